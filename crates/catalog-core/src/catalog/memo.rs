//! Selectors that recompute only when the catalog meaningfully changes.

use super::snapshot::CatalogSnapshot;
use crate::error::{CatalogError, Result};
use crate::models::{ResourceKind, ResourceRecord};
use std::sync::Arc;
use tokio::sync::watch;

/// Identity and validity of every record, in listing order.
pub type StructuralKey = Vec<(ResourceKind, String, bool)>;

/// Key that changes only when a resource appears, disappears, is renamed,
/// or flips validity.
pub fn structural_key(resources: &[ResourceRecord]) -> StructuralKey {
    resources
        .iter()
        .map(|r| {
            (
                r.kind().clone(),
                r.name().to_string(),
                r.valid_spec().is_some(),
            )
        })
        .collect()
}

type KeyFn<K> = Box<dyn Fn(&[ResourceRecord]) -> K + Send + Sync>;
type SelectFn<T> = Box<dyn Fn(&[ResourceRecord]) -> T + Send + Sync>;

struct Memo<K, T> {
    key: K,
    value: T,
}

/// Derived value over the catalog cache.
///
/// Checks the snapshot version on every read; on a bump it recomputes the
/// key and reruns the selector only if the key differs from the memoized
/// one.
pub struct MemoizedSelector<T, K = StructuralKey> {
    receiver: watch::Receiver<Arc<CatalogSnapshot>>,
    key: KeyFn<K>,
    select: SelectFn<T>,
    version: Option<u64>,
    memo: Option<Memo<K, T>>,
    computations: u64,
}

impl<T> MemoizedSelector<T, StructuralKey> {
    /// Memoize on [`structural_key`].
    pub fn new<F>(receiver: watch::Receiver<Arc<CatalogSnapshot>>, select: F) -> Self
    where
        F: Fn(&[ResourceRecord]) -> T + Send + Sync + 'static,
    {
        Self::with_key(receiver, structural_key, select)
    }
}

impl<T, K: PartialEq> MemoizedSelector<T, K> {
    /// Memoize on a caller-provided key.
    pub fn with_key<KF, F>(receiver: watch::Receiver<Arc<CatalogSnapshot>>, key: KF, select: F) -> Self
    where
        KF: Fn(&[ResourceRecord]) -> K + Send + Sync + 'static,
        F: Fn(&[ResourceRecord]) -> T + Send + Sync + 'static,
    {
        Self {
            receiver,
            key: Box::new(key),
            select: Box::new(select),
            version: None,
            memo: None,
            computations: 0,
        }
    }

    /// Current value, recomputed if the catalog changed structurally.
    pub fn get(&mut self) -> &T {
        let snapshot = self.receiver.borrow_and_update().clone();
        let version_changed = self.version != Some(snapshot.version);
        self.version = Some(snapshot.version);

        let memo = match self.memo.take() {
            Some(memo) if !version_changed => memo,
            Some(memo) => {
                let key = (self.key)(&snapshot.resources);
                if memo.key == key {
                    memo
                } else {
                    self.compute(key, &snapshot)
                }
            }
            None => {
                let key = (self.key)(&snapshot.resources);
                self.compute(key, &snapshot)
            }
        };
        &self.memo.insert(memo).value
    }

    fn compute(&mut self, key: K, snapshot: &CatalogSnapshot) -> Memo<K, T> {
        self.computations += 1;
        Memo {
            key,
            value: (self.select)(&snapshot.resources),
        }
    }

    /// Wait for the next catalog version.
    pub async fn changed(&mut self) -> Result<()> {
        self.receiver
            .changed()
            .await
            .map_err(|_| CatalogError::Other("Catalog cache was dropped".to_string()))
    }

    /// How many times the selector ran.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogCache;
    use crate::models::{MetricsViewResource, MetricsViewSpec, MetricsViewState};

    fn metrics_view(name: &str, valid: bool, table: &str) -> ResourceRecord {
        let mut record = ResourceRecord::new(ResourceKind::MetricsView, name);
        let spec = MetricsViewSpec {
            table: Some(table.to_string()),
            ..Default::default()
        };
        record.metrics_view = Some(MetricsViewResource {
            spec: Some(spec.clone()),
            state: Some(MetricsViewState {
                valid_spec: valid.then_some(spec),
            }),
        });
        record
    }

    fn count_valid(resources: &[ResourceRecord]) -> usize {
        resources.iter().filter(|r| r.valid_spec().is_some()).count()
    }

    #[test]
    fn test_structural_key_tracks_validity() {
        let key = structural_key(&[metrics_view("a", true, "t"), metrics_view("b", false, "t")]);
        assert_eq!(
            key,
            vec![
                (ResourceKind::MetricsView, "a".to_string(), true),
                (ResourceKind::MetricsView, "b".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_recomputes_only_on_structural_change() {
        let cache = CatalogCache::new();
        let mut selector = MemoizedSelector::new(cache.subscribe(), count_valid);

        assert_eq!(*selector.get(), 0);
        assert_eq!(selector.computations(), 1);

        cache.replace(vec![metrics_view("a", true, "t1")]);
        assert_eq!(*selector.get(), 1);
        assert_eq!(selector.computations(), 2);

        // Same identity and validity, different table: memo holds.
        cache.replace(vec![metrics_view("a", true, "t2")]);
        assert_eq!(*selector.get(), 1);
        assert_eq!(selector.computations(), 2);

        cache.replace(vec![metrics_view("a", false, "t2")]);
        assert_eq!(*selector.get(), 0);
        assert_eq!(selector.computations(), 3);
    }

    #[test]
    fn test_repeated_reads_without_bump_do_not_recompute() {
        let cache = CatalogCache::new();
        cache.replace(vec![metrics_view("a", true, "t")]);
        let mut selector = MemoizedSelector::new(cache.subscribe(), count_valid);
        selector.get();
        selector.get();
        assert_eq!(selector.computations(), 1);
    }

    #[test]
    fn test_custom_key_sees_spec_changes() {
        let cache = CatalogCache::new();
        let mut selector =
            MemoizedSelector::with_key(cache.subscribe(), |r: &[ResourceRecord]| r.to_vec(), |r| {
                r.iter()
                    .filter_map(|r| r.metrics_view_spec().and_then(|s| s.table.clone()))
                    .collect::<Vec<_>>()
            });

        cache.replace(vec![metrics_view("a", true, "t1")]);
        assert_eq!(selector.get(), &vec!["t1".to_string()]);
        cache.replace(vec![metrics_view("a", true, "t2")]);
        assert_eq!(selector.get(), &vec!["t2".to_string()]);
        assert_eq!(selector.computations(), 2);
    }

    #[tokio::test]
    async fn test_changed_wakes_on_replace() {
        let cache = CatalogCache::new();
        let mut selector = MemoizedSelector::new(cache.subscribe(), count_valid);
        selector.get();

        cache.replace(vec![metrics_view("a", true, "t")]);
        selector.changed().await.unwrap();
        assert_eq!(*selector.get(), 1);
    }
}
