//! Path-keyed registry of file artifacts.

use crate::models::{ResourceKind, ResourceName, ResourceRecord};
use crate::paths::normalize_path;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::debug;

/// Value snapshot of a file artifact's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileArtifactIdentity {
    pub path: String,
    pub kind: Option<ResourceKind>,
    pub name: Option<String>,
}

/// Client-side handle for a project file, optionally bound to a resource.
///
/// Exactly one instance exists per normalized path in a registry; callers
/// share it through `Arc`.
#[derive(Debug)]
pub struct FileArtifact {
    path: String,
    resource: RwLock<Option<ResourceName>>,
}

impl FileArtifact {
    fn new(path: String) -> Self {
        Self {
            path,
            resource: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resource name bound to this file, if known.
    pub fn resource_name(&self) -> Option<ResourceName> {
        self.resource
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn kind(&self) -> Option<ResourceKind> {
        self.resource_name().map(|n| n.kind)
    }

    pub fn name(&self) -> Option<String> {
        self.resource_name().map(|n| n.name)
    }

    pub fn identity(&self) -> FileArtifactIdentity {
        let resource = self.resource_name();
        FileArtifactIdentity {
            path: self.path.clone(),
            kind: resource.as_ref().map(|n| n.kind.clone()),
            name: resource.map(|n| n.name),
        }
    }

    fn set(&self, name: ResourceName) {
        *self.resource.write().unwrap_or_else(PoisonError::into_inner) = Some(name);
    }

    /// Write `name` only when nothing is bound yet. Returns whether it wrote.
    fn set_if_absent(&self, name: ResourceName) -> bool {
        let mut slot = self.resource.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return false;
        }
        *slot = Some(name);
        true
    }

    /// Clear the binding only if it still equals `expected`.
    fn clear_if(&self, expected: &ResourceName) -> bool {
        let mut slot = self.resource.write().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref() != Some(expected) {
            return false;
        }
        *slot = None;
        true
    }
}

/// Registry mapping normalized file paths to their artifacts.
#[derive(Debug, Default)]
pub struct FileArtifactRegistry {
    artifacts: Mutex<HashMap<String, Arc<FileArtifact>>>,
}

impl FileArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<FileArtifact>>> {
        self.artifacts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Artifact for `path`, created with no resource binding on first access.
    pub fn get_file_artifact(&self, path: &str) -> Arc<FileArtifact> {
        let key = normalize_path(path);
        let mut artifacts = self.lock();
        artifacts
            .entry(key)
            .or_insert_with_key(|key| Arc::new(FileArtifact::new(key.clone())))
            .clone()
    }

    /// Value snapshot of the identity at `path`.
    pub fn identity(&self, path: &str) -> FileArtifactIdentity {
        self.get_file_artifact(path).identity()
    }

    /// Optimistically bind `name` to `path` unless a name is already set.
    pub fn set_name_if_absent(&self, path: &str, name: ResourceName) -> bool {
        let artifact = self.get_file_artifact(path);
        let written = artifact.set_if_absent(name);
        if written {
            debug!("Optimistically bound {}", artifact.path());
        }
        written
    }

    /// Authoritatively bind `name` to `path`.
    pub fn set_name(&self, path: &str, name: ResourceName) {
        self.get_file_artifact(path).set(name);
    }

    /// Undo a binding if it is still the one we wrote.
    pub fn clear_name_if(&self, path: &str, expected: &ResourceName) -> bool {
        self.get_file_artifact(path).clear_if(expected)
    }

    /// Bind every file path listed by the catalog to its resource.
    pub fn bind_resources(&self, resources: &[ResourceRecord]) -> usize {
        let mut bound = 0;
        for resource in resources {
            for path in &resource.meta.file_paths {
                self.set_name(path, resource.meta.name.clone());
                bound += 1;
            }
        }
        bound
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
