//! Rename and delete orchestration for file artifacts.
//!
//! A rename or delete touches four places: the local registry, the remote
//! catalog, the request queue and the notification bus. Remote failures stop
//! at this boundary. They are translated into a notification and reported
//! through [`ActionOutcome`]; they never propagate as errors.

use crate::client::{CatalogClient, DeleteFileRequest, RenameFileRequest};
use crate::config::QueueConfig;
use crate::locks::PathLocks;
use crate::models::{ResourceKind, ResourceName, ResourceRecord};
use crate::notifications::{Notification, NotificationBus};
use crate::paths::{
    add_leading_slash, extract_file_name, folder_to_resource_kind, is_main_entity,
    top_level_folder, PRIMARY_EXTENSION,
};
use crate::queue::RequestQueue;
use crate::registry::FileArtifactRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Backend messages with this suffix are shortened to it.
const DIRECTORY_NOT_EMPTY: &str = "directory not empty";

/// Result of a rename or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// The remote call failed; `message` is what was published.
    Failed { message: String },
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed)
    }

    pub fn is_failed(&self) -> bool {
        !self.is_completed()
    }
}

/// Shorten backend messages the user cannot act on verbatim.
pub fn translate_error_message(raw: &str) -> String {
    if raw.ends_with(DIRECTORY_NOT_EMPTY) {
        DIRECTORY_NOT_EMPTY.to_string()
    } else {
        raw.to_string()
    }
}

/// Whether a file of `kind` left the folder that implies its kind for a
/// destination that no longer implies it.
fn moved_out_of_native_folder(kind: &ResourceKind, from_path: &str, to_path: &str) -> bool {
    let from_folder = top_level_folder(from_path);
    let to_folder = top_level_folder(to_path);
    from_folder != to_folder
        && folder_to_resource_kind(&from_folder).as_ref() == Some(kind)
        && !to_path.ends_with(PRIMARY_EXTENSION)
}

/// Coordinates renames, deletes and queued fetches.
#[derive(Clone)]
pub struct Coordinator {
    registry: Arc<FileArtifactRegistry>,
    queue: Arc<RequestQueue>,
    notifications: NotificationBus,
    client: Arc<dyn CatalogClient>,
    locks: PathLocks,
    rollback_optimistic_names: bool,
}

impl Coordinator {
    pub fn new(
        registry: Arc<FileArtifactRegistry>,
        queue: Arc<RequestQueue>,
        notifications: NotificationBus,
        client: Arc<dyn CatalogClient>,
    ) -> Self {
        Self {
            registry,
            queue,
            notifications,
            client,
            locks: PathLocks::new(),
            rollback_optimistic_names: false,
        }
    }

    /// Undo the optimistic destination name when the remote rename fails.
    /// Off by default: a failed rename leaves the copied name in place.
    pub fn with_rollback_optimistic_names(mut self, enable: bool) -> Self {
        self.rollback_optimistic_names = enable;
        self
    }

    /// Rename `from_path` to `to_path`.
    ///
    /// For main entity files the destination inherits the source's resource
    /// name before the remote call, so consumers never see the file unnamed.
    pub async fn rename_file_artifact(
        &self,
        instance_id: &str,
        from_path: &str,
        to_path: &str,
    ) -> ActionOutcome {
        let from_name = extract_file_name(from_path);
        let to_name = extract_file_name(to_path);
        let _guard = self.locks.acquire(&[from_path, to_path]).await;

        let from_resource = self
            .registry
            .get_file_artifact(&add_leading_slash(from_path))
            .resource_name();

        let mut optimistic: Option<ResourceName> = None;
        if is_main_entity(from_path) {
            let to_artifact = self.registry.get_file_artifact(&add_leading_slash(to_path));
            if let (None, Some(resource)) = (to_artifact.name(), from_resource.clone()) {
                if self.registry.set_name_if_absent(to_artifact.path(), resource.clone()) {
                    optimistic = Some(resource);
                }
            }
        }

        let request = RenameFileRequest {
            from_path: from_path.to_string(),
            to_path: to_path.to_string(),
        };
        if let Err(err) = self.client.rename_file(instance_id, &request).await {
            if let Some(written) = optimistic.filter(|_| self.rollback_optimistic_names) {
                if self.registry.clear_name_if(to_path, &written) {
                    debug!("Rolled back optimistic name for {}", to_path);
                }
            }
            let message = format!(
                "Failed to rename {} to {}: {}",
                from_name,
                to_name,
                translate_error_message(&err.backend_message())
            );
            warn!("{}", message);
            self.notifications.publish(Notification::error(message.clone()));
            return ActionOutcome::Failed { message };
        }

        self.queue.remove_by_name(&from_name);

        if let Some(resource) = &from_resource {
            if moved_out_of_native_folder(&resource.kind, from_path, to_path) {
                self.notifications.publish(Notification::warning(format!(
                    "Moving {} out of its native folder. Make sure to specify the resource type with the \"type\" key.",
                    from_name
                )));
            }
        }

        info!("Renamed {} to {}", from_path, to_path);
        ActionOutcome::Completed
    }

    /// Delete `path`. The registry entry is left in place; the next catalog
    /// listing is the authoritative record of the deletion.
    pub async fn delete_file_artifact(
        &self,
        instance_id: &str,
        path: &str,
        force: bool,
    ) -> ActionOutcome {
        let name = extract_file_name(path);
        let _guard = self.locks.acquire(&[path]).await;

        let request = DeleteFileRequest {
            path: path.to_string(),
            force,
        };
        match self.client.delete_file(instance_id, &request).await {
            Ok(()) => {
                self.queue.remove_by_name(&name);
                info!("Deleted {}", path);
                ActionOutcome::Completed
            }
            Err(err) => {
                let message = format!(
                    "Failed to delete {}: {}",
                    name,
                    translate_error_message(&err.backend_message())
                );
                warn!("{}", message);
                self.notifications.publish(Notification::error(message.clone()));
                ActionOutcome::Failed { message }
            }
        }
    }

    /// Fetch one resource through the request queue.
    ///
    /// Returns `None` if the fetch failed or a rename/delete evicted it while
    /// it was in flight.
    pub async fn fetch_resource(
        &self,
        instance_id: &str,
        kind: ResourceKind,
        name: &str,
    ) -> Option<ResourceRecord> {
        let resource_name = ResourceName::new(kind, name);
        let result = self
            .queue
            .run(
                name,
                QueueConfig::FETCH_KEY,
                self.client.get_resource(instance_id, &resource_name),
            )
            .await?;

        match result {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Failed to fetch {}: {}", name, err);
                None
            }
        }
    }

    pub fn locks(&self) -> &PathLocks {
        &self.locks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_directory_not_empty() {
        assert_eq!(
            translate_error_message("remove /project/models: directory not empty"),
            "directory not empty"
        );
        assert_eq!(translate_error_message("directory not empty"), "directory not empty");
    }

    #[test]
    fn test_translate_passes_other_messages_through() {
        assert_eq!(
            translate_error_message("file already exists"),
            "file already exists"
        );
        assert_eq!(
            translate_error_message("directory not empty: /models"),
            "directory not empty: /models"
        );
    }

    #[test]
    fn test_native_folder_move_detection() {
        let model = ResourceKind::Model;
        assert!(moved_out_of_native_folder(&model, "/models/a.sql", "/other/a.yaml"));
        assert!(moved_out_of_native_folder(&model, "/models/a.sql", "/a.yaml"));
        assert!(!moved_out_of_native_folder(&model, "/models/a.sql", "/other/a.sql"));
        assert!(!moved_out_of_native_folder(&model, "/models/a.sql", "/models/sub/a.yaml"));
        assert!(!moved_out_of_native_folder(
            &ResourceKind::Source,
            "/models/a.yaml",
            "/other/a.yaml"
        ));
    }

    #[test]
    fn test_outcome_is_completed() {
        assert!(ActionOutcome::Completed.is_completed());
        assert!(!ActionOutcome::Failed {
            message: "x".into()
        }
        .is_completed());
    }
}
