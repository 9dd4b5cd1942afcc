//! Local registry of file artifacts.
//!
//! Maps normalized project paths to the resource each file defines. Entries
//! are created on first access and live as long as the owning context; a
//! missing resource in a later catalog listing is the authoritative sign of
//! deletion, so entries are never removed here.

pub mod file_artifacts;

pub use file_artifacts::{FileArtifact, FileArtifactIdentity, FileArtifactRegistry};
