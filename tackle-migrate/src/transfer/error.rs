//! Fatal migration conditions

use std::path::PathBuf;

use super::types::EntityType;

/// Conditions that abort a run
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationError {
    /// A record points at an origin id that was never extracted
    UnresolvedReference {
        kind: EntityType,
        id: u64,
        referenced_by: EntityType,
        referrer_id: u64,
    },
    /// A record about to be imported already exists at the destination
    Collision {
        kind: EntityType,
        id: u64,
        name: Option<String>,
        existing_name: Option<String>,
    },
    /// A snapshot file every run requires is absent
    SnapshotMissing { kind: EntityType, path: PathBuf },
    /// The destination rejected a create
    CreateFailed {
        kind: EntityType,
        id: u64,
        status: Option<u16>,
        message: String,
    },
}

impl std::fmt::Display for MigrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnresolvedReference {
                kind,
                id,
                referenced_by,
                referrer_id,
            } => write!(
                f,
                "{}/{} references {}/{} which was not found in the source extraction",
                referenced_by, referrer_id, kind, id
            ),
            Self::Collision {
                kind,
                id,
                name,
                existing_name,
            } => write!(
                f,
                "Resource {}/{} \"{}\" already exists in the destination as \"{}\"; clean it before running the import",
                kind,
                id,
                name.as_deref().unwrap_or(""),
                existing_name.as_deref().unwrap_or("")
            ),
            Self::SnapshotMissing { kind, path } => write!(
                f,
                "Snapshot for {} not found at {}; run export-source first",
                kind,
                path.display()
            ),
            Self::CreateFailed {
                kind,
                id,
                status,
                message,
            } => match status {
                Some(status) => write!(
                    f,
                    "Creating {}/{} failed with HTTP {}: {}",
                    kind, id, status, message
                ),
                None => write!(f, "Creating {}/{} failed: {}", kind, id, message),
            },
        }
    }
}

impl std::error::Error for MigrationError {}
