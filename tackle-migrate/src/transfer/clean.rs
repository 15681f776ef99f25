//! Best-effort removal of previously imported records
//!
//! Walks the types in reverse creation order so dependents go before the
//! records they point at. A failed delete is logged and counted; the target
//! may simply be gone already.

use log::{debug, info, warn};

use super::context::{CollectionSlot, Collections};
use super::types::{EntityType, with_entity_type};
use crate::api::{Operation, Transport};

#[derive(Debug, Clone, PartialEq)]
pub struct CleanEntry {
    pub kind: EntityType,
    pub deleted: usize,
    pub failed: usize,
}

/// Per-type delete outcome, in deletion order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CleanReport {
    pub entries: Vec<CleanEntry>,
}

impl CleanReport {
    pub fn deleted(&self) -> usize {
        self.entries.iter().map(|entry| entry.deleted).sum()
    }

    pub fn failed(&self) -> usize {
        self.entries.iter().map(|entry| entry.failed).sum()
    }
}

pub struct Cleaner<'a> {
    destination: &'a dyn Transport,
}

impl<'a> Cleaner<'a> {
    pub fn new(destination: &'a dyn Transport) -> Self {
        Self { destination }
    }

    /// Delete every snapshot record from the destination. Never fails.
    pub async fn run(&self, collections: &Collections) -> CleanReport {
        let mut report = CleanReport::default();

        for kind in EntityType::delete_order() {
            let Some(path) = kind.destination_path() else {
                debug!("Skipping {} (computed by the destination)", kind);
                continue;
            };

            let entry = with_entity_type!(kind, |T| self.delete_all::<T>(path, collections).await);
            if entry.failed > 0 {
                warn!("{}: {} deleted, {} failed", kind, entry.deleted, entry.failed);
            } else {
                info!("{}: {} deleted", kind, entry.deleted);
            }
            report.entries.push(entry);
        }

        report
    }

    async fn delete_all<T: CollectionSlot>(&self, path: &str, collections: &Collections) -> CleanEntry {
        let mut entry = CleanEntry {
            kind: T::KIND,
            deleted: 0,
            failed: 0,
        };

        for id in collections.get::<T>().ids().into_iter().rev() {
            let operation = Operation::delete(format!("{}/{}", path, id));
            match self.destination.execute(&operation).await {
                Ok(result) if result.is_success() => {
                    debug!("Deleted {}/{}", T::KIND, id);
                    entry.deleted += 1;
                }
                Ok(result) => {
                    warn!(
                        "Could not delete {}/{} (HTTP {}): {}",
                        T::KIND,
                        id,
                        result
                            .status_code
                            .map_or_else(|| "-".to_string(), |status| status.to_string()),
                        result.error.unwrap_or_default()
                    );
                    entry.failed += 1;
                }
                Err(e) => {
                    warn!("Could not delete {}/{}: {:#}", T::KIND, id, e);
                    entry.failed += 1;
                }
            }
        }

        entry
    }
}
