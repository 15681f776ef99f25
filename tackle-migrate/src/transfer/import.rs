//! Replay of a snapshot into the destination
//!
//! Types are created in dependency order. The first rejected create aborts
//! the run; whatever was already created stays and has to be removed with a
//! clean run before retrying.

use anyhow::{Context, Result};
use log::{debug, info};

use super::context::{CollectionSlot, Collections};
use super::error::MigrationError;
use super::types::{EntityType, with_entity_type};
use crate::api::{Operation, Transport};

/// Number of records created per type, in creation order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportReport {
    pub created: Vec<(EntityType, usize)>,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.created.iter().map(|(_, count)| count).sum()
    }
}

pub struct Importer<'a> {
    destination: &'a dyn Transport,
}

impl<'a> Importer<'a> {
    pub fn new(destination: &'a dyn Transport) -> Self {
        Self { destination }
    }

    /// Create every record of every creatable type
    pub async fn run(&self, collections: &Collections) -> Result<ImportReport> {
        let mut report = ImportReport::default();

        for kind in EntityType::insert_order() {
            let Some(path) = kind.destination_path() else {
                debug!("Skipping {} (computed by the destination)", kind);
                continue;
            };

            let created =
                with_entity_type!(kind, |T| self.create_all::<T>(path, collections).await)?;
            info!("{}: {} created", kind, created);
            report.created.push((kind, created));
        }

        Ok(report)
    }

    async fn create_all<T: CollectionSlot>(&self, path: &str, collections: &Collections) -> Result<usize> {
        let mut created = 0;

        for entity in collections.get::<T>() {
            let data = serde_json::to_value(entity)
                .with_context(|| format!("Failed to serialize {}/{}", T::KIND, entity.origin_id()))?;

            let result = self
                .destination
                .execute(&Operation::create(path, data))
                .await
                .with_context(|| format!("Failed to create {}/{}", T::KIND, entity.origin_id()))?;

            if !result.is_success() {
                return Err(MigrationError::CreateFailed {
                    kind: T::KIND,
                    id: entity.origin_id(),
                    status: result.status_code,
                    message: result.error.unwrap_or_default(),
                }
                .into());
            }

            debug!("Created {}/{}", T::KIND, entity.origin_id());
            created += 1;
        }

        Ok(created)
    }
}
