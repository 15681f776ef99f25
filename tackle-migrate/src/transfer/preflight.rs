//! Collision gate run before an import touches the destination

use std::collections::HashMap;

use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::Value;

use super::context::{CollectionSlot, Collections};
use super::error::MigrationError;
use super::types::{EntityType, with_entity_type};
use crate::api::Transport;

/// Checks that no snapshot id is already taken at the destination
pub struct PreflightChecker<'a> {
    destination: &'a dyn Transport,
}

impl<'a> PreflightChecker<'a> {
    pub fn new(destination: &'a dyn Transport) -> Self {
        Self { destination }
    }

    /// Fail with [`MigrationError::Collision`] on the first id present on both sides.
    ///
    /// Only reads; nothing is created before every type has been checked.
    pub async fn run(&self, collections: &Collections) -> Result<()> {
        for kind in EntityType::insert_order() {
            let Some(path) = kind.destination_path() else {
                continue;
            };
            if collections.len_of(kind) == 0 {
                debug!("{}: nothing to import, not checked", kind);
                continue;
            }

            let existing = self
                .destination
                .list(path)
                .await
                .with_context(|| format!("Failed to check destination {}", kind))?;
            let existing = index_by_id(&existing);

            with_entity_type!(kind, |T| check::<T>(collections, &existing))?;
            info!("{}: no collisions with {} existing", kind, existing.len());
        }
        Ok(())
    }
}

/// Destination ids mapped to their names
fn index_by_id(records: &[Value]) -> HashMap<u64, Option<String>> {
    records
        .iter()
        .filter_map(|record| {
            let id = record.get("id")?.as_u64()?;
            let name = record.get("name").and_then(Value::as_str).map(str::to_owned);
            Some((id, name))
        })
        .collect()
}

fn check<T: CollectionSlot>(
    collections: &Collections,
    existing: &HashMap<u64, Option<String>>,
) -> Result<(), MigrationError> {
    for entity in collections.get::<T>() {
        if let Some(existing_name) = existing.get(&entity.origin_id()) {
            return Err(MigrationError::Collision {
                kind: T::KIND,
                id: entity.origin_id(),
                name: entity.natural_key().map(str::to_owned),
                existing_name: existing_name.clone(),
            });
        }
    }
    Ok(())
}
