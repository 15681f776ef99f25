//! Lookup tables used to resolve references during extraction
//!
//! [`DestinationIndex`] matches source records against what the destination
//! already holds, by natural key, for the seed types. [`OriginIndex`] maps
//! origin ids to the pointer a later reference must use, which is the
//! destination's record when the origin record was deduplicated away.

use std::collections::HashMap;

use serde_json::Value;

use super::entity::Ref;
use super::kind::EntityType;
use crate::transfer::error::MigrationError;

/// Destination records of the seed types, keyed by name
#[derive(Debug, Default, Clone)]
pub struct DestinationIndex {
    /// Lookup tables: type -> (name -> pointer)
    tables: HashMap<EntityType, HashMap<String, Ref>>,
}

impl DestinationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table for `kind` from raw destination records.
    ///
    /// Records without a numeric `id` or a string `name` are skipped. When
    /// two records share a name the first one wins.
    pub fn index(&mut self, kind: EntityType, records: &[Value]) -> usize {
        let table = self.tables.entry(kind).or_default();
        let mut duplicate_count = 0usize;

        for record in records {
            let Some(id) = record.get("id").and_then(Value::as_u64) else {
                continue;
            };
            let Some(name) = record.get("name").and_then(Value::as_str) else {
                continue;
            };
            if table.contains_key(name) {
                duplicate_count += 1;
                continue;
            }
            table.insert(name.to_string(), Ref::new(id, name));
        }

        if duplicate_count > 0 {
            log::warn!(
                "Destination {} has {} duplicate names (using first match)",
                kind,
                duplicate_count
            );
        }

        table.len()
    }

    /// Destination record of `kind` named `name`, if any
    pub fn lookup(&self, kind: EntityType, name: &str) -> Option<&Ref> {
        self.tables.get(&kind).and_then(|table| table.get(name))
    }

    #[cfg(test)]
    pub fn contains(&self, kind: EntityType, name: &str) -> bool {
        self.lookup(kind, name).is_some()
    }
}

/// Origin ids seen so far in the extraction pass, per type
#[derive(Debug, Default, Clone)]
pub struct OriginIndex {
    tables: HashMap<EntityType, HashMap<u64, Ref>>,
}

impl OriginIndex {
    /// Record what a reference to `(kind, origin_id)` must resolve to
    pub fn insert(&mut self, kind: EntityType, origin_id: u64, resolved: Ref) {
        self.tables.entry(kind).or_default().insert(origin_id, resolved);
    }

    pub fn get(&self, kind: EntityType, origin_id: u64) -> Option<&Ref> {
        self.tables.get(&kind).and_then(|table| table.get(&origin_id))
    }

    /// Resolve a reference found on a record of type `referenced_by`.
    ///
    /// A miss means the referenced record was never extracted, which is a
    /// fatal consistency problem.
    pub fn resolve(
        &self,
        kind: EntityType,
        origin_id: u64,
        referenced_by: EntityType,
        referrer_id: u64,
    ) -> Result<Ref, MigrationError> {
        self.get(kind, origin_id)
            .cloned()
            .ok_or(MigrationError::UnresolvedReference {
                kind,
                id: origin_id,
                referenced_by,
                referrer_id,
            })
    }
}
