//! Per-type JSON snapshot files
//!
//! A snapshot directory holds one `<type>.json` array per entity type. It is
//! the only thing shared between an export run and the later import or
//! clean runs, so every type is written even when its collection is empty.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use super::context::Collections;
use super::error::MigrationError;
use super::types::{Entity, EntityType, TYPES, TypeCollection, with_entity_type};

/// Reads and writes snapshot files under one directory
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the snapshot of `kind`
    pub fn path_for(&self, kind: EntityType) -> PathBuf {
        self.dir.join(format!("{}.json", kind.name()))
    }

    /// Write `collection` to its file, replacing any previous snapshot
    pub fn store<T: Entity>(&self, collection: &TypeCollection<T>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create snapshot directory: {}", self.dir.display())
        })?;

        let path = self.path_for(T::KIND);
        let json = serde_json::to_string_pretty(collection)
            .with_context(|| format!("Failed to serialize {}", T::KIND))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;

        debug!("Stored {} {} to {}", collection.len(), T::KIND, path.display());
        Ok(path)
    }

    /// Read the snapshot of `T`. A missing file is fatal.
    pub fn load<T: Entity>(&self) -> Result<TypeCollection<T>> {
        let path = self.path_for(T::KIND);
        if !path.exists() {
            return Err(MigrationError::SnapshotMissing {
                kind: T::KIND,
                path,
            }
            .into());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        let collection: TypeCollection<T> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid snapshot file: {}", path.display()))?;

        debug!("Loaded {} {} from {}", collection.len(), T::KIND, path.display());
        Ok(collection)
    }

    /// Write every type's collection
    pub fn store_all(&self, collections: &Collections) -> Result<()> {
        for kind in TYPES {
            with_entity_type!(kind, |T| self.store(collections.get::<T>()))?;
        }
        info!("Snapshot written to {}", self.dir.display());
        Ok(())
    }

    /// Read every type's snapshot. All files must be present.
    pub fn load_all(&self) -> Result<Collections> {
        let mut collections = Collections::default();
        for kind in TYPES {
            with_entity_type!(kind, |T| {
                *collections.get_mut::<T>() = self.load::<T>()?;
            });
        }
        info!("Snapshot loaded from {}", self.dir.display());
        Ok(collections)
    }
}
