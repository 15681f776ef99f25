//! Preloading of the destination's seed data

use anyhow::{Context, Result};
use log::info;

use super::types::{DestinationIndex, SEED_TYPES};
use crate::api::Transport;

/// Fetch every seed type from the destination and index it by name
pub async fn load_destination_index(destination: &dyn Transport) -> Result<DestinationIndex> {
    let mut index = DestinationIndex::new();

    for kind in SEED_TYPES {
        let Some(path) = kind.destination_path() else {
            continue;
        };
        let records = destination
            .list(path)
            .await
            .with_context(|| format!("Failed to load destination {}", kind))?;
        let indexed = index.index(kind, &records);
        info!("Destination has {} {} ({} indexed by name)", records.len(), kind, indexed);
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeTransport;
    use crate::transfer::types::{EntityType, Ref};
    use serde_json::json;

    #[tokio::test]
    async fn test_indexes_every_seed_type() {
        let destination = FakeTransport::new("destination")
            .with_get("/hub/tagtypes", json!([{"id": 1, "name": "Technology"}]))
            .with_get("/hub/tags", json!([{"id": 42, "name": "Java"}]))
            .with_get("/hub/jobfunctions", json!({"jobfunctions": [{"id": 3, "name": "Architect"}]}));

        let index = load_destination_index(&destination).await.unwrap();

        assert_eq!(index.lookup(EntityType::Tags, "Java"), Some(&Ref::new(42, "Java")));
        assert_eq!(index.lookup(EntityType::TagTypes, "Technology").unwrap().id, 1);
        assert_eq!(index.lookup(EntityType::JobFunctions, "Architect").unwrap().id, 3);
        assert_eq!(destination.operations().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_list_is_fatal() {
        let destination = FakeTransport::new("destination")
            .with_get("/hub/tagtypes", json!([]));

        let err = load_destination_index(&destination).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load destination tags"));
    }
}
