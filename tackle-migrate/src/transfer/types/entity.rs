//! The capability shared by every migrated record type

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::kind::EntityType;

/// Pointer to another entity, serialized as `{"id": .., "name": ..}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ref {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Ref {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }

    /// Pointer carrying only the id
    pub fn id_only(id: u64) -> Self {
        Self { id, name: None }
    }
}

/// Audit fields carried over from the origin system
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_user: Option<String>,
}

/// A record of one [`EntityType`].
///
/// The serialized form is exactly what gets submitted on create.
pub trait Entity: Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync {
    const KIND: EntityType;

    /// Identifier in the system the record came from
    fn origin_id(&self) -> u64;

    /// Name used to match records across systems
    fn natural_key(&self) -> Option<&str> {
        None
    }

    /// Entities this record points at, as `(type, id)`
    fn references(&self) -> Vec<(EntityType, u64)> {
        Vec::new()
    }

    /// `{id, name}` pointer to this record
    fn to_ref(&self) -> Ref {
        Ref {
            id: self.origin_id(),
            name: self.natural_key().map(str::to_owned),
        }
    }
}
