//! Ordered, id-deduplicated list of records of one type

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::entity::Entity;

/// Append-only collection keyed by origin id.
///
/// Adding a record whose id is already present is a no-op; insertion order
/// is preserved and is the order records are created in.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeCollection<T> {
    items: Vec<T>,
    ids: HashSet<u64>,
}

impl<T> Default for TypeCollection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            ids: HashSet::new(),
        }
    }
}

impl<T: Entity> TypeCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entity` unless its id is already present. Returns whether it was added.
    pub fn add(&mut self, entity: T) -> bool {
        if !self.ids.insert(entity.origin_id()) {
            return false;
        }
        self.items.push(entity);
        true
    }

    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        if !self.contains(id) {
            return None;
        }
        self.items.iter().find(|item| item.origin_id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.items.iter().map(Entity::origin_id).collect()
    }
}

impl<T: Entity> FromIterator<T> for TypeCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut collection = Self::new();
        for item in iter {
            collection.add(item);
        }
        collection
    }
}

impl<'a, T> IntoIterator for &'a TypeCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize> Serialize for TypeCollection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Entity> Deserialize<'de> for TypeCollection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Ok(items.into_iter().collect())
    }
}
