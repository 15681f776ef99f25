//! Per-run state threaded through the export stages

use super::types::{
    Application, Assessment, AssessmentConfidence, AssessmentRisk, BusinessService, Dependency,
    DestinationIndex, Entity, EntityType, Identity, JobFunction, OriginIndex, Proxy, Review,
    Stakeholder, StakeholderGroup, Tag, TagType, TypeCollection, with_entity_type,
};

/// Record types that own a slot in [`Collections`]
pub trait CollectionSlot: Entity {
    fn slot(collections: &Collections) -> &TypeCollection<Self>;
    fn slot_mut(collections: &mut Collections) -> &mut TypeCollection<Self>;
}

macro_rules! collections {
    ($($field:ident: $ty:ty),* $(,)?) => {
        /// One collection per entity type
        #[derive(Debug, Default, Clone)]
        pub struct Collections {
            $(pub $field: TypeCollection<$ty>,)*
        }

        $(
            impl CollectionSlot for $ty {
                fn slot(collections: &Collections) -> &TypeCollection<Self> {
                    &collections.$field
                }

                fn slot_mut(collections: &mut Collections) -> &mut TypeCollection<Self> {
                    &mut collections.$field
                }
            }
        )*
    };
}

collections! {
    tag_types: TagType,
    tags: Tag,
    job_functions: JobFunction,
    stakeholder_groups: StakeholderGroup,
    stakeholders: Stakeholder,
    business_services: BusinessService,
    applications: Application,
    proxies: Proxy,
    dependencies: Dependency,
    assessments: Assessment,
    assessment_risks: AssessmentRisk,
    assessment_confidences: AssessmentConfidence,
    reviews: Review,
    identities: Identity,
}

impl Collections {
    pub fn get<T: CollectionSlot>(&self) -> &TypeCollection<T> {
        T::slot(self)
    }

    pub fn get_mut<T: CollectionSlot>(&mut self) -> &mut TypeCollection<T> {
        T::slot_mut(self)
    }

    /// Append `entity` to its type's collection (no-op if the id is present)
    pub fn add<T: CollectionSlot>(&mut self, entity: T) -> bool {
        T::slot_mut(self).add(entity)
    }

    pub fn len_of(&self, kind: EntityType) -> usize {
        with_entity_type!(kind, |T| self.get::<T>().len())
    }

    /// Every `(type, id)` reference held by a record of `kind`
    #[cfg(test)]
    pub fn references_of(&self, kind: EntityType) -> Vec<(EntityType, u64)> {
        with_entity_type!(kind, |T| self
            .get::<T>()
            .iter()
            .flat_map(|entity| entity.references())
            .collect())
    }
}

/// State of one export run.
///
/// Built once, passed by reference to each stage, dropped at the end of the
/// run.
#[derive(Debug, Default)]
pub struct RunContext {
    pub destination: DestinationIndex,
    pub origin: OriginIndex,
    pub collections: Collections,
}

impl RunContext {
    pub fn with_destination(destination: DestinationIndex) -> Self {
        Self {
            destination,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::types::{Audit, Ref, TYPES};

    #[test]
    fn test_add_routes_to_typed_slot() {
        let mut collections = Collections::default();
        collections.add(JobFunction {
            id: 1,
            audit: Audit::default(),
            name: "Architect".to_string(),
        });
        assert_eq!(collections.job_functions.len(), 1);
        assert_eq!(collections.len_of(EntityType::JobFunctions), 1);
        assert_eq!(collections.len_of(EntityType::Tags), 0);
    }

    #[test]
    fn test_references_of() {
        let mut collections = Collections::default();
        collections.add(Tag {
            id: 5,
            audit: Audit::default(),
            name: "Java".to_string(),
            tag_type: Ref::new(1, "Language"),
        });
        assert_eq!(
            collections.references_of(EntityType::Tags),
            vec![(EntityType::TagTypes, 1)]
        );
        for kind in TYPES {
            if kind != EntityType::Tags {
                assert!(collections.references_of(kind).is_empty());
            }
        }
    }
}
