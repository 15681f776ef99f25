//! The fixed set of migrated entity types and their dependency order

use serde::{Deserialize, Serialize};

/// One migrated entity type.
///
/// Variants are declared in dependency order: a type only references types
/// declared before it. `Ord` follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    TagTypes,
    Tags,
    JobFunctions,
    StakeholderGroups,
    Stakeholders,
    BusinessServices,
    Applications,
    Proxies,
    Dependencies,
    Assessments,
    AssessmentRisks,
    AssessmentConfidences,
    Reviews,
    Identities,
}

/// All types in creation order. Deletion walks this list in reverse.
pub const TYPES: [EntityType; 14] = [
    EntityType::TagTypes,
    EntityType::Tags,
    EntityType::JobFunctions,
    EntityType::StakeholderGroups,
    EntityType::Stakeholders,
    EntityType::BusinessServices,
    EntityType::Applications,
    EntityType::Proxies,
    EntityType::Dependencies,
    EntityType::Assessments,
    EntityType::AssessmentRisks,
    EntityType::AssessmentConfidences,
    EntityType::Reviews,
    EntityType::Identities,
];

/// Types a fresh destination ships pre-populated; deduplicated by name
pub const SEED_TYPES: [EntityType; 3] = [
    EntityType::TagTypes,
    EntityType::Tags,
    EntityType::JobFunctions,
];

impl EntityType {
    /// Destination schema name, also the snapshot file stem
    pub fn name(self) -> &'static str {
        match self {
            Self::TagTypes => "tagtypes",
            Self::Tags => "tags",
            Self::JobFunctions => "jobfunctions",
            Self::StakeholderGroups => "stakeholdergroups",
            Self::Stakeholders => "stakeholders",
            Self::BusinessServices => "businessservices",
            Self::Applications => "applications",
            Self::Proxies => "proxies",
            Self::Dependencies => "dependencies",
            Self::Assessments => "assessments",
            Self::AssessmentRisks => "assessments_risks",
            Self::AssessmentConfidences => "assessments_confidences",
            Self::Reviews => "reviews",
            Self::Identities => "identities",
        }
    }

    pub fn is_seed(self) -> bool {
        SEED_TYPES.contains(&self)
    }

    /// Destination collection path.
    ///
    /// `None` for types computed server-side by the destination, which are
    /// never created or deleted.
    pub fn destination_path(self) -> Option<&'static str> {
        let path = match self {
            Self::TagTypes => "/hub/tagtypes",
            Self::Tags => "/hub/tags",
            Self::JobFunctions => "/hub/jobfunctions",
            Self::StakeholderGroups => "/hub/stakeholdergroups",
            Self::Stakeholders => "/hub/stakeholders",
            Self::BusinessServices => "/hub/businessservices",
            Self::Applications => "/hub/applications",
            Self::Proxies => "/hub/proxies",
            Self::Dependencies => "/hub/dependencies",
            Self::Assessments => "/hub/pathfinder/assessments",
            Self::Reviews => "/hub/reviews",
            Self::Identities => "/hub/identities",
            Self::AssessmentRisks | Self::AssessmentConfidences => return None,
        };
        Some(path)
    }

    /// Creation order (dependencies first)
    pub fn insert_order() -> impl Iterator<Item = EntityType> {
        TYPES.into_iter()
    }

    /// Deletion order, the exact reverse of [`EntityType::insert_order`]
    pub fn delete_order() -> impl Iterator<Item = EntityType> {
        TYPES.into_iter().rev()
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_match_declaration_order() {
        assert!(TYPES.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_delete_order_reverses_insert() {
        let mut insert: Vec<_> = EntityType::insert_order().collect();
        let delete: Vec<_> = EntityType::delete_order().collect();
        insert.reverse();
        assert_eq!(delete, insert);
        assert_eq!(delete.first(), Some(&EntityType::Identities));
        assert_eq!(delete.last(), Some(&EntityType::TagTypes));
    }

    #[test]
    fn test_names_are_unique() {
        let names: std::collections::HashSet<_> = TYPES.iter().map(|kind| kind.name()).collect();
        assert_eq!(names.len(), TYPES.len());
    }

    #[test]
    fn test_seed_types_precede_organizational_types() {
        for seed in SEED_TYPES {
            assert!(seed.is_seed());
            assert!(seed < EntityType::StakeholderGroups);
        }
        assert!(!EntityType::Applications.is_seed());
    }

    #[test]
    fn test_derived_types_have_no_destination_path() {
        let derived: Vec<_> = TYPES
            .into_iter()
            .filter(|kind| kind.destination_path().is_none())
            .collect();
        assert_eq!(
            derived,
            vec![EntityType::AssessmentRisks, EntityType::AssessmentConfidences]
        );
    }
}
