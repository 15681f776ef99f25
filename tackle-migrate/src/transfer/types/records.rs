//! Per-type record shapes as submitted to the destination

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::{Audit, Entity, Ref};
use super::kind::EntityType;

/// Tag category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagType {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
}

impl Entity for TagType {
    const KIND: EntityType = EntityType::TagTypes;

    fn origin_id(&self) -> u64 {
        self.id
    }

    fn natural_key(&self) -> Option<&str> {
        Some(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    /// Owning category
    pub tag_type: Ref,
}

impl Entity for Tag {
    const KIND: EntityType = EntityType::Tags;

    fn origin_id(&self) -> u64 {
        self.id
    }

    fn natural_key(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn references(&self) -> Vec<(EntityType, u64)> {
        vec![(EntityType::TagTypes, self.tag_type.id)]
    }
}

/// Job role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFunction {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
}

impl Entity for JobFunction {
    const KIND: EntityType = EntityType::JobFunctions;

    fn origin_id(&self) -> u64 {
        self.id
    }

    fn natural_key(&self) -> Option<&str> {
        Some(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeholderGroup {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for StakeholderGroup {
    const KIND: EntityType = EntityType::StakeholderGroups;

    fn origin_id(&self) -> u64 {
        self.id
    }

    fn natural_key(&self) -> Option<&str> {
        Some(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stakeholder {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_function: Option<Ref>,
    #[serde(default)]
    pub stakeholder_groups: Vec<Ref>,
}

impl Entity for Stakeholder {
    const KIND: EntityType = EntityType::Stakeholders;

    fn origin_id(&self) -> u64 {
        self.id
    }

    fn natural_key(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn references(&self) -> Vec<(EntityType, u64)> {
        self.job_function
            .iter()
            .map(|jf| (EntityType::JobFunctions, jf.id))
            .chain(
                self.stakeholder_groups
                    .iter()
                    .map(|g| (EntityType::StakeholderGroups, g.id)),
            )
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessService {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning stakeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Ref>,
}

impl Entity for BusinessService {
    const KIND: EntityType = EntityType::BusinessServices;

    fn origin_id(&self) -> u64 {
        self.id
    }

    fn natural_key(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn references(&self) -> Vec<(EntityType, u64)> {
        self.owner
            .iter()
            .map(|owner| (EntityType::Stakeholders, owner.id))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default)]
    pub tags: Vec<Ref>,
    /// Required by the destination; may be patched into the snapshot by hand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_service: Option<Ref>,
}

impl Entity for Application {
    const KIND: EntityType = EntityType::Applications;

    fn origin_id(&self) -> u64 {
        self.id
    }

    fn natural_key(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn references(&self) -> Vec<(EntityType, u64)> {
        self.tags
            .iter()
            .map(|tag| (EntityType::Tags, tag.id))
            .chain(
                self.business_service
                    .iter()
                    .map(|bs| (EntityType::BusinessServices, bs.id)),
            )
            .collect()
    }
}

/// Extension point: never populated from the source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proxy {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub kind: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
}

impl Entity for Proxy {
    const KIND: EntityType = EntityType::Proxies;

    fn origin_id(&self) -> u64 {
        self.id
    }
}

/// Directed edge between two applications.
///
/// Endpoints are copied from the source without remapping, which assumes
/// both systems agree on application ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(rename = "from")]
    pub source: Ref,
    #[serde(rename = "to")]
    pub target: Ref,
}

impl Entity for Dependency {
    const KIND: EntityType = EntityType::Dependencies;

    fn origin_id(&self) -> u64 {
        self.id
    }

    fn references(&self) -> Vec<(EntityType, u64)> {
        vec![
            (EntityType::Applications, self.source.id),
            (EntityType::Applications, self.target.id),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: u64,
    pub application_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub stakeholders: Vec<u64>,
    #[serde(default)]
    pub stakeholder_groups: Vec<u64>,
    /// Questions and answers, passed through untouched
    #[serde(default)]
    pub questionnaire: Value,
}

impl Entity for Assessment {
    const KIND: EntityType = EntityType::Assessments;

    fn origin_id(&self) -> u64 {
        self.id
    }

    fn references(&self) -> Vec<(EntityType, u64)> {
        std::iter::once((EntityType::Applications, self.application_id))
            .chain(self.stakeholders.iter().map(|id| (EntityType::Stakeholders, *id)))
            .chain(
                self.stakeholder_groups
                    .iter()
                    .map(|id| (EntityType::StakeholderGroups, *id)),
            )
            .collect()
    }
}

/// Risk computed for one assessment (derived, kept for inspection only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRisk {
    pub assessment_id: u64,
    pub application_id: u64,
    pub risk: String,
}

impl Entity for AssessmentRisk {
    const KIND: EntityType = EntityType::AssessmentRisks;

    fn origin_id(&self) -> u64 {
        self.assessment_id
    }

    fn references(&self) -> Vec<(EntityType, u64)> {
        vec![
            (EntityType::Applications, self.application_id),
            (EntityType::Assessments, self.assessment_id),
        ]
    }
}

/// Confidence computed for one assessment (derived, kept for inspection only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentConfidence {
    pub assessment_id: u64,
    pub application_id: u64,
    pub confidence: i64,
}

impl Entity for AssessmentConfidence {
    const KIND: EntityType = EntityType::AssessmentConfidences;

    fn origin_id(&self) -> u64 {
        self.assessment_id
    }

    fn references(&self) -> Vec<(EntityType, u64)> {
        vec![
            (EntityType::Applications, self.application_id),
            (EntityType::Assessments, self.assessment_id),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort_estimate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_criticality: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub application: Ref,
}

impl Entity for Review {
    const KIND: EntityType = EntityType::Reviews;

    fn origin_id(&self) -> u64 {
        self.id
    }

    fn references(&self) -> Vec<(EntityType, u64)> {
        vec![(EntityType::Applications, self.application.id)]
    }
}

/// Extension point: never populated from the source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub kind: String,
}

impl Entity for Identity {
    const KIND: EntityType = EntityType::Identities;

    fn origin_id(&self) -> u64 {
        self.id
    }

    fn natural_key(&self) -> Option<&str> {
        Some(&self.name)
    }
}
