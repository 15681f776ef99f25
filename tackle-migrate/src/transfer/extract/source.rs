//! Record shapes served by the source (Tackle 1) API

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::transfer::types::Audit;

pub const TAG_TYPES_PATH: &str = "/api/controls/tag-type?size=20000";
pub const JOB_FUNCTIONS_PATH: &str = "/api/controls/job-function?size=20000";
pub const STAKEHOLDER_GROUPS_PATH: &str = "/api/controls/stakeholder-group?size=20000";
pub const STAKEHOLDERS_PATH: &str = "/api/controls/stakeholder?size=20000";
pub const BUSINESS_SERVICES_PATH: &str = "/api/controls/business-service?size=20000";
pub const APPLICATIONS_PATH: &str = "/api/application-inventory/application?size=20000";
pub const DEPENDENCIES_PATH: &str = "/api/application-inventory/applications-dependency?size=20000";
pub const ASSESSMENTS_PATH: &str = "/api/pathfinder/assessments";
pub const ASSESSMENT_RISK_PATH: &str = "/api/pathfinder/assessments/assessment-risk";
pub const ASSESSMENT_CONFIDENCE_PATH: &str = "/api/pathfinder/assessments/confidence";

/// Decode raw records, naming the offending index on failure
pub fn decode<T: DeserializeOwned>(records: Vec<Value>, what: &str) -> Result<Vec<T>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record)
                .with_context(|| format!("Malformed {} record at index {}", what, index))
        })
        .collect()
}

/// Id that the source sends as a number, a string or an `{"id": ..}` object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LooseId {
    Number(u64),
    Text(String),
    Object { id: Box<LooseId> },
}

impl LooseId {
    /// Numeric value; `None` for empty or non-numeric text
    pub fn value(&self) -> Option<u64> {
        match self {
            Self::Number(id) => Some(*id),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Object { id } => id.value(),
        }
    }
}

/// Optional id that reads as `None` when its shape is not understood
fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<LooseId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Deserialize)]
pub struct SourceTagType {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    #[serde(default)]
    pub colour: Option<String>,
    #[serde(default)]
    pub rank: Option<i64>,
    #[serde(default)]
    pub tags: Option<Vec<SourceTag>>,
}

#[derive(Debug, Deserialize)]
pub struct SourceTag {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SourceJobFunction {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct SourceStakeholderGroup {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStakeholder {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub job_function: Option<SourceJobFunction>,
    #[serde(default)]
    pub stakeholder_groups: Option<Vec<SourceStakeholderGroup>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceOwner {
    pub id: u64,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SourceBusinessService {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner: Option<SourceOwner>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReview {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(default)]
    pub proposed_action: Option<String>,
    #[serde(default)]
    pub effort_estimate: Option<String>,
    #[serde(default)]
    pub business_criticality: Option<i64>,
    #[serde(default)]
    pub work_priority: Option<i64>,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceApplication {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<LooseId>>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub business_service: Option<LooseId>,
    #[serde(default)]
    pub review: Option<SourceReview>,
}

#[derive(Debug, Deserialize)]
pub struct SourceApplicationRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SourceDependency {
    pub id: u64,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(rename = "from")]
    pub source: SourceApplicationRef,
    #[serde(rename = "to")]
    pub target: SourceApplicationRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAssessmentHeader {
    pub id: u64,
    pub application_id: u64,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAssessmentDetail {
    #[serde(default)]
    pub stakeholders: Option<Vec<u64>>,
    #[serde(default)]
    pub stakeholder_groups: Option<Vec<u64>>,
    #[serde(default)]
    pub questionnaire: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRisk {
    pub assessment_id: u64,
    pub application_id: u64,
    pub risk: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfidence {
    pub assessment_id: u64,
    pub application_id: u64,
    pub confidence: i64,
}
