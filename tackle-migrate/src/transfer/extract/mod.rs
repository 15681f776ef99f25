//! Extraction of the source inventory into typed collections
//!
//! [`EntityGraphBuilder`] walks [`TYPES`] in order, fetches each type from
//! the source and projects it into destination records. References are
//! resolved as they are met, against what earlier steps put into the
//! [`RunContext`].
//!
//! Seed types (tag categories, tags, job functions) whose name already
//! exists at the destination are not collected; their origin id is mapped
//! onto the destination record instead so later references follow it.

mod source;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde_json::json;

use self::source::{
    APPLICATIONS_PATH, ASSESSMENT_CONFIDENCE_PATH, ASSESSMENT_RISK_PATH, ASSESSMENTS_PATH,
    BUSINESS_SERVICES_PATH, DEPENDENCIES_PATH, JOB_FUNCTIONS_PATH, LooseId, STAKEHOLDER_GROUPS_PATH,
    STAKEHOLDERS_PATH, SourceApplication, SourceAssessmentDetail, SourceAssessmentHeader,
    SourceBusinessService, SourceConfidence, SourceDependency, SourceJobFunction, SourceRisk,
    SourceStakeholder, SourceStakeholderGroup, SourceTagType, TAG_TYPES_PATH, decode,
};
use super::context::{CollectionSlot, RunContext};
use super::types::{
    Application, Assessment, AssessmentConfidence, AssessmentRisk, BusinessService, Dependency,
    Entity, EntityType, JobFunction, Ref, Review, Stakeholder, StakeholderGroup, TYPES, Tag, TagType,
};
use crate::api::Transport;

/// Builds the entity graph for one export run
pub struct EntityGraphBuilder<'a> {
    source: &'a dyn Transport,
    ctx: &'a mut RunContext,
}

impl<'a> EntityGraphBuilder<'a> {
    pub fn new(source: &'a dyn Transport, ctx: &'a mut RunContext) -> Self {
        Self { source, ctx }
    }

    /// Extract every type in dependency order
    pub async fn run(mut self) -> Result<()> {
        for kind in TYPES {
            self.extract(kind)
                .await
                .with_context(|| format!("Failed to export {}", kind))?;
            info!("{}: {} collected", kind, self.ctx.collections.len_of(kind));
        }
        Ok(())
    }

    async fn extract(&mut self, kind: EntityType) -> Result<()> {
        match kind {
            EntityType::TagTypes => self.extract_tag_types().await,
            // Collected together with their categories
            EntityType::Tags => Ok(()),
            EntityType::JobFunctions => self.extract_job_functions().await,
            EntityType::StakeholderGroups => self.extract_stakeholder_groups().await,
            EntityType::Stakeholders => self.extract_stakeholders().await,
            EntityType::BusinessServices => self.extract_business_services().await,
            EntityType::Applications => self.extract_applications().await,
            EntityType::Proxies | EntityType::Identities => {
                debug!("{} are not exported from the source", kind);
                Ok(())
            }
            EntityType::Dependencies => self.extract_dependencies().await,
            EntityType::Assessments => self.extract_assessments().await,
            EntityType::AssessmentRisks => self.extract_assessment_risks().await,
            EntityType::AssessmentConfidences => self.extract_assessment_confidences().await,
            // Embedded in the application payload
            EntityType::Reviews => Ok(()),
        }
    }

    /// Collect `entity` and record what references to its origin id resolve to.
    ///
    /// For seed types, a destination record with the same name takes the
    /// place of `entity`, which is then dropped.
    fn admit<T: CollectionSlot>(&mut self, entity: T) -> Ref {
        let origin_id = entity.origin_id();
        let existing = if T::KIND.is_seed() {
            entity
                .natural_key()
                .and_then(|name| self.ctx.destination.lookup(T::KIND, name))
                .cloned()
        } else {
            None
        };

        let resolved = match existing {
            Some(existing) => {
                debug!(
                    "{}/{} \"{}\" already exists in the destination as id {}",
                    T::KIND,
                    origin_id,
                    existing.name.as_deref().unwrap_or(""),
                    existing.id
                );
                existing
            }
            None => {
                let pointer = entity.to_ref();
                self.ctx.collections.add(entity);
                pointer
            }
        };

        self.ctx.origin.insert(T::KIND, origin_id, resolved.clone());
        resolved
    }

    async fn extract_tag_types(&mut self) -> Result<()> {
        let records = self.source.list(TAG_TYPES_PATH).await?;
        for tag_type in decode::<SourceTagType>(records, "tag type")? {
            let category = self.admit(TagType {
                id: tag_type.id,
                audit: tag_type.audit,
                name: tag_type.name,
                colour: tag_type.colour,
                rank: tag_type.rank,
            });

            for tag in tag_type.tags.unwrap_or_default() {
                self.admit(Tag {
                    id: tag.id,
                    audit: tag.audit,
                    name: tag.name,
                    tag_type: category.clone(),
                });
            }
        }
        Ok(())
    }

    async fn extract_job_functions(&mut self) -> Result<()> {
        let records = self.source.list(JOB_FUNCTIONS_PATH).await?;
        for job_function in decode::<SourceJobFunction>(records, "job function")? {
            self.admit(job_function_from(job_function));
        }
        Ok(())
    }

    async fn extract_stakeholder_groups(&mut self) -> Result<()> {
        let records = self.source.list(STAKEHOLDER_GROUPS_PATH).await?;
        for group in decode::<SourceStakeholderGroup>(records, "stakeholder group")? {
            self.admit(stakeholder_group_from(group));
        }
        Ok(())
    }

    async fn extract_stakeholders(&mut self) -> Result<()> {
        let records = self.source.list(STAKEHOLDERS_PATH).await?;
        for stakeholder in decode::<SourceStakeholder>(records, "stakeholder")? {
            let mut groups = Vec::new();
            for group in stakeholder.stakeholder_groups.unwrap_or_default() {
                groups.push(self.admit(stakeholder_group_from(group)));
            }

            // Matched by role name; an unknown role is minted as a new job function
            let job_function = stakeholder
                .job_function
                .map(|job_function| self.admit(job_function_from(job_function)));

            self.admit(Stakeholder {
                id: stakeholder.id,
                audit: stakeholder.audit,
                name: stakeholder.display_name,
                email: stakeholder.email.unwrap_or_default(),
                job_function,
                stakeholder_groups: groups,
            });
        }
        Ok(())
    }

    async fn extract_business_services(&mut self) -> Result<()> {
        let records = self.source.list(BUSINESS_SERVICES_PATH).await?;
        for service in decode::<SourceBusinessService>(records, "business service")? {
            self.admit(BusinessService {
                id: service.id,
                audit: service.audit,
                name: service.name,
                description: service.description,
                owner: service.owner.map(|owner| Ref {
                    id: owner.id,
                    name: owner.display_name,
                }),
            });
        }
        Ok(())
    }

    async fn extract_applications(&mut self) -> Result<()> {
        let records = self.source.list(APPLICATIONS_PATH).await?;
        for app in decode::<SourceApplication>(records, "application")? {
            let mut tags = Vec::new();
            for raw in app.tags.unwrap_or_default() {
                let tag_id = raw.value().with_context(|| {
                    format!("Application {} has a malformed tag id {:?}", app.id, raw)
                })?;
                let tag = self.ctx.origin.resolve(
                    EntityType::Tags,
                    tag_id,
                    EntityType::Applications,
                    app.id,
                )?;
                tags.push(tag);
            }

            let business_service = app
                .business_service
                .as_ref()
                .and_then(LooseId::value)
                .map(Ref::id_only);
            if business_service.is_none() {
                warn!(
                    "Application {} \"{}\" has no business service, which the destination requires; set it in {}.json before importing",
                    app.id,
                    app.name,
                    EntityType::Applications
                );
            }

            let application = Application {
                id: app.id,
                audit: app.audit,
                name: app.name,
                description: app.description,
                comments: app.comments,
                tags,
                business_service,
            };

            if let Some(review) = app.review {
                self.admit(Review {
                    id: review.id,
                    audit: review.audit,
                    proposed_action: review.proposed_action,
                    effort_estimate: review.effort_estimate,
                    business_criticality: review.business_criticality,
                    work_priority: review.work_priority,
                    comments: review.comments,
                    application: application.to_ref(),
                });
            }

            self.admit(application);
        }
        Ok(())
    }

    async fn extract_dependencies(&mut self) -> Result<()> {
        let records = self.source.list(DEPENDENCIES_PATH).await?;
        let dependencies = decode::<SourceDependency>(records, "dependency")?;
        if !dependencies.is_empty() {
            warn!(
                "Dependency endpoints are copied with their source application ids; they are only valid if the destination keeps the same ids"
            );
        }

        for dependency in dependencies {
            self.admit(Dependency {
                id: dependency.id,
                audit: dependency.audit,
                source: Ref::new(dependency.source.id, dependency.source.name),
                target: Ref::new(dependency.target.id, dependency.target.name),
            });
        }
        Ok(())
    }

    async fn extract_assessments(&mut self) -> Result<()> {
        for application_id in self.ctx.collections.applications.ids() {
            let path = format!("{}?applicationId={}", ASSESSMENTS_PATH, application_id);
            let headers = self.source.list(&path).await?;

            for header in decode::<SourceAssessmentHeader>(headers, "assessment")? {
                let detail = self
                    .source
                    .get(&format!("{}/{}", ASSESSMENTS_PATH, header.id))
                    .await?;
                let detail: SourceAssessmentDetail = serde_json::from_value(detail)
                    .with_context(|| format!("Malformed assessment {}", header.id))?;

                self.admit(Assessment {
                    id: header.id,
                    application_id: header.application_id,
                    status: header.status,
                    stakeholders: detail.stakeholders.unwrap_or_default(),
                    stakeholder_groups: detail.stakeholder_groups.unwrap_or_default(),
                    questionnaire: detail.questionnaire,
                });
            }
        }
        Ok(())
    }

    async fn extract_assessment_risks(&mut self) -> Result<()> {
        for application_id in self.ctx.collections.applications.ids() {
            let records = self
                .source
                .query(ASSESSMENT_RISK_PATH, json!([{ "applicationId": application_id }]))
                .await?;
            for risk in decode::<SourceRisk>(records, "assessment risk")? {
                self.admit(AssessmentRisk {
                    assessment_id: risk.assessment_id,
                    application_id: risk.application_id,
                    risk: risk.risk,
                });
            }
        }
        Ok(())
    }

    async fn extract_assessment_confidences(&mut self) -> Result<()> {
        for application_id in self.ctx.collections.applications.ids() {
            let records = self
                .source
                .query(
                    ASSESSMENT_CONFIDENCE_PATH,
                    json!([{ "applicationId": application_id }]),
                )
                .await?;
            for confidence in decode::<SourceConfidence>(records, "assessment confidence")? {
                self.admit(AssessmentConfidence {
                    assessment_id: confidence.assessment_id,
                    application_id: confidence.application_id,
                    confidence: confidence.confidence,
                });
            }
        }
        Ok(())
    }
}

fn job_function_from(source: SourceJobFunction) -> JobFunction {
    JobFunction {
        id: source.id,
        audit: source.audit,
        name: source.role,
    }
}

fn stakeholder_group_from(source: SourceStakeholderGroup) -> StakeholderGroup {
    StakeholderGroup {
        id: source.id,
        audit: source.audit,
        name: source.name,
        description: source.description,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::source::*;
    use super::*;
    use crate::api::fake::FakeTransport;
    use crate::transfer::error::MigrationError;
    use crate::transfer::types::DestinationIndex;

    /// Source with every collection endpoint present and empty
    fn empty_source() -> FakeTransport {
        [
            TAG_TYPES_PATH,
            JOB_FUNCTIONS_PATH,
            STAKEHOLDER_GROUPS_PATH,
            STAKEHOLDERS_PATH,
            BUSINESS_SERVICES_PATH,
            APPLICATIONS_PATH,
            DEPENDENCIES_PATH,
        ]
        .into_iter()
        .fold(FakeTransport::new("source"), |source, path| {
            source.with_get(path, json!([]))
        })
    }

    /// Register `applications` and an empty assessment list for each of them
    fn with_applications(source: FakeTransport, applications: Value) -> FakeTransport {
        let ids: Vec<u64> = applications
            .as_array()
            .map(|apps| apps.iter().filter_map(|app| app["id"].as_u64()).collect())
            .unwrap_or_default();

        ids.into_iter().fold(
            source.with_get(APPLICATIONS_PATH, applications),
            |source, id| source.with_get(&format!("{}?applicationId={}", ASSESSMENTS_PATH, id), json!([])),
        )
    }

    fn language_tag_types() -> Value {
        json!([{
            "id": 1,
            "name": "Language",
            "colour": "#ff0000",
            "rank": 2,
            "tags": [
                {"id": 99, "name": "Java"},
                {"id": 100, "name": "Go"}
            ]
        }])
    }

    async fn build(source: &FakeTransport, destination: DestinationIndex) -> Result<RunContext> {
        let mut ctx = RunContext::with_destination(destination);
        EntityGraphBuilder::new(source, &mut ctx).run().await?;
        Ok(ctx)
    }

    #[tokio::test]
    async fn test_deduplicated_tag_is_remapped_onto_destination() {
        let mut destination = DestinationIndex::new();
        destination.index(EntityType::TagTypes, &[json!({"id": 5, "name": "Framework"})]);
        destination.index(
            EntityType::Tags,
            &[json!({"id": 42, "name": "Java", "tagType": {"id": 5}})],
        );

        let source = with_applications(
            empty_source().with_get(TAG_TYPES_PATH, language_tag_types()),
            json!([{"id": 7, "name": "Billing", "tags": [99, "100"], "businessService": "3"}]),
        );

        let ctx = build(&source, destination).await.unwrap();

        let tags = &ctx.collections.tags;
        assert!(tags.iter().all(|tag| tag.name != "Java"));
        assert!(!tags.contains(99));
        assert_eq!(tags.get(100).unwrap().tag_type, Ref::new(1, "Language"));
        assert_eq!(ctx.collections.tag_types.len(), 1);

        let app = ctx.collections.applications.get(7).unwrap();
        assert_eq!(app.tags, vec![Ref::new(42, "Java"), Ref::new(100, "Go")]);
        assert_eq!(app.business_service, Some(Ref::id_only(3)));
    }

    #[tokio::test]
    async fn test_deduplicated_category_is_used_by_its_tags() {
        let mut destination = DestinationIndex::new();
        destination.index(EntityType::TagTypes, &[json!({"id": 8, "name": "Language"})]);

        let source = empty_source().with_get(TAG_TYPES_PATH, language_tag_types());
        let ctx = build(&source, destination).await.unwrap();

        assert!(ctx.collections.tag_types.is_empty());
        assert_eq!(ctx.collections.tags.len(), 2);
        for tag in &ctx.collections.tags {
            assert_eq!(tag.tag_type, Ref::new(8, "Language"));
        }
    }

    #[tokio::test]
    async fn test_stored_seed_records_never_share_a_destination_name() {
        let mut destination = DestinationIndex::new();
        destination.index(EntityType::Tags, &[json!({"id": 42, "name": "Java"})]);
        destination.index(EntityType::JobFunctions, &[json!({"id": 3, "name": "Architect"})]);

        let source = empty_source()
            .with_get(TAG_TYPES_PATH, language_tag_types())
            .with_get(
                JOB_FUNCTIONS_PATH,
                json!([{"id": 1, "role": "Architect"}, {"id": 2, "role": "Developer"}]),
            );
        let ctx = build(&source, destination.clone()).await.unwrap();

        for tag in &ctx.collections.tags {
            assert!(!destination.contains(EntityType::Tags, &tag.name));
        }
        for job_function in &ctx.collections.job_functions {
            assert!(!destination.contains(EntityType::JobFunctions, &job_function.name));
        }
        assert_eq!(ctx.collections.job_functions.ids(), vec![2]);
    }

    #[tokio::test]
    async fn test_review_is_emitted_only_when_embedded() {
        let source = with_applications(
            empty_source(),
            json!([
                {"id": 1, "name": "Billing", "businessService": {"id": 3}},
                {
                    "id": 2,
                    "name": "Payroll",
                    "businessService": 3,
                    "review": {
                        "id": 50,
                        "proposedAction": "rehost",
                        "effortEstimate": "small",
                        "businessCriticality": 4,
                        "workPriority": 2,
                        "comments": "easy"
                    }
                }
            ]),
        );
        let ctx = build(&source, DestinationIndex::new()).await.unwrap();

        assert_eq!(ctx.collections.applications.len(), 2);
        assert_eq!(ctx.collections.reviews.len(), 1);
        assert_eq!(
            ctx.collections.applications.get(1).unwrap().business_service,
            Some(Ref::id_only(3))
        );

        let review = ctx.collections.reviews.get(50).unwrap();
        assert_eq!(review.application, Ref::new(2, "Payroll"));
        assert_eq!(review.proposed_action.as_deref(), Some("rehost"));
        assert_eq!(review.business_criticality, Some(4));
    }

    #[tokio::test]
    async fn test_unknown_tag_reference_is_fatal() {
        let source = with_applications(
            empty_source().with_get(TAG_TYPES_PATH, language_tag_types()),
            json!([{"id": 4, "name": "Orphan", "tags": [7]}]),
        );

        let err = build(&source, DestinationIndex::new()).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<MigrationError>(),
            Some(&MigrationError::UnresolvedReference {
                kind: EntityType::Tags,
                id: 7,
                referenced_by: EntityType::Applications,
                referrer_id: 4,
            })
        );
        assert!(format!("{:#}", err).contains("Failed to export applications"));
    }

    #[tokio::test]
    async fn test_missing_business_service_is_not_fatal() {
        let source = with_applications(
            empty_source(),
            json!([
                {"id": 1, "name": "Billing", "businessService": null},
                {"id": 2, "name": "Payroll", "businessService": {"name": "Finance"}},
                {"id": 3, "name": "Ledger", "businessService": [3]}
            ]),
        );
        let ctx = build(&source, DestinationIndex::new()).await.unwrap();
        for id in [1, 2, 3] {
            assert_eq!(ctx.collections.applications.get(id).unwrap().business_service, None);
        }
    }

    #[tokio::test]
    async fn test_stakeholder_resolves_groups_and_job_function() {
        let mut destination = DestinationIndex::new();
        destination.index(EntityType::JobFunctions, &[json!({"id": 30, "name": "Manager"})]);

        let source = empty_source().with_get(
            STAKEHOLDERS_PATH,
            json!([
                {
                    "id": 1,
                    "displayName": "Ada",
                    "email": "ada@example.com",
                    "jobFunction": {"id": 9, "role": "Manager"},
                    "stakeholderGroups": [{"id": 11, "name": "Ops"}]
                },
                {
                    "id": 2,
                    "displayName": "Grace",
                    "jobFunction": {"id": 10, "role": "Auditor"},
                    "stakeholderGroups": [{"id": 11, "name": "Ops"}, {"id": 12, "name": "Audit"}]
                }
            ]),
        );
        let ctx = build(&source, destination).await.unwrap();

        let ada = ctx.collections.stakeholders.get(1).unwrap();
        assert_eq!(ada.job_function, Some(Ref::new(30, "Manager")));
        assert_eq!(ada.stakeholder_groups, vec![Ref::new(11, "Ops")]);

        let grace = ctx.collections.stakeholders.get(2).unwrap();
        assert_eq!(grace.email, "");
        assert_eq!(grace.job_function, Some(Ref::new(10, "Auditor")));

        assert_eq!(ctx.collections.stakeholder_groups.ids(), vec![11, 12]);
        assert_eq!(ctx.collections.job_functions.ids(), vec![10]);
    }

    #[tokio::test]
    async fn test_business_service_owner_uses_display_name() {
        let source = empty_source().with_get(
            BUSINESS_SERVICES_PATH,
            json!({"_embedded": {"business-service": [
                {"id": 3, "name": "Finance", "owner": {"id": 1, "displayName": "Ada"}}
            ]}}),
        );
        let ctx = build(&source, DestinationIndex::new()).await.unwrap();
        let service = ctx.collections.business_services.get(3).unwrap();
        assert_eq!(service.owner, Some(Ref::new(1, "Ada")));
    }

    #[tokio::test]
    async fn test_dependency_endpoints_are_copied_verbatim() {
        let source = empty_source().with_get(
            DEPENDENCIES_PATH,
            json!([{"id": 1, "from": {"id": 10, "name": "A"}, "to": {"id": 20, "name": "B"}}]),
        );
        let ctx = build(&source, DestinationIndex::new()).await.unwrap();

        let dependency = ctx.collections.dependencies.get(1).unwrap();
        assert_eq!(dependency.source, Ref::new(10, "A"));
        assert_eq!(dependency.target, Ref::new(20, "B"));
    }

    #[tokio::test]
    async fn test_assessment_details_are_fetched_per_application() {
        let source = with_applications(
            empty_source(),
            json!([{"id": 1, "name": "Billing", "businessService": 3}]),
        )
        .with_get(
            &format!("{}?applicationId=1", ASSESSMENTS_PATH),
            json!([{"id": 70, "applicationId": 1, "status": "COMPLETE"}]),
        )
        .with_get(
            &format!("{}/70", ASSESSMENTS_PATH),
            json!({
                "id": 70,
                "stakeholders": [4],
                "stakeholderGroups": [5],
                "questionnaire": {"categories": []}
            }),
        )
        .with_query(
            ASSESSMENT_RISK_PATH,
            json!([{"applicationId": 1}]),
            json!([{"assessmentId": 70, "applicationId": 1, "risk": "GREEN"}]),
        )
        .with_query(
            ASSESSMENT_CONFIDENCE_PATH,
            json!([{"applicationId": 1}]),
            json!([{"assessmentId": 70, "applicationId": 1, "confidence": 83}]),
        );

        let ctx = build(&source, DestinationIndex::new()).await.unwrap();

        let assessment = ctx.collections.assessments.get(70).unwrap();
        assert_eq!(assessment.status.as_deref(), Some("COMPLETE"));
        assert_eq!(assessment.stakeholders, vec![4]);
        assert_eq!(assessment.stakeholder_groups, vec![5]);
        assert_eq!(assessment.questionnaire, json!({"categories": []}));
        assert_eq!(ctx.collections.assessment_risks.get(70).unwrap().risk, "GREEN");
        assert_eq!(ctx.collections.assessment_confidences.get(70).unwrap().confidence, 83);

        assert_eq!(source.operations_of("query").len(), 2);
    }

    #[tokio::test]
    async fn test_every_reference_points_at_an_earlier_type() {
        let source = with_applications(
            empty_source()
                .with_get(TAG_TYPES_PATH, language_tag_types())
                .with_get(
                    STAKEHOLDERS_PATH,
                    json!([{
                        "id": 1,
                        "displayName": "Ada",
                        "jobFunction": {"id": 9, "role": "Manager"},
                        "stakeholderGroups": [{"id": 11, "name": "Ops"}]
                    }]),
                )
                .with_get(
                    BUSINESS_SERVICES_PATH,
                    json!([{"id": 3, "name": "Finance", "owner": {"id": 1, "displayName": "Ada"}}]),
                )
                .with_get(
                    DEPENDENCIES_PATH,
                    json!([{"id": 1, "from": {"id": 1, "name": "Billing"}, "to": {"id": 2, "name": "Payroll"}}]),
                ),
            json!([
                {"id": 1, "name": "Billing", "tags": [99], "businessService": 3},
                {"id": 2, "name": "Payroll", "tags": [100], "businessService": 3,
                 "review": {"id": 5, "proposedAction": "refactor"}}
            ]),
        )
        .with_get(
            &format!("{}?applicationId=2", ASSESSMENTS_PATH),
            json!([{"id": 70, "applicationId": 2}]),
        )
        .with_get(
            &format!("{}/70", ASSESSMENTS_PATH),
            json!({"stakeholders": [1], "stakeholderGroups": [11]}),
        );

        let ctx = build(&source, DestinationIndex::new()).await.unwrap();

        let mut checked = 0;
        for kind in TYPES {
            for (target, _) in ctx.collections.references_of(kind) {
                assert!(target < kind, "{} references later type {}", kind, target);
                checked += 1;
            }
        }
        assert!(checked > 0);
    }

    #[tokio::test]
    async fn test_source_failure_names_the_type() {
        let source = FakeTransport::new("source").with_get(TAG_TYPES_PATH, json!([]));
        let err = build(&source, DestinationIndex::new()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to export jobfunctions"));
    }
}
