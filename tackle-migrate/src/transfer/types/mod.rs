//! Core types for the migration engine

mod collection;
mod entity;
mod kind;
mod records;
mod resolver;

pub use collection::*;
pub use entity::*;
pub use kind::*;
pub use records::*;
pub use resolver::*;

/// Run `$body` with `$t` bound to the record type of `$kind`.
///
/// ```ignore
/// let count = with_entity_type!(kind, |T| store.load::<T>()?.len());
/// ```
macro_rules! with_entity_type {
    ($kind:expr, |$t:ident| $body:expr) => {
        match $kind {
            $crate::transfer::types::EntityType::TagTypes => {
                type $t = $crate::transfer::types::TagType;
                $body
            }
            $crate::transfer::types::EntityType::Tags => {
                type $t = $crate::transfer::types::Tag;
                $body
            }
            $crate::transfer::types::EntityType::JobFunctions => {
                type $t = $crate::transfer::types::JobFunction;
                $body
            }
            $crate::transfer::types::EntityType::StakeholderGroups => {
                type $t = $crate::transfer::types::StakeholderGroup;
                $body
            }
            $crate::transfer::types::EntityType::Stakeholders => {
                type $t = $crate::transfer::types::Stakeholder;
                $body
            }
            $crate::transfer::types::EntityType::BusinessServices => {
                type $t = $crate::transfer::types::BusinessService;
                $body
            }
            $crate::transfer::types::EntityType::Applications => {
                type $t = $crate::transfer::types::Application;
                $body
            }
            $crate::transfer::types::EntityType::Proxies => {
                type $t = $crate::transfer::types::Proxy;
                $body
            }
            $crate::transfer::types::EntityType::Dependencies => {
                type $t = $crate::transfer::types::Dependency;
                $body
            }
            $crate::transfer::types::EntityType::Assessments => {
                type $t = $crate::transfer::types::Assessment;
                $body
            }
            $crate::transfer::types::EntityType::AssessmentRisks => {
                type $t = $crate::transfer::types::AssessmentRisk;
                $body
            }
            $crate::transfer::types::EntityType::AssessmentConfidences => {
                type $t = $crate::transfer::types::AssessmentConfidence;
                $body
            }
            $crate::transfer::types::EntityType::Reviews => {
                type $t = $crate::transfer::types::Review;
                $body
            }
            $crate::transfer::types::EntityType::Identities => {
                type $t = $crate::transfer::types::Identity;
                $body
            }
        }
    };
}

pub(crate) use with_entity_type;
