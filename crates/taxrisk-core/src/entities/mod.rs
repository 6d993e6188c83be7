//! Entity structs for all taxrisk domain objects.
//!
//! Documents, analyses, and audit entries map to tables in the libSQL
//! database. All structs derive `Serialize`, `Deserialize`, and `JsonSchema`
//! for JSON roundtrip and schema validation.

mod analysis;
mod audit;
mod document;
mod profile;

pub use analysis::{
    AnalysisRecord, AnalysisResult, AuditProbability, CategoryAssessment, EscrowAdequacy,
    KeywordHit, StandardAssessment, TaxContingency,
};
pub use audit::AuditEntry;
pub use document::Document;
pub use profile::{AnalysisSettings, KeywordProfile};
