pub mod error;
pub mod facts;
pub mod severity;

pub use error::EngineError;
pub use facts::{
    CaseEvent, CaseFacts, EventKind, HazardCategory, HousingFacts, InjuryFacts,
    MedicalReportStatus, PracticeArea, Provenance, Vulnerability,
};
pub use severity::Severity;
