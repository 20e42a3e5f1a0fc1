//! Derived-fact engines for legal case management.
//!
//! Four pure, synchronous computations over an immutable
//! [`caseline_core::CaseFacts`] snapshot, in dependency order:
//!
//! - [`calendar`] — business-day arithmetic under weekend/holiday rules
//! - [`rules`] — data-driven deadline derivation with citations
//! - [`guidance`] — procedural stage assessment and next-step templates
//! - [`scoring`] — weighted priority score and discrete risk flags
//!
//! Every function takes an explicit evaluation date; nothing here reads
//! the ambient clock, performs I/O, or retains state between calls.

pub mod calendar;
pub mod guidance;
pub mod rules;
pub mod scoring;

pub use calendar::BusinessCalendar;
pub use guidance::{Guidance, GuidanceStep, Stage, StepCategory, generate_guidance};
pub use rules::{Deadline, DeadlineStatus, calculate_deadline, deadlines_for_case};
pub use scoring::{
    FactorContribution, PriorityScore, RiskCondition, RiskFlag, calculate_priority_score,
    evaluate_risks,
};
