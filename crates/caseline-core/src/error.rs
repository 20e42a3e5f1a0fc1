use thiserror::Error;

/// Errors raised by the derived-fact engines.
///
/// Missing anchor events or absent sub-facts are deliberately not errors:
/// the engines degrade (omitted deadline, earliest stage, zero-weighted
/// factor) and always return a partial result. Only malformed parameters
/// and configuration defects surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or out-of-range parameter, e.g. a negative business-day
    /// count. Never silently coerced.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A rule identifier was requested that no rule table defines. This is
    /// a configuration defect, not a recoverable runtime state.
    #[error("unknown deadline rule: {0}")]
    UnknownRule(String),
}
