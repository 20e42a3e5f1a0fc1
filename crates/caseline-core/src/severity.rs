//! Shared severity ordinal.
//!
//! Guidance ranking, risk-flag sorting, and priority banding all order by
//! the same scale: critical=0, high=1, medium=2, low=3. Keeping one ordinal
//! here means a sort by `Severity` agrees everywhere it is used.

use serde::{Deserialize, Serialize};

/// Urgency scale shared across every derived-fact engine.
///
/// Declaration order is the ordering: `Critical < High < Medium < Low`,
/// so an ascending sort puts the most urgent item first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Numeric ordinal: critical=0, high=1, medium=2, low=3.
    pub fn ordinal(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_puts_most_urgent_first() {
        let mut severities = vec![
            Severity::Low,
            Severity::Critical,
            Severity::Medium,
            Severity::High,
        ];
        severities.sort();
        assert_eq!(
            severities,
            vec![
                Severity::Critical,
                Severity::High,
                Severity::Medium,
                Severity::Low,
            ]
        );
    }

    #[test]
    fn ordinal_matches_declaration_order() {
        assert_eq!(Severity::Critical.ordinal(), 0);
        assert_eq!(Severity::High.ordinal(), 1);
        assert_eq!(Severity::Medium.ordinal(), 2);
        assert_eq!(Severity::Low.ordinal(), 3);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let back: Severity = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(back, Severity::High);
    }
}
