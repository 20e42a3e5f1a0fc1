//! Weighted priority scoring and discrete risk flags.
//!
//! The score is a weighted sum over independently computable factors.
//! Each factor's weight and each band/flag threshold is a named constant:
//! retuning is a one-line data edit, never a logic change. A factor whose
//! sub-facts are missing contributes zero; a partial score is always
//! produced.
//!
//! Risk flags are independent of the score: each names a condition that
//! currently holds given the supplied facts. De-duplicating against
//! already-open flags is the persistence collaborator's concern.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use caseline_core::{CaseFacts, EventKind, MedicalReportStatus, Severity};

use crate::calendar::BusinessCalendar;
use crate::rules::{Deadline, DeadlineStatus};

// ── Factor weights ──

pub const WEIGHT_HAZARD_SEVERITY: f64 = 6.0;
pub const WEIGHT_VULNERABILITY: f64 = 5.0;
pub const WEIGHT_MONTHS_IN_DISREPAIR: f64 = 2.0;
pub const WEIGHT_MISSED_DEADLINES: f64 = 8.0;
pub const WEIGHT_AT_RISK_DEADLINES: f64 = 4.0;
pub const WEIGHT_MEDICAL_REPORT_OUTSTANDING: f64 = 3.0;
pub const WEIGHT_CORRESPONDENCE_GAP: f64 = 2.0;

/// Correspondence-gap factor counts one unit per this many working days
/// of silence.
pub const CORRESPONDENCE_GAP_UNIT_DAYS: i64 = 10;

/// Band cuts over the summed score, highest first.
pub const BAND_CUTS: &[(f64, Severity)] = &[
    (60.0, Severity::Critical),
    (35.0, Severity::High),
    (15.0, Severity::Medium),
];

// ── Risk thresholds ──

/// Working days of landlord/defendant silence after a letter of claim
/// before a no-response flag is raised.
pub const NO_RESPONSE_FLAG_DAYS: i64 = 20;

/// Working days since a medical report was requested before it is flagged
/// overdue.
pub const MEDICAL_REPORT_OVERDUE_DAYS: i64 = 30;

/// Working days with no incoming correspondence of any kind before a
/// correspondence-gap flag is raised.
pub const CORRESPONDENCE_GAP_FLAG_DAYS: i64 = 15;

/// One itemised (factor, raw, weight) triple. `contribution` is always
/// `raw * weight`; the score total is the exact sum of contributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: String,
    pub raw: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Ordinal case priority with a full factor breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityScore {
    pub case_title: String,
    pub total: f64,
    pub band: Severity,
    pub factors: Vec<FactorContribution>,
}

/// Conditions the risk evaluator can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCondition {
    MissedDeadline,
    DeadlineAtRisk,
    NoResponseToClaim,
    HighHazardNoRepair,
    MedicalReportOverdue,
    CorrespondenceGap,
}

/// A discrete, severity-tagged observation about one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFlag {
    pub condition: RiskCondition,
    pub severity: Severity,
    pub detected_at: DateTime<Utc>,
    pub detail: String,
    pub metadata: serde_json::Value,
}

fn factor(name: &str, raw: f64, weight: f64) -> FactorContribution {
    FactorContribution {
        factor: name.to_string(),
        raw,
        weight,
        contribution: raw * weight,
    }
}

fn band_for(total: f64) -> Severity {
    for &(cut, band) in BAND_CUTS {
        if total >= cut {
            return band;
        }
    }
    Severity::Low
}

/// Working days of silence since the claimant last heard anything:
/// measured from the latest incoming event, or from the letter of claim
/// when nothing has ever come back.
fn incoming_silence_days(
    calendar: &BusinessCalendar,
    facts: &CaseFacts,
    today: NaiveDate,
) -> Option<i64> {
    let last_incoming = [EventKind::CorrespondenceReceived, EventKind::ResponseReceived]
        .into_iter()
        .filter_map(|k| facts.latest_event(k))
        .map(|e| e.date)
        .max();
    let since = last_incoming.or_else(|| facts.latest_event(EventKind::LetterOfClaimSent).map(|e| e.date))?;
    Some(calendar.working_days_between(since, today))
}

/// Compute the weighted priority score for one case snapshot.
///
/// `deadlines` is the output of [`crate::rules::deadlines_for_case`] for
/// the same snapshot and evaluation date; passing it in keeps the two
/// engines from disagreeing on status.
pub fn calculate_priority_score(
    calendar: &BusinessCalendar,
    facts: &CaseFacts,
    deadlines: &[Deadline],
    today: NaiveDate,
) -> PriorityScore {
    let mut factors = Vec::new();

    let hazard_raw = facts
        .housing
        .as_ref()
        .and_then(|h| h.hazard_severity)
        .map_or(0.0, |s| (4 - s.ordinal()) as f64);
    factors.push(factor("hazard_severity", hazard_raw, WEIGHT_HAZARD_SEVERITY));

    factors.push(factor(
        "vulnerability",
        facts.vulnerabilities.len() as f64,
        WEIGHT_VULNERABILITY,
    ));

    let months_raw = facts
        .earliest_event(EventKind::DisrepairReported)
        .map_or(0.0, |e| ((today - e.date).num_days().max(0) / 30) as f64);
    factors.push(factor(
        "months_in_disrepair",
        months_raw,
        WEIGHT_MONTHS_IN_DISREPAIR,
    ));

    let missed = deadlines
        .iter()
        .filter(|d| d.status == DeadlineStatus::Missed)
        .count();
    factors.push(factor("missed_deadlines", missed as f64, WEIGHT_MISSED_DEADLINES));

    let at_risk = deadlines
        .iter()
        .filter(|d| d.status == DeadlineStatus::AtRisk)
        .count();
    factors.push(factor("at_risk_deadlines", at_risk as f64, WEIGHT_AT_RISK_DEADLINES));

    let report_raw = facts
        .injury
        .as_ref()
        .map_or(0.0, |i| match i.medical_report {
            MedicalReportStatus::Requested => 1.0,
            MedicalReportStatus::NotYetRequested | MedicalReportStatus::Received => 0.0,
        });
    factors.push(factor(
        "medical_report_outstanding",
        report_raw,
        WEIGHT_MEDICAL_REPORT_OUTSTANDING,
    ));

    let gap_raw = incoming_silence_days(calendar, facts, today)
        .map_or(0.0, |days| (days / CORRESPONDENCE_GAP_UNIT_DAYS) as f64);
    factors.push(factor(
        "correspondence_gap",
        gap_raw,
        WEIGHT_CORRESPONDENCE_GAP,
    ));

    let total: f64 = factors.iter().map(|f| f.contribution).sum();
    PriorityScore {
        case_title: facts.title.clone(),
        total,
        band: band_for(total),
        factors,
    }
}

/// Evaluate every risk condition against the supplied facts.
///
/// Flags are sorted most severe first by the shared severity ordinal.
pub fn evaluate_risks(
    calendar: &BusinessCalendar,
    facts: &CaseFacts,
    deadlines: &[Deadline],
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<RiskFlag> {
    let mut flags = Vec::new();

    for d in deadlines {
        match d.status {
            DeadlineStatus::Missed => flags.push(RiskFlag {
                condition: RiskCondition::MissedDeadline,
                severity: Severity::Critical,
                detected_at: now,
                detail: format!("{} missed (due {})", d.description, d.due),
                metadata: serde_json::json!({ "rule_id": d.rule_id, "due": d.due }),
            }),
            DeadlineStatus::AtRisk => flags.push(RiskFlag {
                condition: RiskCondition::DeadlineAtRisk,
                severity: Severity::High,
                detected_at: now,
                detail: format!("{} due {}", d.description, d.due),
                metadata: serde_json::json!({ "rule_id": d.rule_id, "due": d.due }),
            }),
            DeadlineStatus::Computed => {}
        }
    }

    if let Some(letter) = facts.latest_event(EventKind::LetterOfClaimSent)
        && !facts
            .events
            .iter()
            .any(|e| e.kind == EventKind::ResponseReceived && e.date >= letter.date)
    {
        let silence = calendar.working_days_between(letter.date, today);
        if silence > NO_RESPONSE_FLAG_DAYS {
            flags.push(RiskFlag {
                condition: RiskCondition::NoResponseToClaim,
                severity: Severity::High,
                detected_at: now,
                detail: format!("no response {silence} working days after letter of claim"),
                metadata: serde_json::json!({ "letter_date": letter.date, "working_days": silence }),
            });
        }
    }

    if let Some(housing) = &facts.housing
        && let Some(severity) = housing.hazard_severity
        && matches!(severity, Severity::Critical | Severity::High)
        && !facts.has_event(EventKind::WorkStarted)
    {
        flags.push(RiskFlag {
            condition: RiskCondition::HighHazardNoRepair,
            severity,
            detected_at: now,
            detail: format!("{severity} hazard with no repair attempt logged"),
            metadata: serde_json::json!({ "hazard_category": housing.hazard_category }),
        });
    }

    if let Some(injury) = &facts.injury
        && injury.medical_report == MedicalReportStatus::Requested
        && let Some(requested) = facts.latest_event(EventKind::MedicalReportRequested)
    {
        let waiting = calendar.working_days_between(requested.date, today);
        if waiting > MEDICAL_REPORT_OVERDUE_DAYS {
            flags.push(RiskFlag {
                condition: RiskCondition::MedicalReportOverdue,
                severity: Severity::Medium,
                detected_at: now,
                detail: format!("medical report outstanding {waiting} working days"),
                metadata: serde_json::json!({ "requested": requested.date }),
            });
        }
    }

    if let Some(gap) = incoming_silence_days(calendar, facts, today)
        && gap > CORRESPONDENCE_GAP_FLAG_DAYS
    {
        flags.push(RiskFlag {
            condition: RiskCondition::CorrespondenceGap,
            severity: Severity::Medium,
            detected_at: now,
            detail: format!("no incoming correspondence for {gap} working days"),
            metadata: serde_json::json!({ "working_days": gap }),
        });
    }

    flags.sort_by_key(|f| f.severity);
    flags
}
