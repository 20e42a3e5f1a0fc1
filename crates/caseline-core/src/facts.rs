//! Immutable case-facts snapshot consumed by every derived-fact engine.
//!
//! A `CaseFacts` value is a point-in-time extract of one case's stored
//! attributes: practice area, dated timeline events, and practice-area
//! sub-facts. The engines never mutate a snapshot; every computation
//! returns fresh output values. Dates serialise as ISO 8601 strings at the
//! boundary and are `NaiveDate` internally.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// Practice areas with dedicated rule tables and stage ladders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeArea {
    HousingDisrepair,
    PersonalInjury,
    ClinicalNegligence,
    Family,
    OtherLitigation,
}

/// Timeline event types the engines recognise.
///
/// Free-text labels on [`CaseEvent`] carry anything else; only the kind
/// participates in deadline anchoring and stage assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DisrepairReported,
    LetterOfClaimSent,
    ResponseReceived,
    InspectionCompleted,
    WorkStarted,
    WorkCompleted,
    MedicalReportRequested,
    MedicalReportReceived,
    CorrespondenceSent,
    CorrespondenceReceived,
    SettlementOffered,
    ProceedingsIssued,
}

/// Whether an event was extracted from a document or entered by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Extracted,
    UserEntered,
}

/// One dated entry on a case timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub label: String,
    pub provenance: Provenance,
}

impl CaseEvent {
    pub fn new(date: NaiveDate, kind: EventKind, label: impl Into<String>) -> Self {
        CaseEvent {
            date,
            kind,
            label: label.into(),
            provenance: Provenance::UserEntered,
        }
    }
}

/// HHSRS-style hazard categories for housing conditions claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardCategory {
    DampAndMould,
    ExcessCold,
    StructuralCollapse,
    Electrical,
    FireSafety,
    PestInfestation,
    Other,
}

/// Occupant vulnerability markers weighted by the priority scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vulnerability {
    ChildrenInHousehold,
    ElderlyOccupant,
    DisabilityOrIllness,
    PregnantOccupant,
}

/// Sub-facts specific to housing disrepair cases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HousingFacts {
    pub hazard_category: Option<HazardCategory>,
    pub hazard_severity: Option<Severity>,
}

/// Where a medical report stands for an injury or clinical case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicalReportStatus {
    #[default]
    NotYetRequested,
    Requested,
    Received,
}

/// Sub-facts specific to personal injury and clinical negligence cases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InjuryFacts {
    #[serde(default)]
    pub medical_report: MedicalReportStatus,
    pub injury_severity: Option<Severity>,
}

/// Point-in-time snapshot of one case's extracted facts.
///
/// Sub-fact blocks are optional so a partially extracted case still scores
/// and classifies; absent blocks contribute nothing rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFacts {
    pub title: String,
    pub practice_area: PracticeArea,
    #[serde(default)]
    pub events: Vec<CaseEvent>,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub housing: Option<HousingFacts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injury: Option<InjuryFacts>,
}

impl CaseFacts {
    pub fn new(title: impl Into<String>, practice_area: PracticeArea) -> Self {
        CaseFacts {
            title: title.into(),
            practice_area,
            events: Vec::new(),
            vulnerabilities: Vec::new(),
            housing: None,
            injury: None,
        }
    }

    pub fn has_event(&self, kind: EventKind) -> bool {
        self.events.iter().any(|e| e.kind == kind)
    }

    /// Earliest recorded event of the given kind.
    pub fn earliest_event(&self, kind: EventKind) -> Option<&CaseEvent> {
        self.events
            .iter()
            .filter(|e| e.kind == kind)
            .min_by_key(|e| e.date)
    }

    /// Most recent recorded event of the given kind.
    pub fn latest_event(&self, kind: EventKind) -> Option<&CaseEvent> {
        self.events
            .iter()
            .filter(|e| e.kind == kind)
            .max_by_key(|e| e.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn earliest_and_latest_pick_by_date() {
        let mut facts = CaseFacts::new("Smith v Acme Housing", PracticeArea::HousingDisrepair);
        facts.events.push(CaseEvent::new(
            date(2025, 3, 10),
            EventKind::CorrespondenceSent,
            "chaser letter",
        ));
        facts.events.push(CaseEvent::new(
            date(2025, 1, 6),
            EventKind::CorrespondenceSent,
            "first letter",
        ));

        let earliest = facts.earliest_event(EventKind::CorrespondenceSent).unwrap();
        assert_eq!(earliest.date, date(2025, 1, 6));
        let latest = facts.latest_event(EventKind::CorrespondenceSent).unwrap();
        assert_eq!(latest.date, date(2025, 3, 10));
        assert!(facts.earliest_event(EventKind::ProceedingsIssued).is_none());
    }

    #[test]
    fn snapshot_round_trips_with_iso_dates() {
        let mut facts = CaseFacts::new("Jones v Borough", PracticeArea::HousingDisrepair);
        facts.events.push(CaseEvent::new(
            date(2025, 2, 3),
            EventKind::LetterOfClaimSent,
            "letter of claim",
        ));
        facts.housing = Some(HousingFacts {
            hazard_category: Some(HazardCategory::DampAndMould),
            hazard_severity: Some(Severity::High),
        });
        facts.vulnerabilities.push(Vulnerability::ChildrenInHousehold);

        let json = serde_json::to_string(&facts).unwrap();
        assert!(json.contains("\"2025-02-03\""));
        assert!(json.contains("\"housing_disrepair\""));
        assert!(json.contains("\"damp_and_mould\""));

        let back: CaseFacts = serde_json::from_str(&json).unwrap();
        assert_eq!(back.events.len(), 1);
        assert_eq!(back.events[0].kind, EventKind::LetterOfClaimSent);
        assert_eq!(
            back.housing.unwrap().hazard_severity,
            Some(Severity::High)
        );
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let json = r#"{"title":"A v B","practice_area":"personal_injury"}"#;
        let facts: CaseFacts = serde_json::from_str(json).unwrap();
        assert!(facts.events.is_empty());
        assert!(facts.vulnerabilities.is_empty());
        assert!(facts.housing.is_none());
        assert!(facts.injury.is_none());
    }
}
