//! Procedural stage assessment and next-step guidance.
//!
//! Stage assessment is a walk down an ordered ladder of rungs, one ladder
//! per practice area. Each rung names the event kind that satisfies it;
//! the current stage is the highest rung whose every predecessor is also
//! satisfied, in date order. Later-stage evidence without its predecessor
//! never advances the stage — that guards against corrupted or incomplete
//! extraction. Missing or malformed timelines degrade to the earliest
//! stage rather than fail.
//!
//! Next steps are fixed per-stage templates. Steps with a computable
//! deadline pull it from the rule tables in [`crate::rules`] rather than
//! recomputing, then the list is re-sorted by urgency: earliest due date
//! first, undated steps last, ties by severity then category precedence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use caseline_core::{CaseFacts, EngineError, EventKind, PracticeArea, Severity};

use crate::calendar::BusinessCalendar;
use crate::rules::{Deadline, deadlines_for_case};

/// Procedural stages, earliest first. Declaration order is ladder order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PreAction,
    ClaimNotified,
    ResponseReceived,
    Investigation,
    Remedy,
    Proceedings,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::PreAction => "pre-action",
            Stage::ClaimNotified => "claim notified",
            Stage::ResponseReceived => "response received",
            Stage::Investigation => "investigation",
            Stage::Remedy => "remedy in progress",
            Stage::Proceedings => "proceedings issued",
        }
    }
}

/// Tie-break precedence when two steps share a due date and severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepCategory {
    Compliance,
    Evidence,
    Correspondence,
    Review,
}

impl StepCategory {
    pub fn precedence(self) -> u8 {
        match self {
            StepCategory::Compliance => 0,
            StepCategory::Evidence => 1,
            StepCategory::Correspondence => 2,
            StepCategory::Review => 3,
        }
    }
}

/// A recommended next action, most urgent first in any returned list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidanceStep {
    /// Position in the sorted list, 0 = most urgent.
    pub priority: u8,
    pub action: String,
    pub severity: Severity,
    pub category: StepCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Deadline>,
}

/// Stage plus ordered next steps for one case snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guidance {
    pub stage: Stage,
    pub next_steps: Vec<GuidanceStep>,
}

// ── Stage ladders ──

struct Rung {
    stage: Stage,
    requires: Option<EventKind>,
}

const HOUSING_LADDER: &[Rung] = &[
    Rung { stage: Stage::PreAction, requires: None },
    Rung { stage: Stage::ClaimNotified, requires: Some(EventKind::LetterOfClaimSent) },
    Rung { stage: Stage::ResponseReceived, requires: Some(EventKind::ResponseReceived) },
    Rung { stage: Stage::Investigation, requires: Some(EventKind::InspectionCompleted) },
    Rung { stage: Stage::Remedy, requires: Some(EventKind::WorkStarted) },
    Rung { stage: Stage::Proceedings, requires: Some(EventKind::ProceedingsIssued) },
];

const INJURY_LADDER: &[Rung] = &[
    Rung { stage: Stage::PreAction, requires: None },
    Rung { stage: Stage::ClaimNotified, requires: Some(EventKind::LetterOfClaimSent) },
    Rung { stage: Stage::ResponseReceived, requires: Some(EventKind::ResponseReceived) },
    Rung { stage: Stage::Investigation, requires: Some(EventKind::MedicalReportReceived) },
    Rung { stage: Stage::Proceedings, requires: Some(EventKind::ProceedingsIssued) },
];

const GENERAL_LADDER: &[Rung] = &[
    Rung { stage: Stage::PreAction, requires: None },
    Rung { stage: Stage::ClaimNotified, requires: Some(EventKind::LetterOfClaimSent) },
    Rung { stage: Stage::ResponseReceived, requires: Some(EventKind::ResponseReceived) },
    Rung { stage: Stage::Proceedings, requires: Some(EventKind::ProceedingsIssued) },
];

fn ladder_for(area: PracticeArea) -> &'static [Rung] {
    match area {
        PracticeArea::HousingDisrepair => HOUSING_LADDER,
        PracticeArea::PersonalInjury | PracticeArea::ClinicalNegligence => INJURY_LADDER,
        PracticeArea::Family | PracticeArea::OtherLitigation => GENERAL_LADDER,
    }
}

/// Current stage: the highest rung whose required event is present and
/// dated no earlier than the event that satisfied the previous rung.
pub fn assess_stage(facts: &CaseFacts) -> Stage {
    let ladder = ladder_for(facts.practice_area);
    let mut stage = Stage::PreAction;
    let mut previous_date: Option<NaiveDate> = None;

    for rung in ladder {
        let Some(required) = rung.requires else {
            stage = rung.stage;
            continue;
        };
        let satisfied = facts
            .events
            .iter()
            .filter(|e| e.kind == required)
            .filter(|e| previous_date.is_none_or(|p| e.date >= p))
            .min_by_key(|e| e.date);
        match satisfied {
            Some(event) => {
                stage = rung.stage;
                previous_date = Some(event.date);
            }
            // First unsatisfied rung stops the walk; later evidence
            // without this precondition must not advance the stage.
            None => break,
        }
    }
    stage
}

// ── Next-step templates ──

struct StepTemplate {
    action: &'static str,
    severity: Severity,
    category: StepCategory,
    /// When set, the step carries the matching computed deadline.
    rule_id: Option<&'static str>,
}

const fn step(
    action: &'static str,
    severity: Severity,
    category: StepCategory,
    rule_id: Option<&'static str>,
) -> StepTemplate {
    StepTemplate { action, severity, category, rule_id }
}

const HOUSING_PRE_ACTION: &[StepTemplate] = &[
    step("Gather tenancy agreement and disrepair evidence", Severity::High, StepCategory::Evidence, None),
    step("Draft and serve letter of claim on the landlord", Severity::High, StepCategory::Compliance, None),
    step("Photograph affected rooms and log hazard details", Severity::Medium, StepCategory::Evidence, None),
];

const HOUSING_CLAIM_NOTIFIED: &[StepTemplate] = &[
    step("Chase landlord response to letter of claim", Severity::High, StepCategory::Correspondence, Some("hdr-response")),
    step("Arrange joint expert inspection", Severity::High, StepCategory::Evidence, Some("hdr-inspection")),
    step("Review client for interim relief needs", Severity::Medium, StepCategory::Review, None),
];

const HOUSING_RESPONSE_RECEIVED: &[StepTemplate] = &[
    step("Arrange joint expert inspection", Severity::High, StepCategory::Evidence, Some("hdr-inspection")),
    step("Assess landlord's proposals against the schedule of disrepair", Severity::Medium, StepCategory::Review, None),
];

const HOUSING_INVESTIGATION: &[StepTemplate] = &[
    step("Monitor commencement of repair works", Severity::High, StepCategory::Compliance, Some("hdr-works-start")),
    step("Obtain expert report on inspection findings", Severity::Medium, StepCategory::Evidence, None),
];

const HOUSING_REMEDY: &[StepTemplate] = &[
    step("Monitor completion of repair works", Severity::Medium, StepCategory::Compliance, Some("hdr-works-complete")),
    step("Quantify general damages for period of disrepair", Severity::Medium, StepCategory::Review, None),
];

const INJURY_PRE_ACTION: &[StepTemplate] = &[
    step("Take full instructions and verify limitation date", Severity::Critical, StepCategory::Compliance, None),
    step("Draft and serve letter of claim", Severity::High, StepCategory::Compliance, None),
    step("Collect accident records and witness details", Severity::Medium, StepCategory::Evidence, None),
];

const INJURY_CLAIM_NOTIFIED: &[StepTemplate] = &[
    step("Chase defendant acknowledgment", Severity::High, StepCategory::Correspondence, Some("pi-acknowledgment")),
    step("Diarise liability response date", Severity::High, StepCategory::Compliance, Some("pi-liability-response")),
    step("Instruct medical expert", Severity::Medium, StepCategory::Evidence, None),
];

const INJURY_RESPONSE_RECEIVED: &[StepTemplate] = &[
    step("Chase outstanding medical report", Severity::High, StepCategory::Evidence, Some("pi-medical-chase")),
    step("Review liability admission and consider Part 36 offer", Severity::Medium, StepCategory::Review, None),
];

const INJURY_INVESTIGATION: &[StepTemplate] = &[
    step("Serve medical evidence and schedule of loss", Severity::High, StepCategory::Compliance, None),
    step("Attempt settlement before issuing proceedings", Severity::Medium, StepCategory::Correspondence, None),
];

const CLINICAL_CLAIM_NOTIFIED: &[StepTemplate] = &[
    step("Chase defendant acknowledgment", Severity::High, StepCategory::Correspondence, Some("cn-acknowledgment")),
    step("Diarise full response date", Severity::High, StepCategory::Compliance, Some("cn-response")),
    step("Obtain complete medical records", Severity::Medium, StepCategory::Evidence, None),
];

const CLINICAL_RESPONSE_RECEIVED: &[StepTemplate] = &[
    step("Instruct expert on breach and causation", Severity::High, StepCategory::Evidence, None),
    step("Review admissions against the letter of claim", Severity::Medium, StepCategory::Review, None),
];

const GENERAL_PRE_ACTION: &[StepTemplate] = &[
    step("Take instructions and identify applicable pre-action protocol", Severity::High, StepCategory::Compliance, None),
    step("Serve letter before claim", Severity::Medium, StepCategory::Correspondence, None),
];

const GENERAL_CLAIM_NOTIFIED: &[StepTemplate] = &[
    step("Await and chase substantive response", Severity::Medium, StepCategory::Correspondence, None),
];

const GENERAL_RESPONSE_RECEIVED: &[StepTemplate] = &[
    step("Consider ADR before issuing proceedings", Severity::Medium, StepCategory::Review, None),
];

const PROCEEDINGS: &[StepTemplate] = &[
    step("Comply with directions timetable", Severity::High, StepCategory::Compliance, None),
    step("Review prospects and settlement position", Severity::Medium, StepCategory::Review, None),
];

fn templates_for(area: PracticeArea, stage: Stage) -> &'static [StepTemplate] {
    use PracticeArea::*;
    match (area, stage) {
        (HousingDisrepair, Stage::PreAction) => HOUSING_PRE_ACTION,
        (HousingDisrepair, Stage::ClaimNotified) => HOUSING_CLAIM_NOTIFIED,
        (HousingDisrepair, Stage::ResponseReceived) => HOUSING_RESPONSE_RECEIVED,
        (HousingDisrepair, Stage::Investigation) => HOUSING_INVESTIGATION,
        (HousingDisrepair, Stage::Remedy) => HOUSING_REMEDY,
        (PersonalInjury | ClinicalNegligence, Stage::PreAction) => INJURY_PRE_ACTION,
        (PersonalInjury, Stage::ClaimNotified) => INJURY_CLAIM_NOTIFIED,
        (PersonalInjury, Stage::ResponseReceived) => INJURY_RESPONSE_RECEIVED,
        (ClinicalNegligence, Stage::ClaimNotified) => CLINICAL_CLAIM_NOTIFIED,
        (ClinicalNegligence, Stage::ResponseReceived) => CLINICAL_RESPONSE_RECEIVED,
        (PersonalInjury | ClinicalNegligence, Stage::Investigation) => INJURY_INVESTIGATION,
        (Family | OtherLitigation, Stage::PreAction) => GENERAL_PRE_ACTION,
        (Family | OtherLitigation, Stage::ClaimNotified) => GENERAL_CLAIM_NOTIFIED,
        (Family | OtherLitigation, Stage::ResponseReceived) => GENERAL_RESPONSE_RECEIVED,
        (_, Stage::Proceedings) => PROCEEDINGS,
        // Rungs a ladder does not contain never classify, but the match
        // must stay total.
        _ => &[],
    }
}

/// Classify the stage and return its next steps, most urgent first.
pub fn generate_guidance(
    calendar: &BusinessCalendar,
    facts: &CaseFacts,
    today: NaiveDate,
) -> Result<Guidance, EngineError> {
    let stage = assess_stage(facts);
    let deadlines = deadlines_for_case(calendar, facts, today)?;

    let mut steps: Vec<GuidanceStep> = templates_for(facts.practice_area, stage)
        .iter()
        .map(|t| GuidanceStep {
            priority: 0,
            action: t.action.to_string(),
            severity: t.severity,
            category: t.category,
            deadline: t
                .rule_id
                .and_then(|id| deadlines.iter().find(|d| d.rule_id == id).cloned()),
        })
        .collect();

    steps.sort_by_key(|s| {
        (
            s.deadline.is_none(),
            s.deadline.as_ref().map(|d| d.due),
            s.severity.ordinal(),
            s.category.precedence(),
        )
    });
    for (i, s) in steps.iter_mut().enumerate() {
        s.priority = i as u8;
    }

    Ok(Guidance { stage, next_steps: steps })
}
