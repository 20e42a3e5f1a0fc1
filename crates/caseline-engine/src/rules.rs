//! Data-driven deadline derivation.
//!
//! Every (trigger → business-day offset, citation) mapping lives in a rule
//! table keyed by rule identifier, so the domain knowledge is auditable
//! and testable apart from the traversal that applies it. No offset is
//! embedded in control flow.
//!
//! A deadline's status is recomputed against an explicit evaluation date
//! on every call, never stored, so it cannot go stale.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use caseline_core::{CaseFacts, EngineError, EventKind, PracticeArea};

use crate::calendar::BusinessCalendar;

/// A deadline is at risk once it falls due within this many working days.
pub const AT_RISK_WINDOW_DAYS: i64 = 5;

/// One row of a practice-area rule table: a named procedural trigger, a
/// fixed business-day offset, and the citation that justifies it.
#[derive(Debug, Clone, Copy)]
pub struct DeadlineRule {
    pub id: &'static str,
    pub description: &'static str,
    pub trigger: EventKind,
    pub business_days: i64,
    pub citation: &'static str,
}

/// Housing conditions claims, England & Wales pre-action protocol.
pub const HOUSING_RULES: &[DeadlineRule] = &[
    DeadlineRule {
        id: "hdr-response",
        description: "Landlord response to letter of claim",
        trigger: EventKind::LetterOfClaimSent,
        business_days: 20,
        citation: "Pre-Action Protocol for Housing Conditions Claims, para 6.2",
    },
    DeadlineRule {
        id: "hdr-inspection",
        description: "Joint expert inspection of the property",
        trigger: EventKind::LetterOfClaimSent,
        business_days: 20,
        citation: "Pre-Action Protocol for Housing Conditions Claims, para 7.2",
    },
    DeadlineRule {
        id: "hdr-works-start",
        description: "Repair works to commence following inspection",
        trigger: EventKind::InspectionCompleted,
        business_days: 20,
        citation: "Pre-Action Protocol for Housing Conditions Claims, para 8.1",
    },
    DeadlineRule {
        id: "hdr-works-complete",
        description: "Repair works to complete",
        trigger: EventKind::WorkStarted,
        business_days: 40,
        citation: "Landlord and Tenant Act 1985, s.11 (reasonable time)",
    },
];

/// Personal injury pre-action protocol (sub-£25k fast track).
pub const INJURY_RULES: &[DeadlineRule] = &[
    DeadlineRule {
        id: "pi-acknowledgment",
        description: "Defendant acknowledgment of letter of claim",
        trigger: EventKind::LetterOfClaimSent,
        business_days: 15,
        citation: "Pre-Action Protocol for Personal Injury Claims, para 5.1",
    },
    DeadlineRule {
        id: "pi-liability-response",
        description: "Defendant decision on liability",
        trigger: EventKind::LetterOfClaimSent,
        business_days: 65,
        citation: "Pre-Action Protocol for Personal Injury Claims, para 5.5",
    },
    DeadlineRule {
        id: "pi-medical-chase",
        description: "Chase outstanding medical report",
        trigger: EventKind::MedicalReportRequested,
        business_days: 30,
        citation: "Pre-Action Protocol for Personal Injury Claims, para 7.4",
    },
];

/// Clinical negligence, Pre-Action Protocol for the Resolution of
/// Clinical Disputes.
pub const CLINICAL_RULES: &[DeadlineRule] = &[
    DeadlineRule {
        id: "cn-acknowledgment",
        description: "Defendant acknowledgment of letter of claim",
        trigger: EventKind::LetterOfClaimSent,
        business_days: 10,
        citation: "Pre-Action Protocol for the Resolution of Clinical Disputes, para 3.20",
    },
    DeadlineRule {
        id: "cn-response",
        description: "Defendant full response to letter of claim",
        trigger: EventKind::LetterOfClaimSent,
        business_days: 85,
        citation: "Pre-Action Protocol for the Resolution of Clinical Disputes, para 3.25",
    },
];

/// Rule table for a practice area. Family and general litigation carry no
/// protocol offsets here, so their deadline output is empty by design.
pub fn rules_for(area: PracticeArea) -> &'static [DeadlineRule] {
    match area {
        PracticeArea::HousingDisrepair => HOUSING_RULES,
        PracticeArea::PersonalInjury => INJURY_RULES,
        PracticeArea::ClinicalNegligence => CLINICAL_RULES,
        PracticeArea::Family | PracticeArea::OtherLitigation => &[],
    }
}

fn find_rule(rule_id: &str) -> Option<&'static DeadlineRule> {
    [HOUSING_RULES, INJURY_RULES, CLINICAL_RULES]
        .into_iter()
        .flatten()
        .find(|r| r.id == rule_id)
}

/// Status relative to an explicit evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    Computed,
    AtRisk,
    Missed,
}

/// A named obligation derived from a rule table row and an anchor event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deadline {
    pub rule_id: String,
    pub description: String,
    pub citation: String,
    pub anchor: NaiveDate,
    pub due: NaiveDate,
    pub business_days: i64,
    /// Elapsed calendar days between anchor and due date. Display only;
    /// business days remain the authoritative compliance measure.
    pub calendar_days: i64,
    pub status: DeadlineStatus,
}

fn status_at(calendar: &BusinessCalendar, due: NaiveDate, today: NaiveDate) -> DeadlineStatus {
    if due < today {
        DeadlineStatus::Missed
    } else if calendar.working_days_between(today, due) <= AT_RISK_WINDOW_DAYS {
        DeadlineStatus::AtRisk
    } else {
        DeadlineStatus::Computed
    }
}

fn apply_rule(
    calendar: &BusinessCalendar,
    rule: &DeadlineRule,
    anchor: NaiveDate,
    business_days: i64,
    today: NaiveDate,
) -> Result<Deadline, EngineError> {
    let due = calendar.advance(anchor, business_days)?;
    Ok(Deadline {
        rule_id: rule.id.to_string(),
        description: rule.description.to_string(),
        citation: rule.citation.to_string(),
        anchor,
        due,
        business_days,
        calendar_days: (due - anchor).num_days(),
        status: status_at(calendar, due, today),
    })
}

/// Derive a single deadline from an explicit start date and day count.
///
/// `rule_id` must name a row in one of the rule tables; an unknown id is a
/// configuration defect and returns [`EngineError::UnknownRule`].
pub fn calculate_deadline(
    calendar: &BusinessCalendar,
    start: NaiveDate,
    business_days: i64,
    rule_id: &str,
    today: NaiveDate,
) -> Result<Deadline, EngineError> {
    let rule = find_rule(rule_id).ok_or_else(|| EngineError::UnknownRule(rule_id.to_string()))?;
    apply_rule(calendar, rule, start, business_days, today)
}

/// Derive every deadline whose anchor event is recorded on the case.
///
/// A rule whose trigger has no recorded event is omitted from the output;
/// a deadline is never computed from a defaulted date. When a trigger has
/// recurred, the most recent occurrence re-anchors the deadline.
pub fn deadlines_for_case(
    calendar: &BusinessCalendar,
    facts: &CaseFacts,
    today: NaiveDate,
) -> Result<Vec<Deadline>, EngineError> {
    let mut deadlines = Vec::new();
    for rule in rules_for(facts.practice_area) {
        let Some(event) = facts.latest_event(rule.trigger) else {
            continue;
        };
        deadlines.push(apply_rule(
            calendar,
            rule,
            event.date,
            rule.business_days,
            today,
        )?);
    }
    deadlines.sort_by_key(|d| d.due);
    Ok(deadlines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseline_core::CaseEvent;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekends_only() -> BusinessCalendar {
        BusinessCalendar::new([Weekday::Sat, Weekday::Sun], [])
    }

    fn housing_case_with(kind: EventKind, on: NaiveDate) -> CaseFacts {
        let mut facts = CaseFacts::new("Tenant v Landlord", PracticeArea::HousingDisrepair);
        facts.events.push(CaseEvent::new(on, kind, "anchor"));
        facts
    }

    #[test]
    fn rule_ids_are_unique_across_tables() {
        let all: Vec<&str> = [HOUSING_RULES, INJURY_RULES, CLINICAL_RULES]
            .into_iter()
            .flatten()
            .map(|r| r.id)
            .collect();
        let mut deduped = all.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), all.len());
    }

    #[test]
    fn unknown_rule_id_is_a_configuration_defect() {
        let cal = weekends_only();
        let err =
            calculate_deadline(&cal, date(2025, 6, 2), 10, "no-such-rule", date(2025, 6, 2))
                .unwrap_err();
        assert!(matches!(err, EngineError::UnknownRule(_)));
    }

    #[test]
    fn day_count_is_monotonic_in_due_date() {
        let cal = BusinessCalendar::england_wales();
        let start = date(2025, 1, 2);
        let mut previous = start;
        for days in 0..30 {
            let d = calculate_deadline(&cal, start, days, "hdr-response", start).unwrap();
            assert!(d.due >= previous, "due date regressed at {days} days");
            previous = d.due;
        }
    }

    #[test]
    fn inspection_rule_produces_later_due_date_and_more_calendar_days() {
        let cal = BusinessCalendar::england_wales();
        let facts = housing_case_with(EventKind::InspectionCompleted, date(2025, 1, 1));
        let deadlines = deadlines_for_case(&cal, &facts, date(2025, 1, 1)).unwrap();

        assert_eq!(deadlines.len(), 1);
        let works = &deadlines[0];
        assert_eq!(works.rule_id, "hdr-works-start");
        assert!(works.due > works.anchor);
        assert_eq!(works.business_days, 20);
        assert!(works.calendar_days >= works.business_days);
    }

    #[test]
    fn absent_anchor_omits_the_deadline() {
        let cal = weekends_only();
        let facts = CaseFacts::new("Tenant v Landlord", PracticeArea::HousingDisrepair);
        let deadlines = deadlines_for_case(&cal, &facts, date(2025, 6, 2)).unwrap();
        assert!(deadlines.is_empty());
    }

    #[test]
    fn letter_of_claim_yields_both_housing_protocol_deadlines() {
        let cal = BusinessCalendar::england_wales();
        let facts = housing_case_with(EventKind::LetterOfClaimSent, date(2025, 2, 3));
        let deadlines = deadlines_for_case(&cal, &facts, date(2025, 2, 3)).unwrap();

        let ids: Vec<&str> = deadlines.iter().map(|d| d.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["hdr-response", "hdr-inspection"]);
        assert!(deadlines.iter().all(|d| d.status == DeadlineStatus::Computed));
    }

    #[test]
    fn latest_trigger_occurrence_re_anchors() {
        let cal = weekends_only();
        let mut facts = housing_case_with(EventKind::LetterOfClaimSent, date(2025, 1, 6));
        facts.events.push(CaseEvent::new(
            date(2025, 3, 3),
            EventKind::LetterOfClaimSent,
            "re-served letter",
        ));
        let deadlines = deadlines_for_case(&cal, &facts, date(2025, 3, 3)).unwrap();
        assert!(deadlines.iter().all(|d| d.anchor == date(2025, 3, 3)));
    }

    #[test]
    fn status_reflects_evaluation_date_not_wall_clock() {
        let cal = weekends_only();
        let anchor = date(2025, 6, 2); // Monday
        let d = |today| calculate_deadline(&cal, anchor, 10, "hdr-response", today).unwrap();

        // Due Mon 16 June. Ten working days out: computed.
        assert_eq!(d(anchor).status, DeadlineStatus::Computed);
        // Five working days out: at risk.
        assert_eq!(d(date(2025, 6, 9)).status, DeadlineStatus::AtRisk);
        // On the due date: still at risk, not missed.
        assert_eq!(d(date(2025, 6, 16)).status, DeadlineStatus::AtRisk);
        // The day after: missed.
        assert_eq!(d(date(2025, 6, 17)).status, DeadlineStatus::Missed);
    }

    #[test]
    fn family_and_other_litigation_have_no_protocol_deadlines() {
        let cal = weekends_only();
        for area in [PracticeArea::Family, PracticeArea::OtherLitigation] {
            let mut facts = CaseFacts::new("In re minors", area);
            facts.events.push(CaseEvent::new(
                date(2025, 6, 2),
                EventKind::LetterOfClaimSent,
                "letter",
            ));
            assert!(deadlines_for_case(&cal, &facts, date(2025, 6, 2))
                .unwrap()
                .is_empty());
        }
    }
}
