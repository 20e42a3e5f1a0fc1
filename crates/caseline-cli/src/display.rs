//! Vertical assessment card for one case snapshot.
//!
//! Renders the derived artifacts (stage, deadlines, next steps, priority,
//! risk flags) as grouped, human-readable sections with aligned columns.

use chrono::NaiveDate;

use caseline_core::CaseFacts;
use caseline_engine::rules::Deadline;
use caseline_engine::scoring::{PriorityScore, RiskFlag};
use caseline_engine::{DeadlineStatus, Guidance};

const MAX_LIST_ITEMS: usize = 10;

pub fn print_assessment_card(
    facts: &CaseFacts,
    today: NaiveDate,
    guidance: &Guidance,
    deadlines: &[Deadline],
    score: &PriorityScore,
    risks: &[RiskFlag],
) {
    println!("=== {} ===", facts.title);
    println!("{:<26} {:?}", "practice_area", facts.practice_area);
    println!("{:<26} {}", "evaluated_on", today);
    println!("{:<26} {}", "events_on_file", facts.events.len());
    println!();

    println!("Stage");
    println!("  {}", guidance.stage.as_str());
    println!();

    print_deadlines(deadlines);
    print_next_steps(guidance);
    print_priority(score);
    print_risks(risks);
}

fn status_marker(status: DeadlineStatus) -> &'static str {
    match status {
        DeadlineStatus::Computed => " ",
        DeadlineStatus::AtRisk => "!",
        DeadlineStatus::Missed => "x",
    }
}

fn print_deadlines(deadlines: &[Deadline]) {
    if deadlines.is_empty() {
        return;
    }
    println!("Deadlines ({})", deadlines.len());
    for d in deadlines.iter().take(MAX_LIST_ITEMS) {
        println!(
            "  {} {:<44} due {}  ({} wd / {} cd)",
            status_marker(d.status),
            d.description,
            d.due,
            d.business_days,
            d.calendar_days,
        );
        println!("      {}", d.citation);
    }
    if deadlines.len() > MAX_LIST_ITEMS {
        println!("  ... and {} more", deadlines.len() - MAX_LIST_ITEMS);
    }
    println!();
}

fn print_next_steps(guidance: &Guidance) {
    if guidance.next_steps.is_empty() {
        return;
    }
    println!("Next Steps ({})", guidance.next_steps.len());
    for s in guidance.next_steps.iter().take(MAX_LIST_ITEMS) {
        match &s.deadline {
            Some(d) => println!("  {}. {:<48} by {}", s.priority + 1, s.action, d.due),
            None => println!("  {}. {}", s.priority + 1, s.action),
        }
    }
    if guidance.next_steps.len() > MAX_LIST_ITEMS {
        println!("  ... and {} more", guidance.next_steps.len() - MAX_LIST_ITEMS);
    }
    println!();
}

fn print_priority(score: &PriorityScore) {
    println!("Priority");
    println!("  {:<26} {}", "band", score.band);
    println!("  {:<26} {:.1}", "total", score.total);
    for f in &score.factors {
        if f.contribution == 0.0 {
            continue;
        }
        println!(
            "  {:<26} {:.1}  (raw {:.1} x weight {:.1})",
            f.factor, f.contribution, f.raw, f.weight
        );
    }
    println!();
}

fn print_risks(risks: &[RiskFlag]) {
    if risks.is_empty() {
        println!("Risk Flags");
        println!("  none");
        return;
    }
    println!("Risk Flags ({})", risks.len());
    for r in risks.iter().take(MAX_LIST_ITEMS) {
        println!("  [{}] {}", r.severity, r.detail);
    }
    if risks.len() > MAX_LIST_ITEMS {
        println!("  ... and {} more", risks.len() - MAX_LIST_ITEMS);
    }
}
