mod display;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use caseline_core::CaseFacts;
use caseline_engine::{
    BusinessCalendar, calculate_priority_score, deadlines_for_case, evaluate_risks,
    generate_guidance,
};

#[derive(Parser)]
#[command(name = "caseline", version, about = "Derived-fact engines for legal case management")]
struct Cli {
    /// Evaluation date (defaults to today). Statuses and scores are
    /// computed against this date, never the wall clock mid-run.
    #[arg(long, global = true, env = "CASELINE_TODAY")]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Full assessment card: stage, deadlines, next steps, priority, risks.
    Assess { case_file: PathBuf },
    /// Derived deadlines as JSON.
    Deadlines { case_file: PathBuf },
    /// Priority score and risk flags as JSON.
    Score { case_file: PathBuf },
}

fn load_facts(path: &PathBuf) -> anyhow::Result<CaseFacts> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading case snapshot {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing case snapshot {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("caseline v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let today = cli.today.unwrap_or_else(|| Utc::now().date_naive());
    let calendar = BusinessCalendar::england_wales();

    match cli.command {
        Command::Assess { case_file } => {
            let facts = load_facts(&case_file)?;
            let deadlines = deadlines_for_case(&calendar, &facts, today)?;
            let guidance = generate_guidance(&calendar, &facts, today)?;
            let score = calculate_priority_score(&calendar, &facts, &deadlines, today);
            let risks = evaluate_risks(&calendar, &facts, &deadlines, today, Utc::now());
            display::print_assessment_card(&facts, today, &guidance, &deadlines, &score, &risks);
        }
        Command::Deadlines { case_file } => {
            let facts = load_facts(&case_file)?;
            let deadlines = deadlines_for_case(&calendar, &facts, today)?;
            println!("{}", serde_json::to_string_pretty(&deadlines)?);
        }
        Command::Score { case_file } => {
            let facts = load_facts(&case_file)?;
            let deadlines = deadlines_for_case(&calendar, &facts, today)?;
            let score = calculate_priority_score(&calendar, &facts, &deadlines, today);
            let risks = evaluate_risks(&calendar, &facts, &deadlines, today, Utc::now());
            let out = serde_json::json!({ "priority": score, "risks": risks });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
