use crate::infra::{load_catalog, read_snapshot};
use clap::Args;
use std::fmt::Write;
use std::path::PathBuf;
use volunteer_portal::error::AppError;
use volunteer_portal::workflows::scheduling::{
    classify, EligibilityEngine, OpportunitySnapshot, RegistrationDecision, TrainingCatalog,
    VolunteerSnapshot,
};

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Volunteer snapshot exported from the portal (JSON)
    #[arg(long)]
    pub(crate) volunteer: PathBuf,
    /// Opportunity snapshot exported from the portal (JSON)
    #[arg(long)]
    pub(crate) opportunity: PathBuf,
    /// Training catalog to use instead of the built-in tiers (JSON)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the raw decision as JSON instead of the report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let CheckArgs {
        volunteer,
        opportunity,
        catalog,
        json,
    } = args;

    let catalog = load_catalog(catalog.as_deref())?;
    let volunteer: VolunteerSnapshot = read_snapshot(&volunteer)?;
    let opportunity: OpportunitySnapshot = read_snapshot(&opportunity)?;

    let engine = EligibilityEngine::new(catalog);
    let decision = engine.evaluate(&volunteer, &opportunity);

    if json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        print!(
            "{}",
            render_report(engine.catalog(), &volunteer, &opportunity, &decision)
        );
    }
    Ok(())
}

fn render_report(
    catalog: &TrainingCatalog,
    volunteer: &VolunteerSnapshot,
    opportunity: &OpportunitySnapshot,
    decision: &RegistrationDecision,
) -> String {
    let mut out = String::new();
    let who = volunteer
        .name
        .as_deref()
        .or(volunteer.email.as_deref())
        .unwrap_or("volunteer");
    let what = opportunity
        .title
        .as_deref()
        .or(opportunity.category.as_deref())
        .unwrap_or("opportunity");
    let when = opportunity.date.as_deref().unwrap_or("undated");
    let _ = writeln!(out, "Eligibility check: {who} -> {what} ({when})");

    let program = classify(opportunity.category.as_deref())
        .map(|program| catalog.program_label(program))
        .unwrap_or_else(|| "none".to_string());

    let gates = &decision.gates;
    let rows = [
        ("Tier 1 orientation", gates.tier1_complete),
        ("Tier 2 baseline training", gates.tier2_complete),
        ("Operationally eligible", gates.is_operational_eligible),
        ("Program clearance", gates.program_clearance),
        ("Background check cleared", gates.background_check_complete),
    ];
    let _ = writeln!(out, "Program: {program}");
    let _ = writeln!(out, "Gates:");
    for (label, passed) in rows {
        let mark = if passed { "pass" } else { "FAIL" };
        let _ = writeln!(out, "  - {label:<26} {mark}");
    }

    let verdict = if decision.can_register {
        "can register"
    } else {
        "cannot register"
    };
    let _ = writeln!(out, "Result: {verdict}");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", decision.summary());
    out
}
