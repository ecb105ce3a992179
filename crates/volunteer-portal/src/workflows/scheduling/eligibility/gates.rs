use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate};

use super::super::domain::{Availability, BackgroundCheck};
use super::catalog::TrainingCatalog;
use super::classifier::ProgramId;
use super::decision::{GateFinding, GateKind};

const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// True when every required module id appears in the completed set.
pub fn has_completed_all(completed: &BTreeSet<String>, required: &BTreeSet<String>) -> bool {
    required.is_subset(completed)
}

pub(crate) fn orientation(
    completed: &BTreeSet<String>,
    catalog: &TrainingCatalog,
) -> (bool, Option<GateFinding>) {
    let complete = has_completed_all(completed, &catalog.tier1);
    let finding = (!complete).then(|| {
        GateFinding::blocking(
            GateKind::Orientation,
            "Orientation Incomplete: finish the Tier 1 orientation modules before registering for shifts."
                .to_string(),
        )
    });
    (complete, finding)
}

pub(crate) fn baseline_training(
    completed: &BTreeSet<String>,
    catalog: &TrainingCatalog,
) -> (bool, Option<GateFinding>) {
    let complete = has_completed_all(completed, &catalog.tier2);
    let finding = (!complete).then(|| {
        GateFinding::blocking(
            GateKind::BaselineTraining,
            "Required Training Incomplete: complete HIPAA training, the Core Volunteer Workshop, the volunteer survey, and the portal walkthrough."
                .to_string(),
        )
    });
    (complete, finding)
}

pub(crate) fn role_approval(core_volunteer_status: bool) -> (bool, Option<GateFinding>) {
    let finding = (!core_volunteer_status).then(|| {
        GateFinding::blocking(
            GateKind::RoleApproval,
            "Role Approval Pending: an administrator must approve your volunteer role before you can register for shifts."
                .to_string(),
        )
    });
    (core_volunteer_status, finding)
}

pub(crate) fn program_clearance(
    completed: &BTreeSet<String>,
    program: Option<ProgramId>,
    catalog: &TrainingCatalog,
) -> (bool, Option<GateFinding>) {
    let Some(program) = program else {
        return (true, None);
    };

    let required = catalog.required_modules(program);
    if has_completed_all(completed, &required) {
        return (true, None);
    }

    let missing = required.difference(completed).count();
    let plural = if missing == 1 { "" } else { "s" };
    let label = catalog.program_label(program);
    let finding = GateFinding::blocking(
        GateKind::ProgramClearance,
        format!(
            "{label} Training Required: complete {missing} more {label} module{plural} to register for this shift."
        ),
    );
    (false, Some(finding))
}

pub(crate) fn background_check(check: &BackgroundCheck) -> (bool, Option<GateFinding>) {
    let cleared = check.is_cleared();
    let finding = (!cleared).then(|| {
        GateFinding::warning(
            GateKind::BackgroundCheck,
            "Background Check Pending: you can register, but you cannot be assigned to a shift until your background check is cleared."
                .to_string(),
        )
    });
    (cleared, finding)
}

pub(crate) fn weekly_availability(
    availability: Option<&Availability>,
    date: Option<&str>,
) -> Option<GateFinding> {
    let days = &availability?.days;
    if days.is_empty() {
        return None;
    }

    let day = shift_weekday(date?)?;
    if days.iter().any(|configured| configured == day) {
        return None;
    }

    Some(GateFinding::warning(
        GateKind::WeeklyAvailability,
        format!(
            "Availability Mismatch: this shift falls on {day}, but your availability is set to {}.",
            days.join(", ")
        ),
    ))
}

pub(crate) fn time_off(availability: Option<&Availability>, date: Option<&str>) -> Option<GateFinding> {
    let date = date?;
    if !availability?.unavailable_dates.contains(date) {
        return None;
    }

    Some(GateFinding::blocking(
        GateKind::TimeOff,
        format!(
            "Time-Off Conflict: {date} is on your unavailable dates. Remove it from your time-off list to register."
        ),
    ))
}

/// Weekday abbreviation for an opportunity date, or `None` when the date is unreadable.
pub(crate) fn shift_weekday(raw: &str) -> Option<&'static str> {
    let date = parse_opportunity_date(raw)?;
    let index = date.weekday().num_days_from_sunday() as usize;
    Some(WEEKDAY_ABBREVIATIONS[index])
}

fn parse_opportunity_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}
