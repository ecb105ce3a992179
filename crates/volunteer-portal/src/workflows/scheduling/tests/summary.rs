use std::collections::BTreeSet;

use super::common::*;
use crate::workflows::scheduling::domain::Availability;
use crate::workflows::scheduling::eligibility::{EligibilityGates, RegistrationDecision};

#[test]
fn eligible_summary_is_the_fixed_confirmation() {
    let decision = engine().evaluate(&eligible_volunteer(), &general_meeting());

    assert_eq!(
        decision.summary(),
        "You are eligible to register for this shift."
    );
}

#[test]
fn blocked_summary_lists_issues_then_warnings() {
    let mut volunteer = eligible_volunteer();
    volunteer.core_volunteer_status = false;
    volunteer.compliance.background_check.status = None;
    volunteer.availability = Some(Availability {
        days: vec!["Mon".to_string()],
        unavailable_dates: BTreeSet::from([FRIDAY.to_string()]),
    });

    let decision = engine().evaluate(&volunteer, &general_meeting());
    let summary = decision.summary();

    let expected = format!(
        "2 issues preventing registration:\n\n{}\n\n{}\n\nWarnings:\n{}\n{}",
        decision.blocking_issues[0],
        decision.blocking_issues[1],
        decision.warnings[0],
        decision.warnings[1],
    );
    assert_eq!(summary, expected);
}

#[test]
fn single_issue_summary_uses_singular_noun() {
    let decision = engine().evaluate(&eligible_volunteer(), &street_medicine_outreach());

    let summary = decision.summary();
    assert!(summary.starts_with("1 issue preventing registration:\n\n"));
    assert!(!summary.contains("Warnings:"));
}

#[test]
fn ineligible_without_issues_falls_back_to_generic_message() {
    let decision = RegistrationDecision {
        can_register: false,
        blocking_issues: Vec::new(),
        warnings: vec!["Background Check Pending".to_string()],
        gates: EligibilityGates {
            is_operational_eligible: false,
            tier1_complete: true,
            tier2_complete: true,
            program_clearance: true,
            background_check_complete: false,
        },
        findings: Vec::new(),
    };

    assert_eq!(decision.summary(), "Unable to register for this shift.");
}
