//! Shift registration eligibility.
//!
//! Every gate runs on every evaluation so the caller sees all problems at once. Blocking
//! findings prevent registration; warnings are advisory.

mod catalog;
mod classifier;
mod decision;
mod gates;

pub use catalog::{CatalogError, ProgramRequirement, TrainingCatalog};
pub use classifier::{classify, ProgramId};
pub use decision::{EligibilityGates, FindingSeverity, GateFinding, GateKind, RegistrationDecision};
pub use gates::has_completed_all;

use super::domain::{OpportunitySnapshot, VolunteerSnapshot};

/// Stateless evaluator over an injected training catalog.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEngine {
    catalog: TrainingCatalog,
}

impl EligibilityEngine {
    pub fn new(catalog: TrainingCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &TrainingCatalog {
        &self.catalog
    }

    pub fn evaluate(
        &self,
        volunteer: &VolunteerSnapshot,
        opportunity: &OpportunitySnapshot,
    ) -> RegistrationDecision {
        let completed = &volunteer.completed_training_ids;
        let availability = volunteer.availability.as_ref();
        let date = opportunity.date.as_deref();
        let program = classify(opportunity.category.as_deref());

        let (tier1_complete, orientation) = gates::orientation(completed, &self.catalog);
        let (tier2_complete, baseline) = gates::baseline_training(completed, &self.catalog);
        let (has_approved_role, role) = gates::role_approval(volunteer.core_volunteer_status);
        let (program_clearance, clearance) =
            gates::program_clearance(completed, program, &self.catalog);
        let (background_check_complete, background) =
            gates::background_check(&volunteer.compliance.background_check);
        let availability_mismatch = gates::weekly_availability(availability, date);
        let time_off = gates::time_off(availability, date);

        let findings = [
            orientation,
            baseline,
            role,
            clearance,
            background,
            availability_mismatch,
            time_off,
        ]
        .into_iter()
        .flatten()
        .collect();

        let status = EligibilityGates {
            is_operational_eligible: has_approved_role && tier2_complete,
            tier1_complete,
            tier2_complete,
            program_clearance,
            background_check_complete,
        };

        RegistrationDecision::from_findings(status, findings)
    }
}
