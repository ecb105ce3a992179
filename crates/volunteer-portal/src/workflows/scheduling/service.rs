use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{
    OpportunityId, OpportunitySnapshot, PublicRsvp, RegistrationChannel, ShiftId,
    ShiftRegistration, ShiftRegistrationRequest, VolunteerId, VolunteerSnapshot,
};
use super::eligibility::{EligibilityEngine, GateKind, RegistrationDecision, TrainingCatalog};
use super::repository::{
    NotificationPublisher, RegistrationNotice, RepositoryError, SchedulingRepository,
};

const ASSIGNMENT_GATES: &[GateKind] = &[
    GateKind::BaselineTraining,
    GateKind::RoleApproval,
    GateKind::BackgroundCheck,
];

const RSVP_GATES: &[GateKind] = &[
    GateKind::BaselineTraining,
    GateKind::RoleApproval,
    GateKind::ProgramClearance,
];

/// Service composing the eligibility engine, repository, and notifier.
///
/// Every path that places a volunteer on a shift goes through the same engine.
pub struct ShiftRegistrationService<R, N> {
    engine: Arc<EligibilityEngine>,
    repository: Arc<R>,
    notifications: Arc<N>,
}

impl<R, N> ShiftRegistrationService<R, N>
where
    R: SchedulingRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, notifications: Arc<N>, catalog: TrainingCatalog) -> Self {
        Self {
            engine: Arc::new(EligibilityEngine::new(catalog)),
            repository,
            notifications,
        }
    }

    pub fn engine(&self) -> &EligibilityEngine {
        &self.engine
    }

    /// Evaluate caller-supplied snapshots without touching storage.
    pub fn preview(
        &self,
        volunteer: &VolunteerSnapshot,
        opportunity: &OpportunitySnapshot,
    ) -> RegistrationDecision {
        self.engine.evaluate(volunteer, opportunity)
    }

    /// Load both records and report the decision without reserving anything.
    pub fn check(
        &self,
        volunteer_id: &VolunteerId,
        opportunity_id: &OpportunityId,
    ) -> Result<RegistrationDecision, RegistrationError> {
        let (volunteer, opportunity) = self.load(volunteer_id, opportunity_id)?;
        Ok(self.engine.evaluate(&volunteer, &opportunity))
    }

    /// Self-service signup: only proceeds when the volunteer can register.
    pub fn register(
        &self,
        request: ShiftRegistrationRequest,
    ) -> Result<ShiftRegistration, RegistrationError> {
        let (volunteer, opportunity) = self.load(&request.volunteer_id, &request.opportunity_id)?;
        ensure_shift(&opportunity, &request.shift_id)?;

        let decision = self.engine.evaluate(&volunteer, &opportunity);
        if !decision.can_register {
            warn!(
                volunteer = %request.volunteer_id,
                opportunity = %request.opportunity_id,
                blocking = decision.blocking_issues.len(),
                "shift registration rejected"
            );
            return Err(RegistrationError::Ineligible(Box::new(decision)));
        }

        let registration = new_registration(request, RegistrationChannel::SelfService);
        let stored = self.repository.reserve_slot(registration)?;
        self.notify("shift_confirmation", &stored, &opportunity, &decision);
        Ok(stored)
    }

    /// Administrator placement. Operational eligibility and a cleared background
    /// check are still required; every other blocking issue is overridden and recorded.
    pub fn admin_assign(
        &self,
        request: ShiftRegistrationRequest,
        reason: &str,
    ) -> Result<ShiftRegistration, RegistrationError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(RegistrationError::MissingOverrideReason);
        }

        let (volunteer, opportunity) = self.load(&request.volunteer_id, &request.opportunity_id)?;
        ensure_shift(&opportunity, &request.shift_id)?;

        let decision = self.engine.evaluate(&volunteer, &opportunity);
        if !decision.gates.is_operational_eligible || !decision.gates.background_check_complete {
            return Err(RegistrationError::AssignmentBlocked(
                decision.messages_for(ASSIGNMENT_GATES),
            ));
        }

        let mut registration = new_registration(request, RegistrationChannel::AdminOverride);
        if !decision.blocking_issues.is_empty() {
            warn!(
                volunteer = %registration.volunteer_id,
                overridden = decision.blocking_issues.len(),
                reason,
                "admin override bypassing blocking issues"
            );
        }
        registration.overridden_issues = decision.blocking_issues.clone();
        registration.override_reason = Some(reason.to_string());

        let stored = self.repository.reserve_slot(registration)?;
        self.notify("admin_assignment", &stored, &opportunity, &decision);
        Ok(stored)
    }

    /// Attach a public RSVP to an existing volunteer when they are trained for the event.
    pub fn match_rsvp(&self, rsvp: PublicRsvp) -> Result<RsvpMatch, RegistrationError> {
        let email = rsvp.email.trim();
        let Some(volunteer) = self.repository.volunteer_by_email(email)? else {
            debug!(opportunity = %rsvp.opportunity_id, "rsvp has no matching volunteer");
            return Ok(RsvpMatch::NoVolunteer);
        };
        let Some(volunteer_id) = volunteer.id.clone() else {
            return Ok(RsvpMatch::NoVolunteer);
        };

        let opportunity = self
            .repository
            .opportunity(&rsvp.opportunity_id)?
            .ok_or_else(|| RegistrationError::OpportunityNotFound(rsvp.opportunity_id.clone()))?;
        ensure_shift(&opportunity, &rsvp.shift_id)?;

        let decision = self.engine.evaluate(&volunteer, &opportunity);
        if !(decision.gates.is_operational_eligible && decision.gates.program_clearance) {
            return Ok(RsvpMatch::GuestOnly {
                volunteer_id,
                reasons: decision.messages_for(RSVP_GATES),
            });
        }

        let request = ShiftRegistrationRequest {
            volunteer_id,
            opportunity_id: rsvp.opportunity_id,
            shift_id: rsvp.shift_id,
        };
        let registration = new_registration(request, RegistrationChannel::PublicRsvp);
        match self.repository.reserve_slot(registration) {
            Ok(stored) => {
                self.notify("rsvp_auto_registration", &stored, &opportunity, &decision);
                Ok(RsvpMatch::Registered(stored))
            }
            Err(RepositoryError::AlreadyRegistered(_)) => Ok(RsvpMatch::AlreadyRegistered),
            Err(other) => Err(other.into()),
        }
    }

    fn load(
        &self,
        volunteer_id: &VolunteerId,
        opportunity_id: &OpportunityId,
    ) -> Result<(VolunteerSnapshot, OpportunitySnapshot), RegistrationError> {
        let volunteer = self
            .repository
            .volunteer(volunteer_id)?
            .ok_or_else(|| RegistrationError::VolunteerNotFound(volunteer_id.clone()))?;
        let opportunity = self
            .repository
            .opportunity(opportunity_id)?
            .ok_or_else(|| RegistrationError::OpportunityNotFound(opportunity_id.clone()))?;
        Ok((volunteer, opportunity))
    }

    // The reservation is already committed, so a failed notice is logged rather than returned.
    fn notify(
        &self,
        template: &str,
        registration: &ShiftRegistration,
        opportunity: &OpportunitySnapshot,
        decision: &RegistrationDecision,
    ) {
        let mut details = BTreeMap::new();
        details.insert(
            "channel".to_string(),
            registration.channel.label().to_string(),
        );
        if let Some(title) = &opportunity.title {
            details.insert("opportunity_title".to_string(), title.clone());
        }
        if let Some(date) = &opportunity.date {
            details.insert("date".to_string(), date.clone());
        }
        if !decision.warnings.is_empty() {
            details.insert("warnings".to_string(), decision.warnings.join("\n"));
        }

        let notice = RegistrationNotice {
            template: template.to_string(),
            volunteer_id: registration.volunteer_id.clone(),
            opportunity_id: registration.opportunity_id.clone(),
            shift_id: registration.shift_id.clone(),
            details,
        };

        match self.notifications.publish(notice) {
            Ok(()) => info!(
                volunteer = %registration.volunteer_id,
                shift = %registration.shift_id,
                channel = registration.channel.label(),
                "shift registration confirmed"
            ),
            Err(error) => warn!(
                volunteer = %registration.volunteer_id,
                %error,
                "registration stored but notification failed"
            ),
        }
    }
}

fn ensure_shift(
    opportunity: &OpportunitySnapshot,
    shift_id: &ShiftId,
) -> Result<(), RegistrationError> {
    opportunity
        .shift(shift_id)
        .map(|_| ())
        .ok_or_else(|| RegistrationError::ShiftNotFound(shift_id.clone()))
}

fn new_registration(
    request: ShiftRegistrationRequest,
    channel: RegistrationChannel,
) -> ShiftRegistration {
    ShiftRegistration {
        volunteer_id: request.volunteer_id,
        opportunity_id: request.opportunity_id,
        shift_id: request.shift_id,
        channel,
        registered_at: Utc::now(),
        overridden_issues: Vec::new(),
        override_reason: None,
    }
}

/// Result of matching a public RSVP against the volunteer roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RsvpMatch {
    NoVolunteer,
    Registered(ShiftRegistration),
    AlreadyRegistered,
    GuestOnly {
        volunteer_id: VolunteerId,
        reasons: Vec<String>,
    },
}

/// Error raised by the registration service.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("volunteer {0} not found")]
    VolunteerNotFound(VolunteerId),
    #[error("opportunity {0} not found")]
    OpportunityNotFound(OpportunityId),
    #[error("shift {0} not found on opportunity")]
    ShiftNotFound(ShiftId),
    #[error("{}", .0.summary())]
    Ineligible(Box<RegistrationDecision>),
    #[error("volunteer cannot be assigned: {}", .0.join("; "))]
    AssignmentBlocked(Vec<String>),
    #[error("admin override requires a reason")]
    MissingOverrideReason,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
