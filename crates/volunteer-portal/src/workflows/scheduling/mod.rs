//! Shift scheduling: eligibility evaluation and the registration paths built on it.

pub mod domain;
pub mod eligibility;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Availability, BackgroundCheck, ComplianceRecord, OpportunityId, OpportunitySnapshot,
    PublicRsvp, RegistrationChannel, ShiftId, ShiftRegistration, ShiftRegistrationRequest,
    ShiftSnapshot, VolunteerId, VolunteerSnapshot,
};
pub use eligibility::{
    classify, EligibilityEngine, EligibilityGates, GateKind, ProgramId, RegistrationDecision,
    TrainingCatalog,
};
pub use repository::{
    NotificationError, NotificationPublisher, RegistrationNotice, RepositoryError,
    SchedulingRepository,
};
pub use router::{scheduling_router, EligibilityView};
pub use service::{RegistrationError, RsvpMatch, ShiftRegistrationService};
