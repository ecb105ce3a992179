use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    OpportunityId, OpportunitySnapshot, ShiftId, ShiftRegistration, VolunteerId, VolunteerSnapshot,
};

/// Storage abstraction for volunteers, opportunities, and shift reservations.
pub trait SchedulingRepository: Send + Sync {
    fn volunteer(&self, id: &VolunteerId) -> Result<Option<VolunteerSnapshot>, RepositoryError>;

    /// Case-insensitive lookup used when matching public RSVPs.
    fn volunteer_by_email(&self, email: &str)
        -> Result<Option<VolunteerSnapshot>, RepositoryError>;

    fn opportunity(
        &self,
        id: &OpportunityId,
    ) -> Result<Option<OpportunitySnapshot>, RepositoryError>;

    /// Store the registration and increment the shift's filled slots.
    ///
    /// The capacity check and the write must happen atomically; two concurrent
    /// reservations for the last slot may not both succeed.
    fn reserve_slot(&self, registration: ShiftRegistration)
        -> Result<ShiftRegistration, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("shift {0} has no open slots")]
    ShiftFull(ShiftId),
    #[error("volunteer is already registered for shift {0}")]
    AlreadyRegistered(ShiftId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook (confirmation e-mail, XP award, admin feed).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notice: RegistrationNotice) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationNotice {
    pub template: String,
    pub volunteer_id: VolunteerId,
    pub opportunity_id: OpportunityId,
    pub shift_id: ShiftId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
