use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for volunteer records.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VolunteerId(pub String);

/// Identifier wrapper for opportunities (events that own one or more shifts).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OpportunityId(pub String);

/// Identifier wrapper for a single shift inside an opportunity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShiftId(pub String);

macro_rules! display_id {
    ($($name:ident),+) => {
        $(impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        })+
    };
}

display_id!(VolunteerId, OpportunityId, ShiftId);

/// Read-only view of a volunteer as loaded for a registration request.
///
/// Every field defaults when absent so partially populated records still evaluate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolunteerSnapshot {
    pub id: Option<VolunteerId>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub core_volunteer_status: bool,
    pub completed_training_ids: BTreeSet<String>,
    pub compliance: ComplianceRecord,
    pub availability: Option<Availability>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplianceRecord {
    pub background_check: BackgroundCheck,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackgroundCheck {
    pub status: Option<String>,
}

impl BackgroundCheck {
    /// Only these two statuses count as a cleared check; everything else is pending.
    pub fn is_cleared(&self) -> bool {
        matches!(self.status.as_deref(), Some("verified") | Some("completed"))
    }
}

/// Weekly availability and explicit time off.
///
/// `days` holds weekday abbreviations (`Sun`..`Sat`); an empty list means no restriction.
/// `unavailable_dates` holds ISO dates compared verbatim against the opportunity date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Availability {
    pub days: Vec<String>,
    pub unavailable_dates: BTreeSet<String>,
}

/// Opportunity record as seen by the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpportunitySnapshot {
    pub id: Option<OpportunityId>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub shifts: Vec<ShiftSnapshot>,
}

impl OpportunitySnapshot {
    pub fn shift(&self, shift_id: &ShiftId) -> Option<&ShiftSnapshot> {
        self.shifts.iter().find(|shift| &shift.id == shift_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSnapshot {
    pub id: ShiftId,
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    pub slots_total: u32,
    #[serde(default)]
    pub slots_filled: u32,
}

impl ShiftSnapshot {
    pub fn has_capacity(&self) -> bool {
        self.slots_filled < self.slots_total
    }
}

/// Path through which a registration was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationChannel {
    SelfService,
    AdminOverride,
    PublicRsvp,
}

impl RegistrationChannel {
    pub const fn label(self) -> &'static str {
        match self {
            RegistrationChannel::SelfService => "self_service",
            RegistrationChannel::AdminOverride => "admin_override",
            RegistrationChannel::PublicRsvp => "public_rsvp",
        }
    }
}

/// Request to place a volunteer on a specific shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRegistrationRequest {
    pub volunteer_id: VolunteerId,
    pub opportunity_id: OpportunityId,
    pub shift_id: ShiftId,
}

/// Reservation written after a positive decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRegistration {
    pub volunteer_id: VolunteerId,
    pub opportunity_id: OpportunityId,
    pub shift_id: ShiftId,
    pub channel: RegistrationChannel,
    pub registered_at: DateTime<Utc>,
    /// Blocking issues an administrator chose to override, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overridden_issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_reason: Option<String>,
}

/// RSVP submitted through the public event page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicRsvp {
    pub email: String,
    pub opportunity_id: OpportunityId,
    pub shift_id: ShiftId,
    #[serde(default)]
    pub name: Option<String>,
}
