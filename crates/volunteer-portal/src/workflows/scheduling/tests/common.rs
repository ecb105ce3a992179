use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::scheduling::domain::{
    Availability, BackgroundCheck, ComplianceRecord, OpportunityId, OpportunitySnapshot, ShiftId,
    ShiftRegistration, ShiftRegistrationRequest, ShiftSnapshot, VolunteerId, VolunteerSnapshot,
};
use crate::workflows::scheduling::eligibility::{EligibilityEngine, ProgramId, TrainingCatalog};
use crate::workflows::scheduling::repository::{
    NotificationError, NotificationPublisher, RegistrationNotice, RepositoryError,
    SchedulingRepository,
};
use crate::workflows::scheduling::ShiftRegistrationService;

pub(super) const FRIDAY: &str = "2025-06-06";

pub(super) fn catalog() -> TrainingCatalog {
    TrainingCatalog::standard()
}

pub(super) fn engine() -> EligibilityEngine {
    EligibilityEngine::new(catalog())
}

pub(super) fn baseline_training_ids() -> BTreeSet<String> {
    let catalog = catalog();
    catalog.tier1.union(&catalog.tier2).cloned().collect()
}

pub(super) fn program_ids(program: ProgramId) -> BTreeSet<String> {
    catalog().required_modules(program)
}

pub(super) fn eligible_volunteer() -> VolunteerSnapshot {
    VolunteerSnapshot {
        id: Some(VolunteerId("vol-ana".to_string())),
        name: Some("Ana Torres".to_string()),
        email: Some("ana.torres@example.org".to_string()),
        core_volunteer_status: true,
        completed_training_ids: baseline_training_ids(),
        compliance: ComplianceRecord {
            background_check: BackgroundCheck {
                status: Some("verified".to_string()),
            },
        },
        availability: Some(Availability::default()),
    }
}

pub(super) fn pending_volunteer() -> VolunteerSnapshot {
    VolunteerSnapshot {
        id: Some(VolunteerId("vol-ben".to_string())),
        name: Some("Ben Okafor".to_string()),
        email: Some("ben.okafor@example.org".to_string()),
        core_volunteer_status: false,
        completed_training_ids: catalog().tier1.clone(),
        compliance: ComplianceRecord::default(),
        availability: None,
    }
}

pub(super) fn shift(id: &str, slots_total: u32) -> ShiftSnapshot {
    ShiftSnapshot {
        id: ShiftId(id.to_string()),
        role_name: Some("Check-in".to_string()),
        start_time: Some("09:00".to_string()),
        end_time: Some("12:00".to_string()),
        slots_total,
        slots_filled: 0,
    }
}

pub(super) fn opportunity(id: &str, category: &str, date: &str) -> OpportunitySnapshot {
    OpportunitySnapshot {
        id: Some(OpportunityId(id.to_string())),
        title: Some(format!("{category} ({date})")),
        category: Some(category.to_string()),
        date: Some(date.to_string()),
        shifts: vec![shift("shift-am", 2)],
    }
}

pub(super) fn general_meeting() -> OpportunitySnapshot {
    opportunity("opp-general", "General Meeting", FRIDAY)
}

pub(super) fn street_medicine_outreach() -> OpportunitySnapshot {
    opportunity("opp-smo", "Street Medicine Outreach", FRIDAY)
}

pub(super) fn request(volunteer: &str, opportunity: &str) -> ShiftRegistrationRequest {
    ShiftRegistrationRequest {
        volunteer_id: VolunteerId(volunteer.to_string()),
        opportunity_id: OpportunityId(opportunity.to_string()),
        shift_id: ShiftId("shift-am".to_string()),
    }
}

#[derive(Default)]
pub(super) struct RosterState {
    pub(super) volunteers: HashMap<VolunteerId, VolunteerSnapshot>,
    pub(super) opportunities: HashMap<OpportunityId, OpportunitySnapshot>,
    pub(super) registrations: Vec<ShiftRegistration>,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) state: Arc<Mutex<RosterState>>,
}

impl MemoryRepository {
    pub(super) fn with_volunteer(self, volunteer: VolunteerSnapshot) -> Self {
        {
            let mut state = self.state.lock().expect("repository mutex poisoned");
            let id = volunteer.id.clone().expect("fixture volunteers have ids");
            state.volunteers.insert(id, volunteer);
        }
        self
    }

    pub(super) fn with_opportunity(self, opportunity: OpportunitySnapshot) -> Self {
        {
            let mut state = self.state.lock().expect("repository mutex poisoned");
            let id = opportunity.id.clone().expect("fixture opportunities have ids");
            state.opportunities.insert(id, opportunity);
        }
        self
    }

    pub(super) fn registrations(&self) -> Vec<ShiftRegistration> {
        self.state
            .lock()
            .expect("repository mutex poisoned")
            .registrations
            .clone()
    }

    pub(super) fn slots_filled(&self, opportunity: &str, shift: &str) -> u32 {
        let state = self.state.lock().expect("repository mutex poisoned");
        state
            .opportunities
            .get(&OpportunityId(opportunity.to_string()))
            .and_then(|record| record.shift(&ShiftId(shift.to_string())))
            .map(|shift| shift.slots_filled)
            .unwrap_or_default()
    }
}

impl SchedulingRepository for MemoryRepository {
    fn volunteer(&self, id: &VolunteerId) -> Result<Option<VolunteerSnapshot>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.volunteers.get(id).cloned())
    }

    fn volunteer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<VolunteerSnapshot>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state
            .volunteers
            .values()
            .find(|volunteer| {
                volunteer
                    .email
                    .as_deref()
                    .is_some_and(|candidate| candidate.eq_ignore_ascii_case(email))
            })
            .cloned())
    }

    fn opportunity(
        &self,
        id: &OpportunityId,
    ) -> Result<Option<OpportunitySnapshot>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.opportunities.get(id).cloned())
    }

    fn reserve_slot(
        &self,
        registration: ShiftRegistration,
    ) -> Result<ShiftRegistration, RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        let duplicate = state.registrations.iter().any(|existing| {
            existing.volunteer_id == registration.volunteer_id
                && existing.opportunity_id == registration.opportunity_id
                && existing.shift_id == registration.shift_id
        });
        if duplicate {
            return Err(RepositoryError::AlreadyRegistered(
                registration.shift_id.clone(),
            ));
        }

        let shift = state
            .opportunities
            .get_mut(&registration.opportunity_id)
            .and_then(|opportunity| {
                opportunity
                    .shifts
                    .iter_mut()
                    .find(|shift| shift.id == registration.shift_id)
            })
            .ok_or(RepositoryError::NotFound)?;
        if !shift.has_capacity() {
            return Err(RepositoryError::ShiftFull(registration.shift_id.clone()));
        }
        shift.slots_filled += 1;

        state.registrations.push(registration.clone());
        Ok(registration)
    }
}

pub(super) struct UnavailableRepository;

impl SchedulingRepository for UnavailableRepository {
    fn volunteer(&self, _id: &VolunteerId) -> Result<Option<VolunteerSnapshot>, RepositoryError> {
        Err(RepositoryError::Unavailable("datastore offline".to_string()))
    }

    fn volunteer_by_email(
        &self,
        _email: &str,
    ) -> Result<Option<VolunteerSnapshot>, RepositoryError> {
        Err(RepositoryError::Unavailable("datastore offline".to_string()))
    }

    fn opportunity(
        &self,
        _id: &OpportunityId,
    ) -> Result<Option<OpportunitySnapshot>, RepositoryError> {
        Err(RepositoryError::Unavailable("datastore offline".to_string()))
    }

    fn reserve_slot(
        &self,
        _registration: ShiftRegistration,
    ) -> Result<ShiftRegistration, RepositoryError> {
        Err(RepositoryError::Unavailable("datastore offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<RegistrationNotice>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<RegistrationNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notice: RegistrationNotice) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct FailingNotifications;

impl NotificationPublisher for FailingNotifications {
    fn publish(&self, _notice: RegistrationNotice) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp relay down".to_string()))
    }
}

pub(super) fn seeded_repository() -> MemoryRepository {
    MemoryRepository::default()
        .with_volunteer(eligible_volunteer())
        .with_volunteer(pending_volunteer())
        .with_opportunity(general_meeting())
        .with_opportunity(street_medicine_outreach())
}

pub(super) fn build_service() -> (
    ShiftRegistrationService<MemoryRepository, MemoryNotifications>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifications>,
) {
    service_with(seeded_repository())
}

pub(super) fn service_with(
    repository: MemoryRepository,
) -> (
    ShiftRegistrationService<MemoryRepository, MemoryNotifications>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifications>,
) {
    let repository = Arc::new(repository);
    let notifications = Arc::new(MemoryNotifications::default());
    let service =
        ShiftRegistrationService::new(repository.clone(), notifications.clone(), catalog());
    (service, repository, notifications)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
