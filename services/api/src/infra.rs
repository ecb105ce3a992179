use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;
use volunteer_portal::error::AppError;
use volunteer_portal::workflows::scheduling::{
    NotificationError, NotificationPublisher, OpportunityId, OpportunitySnapshot,
    RegistrationNotice, RepositoryError, SchedulingRepository, ShiftRegistration,
    TrainingCatalog, VolunteerId, VolunteerSnapshot,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Roster preloaded into the in-memory repository at startup.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SeedData {
    #[serde(default)]
    pub(crate) volunteers: Vec<VolunteerSnapshot>,
    #[serde(default)]
    pub(crate) opportunities: Vec<OpportunitySnapshot>,
}

impl SeedData {
    pub(crate) fn from_path(path: &Path) -> Result<Self, AppError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[derive(Default)]
struct Roster {
    volunteers: HashMap<VolunteerId, VolunteerSnapshot>,
    opportunities: HashMap<OpportunityId, OpportunitySnapshot>,
    registrations: Vec<ShiftRegistration>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySchedulingRepository {
    roster: Arc<Mutex<Roster>>,
}

impl InMemorySchedulingRepository {
    /// Records without an id cannot be looked up and are skipped.
    pub(crate) fn seeded(seed: SeedData) -> Self {
        let mut roster = Roster::default();
        for volunteer in seed.volunteers {
            if let Some(id) = volunteer.id.clone() {
                roster.volunteers.insert(id, volunteer);
            }
        }
        for opportunity in seed.opportunities {
            if let Some(id) = opportunity.id.clone() {
                roster.opportunities.insert(id, opportunity);
            }
        }
        Self {
            roster: Arc::new(Mutex::new(roster)),
        }
    }

    pub(crate) fn counts(&self) -> Result<(usize, usize), RepositoryError> {
        let roster = self.lock()?;
        Ok((roster.volunteers.len(), roster.opportunities.len()))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Roster>, RepositoryError> {
        self.roster
            .lock()
            .map_err(|_| RepositoryError::Unavailable("roster mutex poisoned".to_string()))
    }
}

impl SchedulingRepository for InMemorySchedulingRepository {
    fn volunteer(&self, id: &VolunteerId) -> Result<Option<VolunteerSnapshot>, RepositoryError> {
        Ok(self.lock()?.volunteers.get(id).cloned())
    }

    fn volunteer_by_email(
        &self,
        email: &str,
    ) -> Result<Option<VolunteerSnapshot>, RepositoryError> {
        let roster = self.lock()?;
        Ok(roster
            .volunteers
            .values()
            .find(|volunteer| {
                volunteer
                    .email
                    .as_deref()
                    .is_some_and(|candidate| candidate.trim().eq_ignore_ascii_case(email))
            })
            .cloned())
    }

    fn opportunity(
        &self,
        id: &OpportunityId,
    ) -> Result<Option<OpportunitySnapshot>, RepositoryError> {
        Ok(self.lock()?.opportunities.get(id).cloned())
    }

    fn reserve_slot(
        &self,
        registration: ShiftRegistration,
    ) -> Result<ShiftRegistration, RepositoryError> {
        let mut roster = self.lock()?;
        let duplicate = roster.registrations.iter().any(|existing| {
            existing.volunteer_id == registration.volunteer_id
                && existing.opportunity_id == registration.opportunity_id
                && existing.shift_id == registration.shift_id
        });
        if duplicate {
            return Err(RepositoryError::AlreadyRegistered(
                registration.shift_id.clone(),
            ));
        }

        let shift = roster
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

        roster.registrations.push(registration.clone());
        Ok(registration)
    }
}

/// Writes each notice to the log; delivery is handled outside this service.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotificationPublisher {
    sent: Arc<Mutex<Vec<RegistrationNotice>>>,
}

impl NotificationPublisher for LoggingNotificationPublisher {
    fn publish(&self, notice: RegistrationNotice) -> Result<(), NotificationError> {
        info!(
            template = %notice.template,
            volunteer = %notice.volunteer_id,
            opportunity = %notice.opportunity_id,
            shift = %notice.shift_id,
            "registration notice queued"
        );
        let mut guard = self
            .sent
            .lock()
            .map_err(|_| NotificationError::Transport("notice log poisoned".to_string()))?;
        guard.push(notice);
        Ok(())
    }
}

impl LoggingNotificationPublisher {
    #[cfg(test)]
    pub(crate) fn sent(&self) -> Vec<RegistrationNotice> {
        self.sent.lock().expect("notice mutex poisoned").clone()
    }
}

/// Configured catalog file when present, otherwise the built-in tiers.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<TrainingCatalog, AppError> {
    match path {
        Some(path) => Ok(TrainingCatalog::from_path(path)?),
        None => Ok(TrainingCatalog::standard()),
    }
}

pub(crate) fn read_snapshot<T>(path: &Path) -> Result<T, AppError>
where
    T: for<'de> Deserialize<'de>,
{
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use volunteer_portal::workflows::scheduling::{
        RegistrationChannel, ShiftId, ShiftRegistrationService,
    };

    fn seed() -> SeedData {
        serde_json::from_value(json!({
            "volunteers": [{
                "id": "vol-1",
                "email": "dana@example.org",
                "coreVolunteerStatus": true,
                "completedTrainingIds": [
                    "hmc_orientation", "volunteer_champion_intro", "hipaa_training",
                    "core_volunteer_workshop", "volunteer_survey", "portal_walkthrough"
                ],
                "compliance": { "backgroundCheck": { "status": "verified" } }
            }, {
                "email": "no-id@example.org"
            }],
            "opportunities": [{
                "id": "opp-1",
                "category": "General Meeting",
                "date": "2025-06-06",
                "shifts": [{ "id": "doors", "slotsTotal": 1 }]
            }]
        }))
        .expect("seed parses")
    }

    #[test]
    fn seeding_skips_records_without_ids() {
        let repository = InMemorySchedulingRepository::seeded(seed());

        assert_eq!(repository.counts().expect("counts"), (1, 1));
        let found = repository
            .volunteer_by_email("DANA@example.org")
            .expect("lookup succeeds");
        assert_eq!(
            found.and_then(|volunteer| volunteer.id),
            Some(VolunteerId("vol-1".to_string()))
        );
    }

    #[test]
    fn seeded_service_registers_and_logs_notice() {
        let repository = Arc::new(InMemorySchedulingRepository::seeded(seed()));
        let notifications = Arc::new(LoggingNotificationPublisher::default());
        let service = ShiftRegistrationService::new(
            repository.clone(),
            notifications.clone(),
            load_catalog(None).expect("standard catalog"),
        );

        let stored = service
            .register(volunteer_portal::workflows::scheduling::ShiftRegistrationRequest {
                volunteer_id: VolunteerId("vol-1".to_string()),
                opportunity_id: OpportunityId("opp-1".to_string()),
                shift_id: ShiftId("doors".to_string()),
            })
            .expect("registration succeeds");

        assert_eq!(stored.channel, RegistrationChannel::SelfService);
        assert_eq!(notifications.sent().len(), 1);
        let opportunity = repository
            .opportunity(&OpportunityId("opp-1".to_string()))
            .expect("lookup succeeds")
            .expect("opportunity seeded");
        assert!(!opportunity.shifts[0].has_capacity());
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        let result = load_catalog(Some(Path::new("/nonexistent/catalog.json")));
        assert!(matches!(result, Err(AppError::Catalog(_))));
    }
}
