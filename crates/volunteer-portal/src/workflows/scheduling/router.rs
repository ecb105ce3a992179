use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    OpportunityId, OpportunitySnapshot, PublicRsvp, ShiftRegistrationRequest, VolunteerId,
    VolunteerSnapshot,
};
use super::eligibility::RegistrationDecision;
use super::repository::{NotificationPublisher, RepositoryError, SchedulingRepository};
use super::service::{RegistrationError, ShiftRegistrationService};

/// Router builder exposing eligibility and registration endpoints.
pub fn scheduling_router<R, N>(service: Arc<ShiftRegistrationService<R, N>>) -> Router
where
    R: SchedulingRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/eligibility/preview", post(preview_handler::<R, N>))
        .route(
            "/api/v1/volunteers/:volunteer_id/eligibility/:opportunity_id",
            get(check_handler::<R, N>),
        )
        .route("/api/v1/shifts/register", post(register_handler::<R, N>))
        .route(
            "/api/v1/admin/shifts/assign",
            post(admin_assign_handler::<R, N>),
        )
        .route("/api/v1/rsvp/match", post(rsvp_match_handler::<R, N>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct EligibilityPreviewRequest {
    pub volunteer: VolunteerSnapshot,
    pub opportunity: OpportunitySnapshot,
}

#[derive(Debug, Deserialize)]
pub struct AdminAssignmentRequest {
    #[serde(flatten)]
    pub registration: ShiftRegistrationRequest,
    #[serde(default)]
    pub reason: String,
}

/// Decision plus its rendered summary, as returned to the portal UI.
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityView {
    #[serde(flatten)]
    pub decision: RegistrationDecision,
    pub summary: String,
}

impl From<RegistrationDecision> for EligibilityView {
    fn from(decision: RegistrationDecision) -> Self {
        let summary = decision.summary();
        Self { decision, summary }
    }
}

pub(crate) async fn preview_handler<R, N>(
    State(service): State<Arc<ShiftRegistrationService<R, N>>>,
    Json(request): Json<EligibilityPreviewRequest>,
) -> Response
where
    R: SchedulingRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let decision = service.preview(&request.volunteer, &request.opportunity);
    (StatusCode::OK, Json(EligibilityView::from(decision))).into_response()
}

pub(crate) async fn check_handler<R, N>(
    State(service): State<Arc<ShiftRegistrationService<R, N>>>,
    Path((volunteer_id, opportunity_id)): Path<(String, String)>,
) -> Response
where
    R: SchedulingRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.check(&VolunteerId(volunteer_id), &OpportunityId(opportunity_id)) {
        Ok(decision) => (StatusCode::OK, Json(EligibilityView::from(decision))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_handler<R, N>(
    State(service): State<Arc<ShiftRegistrationService<R, N>>>,
    Json(request): Json<ShiftRegistrationRequest>,
) -> Response
where
    R: SchedulingRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.register(request) {
        Ok(registration) => (StatusCode::CREATED, Json(registration)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn admin_assign_handler<R, N>(
    State(service): State<Arc<ShiftRegistrationService<R, N>>>,
    Json(request): Json<AdminAssignmentRequest>,
) -> Response
where
    R: SchedulingRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.admin_assign(request.registration, &request.reason) {
        Ok(registration) => (StatusCode::CREATED, Json(registration)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rsvp_match_handler<R, N>(
    State(service): State<Arc<ShiftRegistrationService<R, N>>>,
    Json(rsvp): Json<PublicRsvp>,
) -> Response
where
    R: SchedulingRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.match_rsvp(rsvp) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: RegistrationError) -> Response {
    let message = error.to_string();
    match error {
        RegistrationError::Ineligible(decision) => {
            let payload = json!({
                "error": message,
                "decision": decision,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        RegistrationError::AssignmentBlocked(reasons) => {
            let payload = json!({
                "error": message,
                "reasons": reasons,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        RegistrationError::MissingOverrideReason => error_json(StatusCode::BAD_REQUEST, message),
        RegistrationError::VolunteerNotFound(_)
        | RegistrationError::OpportunityNotFound(_)
        | RegistrationError::ShiftNotFound(_)
        | RegistrationError::Repository(RepositoryError::NotFound) => {
            error_json(StatusCode::NOT_FOUND, message)
        }
        RegistrationError::Repository(
            RepositoryError::ShiftFull(_) | RepositoryError::AlreadyRegistered(_),
        ) => error_json(StatusCode::CONFLICT, message),
        RegistrationError::Repository(RepositoryError::Unavailable(_)) => {
            error_json(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

fn error_json(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
