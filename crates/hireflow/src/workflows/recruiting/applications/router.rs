use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    AnonymousApplication, Application, ApplicationChanges, ApplicationId, Credentials,
    NewApplication, UserId,
};
use super::service::{ApplicationService, ApplicationServiceError};
use crate::workflows::recruiting::jobs::JobId;

/// Header carrying the authenticated caller, set by the gateway in front of this service.
pub const ACTING_USER_HEADER: &str = "x-user-id";

/// Router builder exposing the application lifecycle over HTTP.
pub fn application_router(service: Arc<ApplicationService>) -> Router {
    Router::new()
        .route("/api/v1/applications", post(create_handler))
        .route("/api/v1/applications/anonymous", post(create_anonymous_handler))
        .route(
            "/api/v1/applications/:application_id",
            get(get_handler).patch(update_handler),
        )
        .route(
            "/api/v1/applications/:application_id/notes",
            get(notes_handler).post(add_note_handler),
        )
        .route("/api/v1/jobs/:job_id/applications", get(job_applications_handler))
        .route(
            "/api/v1/candidates/:candidate_id/applications",
            get(candidate_applications_handler),
        )
        .with_state(service)
}

/// Application as rendered to API consumers, with the event trail also flattened to text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationView {
    #[serde(flatten)]
    application: Application,
    company_notes: Option<String>,
}

impl From<Application> for ApplicationView {
    fn from(application: Application) -> Self {
        Self {
            company_notes: application.company_notes(),
            application,
        }
    }
}

/// Anonymous submission response. `credentials` is left out entirely for reused accounts.
#[derive(Debug, Serialize)]
struct SubmissionView {
    application: ApplicationView,
    #[serde(skip_serializing_if = "Option::is_none")]
    credentials: Option<Credentials>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoteBody {
    #[serde(default)]
    body: String,
}

fn acting_user(headers: &HeaderMap) -> Result<UserId, Response> {
    headers
        .get(ACTING_USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| UserId(value.to_string()))
        .ok_or_else(|| {
            let payload = json!({ "error": format!("missing {ACTING_USER_HEADER} header") });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        })
}

pub(crate) fn error_status(error: &ApplicationServiceError) -> StatusCode {
    match error {
        ApplicationServiceError::MissingRequiredField(_) => StatusCode::BAD_REQUEST,
        ApplicationServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ApplicationServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        ApplicationServiceError::DuplicateApplication
        | ApplicationServiceError::InvalidTransition(_) => StatusCode::CONFLICT,
        ApplicationServiceError::ApplicationsClosed | ApplicationServiceError::DeadlinePassed => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ApplicationServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn error_response(error: ApplicationServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error_status(&error), Json(payload)).into_response()
}

fn list_response(result: Result<Vec<Application>, ApplicationServiceError>) -> Response {
    match result {
        Ok(applications) => {
            let views: Vec<ApplicationView> =
                applications.into_iter().map(ApplicationView::from).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler(
    State(service): State<Arc<ApplicationService>>,
    headers: HeaderMap,
    Json(input): Json<NewApplication>,
) -> Response {
    let user = match acting_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.create(input, &user) {
        Ok(application) => {
            (StatusCode::CREATED, Json(ApplicationView::from(application))).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_anonymous_handler(
    State(service): State<Arc<ApplicationService>>,
    Json(input): Json<AnonymousApplication>,
) -> Response {
    match service.create_anonymous(input).await {
        Ok(submission) => {
            let view = SubmissionView {
                application: ApplicationView::from(submission.application),
                credentials: submission.credentials,
            };
            (StatusCode::CREATED, Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_handler(
    State(service): State<Arc<ApplicationService>>,
    Path(application_id): Path<String>,
) -> Response {
    match service.get(&ApplicationId(application_id)) {
        Ok(Some(application)) => {
            (StatusCode::OK, Json(ApplicationView::from(application))).into_response()
        }
        Ok(None) => error_response(ApplicationServiceError::NotFound("application")),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler(
    State(service): State<Arc<ApplicationService>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    Json(changes): Json<ApplicationChanges>,
) -> Response {
    let user = match acting_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.update(&ApplicationId(application_id), changes, &user) {
        Ok(application) => {
            (StatusCode::OK, Json(ApplicationView::from(application))).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn notes_handler(
    State(service): State<Arc<ApplicationService>>,
    Path(application_id): Path<String>,
) -> Response {
    match service.notes(&ApplicationId(application_id)) {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_note_handler(
    State(service): State<Arc<ApplicationService>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    Json(note): Json<NoteBody>,
) -> Response {
    let user = match acting_user(&headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    match service.add_note(&ApplicationId(application_id), &user, &note.body) {
        Ok(note) => (StatusCode::CREATED, Json(note)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn job_applications_handler(
    State(service): State<Arc<ApplicationService>>,
    Path(job_id): Path<String>,
) -> Response {
    list_response(service.list_by_job(&JobId(job_id)))
}

pub(crate) async fn candidate_applications_handler(
    State(service): State<Arc<ApplicationService>>,
    Path(candidate_id): Path<String>,
) -> Response {
    list_response(service.list_by_candidate(&UserId(candidate_id)))
}
