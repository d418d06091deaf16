use chrono::{Duration as ChronoDuration, Utc};
use hireflow::config::IntegrationConfig;
use hireflow::error::AppError;
use hireflow::workflows::recruiting::applications::{
    ApplicationStatus, Collaborators, LifecycleConfig,
};
use hireflow::workflows::recruiting::gateways::{
    CvIntelligence, HttpCvIntelligence, HttpRoomProvisioner, NotificationChannel,
    NotificationDispatcher, RoomProvisioner, WebhookMessagingChannel,
};
use hireflow::workflows::recruiting::jobs::{CompanyId, JobId, JobPosting, JobStatus};
use hireflow::workflows::recruiting::memory::{
    InMemoryApplicationRepository, InMemoryIdentityStore, InMemoryJobBoard, KeywordCvIntelligence,
    LocalRoomProvisioner, LoggingChannel,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) const SAMPLE_COMPANY: &str = "sample-co";
pub(crate) const SAMPLE_JOB: &str = "job-sample-backend";
pub(crate) const SAMPLE_STAFF: &str = "staff-sample";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Job board with one open posting and one active recruiter, so a fresh process accepts
/// applications without an external job directory.
pub(crate) fn sample_job_board() -> InMemoryJobBoard {
    let company = CompanyId(SAMPLE_COMPANY.to_string());
    InMemoryJobBoard::default()
        .with_job(JobPosting {
            id: JobId(SAMPLE_JOB.to_string()),
            company_id: company.clone(),
            title: "Backend Engineer".to_string(),
            status: JobStatus::Active,
            deadline: Some(Utc::now() + ChronoDuration::days(30)),
            analysis_prompt: Some("rust tokio postgres distributed systems".to_string()),
            applicants_count: 0,
        })
        .with_staff(&company, SAMPLE_STAFF, true)
}

/// Wires each gateway to its HTTP client when an endpoint is configured, and to the
/// in-process stand-in otherwise. Stand-ins on the serving path keep no per-delivery state.
pub(crate) fn build_collaborators(
    integrations: &IntegrationConfig,
    lifecycle: &LifecycleConfig,
    jobs: InMemoryJobBoard,
) -> Result<Collaborators, AppError> {
    let timeout = lifecycle.gateway_timeout;
    let api_key = integrations.api_key.clone();

    let cv: Arc<dyn CvIntelligence> = match &integrations.cv_service_url {
        Some(url) => Arc::new(HttpCvIntelligence::new(url.as_str(), api_key.clone(), timeout)?),
        None => Arc::new(KeywordCvIntelligence::default()),
    };
    let rooms: Arc<dyn RoomProvisioner> = match &integrations.room_service_url {
        Some(url) => Arc::new(HttpRoomProvisioner::new(url.as_str(), api_key.clone(), timeout)?),
        None => Arc::new(LocalRoomProvisioner),
    };
    let messaging: Arc<dyn NotificationChannel> = match &integrations.messaging_webhook_url {
        Some(url) => Arc::new(WebhookMessagingChannel::new(url.as_str(), api_key, timeout)?),
        None => Arc::new(LoggingChannel),
    };

    Ok(Collaborators {
        applications: Arc::new(InMemoryApplicationRepository::default()),
        jobs: Arc::new(jobs),
        identities: Arc::new(InMemoryIdentityStore::default()),
        cv,
        rooms,
        notifications: NotificationDispatcher::new(Arc::new(LoggingChannel), messaging),
    })
}

pub(crate) fn parse_status(raw: &str) -> Result<ApplicationStatus, String> {
    let wanted = raw.trim();
    ApplicationStatus::ALL
        .into_iter()
        .find(|status| status.label().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            let known: Vec<&str> = ApplicationStatus::ALL.iter().map(|s| s.label()).collect();
            format!("unknown status '{raw}' (expected one of {})", known.join(", "))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hireflow::workflows::recruiting::gateways::{Notification, Recipient, RoomRequest};

    #[test]
    fn parse_status_accepts_any_case() {
        assert_eq!(parse_status(" hired "), Ok(ApplicationStatus::Hired));
        assert_eq!(parse_status("SHORTLISTED"), Ok(ApplicationStatus::Shortlisted));
        let err = parse_status("promoted").expect_err("unknown status");
        assert!(err.contains("PENDING"));
    }

    #[test]
    fn unset_integrations_fall_back_to_in_process_collaborators() {
        let collaborators = build_collaborators(
            &IntegrationConfig::default(),
            &LifecycleConfig::default(),
            sample_job_board(),
        );
        assert!(collaborators.is_ok());
    }

    #[tokio::test]
    async fn fallback_rooms_and_notifications_keep_nothing_in_memory() {
        let collaborators = build_collaborators(
            &IntegrationConfig::default(),
            &LifecycleConfig::default(),
            sample_job_board(),
        )
        .expect("in-process collaborators");

        let request = RoomRequest {
            unique_name: "interview-app-9-1700000000000-4".to_string(),
            metadata: Default::default(),
            participant_display_name: "Candidate".to_string(),
        };
        let room = collaborators
            .rooms
            .create_room(request.clone())
            .await
            .expect("room issued");
        let again = collaborators.rooms.create_room(request).await.expect("room issued");
        assert_eq!(room.room_id, again.room_id);

        let notification = Notification::new(Recipient::Phone("+15550100".to_string()), "hired");
        collaborators
            .notifications
            .send(notification)
            .await
            .expect("logged and dropped");
    }

    #[test]
    fn configured_integrations_build_http_clients() {
        let integrations = IntegrationConfig {
            cv_service_url: Some("http://cv.internal".to_string()),
            room_service_url: Some("http://rooms.internal".to_string()),
            messaging_webhook_url: Some("http://hooks.internal/whatsapp".to_string()),
            api_key: Some("secret".to_string()),
        };
        assert!(
            build_collaborators(&integrations, &LifecycleConfig::default(), sample_job_board())
                .is_ok()
        );
    }
}
