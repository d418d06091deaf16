use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::Value;

use crate::workflows::recruiting::applications::domain::{
    Application, ApplicationContent, ApplicationEventKind, ApplicationId, ApplicationNote,
    CandidateFacts, NewApplication, RecommendationKind, UserId,
};
use crate::workflows::recruiting::applications::identity::CandidateIdentity;
use crate::workflows::recruiting::applications::repository::{
    ApplicationRepository, RepositoryError,
};
use crate::workflows::recruiting::applications::{
    AnonymousApplication, ApplicationService, Collaborators, LifecycleConfig,
};
use crate::workflows::recruiting::gateways::cv::{CvAnalysis, CvError, CvIntelligence, JobContext};
use crate::workflows::recruiting::gateways::notify::{
    Notification, NotificationChannel, NotificationDispatcher, NotificationError,
};
use crate::workflows::recruiting::gateways::rooms::{
    InterviewRoom, ProvisioningError, RoomProvisioner, RoomRequest,
};
use crate::workflows::recruiting::jobs::{CompanyId, JobId, JobPosting, JobStatus};
use crate::workflows::recruiting::memory::{
    InMemoryApplicationRepository, InMemoryIdentityStore, InMemoryInbox, InMemoryJobBoard,
    InMemoryRoomProvisioner, KeywordCvIntelligence,
};

pub(super) const COMPANY: &str = "acme";
pub(super) const JOB: &str = "job-backend";
pub(super) const CLOSED_JOB: &str = "job-closed";
pub(super) const EXPIRED_JOB: &str = "job-expired";
pub(super) const STAFF: &str = "staff-1";
pub(super) const INACTIVE_STAFF: &str = "staff-2";
pub(super) const CANDIDATE: &str = "cand-ada";
pub(super) const CANDIDATE_EMAIL: &str = "ada@example.com";
pub(super) const CANDIDATE_PHONE: &str = "+447700900123";
pub(super) const RESUME_URL: &str = "https://files.example.com/cv/ada.pdf";
pub(super) const NEW_RESUME_URL: &str = "https://files.example.com/cv/grace.pdf";

pub(super) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(super) fn job_id(id: &str) -> JobId {
    JobId(id.to_string())
}

pub(super) fn posting(id: &str, status: JobStatus) -> JobPosting {
    JobPosting {
        id: job_id(id),
        company_id: CompanyId(COMPANY.to_string()),
        title: "Backend Engineer".to_string(),
        status,
        deadline: Some(Utc::now() + ChronoDuration::days(14)),
        analysis_prompt: Some("rust tokio postgres kubernetes".to_string()),
        applicants_count: 0,
    }
}

pub(super) fn job_board() -> InMemoryJobBoard {
    let company = CompanyId(COMPANY.to_string());
    let mut expired = posting(EXPIRED_JOB, JobStatus::Active);
    expired.deadline = Some(Utc::now() - ChronoDuration::hours(1));

    InMemoryJobBoard::default()
        .with_job(posting(JOB, JobStatus::Active))
        .with_job(posting(CLOSED_JOB, JobStatus::Closed))
        .with_job(expired)
        .with_staff(&company, STAFF, true)
        .with_staff(&company, INACTIVE_STAFF, false)
}

pub(super) fn existing_candidate() -> CandidateIdentity {
    CandidateIdentity {
        user_id: user(CANDIDATE),
        email: CANDIDATE_EMAIL.to_string(),
        first_name: "Ada".to_string(),
        last_name: Some("Lovelace".to_string()),
        phone: Some(CANDIDATE_PHONE.to_string()),
    }
}

pub(super) fn keyword_cv() -> KeywordCvIntelligence {
    KeywordCvIntelligence::default()
        .with_resume(
            RESUME_URL,
            "Ada Lovelace\nada@example.com +447700900123\nRust and Tokio services on Postgres",
        )
        .with_resume(
            NEW_RESUME_URL,
            "Grace Hopper\ngrace@example.com +15550100\nCobol, compilers and Rust",
        )
}

pub(super) fn test_config() -> LifecycleConfig {
    LifecycleConfig {
        gateway_timeout: Duration::from_millis(200),
        background_workers: 4,
        write_retries: 5,
        join_base_url: "https://talent.example.com/interview".to_string(),
    }
}

pub(super) fn new_application(job: &str, candidate: &str) -> NewApplication {
    NewApplication {
        job_id: job_id(job),
        candidate_id: user(candidate),
        content: ApplicationContent {
            cover_letter: Some("I would love to join.".to_string()),
            resume_url: Some(RESUME_URL.to_string()),
            source: Some("careers-page".to_string()),
            notes: None,
        },
    }
}

/// Collaborators a test may swap out; anything left `None` uses the in-memory default.
#[derive(Default)]
pub(super) struct Overrides {
    pub(super) applications: Option<Arc<dyn ApplicationRepository>>,
    pub(super) cv: Option<Arc<dyn CvIntelligence>>,
    pub(super) rooms: Option<Arc<dyn RoomProvisioner>>,
    pub(super) messaging: Option<Arc<dyn NotificationChannel>>,
    pub(super) config: Option<LifecycleConfig>,
}

pub(super) struct Harness {
    pub(super) service: ApplicationService,
    pub(super) applications: InMemoryApplicationRepository,
    pub(super) jobs: InMemoryJobBoard,
    pub(super) identities: InMemoryIdentityStore,
    pub(super) rooms: InMemoryRoomProvisioner,
    pub(super) inbox: InMemoryInbox,
    pub(super) messages: InMemoryInbox,
}

impl Harness {
    pub(super) fn new() -> Self {
        Self::with(Overrides::default())
    }

    pub(super) fn with(overrides: Overrides) -> Self {
        let applications = InMemoryApplicationRepository::default();
        let jobs = job_board();
        let identities = InMemoryIdentityStore::default().with_candidate(existing_candidate());
        let rooms = InMemoryRoomProvisioner::default();
        let inbox = InMemoryInbox::default();
        let messages = InMemoryInbox::default();

        let collaborators = Collaborators {
            applications: overrides
                .applications
                .unwrap_or_else(|| Arc::new(applications.clone())),
            jobs: Arc::new(jobs.clone()),
            identities: Arc::new(identities.clone()),
            cv: overrides.cv.unwrap_or_else(|| Arc::new(keyword_cv())),
            rooms: overrides.rooms.unwrap_or_else(|| Arc::new(rooms.clone())),
            notifications: NotificationDispatcher::new(
                Arc::new(inbox.clone()),
                overrides
                    .messaging
                    .unwrap_or_else(|| Arc::new(messages.clone())),
            ),
        };
        let service =
            ApplicationService::new(collaborators, overrides.config.unwrap_or_else(test_config));

        Self {
            service,
            applications,
            jobs,
            identities,
            rooms,
            inbox,
            messages,
        }
    }

    /// Reads the stored record once every background job has finished.
    pub(super) async fn settled(&self, id: &ApplicationId) -> Application {
        self.service.wait_for_background().await;
        self.service
            .get(id)
            .expect("repository available")
            .expect("application stored")
    }
}

pub(super) fn has_event(
    application: &Application,
    predicate: impl Fn(&ApplicationEventKind) -> bool,
) -> bool {
    application.events.iter().any(|event| predicate(&event.kind))
}

pub(super) fn anonymous(
    job: &str,
    resume_url: Option<&str>,
    manual: CandidateFacts,
) -> AnonymousApplication {
    AnonymousApplication {
        job_id: job_id(job),
        content: ApplicationContent {
            resume_url: resume_url.map(str::to_string),
            ..ApplicationContent::default()
        },
        candidate: manual,
    }
}

/// CV service that is down for every call.
pub(super) struct FailingCv;

#[async_trait]
impl CvIntelligence for FailingCv {
    async fn extract_facts(&self, _resume_url: &str) -> Result<CandidateFacts, CvError> {
        Err(CvError::ExtractionFailed("cv service offline".to_string()))
    }

    async fn analyze(
        &self,
        _resume_url: &str,
        _prompt: &str,
        _job: &JobContext,
    ) -> Result<CvAnalysis, CvError> {
        Err(CvError::AnalysisFailed("cv service offline".to_string()))
    }

    async fn recommend(
        &self,
        _analysis: &CvAnalysis,
        _kind: RecommendationKind,
        _job: &JobContext,
    ) -> Result<String, CvError> {
        Err(CvError::RecommendationFailed("cv service offline".to_string()))
    }
}

/// Scores normally but cannot produce recommendation texts.
pub(super) struct NoAdviceCv(pub(super) KeywordCvIntelligence);

#[async_trait]
impl CvIntelligence for NoAdviceCv {
    async fn extract_facts(&self, resume_url: &str) -> Result<CandidateFacts, CvError> {
        self.0.extract_facts(resume_url).await
    }

    async fn analyze(
        &self,
        resume_url: &str,
        prompt: &str,
        job: &JobContext,
    ) -> Result<CvAnalysis, CvError> {
        self.0.analyze(resume_url, prompt, job).await
    }

    async fn recommend(
        &self,
        _analysis: &CvAnalysis,
        _kind: RecommendationKind,
        _job: &JobContext,
    ) -> Result<String, CvError> {
        Err(CvError::RecommendationFailed("model overloaded".to_string()))
    }
}

/// Room provider that answers after `delay`, well past the test timeout.
pub(super) struct SlowRooms {
    pub(super) delay: Duration,
}

#[async_trait]
impl RoomProvisioner for SlowRooms {
    async fn create_room(&self, request: RoomRequest) -> Result<InterviewRoom, ProvisioningError> {
        tokio::time::sleep(self.delay).await;
        Ok(InterviewRoom {
            room_id: "late".to_string(),
            room_name: request.unique_name,
            join_token: "token".to_string(),
        })
    }
}

pub(super) struct FailingRooms;

#[async_trait]
impl RoomProvisioner for FailingRooms {
    async fn create_room(&self, _request: RoomRequest) -> Result<InterviewRoom, ProvisioningError> {
        Err(ProvisioningError::Unavailable("provider offline".to_string()))
    }
}

pub(super) struct FailingChannel;

#[async_trait]
impl NotificationChannel for FailingChannel {
    async fn deliver(&self, _notification: Notification) -> Result<(), NotificationError> {
        Err(NotificationError::Unavailable("webhook returned 502".to_string()))
    }
}

/// Repository whose duplicate pre-check never sees the competing writer, as in a real race.
#[derive(Clone, Default)]
pub(super) struct BlindPrecheckRepository(pub(super) InMemoryApplicationRepository);

impl ApplicationRepository for BlindPrecheckRepository {
    fn insert(&self, record: Application) -> Result<Application, RepositoryError> {
        self.0.insert(record)
    }

    fn replace(&self, record: Application) -> Result<Application, RepositoryError> {
        self.0.replace(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.0.fetch(id)
    }

    fn active_for(
        &self,
        _job_id: &JobId,
        _candidate_id: &UserId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(None)
    }

    fn list_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, RepositoryError> {
        self.0.list_by_job(job_id)
    }

    fn list_by_candidate(
        &self,
        candidate_id: &UserId,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.0.list_by_candidate(candidate_id)
    }

    fn add_note(&self, note: ApplicationNote) -> Result<ApplicationNote, RepositoryError> {
        self.0.add_note(note)
    }

    fn notes(&self, id: &ApplicationId) -> Result<Vec<ApplicationNote>, RepositoryError> {
        self.0.notes(id)
    }
}

/// Simulates one concurrent writer sneaking in before the first `replace`.
#[derive(Clone, Default)]
pub(super) struct InterleavedWriterRepository {
    pub(super) inner: InMemoryApplicationRepository,
    pub(super) interfered: Arc<AtomicBool>,
}

impl ApplicationRepository for InterleavedWriterRepository {
    fn insert(&self, record: Application) -> Result<Application, RepositoryError> {
        self.inner.insert(record)
    }

    fn replace(&self, record: Application) -> Result<Application, RepositoryError> {
        if !self.interfered.swap(true, Ordering::SeqCst) {
            let mut competing = self
                .inner
                .fetch(&record.id)?
                .ok_or(RepositoryError::NotFound)?;
            competing.notes = Some("edited concurrently".to_string());
            self.inner.replace(competing)?;
        }
        self.inner.replace(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn active_for(
        &self,
        job_id: &JobId,
        candidate_id: &UserId,
    ) -> Result<Option<Application>, RepositoryError> {
        self.inner.active_for(job_id, candidate_id)
    }

    fn list_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, RepositoryError> {
        self.inner.list_by_job(job_id)
    }

    fn list_by_candidate(
        &self,
        candidate_id: &UserId,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.inner.list_by_candidate(candidate_id)
    }

    fn add_note(&self, note: ApplicationNote) -> Result<ApplicationNote, RepositoryError> {
        self.inner.add_note(note)
    }

    fn notes(&self, id: &ApplicationId) -> Result<Vec<ApplicationNote>, RepositoryError> {
        self.inner.notes(id)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Fails the first `insert`. With `competitor_wins` a concurrent submission for the same
/// candidate lands first and the insert loses on the uniqueness constraint; otherwise the
/// store is briefly unreachable.
#[derive(Clone, Default)]
pub(super) struct FlakyInsertRepository {
    pub(super) inner: InMemoryApplicationRepository,
    pub(super) competitor_wins: bool,
    pub(super) failed: Arc<AtomicBool>,
}

impl ApplicationRepository for FlakyInsertRepository {
    fn insert(&self, record: Application) -> Result<Application, RepositoryError> {
        if self.failed.swap(true, Ordering::SeqCst) {
            return self.inner.insert(record);
        }
        if self.competitor_wins {
            self.inner.insert(record.clone())?;
            return self.inner.insert(record);
        }
        Err(RepositoryError::Unavailable("connection reset".to_string()))
    }

    fn replace(&self, record: Application) -> Result<Application, RepositoryError> {
        self.inner.replace(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn active_for(
        &self,
        job_id: &JobId,
        candidate_id: &UserId,
    ) -> Result<Option<Application>, RepositoryError> {
        self.inner.active_for(job_id, candidate_id)
    }

    fn list_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, RepositoryError> {
        self.inner.list_by_job(job_id)
    }

    fn list_by_candidate(
        &self,
        candidate_id: &UserId,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.inner.list_by_candidate(candidate_id)
    }

    fn add_note(&self, note: ApplicationNote) -> Result<ApplicationNote, RepositoryError> {
        self.inner.add_note(note)
    }

    fn notes(&self, id: &ApplicationId) -> Result<Vec<ApplicationNote>, RepositoryError> {
        self.inner.notes(id)
    }
}
