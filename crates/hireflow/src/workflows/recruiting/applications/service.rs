use std::collections::BTreeMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::background::BackgroundQueue;
use super::config::LifecycleConfig;
use super::domain::{
    AnonymousApplication, AnonymousSubmission, Application, ApplicationChanges,
    ApplicationEventKind, ApplicationId, ApplicationNote, ApplicationStatus, Audience,
    CandidateFacts, NewApplication, RecommendationKind, RoomPurpose, UserId,
};
use super::identity::{
    CandidateIdentity, CandidateIdentityResolver, IdentityError, IdentityStore,
    IdentityStoreError,
};
use super::repository::{ApplicationRepository, RepositoryError};
use super::status::{self, InvalidTransition};
use crate::workflows::recruiting::gateways::cv::{
    fallback_recommendation, CvAnalysis, CvIntelligence, JobContext,
};
use crate::workflows::recruiting::gateways::notify::{
    Notification, NotificationDispatcher, Recipient, APPROACH_INVITATION_TEMPLATE,
    INTERVIEW_INVITATION_TEMPLATE, NEW_APPLICATION_TEMPLATE,
};
use crate::workflows::recruiting::gateways::rooms::{self, RoomProvisioner, RoomRequest};
use crate::workflows::recruiting::jobs::{DirectoryError, JobDirectory, JobId, JobPosting};

/// Everything the orchestrator talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub applications: Arc<dyn ApplicationRepository>,
    pub jobs: Arc<dyn JobDirectory>,
    pub identities: Arc<dyn IdentityStore>,
    pub cv: Arc<dyn CvIntelligence>,
    pub rooms: Arc<dyn RoomProvisioner>,
    pub notifications: NotificationDispatcher,
}

/// Application lifecycle orchestrator.
///
/// Creation and status updates run synchronously up to the persisted record; every side effect
/// after that (staff notification, CV analysis, room provisioning, candidate messaging) is handed
/// to the background queue and can only ever annotate the record's event trail.
#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    jobs: Arc<dyn JobDirectory>,
    identities: CandidateIdentityResolver,
    cv: Arc<dyn CvIntelligence>,
    rooms: Arc<dyn RoomProvisioner>,
    notifications: NotificationDispatcher,
    queue: BackgroundQueue,
    config: Arc<LifecycleConfig>,
}

impl ApplicationService {
    pub fn new(collaborators: Collaborators, config: LifecycleConfig) -> Self {
        let Collaborators {
            applications,
            jobs,
            identities,
            cv,
            rooms,
            notifications,
        } = collaborators;

        Self {
            identities: CandidateIdentityResolver::new(identities, applications.clone()),
            queue: BackgroundQueue::new(config.background_workers),
            applications,
            jobs,
            cv,
            rooms,
            notifications,
            config: Arc::new(config),
        }
    }

    /// Authenticated creation: a candidate applying on their own behalf.
    pub fn create(
        &self,
        input: NewApplication,
        acting_user: &UserId,
    ) -> Result<Application, ApplicationServiceError> {
        if acting_user != &input.candidate_id {
            return Err(ApplicationServiceError::Forbidden(
                "candidates can only apply on their own behalf".to_string(),
            ));
        }

        if self
            .applications
            .active_for(&input.job_id, &input.candidate_id)?
            .is_some()
        {
            return Err(ApplicationServiceError::DuplicateApplication);
        }

        let application = Application::new(
            input.job_id,
            input.candidate_id,
            input.content,
            Utc::now(),
        );
        // The storage-level uniqueness constraint settles races the pre-check above lets through.
        let stored = self.applications.insert(application)?;

        info!(
            application_id = %stored.id,
            job_id = %stored.job_id.0,
            candidate_id = %stored.candidate_id,
            "application created"
        );
        self.schedule_creation_followups(&stored);
        Ok(stored)
    }

    /// Anonymous creation: identity is derived from the résumé plus any manual fields.
    pub async fn create_anonymous(
        &self,
        input: AnonymousApplication,
    ) -> Result<AnonymousSubmission, ApplicationServiceError> {
        let AnonymousApplication {
            job_id,
            mut content,
            candidate,
        } = input;

        let resume_url = content
            .resume_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or(ApplicationServiceError::MissingRequiredField("resumeUrl"))?;
        content.resume_url = Some(resume_url.clone());

        let job = self
            .jobs
            .job(&job_id)?
            .ok_or(ApplicationServiceError::NotFound("job"))?;
        let now = Utc::now();
        if !job.accepts_applications() {
            return Err(ApplicationServiceError::ApplicationsClosed);
        }
        if job.deadline_passed(now) {
            return Err(ApplicationServiceError::DeadlinePassed);
        }

        let extracted = match self
            .bounded("cv extraction", self.cv.extract_facts(&resume_url))
            .await
        {
            Ok(facts) => facts,
            Err(reason) => {
                warn!(
                    job_id = %job.id.0,
                    %reason,
                    "continuing with manually supplied candidate fields"
                );
                CandidateFacts::default()
            }
        };
        let facts = CandidateFacts::merge(candidate, extracted);
        let resolved = self.identities.resolve_or_create(facts, &job.id)?;

        let application = Application::new(
            job.id.clone(),
            resolved.identity.user_id.clone(),
            content,
            now,
        );
        let stored = match self.applications.insert(application) {
            Ok(stored) => stored,
            Err(err) => {
                if resolved.credentials.is_some() {
                    self.discard_unused_account(&resolved.identity.user_id);
                }
                return Err(err.into());
            }
        };

        if let Err(err) = self.jobs.increment_applicants(&job.id) {
            warn!(job_id = %job.id.0, error = %err, "failed to increment applicant counter");
        }

        info!(
            application_id = %stored.id,
            job_id = %stored.job_id.0,
            candidate_id = %stored.candidate_id,
            new_account = resolved.credentials.is_some(),
            "anonymous application created"
        );
        self.schedule_creation_followups(&stored);

        Ok(AnonymousSubmission {
            application: stored,
            credentials: resolved.credentials,
        })
    }

    /// Applies a status transition and/or plain field changes.
    pub fn update(
        &self,
        id: &ApplicationId,
        changes: ApplicationChanges,
        acting_user: &UserId,
    ) -> Result<Application, ApplicationServiceError> {
        let current = self
            .applications
            .fetch(id)?
            .ok_or(ApplicationServiceError::NotFound("application"))?;

        // Re-requesting the current status is a plain update unless the status is terminal,
        // where it is an illegal self-loop.
        let requested = changes
            .status
            .filter(|status| *status != current.status || status.is_terminal());
        self.authorize_update(&current, requested, acting_user)?;

        let now = Utc::now();
        let mut from = current.status;
        let updated = self.mutate(id, |application| {
            if let Some(target) = requested {
                from = application.status;
                *application = status::transition(application, target, now)?;
                application.record(ApplicationEventKind::StatusChanged { from, to: target }, now);
            }
            changes.apply_fields(application);
            Ok(())
        })?;

        if let Some(target) = requested {
            info!(
                application_id = %id,
                from = %from,
                to = %target,
                acting_user = %acting_user,
                "application status changed"
            );
            self.schedule_status_followups(&updated, target);
        }

        Ok(updated)
    }

    pub fn get(&self, id: &ApplicationId) -> Result<Option<Application>, ApplicationServiceError> {
        Ok(self.applications.fetch(id)?)
    }

    pub fn list_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, ApplicationServiceError> {
        Ok(self.applications.list_by_job(job_id)?)
    }

    pub fn list_by_candidate(
        &self,
        candidate_id: &UserId,
    ) -> Result<Vec<Application>, ApplicationServiceError> {
        Ok(self.applications.list_by_candidate(candidate_id)?)
    }

    pub fn add_note(
        &self,
        id: &ApplicationId,
        author: &UserId,
        body: &str,
    ) -> Result<ApplicationNote, ApplicationServiceError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ApplicationServiceError::MissingRequiredField("body"));
        }
        if self.applications.fetch(id)?.is_none() {
            return Err(ApplicationServiceError::NotFound("application"));
        }

        let note = ApplicationNote {
            id: uuid::Uuid::new_v4().to_string(),
            application_id: id.clone(),
            author_id: author.clone(),
            body: body.to_string(),
            created_at: Utc::now(),
        };
        Ok(self.applications.add_note(note)?)
    }

    pub fn notes(
        &self,
        id: &ApplicationId,
    ) -> Result<Vec<ApplicationNote>, ApplicationServiceError> {
        if self.applications.fetch(id)?.is_none() {
            return Err(ApplicationServiceError::NotFound("application"));
        }
        Ok(self.applications.notes(id)?)
    }

    /// Waits until all scheduled background work has finished.
    pub async fn wait_for_background(&self) {
        self.queue.wait_idle().await;
    }

    /// Drops an account created for a submission that never got stored, so a retry starts over
    /// and receives fresh credentials. Accounts another submission already filed under are kept.
    fn discard_unused_account(&self, user_id: &UserId) {
        match self.applications.list_by_candidate(user_id) {
            Ok(filed) if filed.is_empty() => {
                match self.identities.store().delete_candidate(user_id) {
                    Ok(()) => info!(
                        candidate_id = %user_id,
                        "removed account created for a failed anonymous submission"
                    ),
                    Err(err) => warn!(
                        candidate_id = %user_id,
                        error = %err,
                        "failed to remove account of a failed anonymous submission"
                    ),
                }
            }
            Ok(_) => warn!(
                candidate_id = %user_id,
                "new account already holds another application, keeping it"
            ),
            Err(err) => warn!(
                candidate_id = %user_id,
                error = %err,
                "cannot tell whether the new account is in use, keeping it"
            ),
        }
    }

    fn authorize_update(
        &self,
        current: &Application,
        requested: Option<ApplicationStatus>,
        acting_user: &UserId,
    ) -> Result<(), ApplicationServiceError> {
        let is_candidate = &current.candidate_id == acting_user;
        if is_candidate && matches!(requested, None | Some(ApplicationStatus::Withdrawn)) {
            return Ok(());
        }
        if self.is_company_staff(&current.job_id, acting_user)? {
            return Ok(());
        }

        let reason = if requested.is_some() {
            "only staff of the hiring company can change this application's status"
        } else {
            "only the candidate or hiring staff can edit this application"
        };
        Err(ApplicationServiceError::Forbidden(reason.to_string()))
    }

    fn is_company_staff(
        &self,
        job_id: &JobId,
        user: &UserId,
    ) -> Result<bool, ApplicationServiceError> {
        let Some(job) = self.jobs.job(job_id)? else {
            return Ok(false);
        };
        Ok(self
            .jobs
            .active_staff(&job.company_id)?
            .iter()
            .any(|member| member.active && &member.user_id == user))
    }

    /// Read-modify-write against the versioned record, re-reading on concurrent modification.
    fn mutate<F>(
        &self,
        id: &ApplicationId,
        mut apply: F,
    ) -> Result<Application, ApplicationServiceError>
    where
        F: FnMut(&mut Application) -> Result<(), ApplicationServiceError>,
    {
        let mut attempt = 0;
        loop {
            let mut record = self
                .applications
                .fetch(id)?
                .ok_or(ApplicationServiceError::NotFound("application"))?;
            apply(&mut record)?;

            match self.applications.replace(record) {
                Ok(stored) => return Ok(stored),
                Err(RepositoryError::Stale { .. }) if attempt < self.config.write_retries => {
                    attempt += 1;
                    debug!(
                        application_id = %id,
                        attempt,
                        "retrying write after concurrent modification"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn annotate(&self, id: &ApplicationId, kind: ApplicationEventKind) {
        let at = Utc::now();
        if let Err(err) = self.mutate(id, |application| {
            application.record(kind.clone(), at);
            Ok(())
        }) {
            warn!(
                application_id = %id,
                error = %err,
                event = ?kind,
                "failed to record application event"
            );
        }
    }

    async fn bounded<T, E, F>(&self, step: &str, call: F) -> Result<T, String>
    where
        E: Display,
        F: Future<Output = Result<T, E>>,
    {
        match tokio::time::timeout(self.config.gateway_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err(format!(
                "{step} timed out after {}ms",
                self.config.gateway_timeout.as_millis()
            )),
        }
    }

    fn schedule_creation_followups(&self, application: &Application) {
        let service = self.clone();
        let application = application.clone();
        self.queue.spawn(application.id.clone(), async move {
            service.run_creation_followups(application).await;
        });
    }

    fn schedule_status_followups(&self, application: &Application, status: ApplicationStatus) {
        let service = self.clone();
        let application = application.clone();
        self.queue.spawn(application.id.clone(), async move {
            service.run_status_followups(application, status).await;
        });
    }

    async fn run_creation_followups(&self, application: Application) {
        let job = self.load_job(&application.job_id);
        let candidate = self.load_candidate(&application.candidate_id);

        tokio::join!(
            self.notify_staff(&application, job.as_ref()),
            self.analyze_resume(&application, job.as_ref()),
            self.provision_room(
                &application,
                candidate.as_ref(),
                RoomPurpose::Approach,
                APPROACH_INVITATION_TEMPLATE,
            ),
        );
    }

    async fn run_status_followups(&self, application: Application, status: ApplicationStatus) {
        let candidate = self.load_candidate(&application.candidate_id);

        let interview_room = async {
            if status == ApplicationStatus::Interviewed {
                self.provision_room(
                    &application,
                    candidate.as_ref(),
                    RoomPurpose::Interview,
                    INTERVIEW_INVITATION_TEMPLATE,
                )
                .await;
            }
        };
        tokio::join!(
            self.notify_candidate_of_status(&application, candidate.as_ref(), status),
            interview_room,
        );
    }

    async fn notify_staff(&self, application: &Application, job: Option<&JobPosting>) {
        let Some(job) = job else {
            self.annotate(
                &application.id,
                ApplicationEventKind::NotificationFailed {
                    audience: Audience::Staff,
                    reason: format!("job {} unavailable", application.job_id.0),
                },
            );
            return;
        };

        let staff: Vec<UserId> = match self.jobs.active_staff(&job.company_id) {
            Ok(members) => members
                .into_iter()
                .filter(|member| member.active)
                .map(|member| member.user_id)
                .collect(),
            Err(err) => {
                warn!(application_id = %application.id, error = %err, "staff lookup failed");
                self.annotate(
                    &application.id,
                    ApplicationEventKind::NotificationFailed {
                        audience: Audience::Staff,
                        reason: err.to_string(),
                    },
                );
                return;
            }
        };
        if staff.is_empty() {
            debug!(application_id = %application.id, "no active staff to notify");
            return;
        }

        let mut params = BTreeMap::new();
        params.insert("application_id".to_string(), application.id.to_string());
        params.insert("job_id".to_string(), job.id.0.clone());
        params.insert("job_title".to_string(), job.title.clone());
        params.insert("candidate_id".to_string(), application.candidate_id.to_string());

        let delivery = tokio::time::timeout(
            self.config.gateway_timeout,
            self.notifications
                .fan_out(&staff, NEW_APPLICATION_TEMPLATE, &params),
        )
        .await;
        let event = match delivery {
            Ok(report) if report.all_failed() => ApplicationEventKind::NotificationFailed {
                audience: Audience::Staff,
                reason: format!("delivery failed for {}", report.failed.join(", ")),
            },
            Ok(report) => {
                if !report.failed.is_empty() {
                    warn!(
                        application_id = %application.id,
                        failed = report.failed.len(),
                        "some staff notifications failed"
                    );
                }
                ApplicationEventKind::NotificationSent {
                    audience: Audience::Staff,
                    template: NEW_APPLICATION_TEMPLATE.to_string(),
                    delivered: report.delivered,
                }
            }
            Err(_) => ApplicationEventKind::NotificationFailed {
                audience: Audience::Staff,
                reason: "staff notification timed out".to_string(),
            },
        };
        self.annotate(&application.id, event);
    }

    async fn analyze_resume(&self, application: &Application, job: Option<&JobPosting>) {
        let (Some(resume_url), Some(job)) = (application.resume_url.as_deref(), job) else {
            return;
        };
        let Some(prompt) = job.analysis_prompt() else {
            return;
        };

        let context = JobContext::from(job);
        let analysis = match self
            .bounded("cv analysis", self.cv.analyze(resume_url, prompt, &context))
            .await
        {
            Ok(analysis) => analysis,
            Err(reason) => {
                warn!(application_id = %application.id, %reason, "cv analysis failed");
                self.annotate(&application.id, ApplicationEventKind::AnalysisFailed { reason });
                return;
            }
        };

        let (cv_advice, interview_advice) = tokio::join!(
            self.recommendation(&analysis, RecommendationKind::CvImprovement, &context),
            self.recommendation(&analysis, RecommendationKind::InterviewPreparation, &context),
        );

        let analyzed_at = Utc::now();
        let score = analysis.score;
        let result = self.mutate(&application.id, |record| {
            record.cv_analysis_score = Some(score);
            record.cv_analysis_result = Some(analysis.clone());
            record.analyzed_at = Some(analyzed_at);
            record.ai_cv_recommendations = Some(cv_advice.0.clone());
            record.ai_interview_recommendations = Some(interview_advice.0.clone());
            record.record(ApplicationEventKind::AnalysisCompleted { score }, analyzed_at);
            for fallback in [&cv_advice.1, &interview_advice.1].into_iter().flatten() {
                record.record(fallback.clone(), analyzed_at);
            }
            Ok(())
        });

        match result {
            Ok(_) => info!(application_id = %application.id, score, "cv analysis stored"),
            Err(err) => {
                warn!(application_id = %application.id, error = %err, "failed to store cv analysis")
            }
        }
    }

    /// Derived advice text, falling back to a static string (and an event describing why).
    async fn recommendation(
        &self,
        analysis: &CvAnalysis,
        kind: RecommendationKind,
        context: &JobContext,
    ) -> (String, Option<ApplicationEventKind>) {
        match self
            .bounded("recommendation", self.cv.recommend(analysis, kind, context))
            .await
        {
            Ok(text) => (text, None),
            Err(reason) => {
                warn!(?kind, %reason, "recommendation unavailable, using fallback text");
                (
                    fallback_recommendation(kind).to_string(),
                    Some(ApplicationEventKind::RecommendationFallback { kind, reason }),
                )
            }
        }
    }

    async fn provision_room(
        &self,
        application: &Application,
        candidate: Option<&CandidateIdentity>,
        purpose: RoomPurpose,
        template: &str,
    ) {
        let unique_name = rooms::room_name(purpose, &application.id, Utc::now());
        let mut metadata = BTreeMap::new();
        metadata.insert("application_id".to_string(), application.id.to_string());
        metadata.insert("job_id".to_string(), application.job_id.0.clone());
        metadata.insert("candidate_id".to_string(), application.candidate_id.to_string());
        metadata.insert("purpose".to_string(), purpose.label().to_string());

        let request = RoomRequest {
            unique_name,
            metadata,
            participant_display_name: candidate
                .map(CandidateIdentity::display_name)
                .unwrap_or_else(|| "Candidate".to_string()),
        };

        let room = match self
            .bounded("room provisioning", self.rooms.create_room(request))
            .await
        {
            Ok(room) => room,
            Err(reason) => {
                warn!(
                    application_id = %application.id,
                    purpose = purpose.label(),
                    %reason,
                    "room provisioning failed"
                );
                self.annotate(
                    &application.id,
                    ApplicationEventKind::ProvisioningFailed { purpose, reason },
                );
                return;
            }
        };
        self.annotate(
            &application.id,
            ApplicationEventKind::RoomProvisioned {
                purpose,
                room_id: room.room_id.clone(),
                room_name: room.room_name.clone(),
            },
        );

        let Some(phone) = candidate.and_then(|identity| identity.phone.clone()) else {
            debug!(application_id = %application.id, "candidate has no phone, skipping invitation");
            return;
        };

        let link = match join_link(
            &self.config.join_base_url,
            &application.job_id,
            &phone,
            &room.room_name,
        ) {
            Ok(link) => link,
            Err(reason) => {
                self.annotate(
                    &application.id,
                    ApplicationEventKind::NotificationFailed {
                        audience: Audience::Candidate,
                        reason,
                    },
                );
                return;
            }
        };

        let invitation = Notification::new(Recipient::Phone(phone.clone()), template)
            .param("join_url", link)
            .param("room_name", room.room_name)
            .param("job_id", application.job_id.0.clone());
        let event = match self
            .bounded("invitation", self.notifications.send(invitation))
            .await
        {
            Ok(()) => ApplicationEventKind::InvitationSent {
                template: template.to_string(),
                recipient: phone,
            },
            Err(reason) => {
                warn!(application_id = %application.id, %reason, "invitation delivery failed");
                ApplicationEventKind::NotificationFailed {
                    audience: Audience::Candidate,
                    reason,
                }
            }
        };
        self.annotate(&application.id, event);
    }

    async fn notify_candidate_of_status(
        &self,
        application: &Application,
        candidate: Option<&CandidateIdentity>,
        status: ApplicationStatus,
    ) {
        let template = status::notification_template(status);
        let recipient = match candidate.and_then(|identity| identity.phone.clone()) {
            Some(phone) => Recipient::Phone(phone),
            None => Recipient::User(application.candidate_id.clone()),
        };
        let notification = Notification::new(recipient, template)
            .param("status", status.label())
            .param("application_id", application.id.to_string())
            .param("job_id", application.job_id.0.clone());

        let event = match self
            .bounded("status notification", self.notifications.send(notification))
            .await
        {
            Ok(()) => ApplicationEventKind::NotificationSent {
                audience: Audience::Candidate,
                template: template.to_string(),
                delivered: 1,
            },
            Err(reason) => {
                warn!(application_id = %application.id, %reason, "status notification failed");
                ApplicationEventKind::NotificationFailed {
                    audience: Audience::Candidate,
                    reason,
                }
            }
        };
        self.annotate(&application.id, event);
    }

    fn load_job(&self, job_id: &JobId) -> Option<JobPosting> {
        match self.jobs.job(job_id) {
            Ok(job) => job,
            Err(err) => {
                warn!(job_id = %job_id.0, error = %err, "job lookup failed");
                None
            }
        }
    }

    fn load_candidate(&self, candidate_id: &UserId) -> Option<CandidateIdentity> {
        match self.identities.store().find_by_id(candidate_id) {
            Ok(identity) => identity,
            Err(err) => {
                warn!(candidate_id = %candidate_id, error = %err, "candidate lookup failed");
                None
            }
        }
    }
}

/// `{base}/{job_id}?phone={phone}&room={room_name}`, query-encoded.
pub fn join_link(
    base_url: &str,
    job_id: &JobId,
    phone: &str,
    room_name: &str,
) -> Result<String, String> {
    let base = format!("{}/{}", base_url.trim_end_matches('/'), job_id.0);
    reqwest::Url::parse_with_params(&base, &[("phone", phone), ("room", room_name)])
        .map(|url| url.to_string())
        .map_err(|err| format!("invalid join link base {base_url}: {err}"))
}

/// Error raised by the application service. Only synchronous failures reach this type.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("candidate already has an active application for this job")]
    DuplicateApplication,
    #[error("job is not accepting applications")]
    ApplicationsClosed,
    #[error("application deadline has passed")]
    DeadlinePassed,
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl From<RepositoryError> for ApplicationServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict => Self::DuplicateApplication,
            RepositoryError::NotFound => Self::NotFound("application"),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

impl From<DirectoryError> for ApplicationServiceError {
    fn from(value: DirectoryError) -> Self {
        match value {
            DirectoryError::UnknownJob(_) => Self::NotFound("job"),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

impl From<IdentityStoreError> for ApplicationServiceError {
    fn from(value: IdentityStoreError) -> Self {
        Self::Unavailable(value.to_string())
    }
}

impl From<IdentityError> for ApplicationServiceError {
    fn from(value: IdentityError) -> Self {
        match value {
            IdentityError::MissingRequiredField(field) => Self::MissingRequiredField(field),
            IdentityError::DuplicateApplication => Self::DuplicateApplication,
            IdentityError::Repository(err) => err.into(),
            IdentityError::Store(err) => err.into(),
            IdentityError::Credentials(err) => Self::Unavailable(err.to_string()),
        }
    }
}
