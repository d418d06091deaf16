use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::recruiting::gateways::cv::CvAnalysis;
use crate::workflows::recruiting::jobs::JobId;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn generate() -> Self {
        Self(format!("app-{}", uuid::Uuid::new_v4().simple()))
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for any platform user. Candidates are addressed by their user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status tracked throughout the application lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Shortlisted,
    Interviewed,
    Offered,
    Hired,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 8] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Interviewed,
        ApplicationStatus::Offered,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Reviewed => "REVIEWED",
            ApplicationStatus::Shortlisted => "SHORTLISTED",
            ApplicationStatus::Interviewed => "INTERVIEWED",
            ApplicationStatus::Offered => "OFFERED",
            ApplicationStatus::Hired => "HIRED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Withdrawn => "WITHDRAWN",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Hired | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One candidate's application to one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub candidate_id: UserId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub interviewed_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub cv_analysis_score: Option<u8>,
    pub cv_analysis_result: Option<CvAnalysis>,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub ai_cv_recommendations: Option<String>,
    pub ai_interview_recommendations: Option<String>,
    pub events: Vec<ApplicationEvent>,
    /// Optimistic concurrency token, bumped by the repository on every write.
    pub version: u64,
}

impl Application {
    pub fn new(
        job_id: JobId,
        candidate_id: UserId,
        content: ApplicationContent,
        applied_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ApplicationId::generate(),
            job_id,
            candidate_id,
            status: ApplicationStatus::Pending,
            applied_at,
            reviewed_at: None,
            interviewed_at: None,
            rejected_at: None,
            accepted_at: None,
            cover_letter: content.cover_letter,
            resume_url: content.resume_url,
            source: content.source,
            notes: content.notes,
            cv_analysis_score: None,
            cv_analysis_result: None,
            analyzed_at: None,
            ai_cv_recommendations: None,
            ai_interview_recommendations: None,
            events: Vec::new(),
            version: 0,
        }
    }

    /// Applications that still occupy the (job, candidate) slot.
    pub fn is_active(&self) -> bool {
        self.status != ApplicationStatus::Withdrawn
    }

    pub fn record(&mut self, kind: ApplicationEventKind, at: DateTime<Utc>) {
        self.events.push(ApplicationEvent { at, kind });
    }

    /// Free-text rendering of the event trail for consumers of the legacy notes view.
    pub fn company_notes(&self) -> Option<String> {
        if self.events.is_empty() {
            return None;
        }

        let lines: Vec<String> = self
            .events
            .iter()
            .map(|event| format!("[{}] {}", event.at.to_rfc3339(), event.kind.describe()))
            .collect();
        Some(lines.join("\n"))
    }
}

/// Free-form content shared by both creation paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationContent {
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Which lifecycle moment a room was provisioned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomPurpose {
    /// Room offered to the candidate right after applying.
    Approach,
    /// Scheduled interview after the transition into `INTERVIEWED`.
    Interview,
}

impl RoomPurpose {
    pub const fn label(self) -> &'static str {
        match self {
            RoomPurpose::Approach => "approach",
            RoomPurpose::Interview => "interview",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Staff,
    Candidate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    CvImprovement,
    InterviewPreparation,
}

/// Timestamped entry in an application's append-only event trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationEvent {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: ApplicationEventKind,
}

/// Outcome of a lifecycle side effect, recorded instead of being surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApplicationEventKind {
    StatusChanged {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    RoomProvisioned {
        purpose: RoomPurpose,
        room_id: String,
        room_name: String,
    },
    ProvisioningFailed {
        purpose: RoomPurpose,
        reason: String,
    },
    InvitationSent {
        template: String,
        recipient: String,
    },
    NotificationSent {
        audience: Audience,
        template: String,
        delivered: usize,
    },
    NotificationFailed {
        audience: Audience,
        reason: String,
    },
    AnalysisCompleted {
        score: u8,
    },
    AnalysisFailed {
        reason: String,
    },
    RecommendationFallback {
        kind: RecommendationKind,
        reason: String,
    },
}

impl ApplicationEventKind {
    pub fn describe(&self) -> String {
        match self {
            ApplicationEventKind::StatusChanged { from, to } => {
                format!("status changed from {from} to {to}")
            }
            ApplicationEventKind::RoomProvisioned {
                purpose, room_name, ..
            } => format!("{} room provisioned: {room_name}", purpose.label()),
            ApplicationEventKind::ProvisioningFailed { purpose, reason } => {
                format!("{} room provisioning failed: {reason}", purpose.label())
            }
            ApplicationEventKind::InvitationSent {
                template,
                recipient,
            } => format!("invitation {template} sent to {recipient}"),
            ApplicationEventKind::NotificationSent {
                audience,
                template,
                delivered,
            } => format!("{template} delivered to {delivered} {audience:?} recipient(s)"),
            ApplicationEventKind::NotificationFailed { audience, reason } => {
                format!("{audience:?} notification failed: {reason}")
            }
            ApplicationEventKind::AnalysisCompleted { score } => {
                format!("cv analysis completed with score {score}")
            }
            ApplicationEventKind::AnalysisFailed { reason } => {
                format!("cv analysis failed: {reason}")
            }
            ApplicationEventKind::RecommendationFallback { kind, reason } => {
                format!("{kind:?} recommendation fell back to default: {reason}")
            }
        }
    }
}

/// Out-of-band comment attached to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationNote {
    pub id: String,
    pub application_id: ApplicationId,
    pub author_id: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Contact facts about a candidate, either extracted from a résumé or typed in manually.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFacts {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CandidateFacts {
    /// Combine manual input with extracted facts. Non-blank manual values win.
    pub fn merge(manual: CandidateFacts, extracted: CandidateFacts) -> CandidateFacts {
        CandidateFacts {
            email: prefer(manual.email, extracted.email),
            first_name: prefer(manual.first_name, extracted.first_name),
            last_name: prefer(manual.last_name, extracted.last_name),
            phone: prefer(manual.phone, extracted.phone),
        }
    }
}

fn prefer(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    let clean = |value: Option<String>| {
        value
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
    };
    clean(primary).or_else(|| clean(fallback))
}

/// Authenticated creation input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub job_id: JobId,
    pub candidate_id: UserId,
    #[serde(flatten)]
    pub content: ApplicationContent,
}

/// Anonymous creation input: the résumé plus whatever the applicant typed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousApplication {
    pub job_id: JobId,
    #[serde(flatten)]
    pub content: ApplicationContent,
    #[serde(default)]
    pub candidate: CandidateFacts,
}

/// Changes requested by an update call. An absent status means a plain field update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationChanges {
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

impl ApplicationChanges {
    pub fn status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn apply_fields(&self, application: &mut Application) {
        if let Some(notes) = &self.notes {
            application.notes = Some(notes.clone());
        }
        if let Some(cover_letter) = &self.cover_letter {
            application.cover_letter = Some(cover_letter.clone());
        }
    }
}

/// Account credentials generated for a first-time anonymous applicant.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of an anonymous submission. Credentials appear here once and nowhere else.
#[derive(Debug, Clone, Serialize)]
pub struct AnonymousSubmission {
    pub application: Application,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}
