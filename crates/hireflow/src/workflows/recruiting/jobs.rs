use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::applications::domain::UserId;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for hiring companies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

/// Publication state of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Draft,
    Active,
    Paused,
    Closed,
}

/// Snapshot of the job fields the application lifecycle depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub company_id: CompanyId,
    pub title: String,
    pub status: JobStatus,
    pub deadline: Option<DateTime<Utc>>,
    pub analysis_prompt: Option<String>,
    pub applicants_count: u32,
}

impl JobPosting {
    pub fn accepts_applications(&self) -> bool {
        self.status == JobStatus::Active
    }

    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now > deadline)
    }

    /// Analysis prompt, ignoring blank values configured by recruiters.
    pub fn analysis_prompt(&self) -> Option<&str> {
        self.analysis_prompt
            .as_deref()
            .map(str::trim)
            .filter(|prompt| !prompt.is_empty())
    }
}

/// Company-side user who should hear about new applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub user_id: UserId,
    pub company_id: CompanyId,
    pub active: bool,
}

/// Job and company-staff lookups owned by the job management subsystem.
pub trait JobDirectory: Send + Sync {
    fn job(&self, id: &JobId) -> Result<Option<JobPosting>, DirectoryError>;
    fn increment_applicants(&self, id: &JobId) -> Result<(), DirectoryError>;
    fn active_staff(&self, company_id: &CompanyId) -> Result<Vec<StaffMember>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("job {0} not found")]
    UnknownJob(String),
    #[error("job directory unavailable: {0}")]
    Unavailable(String),
}
