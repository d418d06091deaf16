use super::domain::{Application, ApplicationId, ApplicationNote, UserId};
use crate::workflows::recruiting::jobs::JobId;

/// Storage abstraction so the orchestrator can be exercised in isolation.
///
/// Implementations must enforce two constraints atomically with the write itself:
/// at most one active (non-withdrawn) application per `(job_id, candidate_id)` on `insert`,
/// and version matching on `replace`.
pub trait ApplicationRepository: Send + Sync {
    /// Persists a new application, failing with `Conflict` when the slot is already taken.
    fn insert(&self, record: Application) -> Result<Application, RepositoryError>;

    /// Compare-and-swap write. Fails with `Stale` when `record.version` no longer matches
    /// the stored version; on success the stored version is bumped and returned.
    fn replace(&self, record: Application) -> Result<Application, RepositoryError>;

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn active_for(
        &self,
        job_id: &JobId,
        candidate_id: &UserId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn list_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, RepositoryError>;
    fn list_by_candidate(&self, candidate_id: &UserId)
        -> Result<Vec<Application>, RepositoryError>;

    fn add_note(&self, note: ApplicationNote) -> Result<ApplicationNote, RepositoryError>;
    fn notes(&self, id: &ApplicationId) -> Result<Vec<ApplicationNote>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("an active application already exists for this job and candidate")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record was modified concurrently (expected version {expected}, found {found})")]
    Stale { expected: u64, found: u64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
