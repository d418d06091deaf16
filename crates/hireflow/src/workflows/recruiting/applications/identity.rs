use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::credentials::{self, CredentialError};
use super::domain::{CandidateFacts, Credentials, UserId};
use super::repository::{ApplicationRepository, RepositoryError};
use crate::workflows::recruiting::jobs::JobId;

/// Candidate account as seen by the application lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateIdentity {
    pub user_id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl CandidateIdentity {
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// Account creation request handed to the identity subsystem. Carries a hash, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCandidate {
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub password_hash: String,
}

/// User accounts and candidate profiles owned by the identity subsystem.
pub trait IdentityStore: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<CandidateIdentity>, IdentityStoreError>;
    fn find_by_id(&self, id: &UserId) -> Result<Option<CandidateIdentity>, IdentityStoreError>;
    /// Creates the user account and its candidate profile in one step.
    fn create_candidate(
        &self,
        candidate: NewCandidate,
    ) -> Result<CandidateIdentity, IdentityStoreError>;
    /// Removes an account whose first application could not be stored.
    fn delete_candidate(&self, id: &UserId) -> Result<(), IdentityStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityStoreError {
    #[error("an account with email {0} already exists")]
    EmailTaken(String),
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("candidate already has an active application for this job")]
    DuplicateApplication,
    #[error(transparent)]
    Store(#[from] IdentityStoreError),
    #[error(transparent)]
    Credentials(#[from] CredentialError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Identity the application will be filed under, plus credentials when the account is new.
#[derive(Debug, Clone)]
pub struct ResolvedCandidate {
    pub identity: CandidateIdentity,
    pub credentials: Option<Credentials>,
}

/// Finds or creates the candidate behind an anonymous submission.
#[derive(Clone)]
pub struct CandidateIdentityResolver {
    store: Arc<dyn IdentityStore>,
    applications: Arc<dyn ApplicationRepository>,
}

impl CandidateIdentityResolver {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        applications: Arc<dyn ApplicationRepository>,
    ) -> Self {
        Self {
            store,
            applications,
        }
    }

    pub fn store(&self) -> &Arc<dyn IdentityStore> {
        &self.store
    }

    /// `facts` must already be merged (manual values over extracted ones).
    pub fn resolve_or_create(
        &self,
        facts: CandidateFacts,
        job_id: &JobId,
    ) -> Result<ResolvedCandidate, IdentityError> {
        let email = facts
            .email
            .map(|email| email.trim().to_ascii_lowercase())
            .filter(|email| !email.is_empty())
            .ok_or(IdentityError::MissingRequiredField("email"))?;
        let first_name = facts
            .first_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(IdentityError::MissingRequiredField("firstName"))?;

        if let Some(existing) = self.store.find_by_email(&email)? {
            return self.reuse(existing, job_id);
        }

        let password = credentials::generate_password();
        let password_hash = credentials::hash_password(&password)?;
        let created = self.store.create_candidate(NewCandidate {
            email: email.clone(),
            first_name,
            last_name: facts.last_name,
            phone: facts.phone,
            password_hash,
        });
        let identity = match created {
            Ok(identity) => identity,
            // Lost a race against a concurrent submission with the same email.
            Err(IdentityStoreError::EmailTaken(_)) => {
                let existing = self
                    .store
                    .find_by_email(&email)?
                    .ok_or_else(|| IdentityStoreError::EmailTaken(email.clone()))?;
                return self.reuse(existing, job_id);
            }
            Err(err) => return Err(err.into()),
        };

        info!(user_id = %identity.user_id, "created candidate account for anonymous applicant");

        Ok(ResolvedCandidate {
            identity,
            credentials: Some(Credentials { email, password }),
        })
    }

    fn reuse(
        &self,
        existing: CandidateIdentity,
        job_id: &JobId,
    ) -> Result<ResolvedCandidate, IdentityError> {
        if self
            .applications
            .active_for(job_id, &existing.user_id)?
            .is_some()
        {
            return Err(IdentityError::DuplicateApplication);
        }
        Ok(ResolvedCandidate {
            identity: existing,
            credentials: None,
        })
    }
}
