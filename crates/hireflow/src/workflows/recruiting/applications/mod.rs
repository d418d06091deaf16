//! Application intake, status lifecycle, and the background side effects hanging off both.

pub mod background;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod identity;
pub mod repository;
pub mod router;
pub mod service;
pub mod status;

#[cfg(test)]
mod tests;

pub use config::LifecycleConfig;
pub use domain::{
    AnonymousApplication, AnonymousSubmission, Application, ApplicationChanges,
    ApplicationContent, ApplicationEvent, ApplicationEventKind, ApplicationId, ApplicationNote,
    ApplicationStatus, Audience, CandidateFacts, Credentials, NewApplication, RecommendationKind,
    RoomPurpose, UserId,
};
pub use identity::{
    CandidateIdentity, CandidateIdentityResolver, IdentityError, IdentityStore,
    IdentityStoreError, NewCandidate,
};
pub use repository::{ApplicationRepository, RepositoryError};
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError, Collaborators};
pub use status::InvalidTransition;
