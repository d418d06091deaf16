use chrono::{DateTime, Utc};

use super::domain::{Application, ApplicationStatus};

/// Raised when the requested status is not reachable from the current one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot move application from {from} to {to}")]
pub struct InvalidTransition {
    pub from: ApplicationStatus,
    pub to: ApplicationStatus,
}

const FROM_PENDING: &[ApplicationStatus] = &[
    ApplicationStatus::Reviewed,
    ApplicationStatus::Rejected,
    ApplicationStatus::Withdrawn,
];
const FROM_REVIEWED: &[ApplicationStatus] = &[
    ApplicationStatus::Shortlisted,
    ApplicationStatus::Interviewed,
    ApplicationStatus::Rejected,
    ApplicationStatus::Withdrawn,
];
const FROM_SHORTLISTED: &[ApplicationStatus] = &[
    ApplicationStatus::Interviewed,
    ApplicationStatus::Rejected,
    ApplicationStatus::Withdrawn,
];
const FROM_INTERVIEWED: &[ApplicationStatus] = &[
    ApplicationStatus::Offered,
    ApplicationStatus::Rejected,
    ApplicationStatus::Withdrawn,
];
const FROM_OFFERED: &[ApplicationStatus] = &[
    ApplicationStatus::Hired,
    ApplicationStatus::Rejected,
    ApplicationStatus::Withdrawn,
];

/// Directed edges out of `from`. Terminal statuses have none, not even a self-loop.
pub fn allowed_transitions(from: ApplicationStatus) -> &'static [ApplicationStatus] {
    match from {
        ApplicationStatus::Pending => FROM_PENDING,
        ApplicationStatus::Reviewed => FROM_REVIEWED,
        ApplicationStatus::Shortlisted => FROM_SHORTLISTED,
        ApplicationStatus::Interviewed => FROM_INTERVIEWED,
        ApplicationStatus::Offered => FROM_OFFERED,
        ApplicationStatus::Hired | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn => {
            &[]
        }
    }
}

pub fn can_transition(from: ApplicationStatus, to: ApplicationStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

/// Validates a transition and returns the updated record with its lifecycle timestamp stamped.
///
/// The legality check runs before anything is touched, so a rejected transition leaves the
/// caller's record exactly as it was. Timestamps are written on first entry only.
pub fn transition(
    current: &Application,
    requested: ApplicationStatus,
    at: DateTime<Utc>,
) -> Result<Application, InvalidTransition> {
    if !can_transition(current.status, requested) {
        return Err(InvalidTransition {
            from: current.status,
            to: requested,
        });
    }

    let mut next = current.clone();
    next.status = requested;

    let stamp = match requested {
        ApplicationStatus::Reviewed => Some(&mut next.reviewed_at),
        ApplicationStatus::Interviewed => Some(&mut next.interviewed_at),
        ApplicationStatus::Rejected => Some(&mut next.rejected_at),
        ApplicationStatus::Hired => Some(&mut next.accepted_at),
        _ => None,
    };
    if let Some(slot) = stamp {
        slot.get_or_insert(at);
    }

    Ok(next)
}

/// Messaging template announcing that an application reached `status`.
pub fn notification_template(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Reviewed => "application_reviewed",
        ApplicationStatus::Shortlisted => "application_shortlisted",
        ApplicationStatus::Interviewed => "application_interview_stage",
        ApplicationStatus::Offered => "application_offer_extended",
        ApplicationStatus::Hired => "application_hired",
        ApplicationStatus::Rejected => "application_rejected",
        _ => "application_status_update",
    }
}
