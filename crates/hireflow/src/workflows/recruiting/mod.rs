//! Recruiting workflows: job lookups, the external gateways consumed while an application moves
//! through its lifecycle, and the application orchestrator itself.

pub mod applications;
pub mod gateways;
pub mod jobs;
pub mod memory;

pub use jobs::{DirectoryError, JobDirectory, JobPosting, JobStatus, StaffMember};
