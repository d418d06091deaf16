//! Narrow contracts for the external systems the application lifecycle depends on.

pub mod cv;
pub mod http;
pub mod notify;
pub mod rooms;

pub use cv::{CvAnalysis, CvError, CvIntelligence, JobContext, SkillsMatch};
pub use http::{HttpCvIntelligence, HttpRoomProvisioner, WebhookMessagingChannel};
pub use notify::{
    FanOutReport, Notification, NotificationChannel, NotificationDispatcher, NotificationError,
    Recipient,
};
pub use rooms::{InterviewRoom, ProvisioningError, RoomProvisioner, RoomRequest};
