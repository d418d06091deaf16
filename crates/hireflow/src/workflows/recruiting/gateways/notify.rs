use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::warn;

use crate::workflows::recruiting::applications::domain::UserId;

pub const NEW_APPLICATION_TEMPLATE: &str = "new_application_received";
pub const APPROACH_INVITATION_TEMPLATE: &str = "application_room_invitation";
pub const INTERVIEW_INVITATION_TEMPLATE: &str = "interview_room_invitation";

/// Where a notification is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "address", rename_all = "snake_case")]
pub enum Recipient {
    /// Platform user, delivered to their in-app inbox.
    User(UserId),
    /// Phone number, delivered through the messaging provider.
    Phone(String),
}

impl Recipient {
    pub fn label(&self) -> String {
        match self {
            Recipient::User(user) => format!("user:{user}"),
            Recipient::Phone(phone) => format!("phone:{phone}"),
        }
    }
}

/// Templated outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: Recipient,
    pub template: String,
    pub params: BTreeMap<String, String>,
}

impl Notification {
    pub fn new(recipient: Recipient, template: &str) -> Self {
        Self {
            recipient,
            template: template.to_string(),
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

/// One outbound transport (in-app inbox, WhatsApp-style templated push, ...).
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn deliver(&self, notification: Notification) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification rejected by provider: {0}")]
    Rejected(String),
    #[error("notification channel unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of delivering the same template to many recipients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub delivered: usize,
    pub failed: Vec<String>,
}

impl FanOutReport {
    pub fn all_failed(&self) -> bool {
        self.delivered == 0 && !self.failed.is_empty()
    }
}

/// Routes notifications to the right channel and fans out to recipient lists.
#[derive(Clone)]
pub struct NotificationDispatcher {
    in_app: Arc<dyn NotificationChannel>,
    messaging: Arc<dyn NotificationChannel>,
}

impl NotificationDispatcher {
    pub fn new(
        in_app: Arc<dyn NotificationChannel>,
        messaging: Arc<dyn NotificationChannel>,
    ) -> Self {
        Self { in_app, messaging }
    }

    pub async fn send(&self, notification: Notification) -> Result<(), NotificationError> {
        self.channel_for(&notification.recipient)
            .deliver(notification)
            .await
    }

    /// Delivers `template` to every user concurrently. Individual failures are collected,
    /// never short-circuit the remaining deliveries.
    pub async fn fan_out(
        &self,
        users: &[UserId],
        template: &str,
        params: &BTreeMap<String, String>,
    ) -> FanOutReport {
        let mut deliveries = JoinSet::new();
        for user in users {
            let notification = Notification {
                recipient: Recipient::User(user.clone()),
                template: template.to_string(),
                params: params.clone(),
            };
            let channel = self.in_app.clone();
            let label = notification.recipient.label();
            deliveries.spawn(async move { (label, channel.deliver(notification).await) });
        }

        let mut report = FanOutReport::default();
        while let Some(joined) = deliveries.join_next().await {
            match joined {
                Ok((_, Ok(()))) => report.delivered += 1,
                Ok((label, Err(err))) => {
                    warn!(
                        recipient = %label,
                        template,
                        error = %err,
                        "notification delivery failed"
                    );
                    report.failed.push(label);
                }
                Err(err) => {
                    warn!(template, error = %err, "notification task aborted");
                    report.failed.push("unknown".to_string());
                }
            }
        }
        report
    }

    fn channel_for(&self, recipient: &Recipient) -> &Arc<dyn NotificationChannel> {
        match recipient {
            Recipient::User(_) => &self.in_app,
            Recipient::Phone(_) => &self.messaging,
        }
    }
}
