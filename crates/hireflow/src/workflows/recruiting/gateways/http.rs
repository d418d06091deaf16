//! `reqwest`-backed adapters for the CV service, the room provider and the messaging webhook.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::cv::{normalize_score, CvAnalysis, CvError, CvIntelligence, JobContext, SkillsMatch};
use super::notify::{Notification, NotificationChannel, NotificationError, Recipient};
use super::rooms::{InterviewRoom, ProvisioningError, RoomProvisioner, RoomRequest};
use crate::workflows::recruiting::applications::domain::{CandidateFacts, RecommendationKind};

fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

fn authorize(request: RequestBuilder, api_key: Option<&str>) -> RequestBuilder {
    match api_key {
        Some(key) => request.bearer_auth(key),
        None => request,
    }
}

/// Client for the CV intelligence service (`/extract`, `/analyze`, `/recommend`).
#[derive(Debug, Clone)]
pub struct HttpCvIntelligence {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpCvIntelligence {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
            api_key,
        })
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, String> {
        let request = self.client.post(endpoint(&self.base_url, path)).json(&body);
        let response = authorize(request, self.api_key.as_deref())
            .send()
            .await
            .map_err(|err| err.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("{path} returned {status}"));
        }
        response.json::<T>().await.map_err(|err| err.to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    score: f64,
    #[serde(default)]
    overall_fit: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    skills_match: SkillsMatch,
}

#[derive(Debug, Deserialize)]
struct RecommendationBody {
    text: String,
}

#[async_trait]
impl CvIntelligence for HttpCvIntelligence {
    async fn extract_facts(&self, resume_url: &str) -> Result<CandidateFacts, CvError> {
        self.post("extract", json!({ "resumeUrl": resume_url }))
            .await
            .map_err(CvError::ExtractionFailed)
    }

    async fn analyze(
        &self,
        resume_url: &str,
        prompt: &str,
        job: &JobContext,
    ) -> Result<CvAnalysis, CvError> {
        let raw: RawAnalysis = self
            .post(
                "analyze",
                json!({ "resumeUrl": resume_url, "prompt": prompt, "job": job }),
            )
            .await
            .map_err(CvError::AnalysisFailed)?;

        Ok(CvAnalysis {
            score: normalize_score(raw.score)?,
            overall_fit: raw.overall_fit,
            strengths: raw.strengths,
            weaknesses: raw.weaknesses,
            skills_match: raw.skills_match,
        })
    }

    async fn recommend(
        &self,
        analysis: &CvAnalysis,
        kind: RecommendationKind,
        job: &JobContext,
    ) -> Result<String, CvError> {
        let body: RecommendationBody = self
            .post(
                "recommend",
                json!({ "analysis": analysis, "kind": kind, "job": job }),
            )
            .await
            .map_err(CvError::RecommendationFailed)?;

        let text = body.text.trim();
        if text.is_empty() {
            return Err(CvError::RecommendationFailed(
                "empty recommendation".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}

/// Client for the real-time room provider.
#[derive(Debug, Clone)]
pub struct HttpRoomProvisioner {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRoomProvisioner {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
            api_key,
        })
    }

    async fn existing_room(
        &self,
        request: &RoomRequest,
    ) -> Result<InterviewRoom, ProvisioningError> {
        let url = endpoint(&self.base_url, &format!("rooms/{}/tokens", request.unique_name));
        let call = self
            .client
            .post(url)
            .json(&json!({ "participant": request.participant_display_name }));
        let response = authorize(call, self.api_key.as_deref())
            .send()
            .await
            .map_err(|err| ProvisioningError::Unavailable(err.to_string()))?;
        read_room(response).await
    }
}

async fn read_room(response: reqwest::Response) -> Result<InterviewRoom, ProvisioningError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ProvisioningError::Rejected(format!("provider returned {status}")));
    }
    response
        .json::<InterviewRoom>()
        .await
        .map_err(|err| ProvisioningError::Rejected(err.to_string()))
}

#[async_trait]
impl RoomProvisioner for HttpRoomProvisioner {
    async fn create_room(&self, request: RoomRequest) -> Result<InterviewRoom, ProvisioningError> {
        let call = self
            .client
            .post(endpoint(&self.base_url, "rooms"))
            .json(&request);
        let response = authorize(call, self.api_key.as_deref())
            .send()
            .await
            .map_err(|err| ProvisioningError::Unavailable(err.to_string()))?;

        if response.status() == StatusCode::CONFLICT {
            return self.existing_room(&request).await;
        }
        read_room(response).await
    }
}

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    to: &'a str,
    template: &'a str,
    params: &'a std::collections::BTreeMap<String, String>,
}

/// Templated push (WhatsApp-style) delivered through a provider webhook.
#[derive(Debug, Clone)]
pub struct WebhookMessagingChannel {
    client: Client,
    webhook_url: String,
    api_key: Option<String>,
}

impl WebhookMessagingChannel {
    pub fn new(
        webhook_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            webhook_url: webhook_url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl NotificationChannel for WebhookMessagingChannel {
    async fn deliver(&self, notification: Notification) -> Result<(), NotificationError> {
        let Recipient::Phone(phone) = &notification.recipient else {
            return Err(NotificationError::Rejected(format!(
                "messaging requires a phone recipient, got {}",
                notification.recipient.label()
            )));
        };

        let message = WebhookMessage {
            to: phone,
            template: &notification.template,
            params: &notification.params,
        };
        let call = self.client.post(&self.webhook_url).json(&message);
        let response = authorize(call, self.api_key.as_deref())
            .send()
            .await
            .map_err(|err| NotificationError::Unavailable(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(NotificationError::Rejected(format!(
                "webhook returned {status}"
            )))
        }
    }
}
