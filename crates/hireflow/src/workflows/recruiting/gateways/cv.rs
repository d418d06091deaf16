use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::workflows::recruiting::applications::domain::{CandidateFacts, RecommendationKind};
use crate::workflows::recruiting::jobs::{JobId, JobPosting};

pub const FALLBACK_CV_RECOMMENDATIONS: &str =
    "Tailor your CV to the role: lead with the most relevant experience and quantify results.";
pub const FALLBACK_INTERVIEW_RECOMMENDATIONS: &str =
    "Prepare concrete examples for the core skills listed in the job description.";

/// Structured result of scoring a résumé against a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvAnalysis {
    pub score: u8,
    pub overall_fit: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub skills_match: SkillsMatch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsMatch {
    #[serde(default)]
    pub matched: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
}

/// Job fields shared with the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobContext {
    pub job_id: JobId,
    pub title: String,
}

impl From<&JobPosting> for JobContext {
    fn from(job: &JobPosting) -> Self {
        Self {
            job_id: job.id.clone(),
            title: job.title.clone(),
        }
    }
}

/// External AI service that reads résumés.
#[async_trait]
pub trait CvIntelligence: Send + Sync {
    /// Best-effort contact extraction. Partial results are returned as-is; only a total
    /// failure yields `ExtractionFailed`.
    async fn extract_facts(&self, resume_url: &str) -> Result<CandidateFacts, CvError>;

    async fn analyze(
        &self,
        resume_url: &str,
        prompt: &str,
        job: &JobContext,
    ) -> Result<CvAnalysis, CvError>;

    /// Natural-language advice derived from an existing analysis.
    async fn recommend(
        &self,
        analysis: &CvAnalysis,
        kind: RecommendationKind,
        job: &JobContext,
    ) -> Result<String, CvError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CvError {
    #[error("cv extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("cv analysis failed: {0}")]
    AnalysisFailed(String),
    #[error("recommendation generation failed: {0}")]
    RecommendationFailed(String),
}

/// Validates a raw provider score and rounds it onto the 0..=100 scale.
pub fn normalize_score(raw: f64) -> Result<u8, CvError> {
    if !raw.is_finite() || !(0.0..=100.0).contains(&raw) {
        return Err(CvError::AnalysisFailed(format!(
            "score {raw} outside the 0-100 range"
        )));
    }
    Ok(raw.round() as u8)
}

pub fn fallback_recommendation(kind: RecommendationKind) -> &'static str {
    match kind {
        RecommendationKind::CvImprovement => FALLBACK_CV_RECOMMENDATIONS,
        RecommendationKind::InterviewPreparation => FALLBACK_INTERVIEW_RECOMMENDATIONS,
    }
}
