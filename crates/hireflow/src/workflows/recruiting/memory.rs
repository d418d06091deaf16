//! In-process collaborators used by the CLI demo, local development and tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, info};

use super::applications::domain::{
    Application, ApplicationId, ApplicationNote, CandidateFacts, RecommendationKind, UserId,
};
use super::applications::identity::{
    CandidateIdentity, IdentityStore, IdentityStoreError, NewCandidate,
};
use super::applications::repository::{ApplicationRepository, RepositoryError};
use super::gateways::cv::{CvAnalysis, CvError, CvIntelligence, JobContext, SkillsMatch};
use super::gateways::notify::{Notification, NotificationChannel, NotificationError, Recipient};
use super::gateways::rooms::{InterviewRoom, ProvisioningError, RoomProvisioner, RoomRequest};
use super::jobs::{CompanyId, DirectoryError, JobDirectory, JobId, JobPosting, StaffMember};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
struct ApplicationTables {
    records: HashMap<ApplicationId, Application>,
    notes: HashMap<ApplicationId, Vec<ApplicationNote>>,
}

/// Repository enforcing the active `(job, candidate)` uniqueness and version checks under one lock.
#[derive(Default, Clone)]
pub struct InMemoryApplicationRepository {
    tables: Arc<Mutex<ApplicationTables>>,
}

impl InMemoryApplicationRepository {
    fn sorted(mut records: Vec<Application>) -> Vec<Application> {
        records.sort_by(|a, b| a.applied_at.cmp(&b.applied_at).then(a.id.cmp(&b.id)));
        records
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, record: Application) -> Result<Application, RepositoryError> {
        let mut tables = lock(&self.tables);
        let slot_taken = tables.records.values().any(|existing| {
            existing.is_active()
                && existing.job_id == record.job_id
                && existing.candidate_id == record.candidate_id
        });
        if slot_taken || tables.records.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn replace(&self, mut record: Application) -> Result<Application, RepositoryError> {
        let mut tables = lock(&self.tables);
        let stored = tables
            .records
            .get_mut(&record.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.version != record.version {
            return Err(RepositoryError::Stale {
                expected: record.version,
                found: stored.version,
            });
        }
        record.version += 1;
        *stored = record.clone();
        Ok(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(lock(&self.tables).records.get(id).cloned())
    }

    fn active_for(
        &self,
        job_id: &JobId,
        candidate_id: &UserId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(lock(&self.tables)
            .records
            .values()
            .find(|record| {
                record.is_active()
                    && &record.job_id == job_id
                    && &record.candidate_id == candidate_id
            })
            .cloned())
    }

    fn list_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, RepositoryError> {
        let records = lock(&self.tables)
            .records
            .values()
            .filter(|record| &record.job_id == job_id)
            .cloned()
            .collect();
        Ok(Self::sorted(records))
    }

    fn list_by_candidate(
        &self,
        candidate_id: &UserId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let records = lock(&self.tables)
            .records
            .values()
            .filter(|record| &record.candidate_id == candidate_id)
            .cloned()
            .collect();
        Ok(Self::sorted(records))
    }

    fn add_note(&self, note: ApplicationNote) -> Result<ApplicationNote, RepositoryError> {
        let mut tables = lock(&self.tables);
        if !tables.records.contains_key(&note.application_id) {
            return Err(RepositoryError::NotFound);
        }
        tables
            .notes
            .entry(note.application_id.clone())
            .or_default()
            .push(note.clone());
        Ok(note)
    }

    fn notes(&self, id: &ApplicationId) -> Result<Vec<ApplicationNote>, RepositoryError> {
        Ok(lock(&self.tables).notes.get(id).cloned().unwrap_or_default())
    }
}

/// Job postings and company staff rosters.
#[derive(Default, Clone)]
pub struct InMemoryJobBoard {
    jobs: Arc<Mutex<HashMap<JobId, JobPosting>>>,
    staff: Arc<Mutex<Vec<StaffMember>>>,
}

impl InMemoryJobBoard {
    pub fn with_job(self, job: JobPosting) -> Self {
        lock(&self.jobs).insert(job.id.clone(), job);
        self
    }

    pub fn with_staff(self, company_id: &CompanyId, user_id: &str, active: bool) -> Self {
        lock(&self.staff).push(StaffMember {
            user_id: UserId(user_id.to_string()),
            company_id: company_id.clone(),
            active,
        });
        self
    }

    pub fn posting(&self, id: &JobId) -> Option<JobPosting> {
        lock(&self.jobs).get(id).cloned()
    }
}

impl JobDirectory for InMemoryJobBoard {
    fn job(&self, id: &JobId) -> Result<Option<JobPosting>, DirectoryError> {
        Ok(self.posting(id))
    }

    fn increment_applicants(&self, id: &JobId) -> Result<(), DirectoryError> {
        let mut jobs = lock(&self.jobs);
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| DirectoryError::UnknownJob(id.0.clone()))?;
        job.applicants_count = job.applicants_count.saturating_add(1);
        Ok(())
    }

    fn active_staff(&self, company_id: &CompanyId) -> Result<Vec<StaffMember>, DirectoryError> {
        Ok(lock(&self.staff)
            .iter()
            .filter(|member| member.active && &member.company_id == company_id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone)]
struct StoredAccount {
    identity: CandidateIdentity,
    password_hash: String,
}

/// Candidate accounts keyed by lowercase email. Only password hashes are kept.
#[derive(Default, Clone)]
pub struct InMemoryIdentityStore {
    accounts: Arc<Mutex<Vec<StoredAccount>>>,
}

impl InMemoryIdentityStore {
    pub fn with_candidate(self, identity: CandidateIdentity) -> Self {
        lock(&self.accounts).push(StoredAccount {
            identity,
            password_hash: String::new(),
        });
        self
    }

    pub fn password_hash(&self, email: &str) -> Option<String> {
        lock(&self.accounts)
            .iter()
            .find(|account| account.identity.email.eq_ignore_ascii_case(email))
            .map(|account| account.password_hash.clone())
    }

    pub fn len(&self) -> usize {
        lock(&self.accounts).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn find_by_email(&self, email: &str) -> Result<Option<CandidateIdentity>, IdentityStoreError> {
        Ok(lock(&self.accounts)
            .iter()
            .find(|account| account.identity.email.eq_ignore_ascii_case(email))
            .map(|account| account.identity.clone()))
    }

    fn find_by_id(&self, id: &UserId) -> Result<Option<CandidateIdentity>, IdentityStoreError> {
        Ok(lock(&self.accounts)
            .iter()
            .find(|account| &account.identity.user_id == id)
            .map(|account| account.identity.clone()))
    }

    fn create_candidate(
        &self,
        candidate: NewCandidate,
    ) -> Result<CandidateIdentity, IdentityStoreError> {
        let mut accounts = lock(&self.accounts);
        if accounts
            .iter()
            .any(|account| account.identity.email.eq_ignore_ascii_case(&candidate.email))
        {
            return Err(IdentityStoreError::EmailTaken(candidate.email));
        }

        let identity = CandidateIdentity {
            user_id: UserId(format!("cand-{}", uuid::Uuid::new_v4().simple())),
            email: candidate.email.to_ascii_lowercase(),
            first_name: candidate.first_name,
            last_name: candidate.last_name,
            phone: candidate.phone,
        };
        accounts.push(StoredAccount {
            identity: identity.clone(),
            password_hash: candidate.password_hash,
        });
        Ok(identity)
    }

    fn delete_candidate(&self, id: &UserId) -> Result<(), IdentityStoreError> {
        lock(&self.accounts).retain(|account| &account.identity.user_id != id);
        Ok(())
    }
}

/// Room provider that keeps rooms in memory and returns the existing room for a known name.
#[derive(Default, Clone)]
pub struct InMemoryRoomProvisioner {
    rooms: Arc<Mutex<Vec<RoomRequest>>>,
}

impl InMemoryRoomProvisioner {
    pub fn room_names(&self) -> Vec<String> {
        lock(&self.rooms)
            .iter()
            .map(|room| room.unique_name.clone())
            .collect()
    }
}

#[async_trait]
impl RoomProvisioner for InMemoryRoomProvisioner {
    async fn create_room(&self, request: RoomRequest) -> Result<InterviewRoom, ProvisioningError> {
        let mut rooms = lock(&self.rooms);
        let index = match rooms
            .iter()
            .position(|room| room.unique_name == request.unique_name)
        {
            Some(index) => index,
            None => {
                rooms.push(request.clone());
                rooms.len() - 1
            }
        };

        Ok(InterviewRoom {
            room_id: format!("room-{index}"),
            room_name: request.unique_name,
            join_token: uuid::Uuid::new_v4().to_string(),
        })
    }
}

/// Notification channel that records every delivery.
#[derive(Default, Clone)]
pub struct InMemoryInbox {
    delivered: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryInbox {
    pub fn delivered(&self) -> Vec<Notification> {
        lock(&self.delivered).clone()
    }
}

#[async_trait]
impl NotificationChannel for InMemoryInbox {
    async fn deliver(&self, notification: Notification) -> Result<(), NotificationError> {
        lock(&self.delivered).push(notification);
        Ok(())
    }
}

/// Room provider for local runs without a room service. Keeps no state: the room id is
/// derived from the unique name, so repeated requests for a name resolve to the same room.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalRoomProvisioner;

#[async_trait]
impl RoomProvisioner for LocalRoomProvisioner {
    async fn create_room(&self, request: RoomRequest) -> Result<InterviewRoom, ProvisioningError> {
        debug!(room_name = %request.unique_name, "local room issued");
        Ok(InterviewRoom {
            room_id: format!("local-{}", request.unique_name),
            room_name: request.unique_name,
            join_token: uuid::Uuid::new_v4().to_string(),
        })
    }
}

/// Channel that logs each delivery and drops it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingChannel;

#[async_trait]
impl NotificationChannel for LoggingChannel {
    async fn deliver(&self, notification: Notification) -> Result<(), NotificationError> {
        match &notification.recipient {
            Recipient::User(user_id) => {
                info!(template = %notification.template, user_id = %user_id, "in-app notification")
            }
            // Phone numbers stay out of the logs.
            Recipient::Phone(_) => {
                info!(template = %notification.template, "phone notification")
            }
        }
        Ok(())
    }
}

/// Offline CV gateway over résumé texts registered by URL.
///
/// Contact facts are read with simple token heuristics and the score is the share of prompt
/// keywords found in the résumé.
#[derive(Default, Clone)]
pub struct KeywordCvIntelligence {
    resumes: Arc<Mutex<HashMap<String, String>>>,
}

impl KeywordCvIntelligence {
    pub fn with_resume(self, url: &str, text: &str) -> Self {
        lock(&self.resumes).insert(url.to_string(), text.to_string());
        self
    }

    fn resume(&self, url: &str) -> Option<String> {
        lock(&self.resumes).get(url).cloned()
    }
}

fn keywords(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
        .filter(|word| word.len() > 2)
        .map(str::to_lowercase)
        .collect()
}

fn extract_contact_facts(text: &str) -> CandidateFacts {
    let mut facts = CandidateFacts::default();
    for token in text.split_whitespace() {
        let token = token.trim_matches(|c: char| c == ',' || c == ';' || c == '<' || c == '>');
        if facts.email.is_none() && token.contains('@') && token.contains('.') {
            facts.email = Some(token.to_string());
        } else if facts.phone.is_none()
            && token.starts_with('+')
            && token[1..].chars().all(|c| c.is_ascii_digit())
            && token.len() > 6
        {
            facts.phone = Some(token.to_string());
        }
    }

    let mut name = text
        .lines()
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .filter(|word| word.chars().all(char::is_alphabetic));
    facts.first_name = name.next().map(str::to_string);
    facts.last_name = name.next().map(str::to_string);
    facts
}

#[async_trait]
impl CvIntelligence for KeywordCvIntelligence {
    async fn extract_facts(&self, resume_url: &str) -> Result<CandidateFacts, CvError> {
        let text = self
            .resume(resume_url)
            .ok_or_else(|| CvError::ExtractionFailed(format!("no resume at {resume_url}")))?;
        Ok(extract_contact_facts(&text))
    }

    async fn analyze(
        &self,
        resume_url: &str,
        prompt: &str,
        job: &JobContext,
    ) -> Result<CvAnalysis, CvError> {
        let text = self
            .resume(resume_url)
            .ok_or_else(|| CvError::AnalysisFailed(format!("no resume at {resume_url}")))?;

        let wanted = keywords(prompt);
        if wanted.is_empty() {
            return Err(CvError::AnalysisFailed("prompt has no keywords".to_string()));
        }
        let present = keywords(&text);
        let (matched, missing): (Vec<String>, Vec<String>) =
            wanted.into_iter().partition(|word| present.contains(word));

        let score = (matched.len() * 100 / (matched.len() + missing.len())) as u8;
        let overall_fit = match score {
            75..=100 => "strong",
            40..=74 => "moderate",
            _ => "weak",
        };

        Ok(CvAnalysis {
            score,
            overall_fit: format!("{overall_fit} fit for {}", job.title),
            strengths: matched.iter().map(|word| format!("mentions {word}")).collect(),
            weaknesses: missing.iter().map(|word| format!("no evidence of {word}")).collect(),
            skills_match: SkillsMatch { matched, missing },
        })
    }

    async fn recommend(
        &self,
        analysis: &CvAnalysis,
        kind: RecommendationKind,
        job: &JobContext,
    ) -> Result<String, CvError> {
        let missing = analysis.skills_match.missing.join(", ");
        Ok(match kind {
            RecommendationKind::CvImprovement if missing.is_empty() => {
                format!("Your CV already covers what the {} role asks for.", job.title)
            }
            RecommendationKind::CvImprovement => {
                format!("Highlight experience with: {missing}.")
            }
            RecommendationKind::InterviewPreparation => format!(
                "Prepare examples around {} for the {} interview.",
                analysis.skills_match.matched.join(", "),
                job.title
            ),
        })
    }
}
