use crate::infra::{sample_job_board, SAMPLE_JOB, SAMPLE_STAFF};
use clap::Args;
use hireflow::error::AppError;
use hireflow::workflows::recruiting::applications::{
    AnonymousApplication, Application, ApplicationChanges, ApplicationContent, ApplicationService,
    ApplicationStatus, CandidateFacts, Collaborators, LifecycleConfig, UserId,
};
use hireflow::workflows::recruiting::gateways::{Notification, NotificationDispatcher, Recipient};
use hireflow::workflows::recruiting::jobs::JobId;
use hireflow::workflows::recruiting::memory::{
    InMemoryApplicationRepository, InMemoryIdentityStore, InMemoryInbox, InMemoryRoomProvisioner,
    KeywordCvIntelligence,
};
use std::sync::Arc;
use std::time::Duration;

const DEMO_RESUME_URL: &str = "https://files.example.com/cv/demo-candidate.pdf";
const DEMO_RESUME: &str = "Grace Hopper\ngrace@example.com +15550100200\n\
Rust and tokio services, postgres tuning, distributed systems on call";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Last status to move the demo application to.
    #[arg(long, default_value = "HIRED", value_parser = crate::infra::parse_status)]
    pub(crate) through: ApplicationStatus,
    /// Email typed in by the applicant. Overrides the one read from the résumé.
    #[arg(long)]
    pub(crate) email: Option<String>,
}

/// Demo inboxes kept around so the run can print what would have been delivered.
struct DemoPlatform {
    service: ApplicationService,
    staff_inbox: InMemoryInbox,
    messaging: InMemoryInbox,
    rooms: InMemoryRoomProvisioner,
}

fn demo_platform() -> DemoPlatform {
    let staff_inbox = InMemoryInbox::default();
    let messaging = InMemoryInbox::default();
    let rooms = InMemoryRoomProvisioner::default();
    let cv = KeywordCvIntelligence::default().with_resume(DEMO_RESUME_URL, DEMO_RESUME);

    let service = ApplicationService::new(
        Collaborators {
            applications: Arc::new(InMemoryApplicationRepository::default()),
            jobs: Arc::new(sample_job_board()),
            identities: Arc::new(InMemoryIdentityStore::default()),
            cv: Arc::new(cv),
            rooms: Arc::new(rooms.clone()),
            notifications: NotificationDispatcher::new(
                Arc::new(staff_inbox.clone()),
                Arc::new(messaging.clone()),
            ),
        },
        LifecycleConfig {
            gateway_timeout: Duration::from_secs(2),
            ..LifecycleConfig::default()
        },
    );

    DemoPlatform {
        service,
        staff_inbox,
        messaging,
        rooms,
    }
}

/// Statuses a recruiter walks through to reach `through` from `PENDING`.
pub(crate) fn demo_path(through: ApplicationStatus) -> Vec<ApplicationStatus> {
    use ApplicationStatus::*;
    let forward = [Reviewed, Shortlisted, Interviewed, Offered, Hired];
    match through {
        Pending => Vec::new(),
        Rejected | Withdrawn => vec![Reviewed, through],
        target => forward
            .iter()
            .position(|status| *status == target)
            .map(|end| forward[..=end].to_vec())
            .unwrap_or_default(),
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { through, email } = args;
    let platform = demo_platform();

    println!("Application lifecycle demo");
    println!("  Job: {SAMPLE_JOB}");
    println!("  Résumé: {DEMO_RESUME_URL}");

    let submission = platform
        .service
        .create_anonymous(AnonymousApplication {
            job_id: JobId(SAMPLE_JOB.to_string()),
            content: ApplicationContent {
                resume_url: Some(DEMO_RESUME_URL.to_string()),
                source: Some("cli-demo".to_string()),
                ..ApplicationContent::default()
            },
            candidate: CandidateFacts {
                email,
                ..CandidateFacts::default()
            },
        })
        .await?;

    let id = submission.application.id.clone();
    println!("\nAnonymous submission accepted: {id}");
    match &submission.credentials {
        Some(credentials) => println!(
            "  New account for {} (one-time password: {})",
            credentials.email, credentials.password
        ),
        None => println!("  Existing account reused"),
    }

    platform.service.wait_for_background().await;
    let scored = platform.service.get(&id)?;
    if let Some(score) = scored.as_ref().and_then(|app| app.cv_analysis_score) {
        println!("  CV match score: {score}");
    }

    let recruiter = UserId(SAMPLE_STAFF.to_string());
    println!("\nStatus changes");
    for status in demo_path(through) {
        let updated = platform
            .service
            .update(&id, ApplicationChanges::status(status), &recruiter)?;
        println!("  -> {} (version {})", updated.status, updated.version);
    }
    platform.service.wait_for_background().await;

    let Some(application) = platform.service.get(&id)? else {
        println!("  Application vanished from the repository");
        return Ok(());
    };
    render_application(&application);
    render_deliveries("Staff inbox", &platform.staff_inbox.delivered());
    render_deliveries("Candidate messages", &platform.messaging.delivered());

    let rooms = platform.rooms.room_names();
    if rooms.is_empty() {
        println!("\nRooms: none provisioned");
    } else {
        println!("\nRooms");
        for room in rooms {
            println!("  - {room}");
        }
    }

    match serde_json::to_string_pretty(&application) {
        Ok(json) => println!("\nStored record:\n{json}"),
        Err(err) => println!("\nStored record unavailable: {err}"),
    }

    Ok(())
}

fn render_application(application: &Application) {
    println!("\nFinal status: {}", application.status);
    for (label, stamp) in [
        ("reviewed", application.reviewed_at),
        ("interviewed", application.interviewed_at),
        ("accepted", application.accepted_at),
        ("rejected", application.rejected_at),
    ] {
        if let Some(at) = stamp {
            println!("  {label} at {}", at.to_rfc3339());
        }
    }

    match application.company_notes() {
        Some(notes) => {
            println!("\nEvent trail");
            for line in notes.lines() {
                println!("  {line}");
            }
        }
        None => println!("\nEvent trail: empty"),
    }
}

fn render_deliveries(title: &str, deliveries: &[Notification]) {
    if deliveries.is_empty() {
        println!("\n{title}: nothing delivered");
        return;
    }
    println!("\n{title}");
    for notification in deliveries {
        let recipient = match &notification.recipient {
            Recipient::User(user) => format!("user {user}"),
            Recipient::Phone(phone) => format!("phone {phone}"),
        };
        println!("  - {} to {recipient}", notification.template);
    }
}
