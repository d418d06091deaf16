use crate::cli::ServeArgs;
use crate::infra::{build_collaborators, sample_job_board, AppState, SAMPLE_JOB};
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hireflow::config::AppConfig;
use hireflow::error::AppError;
use hireflow::telemetry;
use hireflow::workflows::recruiting::applications::ApplicationService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let collaborators =
        build_collaborators(&config.integrations, &config.lifecycle, sample_job_board())?;
    let application_service = Arc::new(ApplicationService::new(
        collaborators,
        config.lifecycle.clone(),
    ));

    let app = with_application_routes(application_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        ?config.integrations,
        %addr,
        sample_job = SAMPLE_JOB,
        "application lifecycle orchestrator ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
