use crate::cli::ServeArgs;
use crate::infra::{
    ensure_fixture_user, AppState, SqliteAssessmentRepository, SqliteDatabase, SqliteUserRepository,
};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use reciprocity::auth::AuthProvider;
use reciprocity::config::{AppConfig, AuthMode};
use reciprocity::error::AppError;
use reciprocity::records::AssessmentService;
use reciprocity::telemetry;
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

    let database = Arc::new(SqliteDatabase::open(&config.database.path)?);
    if matches!(config.auth.mode, AuthMode::Fixture) {
        ensure_fixture_user(&database)?;
    }

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        database: database.clone(),
    };

    let assessments = Arc::new(SqliteAssessmentRepository::new(database.clone()));
    let users = Arc::new(SqliteUserRepository::new(database));
    let auth = AuthProvider::from_config(&config.auth);
    let assessment_service = Arc::new(AssessmentService::new(
        assessments,
        users,
        auth,
        config.auth.pbkdf2_iterations,
    ));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        mode = ?config.auth.mode,
        "reciprocity assessment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
