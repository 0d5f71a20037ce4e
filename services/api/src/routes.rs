use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use reciprocity::records::{
    assessment_router, AssessmentRepository, AssessmentService, UserRepository,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

pub(crate) const SERVICE_NAME: &str = "reciprocity-api";

#[derive(Debug, Serialize)]
pub(crate) struct HealthPayload {
    pub(crate) ok: bool,
    pub(crate) service: &'static str,
    pub(crate) db: &'static str,
    pub(crate) target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

pub(crate) fn with_assessment_routes<A, U>(service: Arc<AssessmentService<A, U>>) -> axum::Router
where
    A: AssessmentRepository + 'static,
    U: UserRepository + 'static,
{
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/db/ping", axum::routing::get(db_ping_endpoint))
}

pub(crate) async fn healthcheck(Extension(state): Extension<AppState>) -> impl IntoResponse {
    match state.database.ping() {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthPayload {
                ok: true,
                service: SERVICE_NAME,
                db: "up",
                target: state.database.target().to_string(),
                error: None,
            }),
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthPayload {
                ok: false,
                service: SERVICE_NAME,
                db: "down",
                target: state.database.target().to_string(),
                error: Some(err.to_string()),
            }),
        ),
    }
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn db_ping_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    match state.database.ping() {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({ "ok": true, "result": result, "target": state.database.target() })),
        ),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "ok": false, "error": err.to_string() })),
        ),
    }
}
