use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{AssessmentSubmission, LoginRequest, RegisterRequest};
use super::export::{self, ExportError};
use super::repository::{AssessmentRepository, RepositoryError, UserRepository};
use super::service::{AssessmentService, ServiceError, DEFAULT_LIST_LIMIT};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Router builder exposing the account and assessment endpoints.
pub fn assessment_router<A, U>(service: Arc<AssessmentService<A, U>>) -> Router
where
    A: AssessmentRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route("/api/register", post(register_handler::<A, U>))
        .route("/api/login", post(login_handler::<A, U>))
        .route("/api/submit", post(submit_handler::<A, U>))
        .route("/api/list", get(list_handler::<A, U>))
        .route("/api/export-csv", get(export_csv_handler::<A, U>))
        .route("/api/export-xlsx", get(export_xlsx_handler::<A, U>))
        .with_state(service)
}

pub(crate) async fn register_handler<A, U>(
    State(service): State<Arc<AssessmentService<A, U>>>,
    payload: Result<axum::Json<RegisterRequest>, JsonRejection>,
) -> Response
where
    A: AssessmentRepository + 'static,
    U: UserRepository + 'static,
{
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.register(request) {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn login_handler<A, U>(
    State(service): State<Arc<AssessmentService<A, U>>>,
    payload: Result<axum::Json<LoginRequest>, JsonRejection>,
) -> Response
where
    A: AssessmentRepository + 'static,
    U: UserRepository + 'static,
{
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.login(request) {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<A, U>(
    State(service): State<Arc<AssessmentService<A, U>>>,
    headers: HeaderMap,
    payload: Result<axum::Json<AssessmentSubmission>, JsonRejection>,
) -> Response
where
    A: AssessmentRepository + 'static,
    U: UserRepository + 'static,
{
    // Identity is resolved before the body is decoded, so auth failures
    // win over payload failures.
    let identity = match service.authenticate(authorization_header(&headers)) {
        Ok(identity) => identity,
        Err(error) => return error_response(error),
    };

    let submission = match payload {
        Ok(axum::Json(submission)) => submission,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.submit(&identity, submission) {
        Ok(row) => (StatusCode::OK, axum::Json(json!({ "id": row.id }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<A, U>(
    State(service): State<Arc<AssessmentService<A, U>>>,
    headers: HeaderMap,
) -> Response
where
    A: AssessmentRepository + 'static,
    U: UserRepository + 'static,
{
    if let Err(error) = service.authenticate(authorization_header(&headers)) {
        return error_response(error);
    }

    match service.list(DEFAULT_LIST_LIMIT) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_csv_handler<A, U>(
    State(service): State<Arc<AssessmentService<A, U>>>,
    headers: HeaderMap,
) -> Response
where
    A: AssessmentRepository + 'static,
    U: UserRepository + 'static,
{
    if let Err(error) = service.authenticate(authorization_header(&headers)) {
        return error_response(error);
    }

    let rows = match service.list(DEFAULT_LIST_LIMIT) {
        Ok(rows) => rows,
        Err(error) => return error_response(error),
    };

    match export::csv_bytes(&rows) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"assessments.csv\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(error) => export_error_response(error),
    }
}

pub(crate) async fn export_xlsx_handler<A, U>(
    State(service): State<Arc<AssessmentService<A, U>>>,
    headers: HeaderMap,
) -> Response
where
    A: AssessmentRepository + 'static,
    U: UserRepository + 'static,
{
    if let Err(error) = service.authenticate(authorization_header(&headers)) {
        return error_response(error);
    }

    let rows = match service.list(DEFAULT_LIST_LIMIT) {
        Ok(rows) => rows,
        Err(error) => return error_response(error),
    };

    match export::xlsx_bytes(&rows) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"assessments.xlsx\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(error) => export_error_response(error),
    }
}

fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Body-decoding failures answer 400 with an error field like every other
/// rejected payload, instead of axum's plain-text 422.
fn rejection_response(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::InvalidCredentials | ServiceError::Unauthorized(_) => {
            StatusCode::UNAUTHORIZED
        }
        ServiceError::EmailTaken | ServiceError::Repository(RepositoryError::Conflict) => {
            StatusCode::CONFLICT
        }
        ServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

fn export_error_response(error: ExportError) -> Response {
    let status = match &error {
        ExportError::XlsxDisabled => StatusCode::SERVICE_UNAVAILABLE,
        ExportError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
