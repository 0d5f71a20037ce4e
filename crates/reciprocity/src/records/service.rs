use std::sync::Arc;

use chrono::Utc;

use crate::assessment::{score, AssessmentDossier};
use crate::auth::{hash_password, verify_password, AuthError, AuthProvider, Identity};

use super::domain::{
    AssessmentRow, AssessmentSubmission, AuthResponse, LoginRequest, NewAssessment, NewUser,
    RegisterRequest,
};
use super::repository::{AssessmentRepository, RepositoryError, UserRepository};

/// Hard cap on rows returned by list and export, matching the query limit
/// the endpoints have always used.
pub const DEFAULT_LIST_LIMIT: usize = 1000;

/// Service composing account storage, assessment storage, and the auth
/// provider. Handlers and the CLI both go through this type.
pub struct AssessmentService<A, U> {
    assessments: Arc<A>,
    users: Arc<U>,
    auth: AuthProvider,
    pbkdf2_iterations: u32,
}

impl<A, U> AssessmentService<A, U>
where
    A: AssessmentRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(
        assessments: Arc<A>,
        users: Arc<U>,
        auth: AuthProvider,
        pbkdf2_iterations: u32,
    ) -> Self {
        Self {
            assessments,
            users,
            auth,
            pbkdf2_iterations,
        }
    }

    /// Create an account and hand back a bearer token for it.
    pub fn register(&self, request: RegisterRequest) -> Result<AuthResponse, ServiceError> {
        let email = request.email.trim().to_ascii_lowercase();
        if email.is_empty() {
            return Err(ServiceError::Validation("email is required".to_string()));
        }
        if request.password.is_empty() {
            return Err(ServiceError::Validation("password is required".to_string()));
        }

        let password_hash = hash_password(&request.password, self.pbkdf2_iterations)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;

        let account = self
            .users
            .create(NewUser {
                email,
                password_hash,
                name: request.name,
                role: "user".to_string(),
                created_at: Utc::now().to_rfc3339(),
            })
            .map_err(|err| match err {
                RepositoryError::Conflict => ServiceError::EmailTaken,
                other => ServiceError::Repository(other),
            })?;

        let token = self
            .auth
            .issue(account.id, &account.email, &account.role)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        Ok(AuthResponse { token })
    }

    /// Check credentials and issue a token. Unknown accounts and wrong
    /// passwords are indistinguishable to the caller; blank fields fail
    /// validation before any lookup.
    pub fn login(&self, request: LoginRequest) -> Result<AuthResponse, ServiceError> {
        let email = request.email.trim().to_ascii_lowercase();
        if email.is_empty() {
            return Err(ServiceError::Validation("email is required".to_string()));
        }
        if request.password.is_empty() {
            return Err(ServiceError::Validation("password is required".to_string()));
        }

        let account = self
            .users
            .find_by_email(&email)?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_password(&request.password, &account.password_hash) {
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self
            .auth
            .issue(account.id, &account.email, &account.role)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        Ok(AuthResponse { token })
    }

    /// Resolve the identity behind an Authorization header value.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, ServiceError> {
        Ok(self.auth.authenticate(authorization)?)
    }

    /// Score the submitted aggregates and persist the row. The stored score
    /// columns always come from the server-side computation; the dossier is
    /// kept verbatim as the audit payload.
    pub fn submit(
        &self,
        identity: &Identity,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentRow, ServiceError> {
        let subject_name = submission.subject_name.trim();
        if subject_name.is_empty() {
            return Err(ServiceError::Validation(
                "subject_name is required".to_string(),
            ));
        }
        let aggregates = submission
            .aggregates
            .as_ref()
            .ok_or_else(|| ServiceError::Validation("aggregates is required".to_string()))?;

        let scores = score(aggregates);
        let dossier = submission
            .dossier
            .unwrap_or_else(|| AssessmentDossier::from_scores(aggregates));
        let raw_json = serde_json::to_string(&dossier)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;

        let row = self.assessments.insert(NewAssessment {
            user_id: identity.user_id,
            subject_name: subject_name.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            scores,
            raw_json,
        })?;
        Ok(row)
    }

    /// Most recent rows first, capped at [`DEFAULT_LIST_LIMIT`].
    pub fn list(&self, limit: usize) -> Result<Vec<AssessmentRow>, ServiceError> {
        let capped = limit.clamp(1, DEFAULT_LIST_LIMIT);
        Ok(self.assessments.recent(capped)?)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already registered")]
    EmailTaken,
    #[error(transparent)]
    Unauthorized(#[from] AuthError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("internal error: {0}")]
    Internal(String),
}
