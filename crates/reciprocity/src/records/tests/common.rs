use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessment::DomainScores;
use crate::auth::AuthProvider;
use crate::records::domain::{
    AssessmentRow, AssessmentSubmission, NewAssessment, NewUser, RegisterRequest, UserAccount,
};
use crate::records::repository::{AssessmentRepository, RepositoryError, UserRepository};
use crate::records::{assessment_router, AssessmentService};

/// Low PBKDF2 cost so account fixtures stay fast.
pub(super) const TEST_ITERATIONS: u32 = 500;
pub(super) const TEST_SECRET: &[u8] = b"records-test-secret";

pub(super) fn sample_aggregates() -> DomainScores {
    // Scores to expect downstream: IOS 68.5, EOS 33.0, confidence 64.5,
    // classified as needs-deeper.
    DomainScores {
        tp: 80.0,
        bi: 60.0,
        oe: 20.0,
        lc: 30.0,
        sc: 50.0,
        ps: 70.0,
    }
}

pub(super) fn submission() -> AssessmentSubmission {
    AssessmentSubmission {
        subject_name: "Jordan Example".to_string(),
        aggregates: Some(sample_aggregates()),
        dossier: None,
    }
}

pub(super) fn register_request() -> RegisterRequest {
    RegisterRequest {
        email: "rater@example.com".to_string(),
        password: "hunter2".to_string(),
        name: Some("Rater".to_string()),
    }
}

pub(super) fn fixture_service() -> (
    AssessmentService<MemoryAssessments, MemoryUsers>,
    Arc<MemoryAssessments>,
    Arc<MemoryUsers>,
) {
    let assessments = Arc::new(MemoryAssessments::default());
    let users = Arc::new(MemoryUsers::default());
    let service = AssessmentService::new(
        assessments.clone(),
        users.clone(),
        AuthProvider::Fixture,
        TEST_ITERATIONS,
    );
    (service, assessments, users)
}

pub(super) fn verified_service() -> (
    AssessmentService<MemoryAssessments, MemoryUsers>,
    Arc<MemoryAssessments>,
    Arc<MemoryUsers>,
) {
    let assessments = Arc::new(MemoryAssessments::default());
    let users = Arc::new(MemoryUsers::default());
    let service = AssessmentService::new(
        assessments.clone(),
        users.clone(),
        AuthProvider::Verified {
            secret: TEST_SECRET.to_vec(),
            token_ttl_hours: 8,
        },
        TEST_ITERATIONS,
    );
    (service, assessments, users)
}

pub(super) fn router_with(
    service: AssessmentService<MemoryAssessments, MemoryUsers>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_raw_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body")
        .to_vec()
}

#[derive(Default, Clone)]
pub(super) struct MemoryAssessments {
    rows: Arc<Mutex<Vec<AssessmentRow>>>,
}

impl MemoryAssessments {
    pub(super) fn rows(&self) -> Vec<AssessmentRow> {
        self.rows.lock().expect("assessment mutex poisoned").clone()
    }
}

impl AssessmentRepository for MemoryAssessments {
    fn insert(&self, record: NewAssessment) -> Result<AssessmentRow, RepositoryError> {
        let mut guard = self.rows.lock().expect("assessment mutex poisoned");
        let row = AssessmentRow {
            id: guard.len() as i64 + 1,
            user_id: record.user_id,
            subject_name: record.subject_name,
            timestamp: record.timestamp,
            scores: record.scores,
            raw_json: record.raw_json,
        };
        guard.push(row.clone());
        Ok(row)
    }

    fn recent(&self, limit: usize) -> Result<Vec<AssessmentRow>, RepositoryError> {
        let guard = self.rows.lock().expect("assessment mutex poisoned");
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryUsers {
    accounts: Arc<Mutex<Vec<UserAccount>>>,
}

impl MemoryUsers {
    pub(super) fn accounts(&self) -> Vec<UserAccount> {
        self.accounts.lock().expect("user mutex poisoned").clone()
    }
}

impl UserRepository for MemoryUsers {
    fn create(&self, user: NewUser) -> Result<UserAccount, RepositoryError> {
        let mut guard = self.accounts.lock().expect("user mutex poisoned");
        if guard.iter().any(|account| account.email == user.email) {
            return Err(RepositoryError::Conflict);
        }
        let account = UserAccount {
            id: guard.len() as i64 + 1,
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        };
        guard.push(account.clone());
        Ok(account)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, RepositoryError> {
        let guard = self.accounts.lock().expect("user mutex poisoned");
        Ok(guard
            .iter()
            .find(|account| account.email == email)
            .cloned())
    }
}

pub(super) struct UnavailableAssessments;

impl AssessmentRepository for UnavailableAssessments {
    fn insert(&self, _record: NewAssessment) -> Result<AssessmentRow, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<AssessmentRow>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct UnavailableUsers;

impl UserRepository for UnavailableUsers {
    fn create(&self, _user: NewUser) -> Result<UserAccount, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_email(&self, _email: &str) -> Result<Option<UserAccount>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
