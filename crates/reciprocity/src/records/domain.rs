use serde::{Deserialize, Serialize};

use crate::assessment::{AssessmentDossier, DomainScores, ScoreCard};

/// Payload accepted by the submit endpoint: the combined rater aggregates
/// plus the dossier captured during the interview. Score fields are always
/// recomputed server-side from the aggregates, never read from the client.
///
/// Every field defaults when absent so the service's validation owns the
/// missing-field answer, not the JSON decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    #[serde(default)]
    pub subject_name: String,
    #[serde(default)]
    pub aggregates: Option<DomainScores>,
    #[serde(default)]
    pub dossier: Option<AssessmentDossier>,
}

/// One persisted assessment row, as returned by list and export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRow {
    pub id: i64,
    pub user_id: i64,
    pub subject_name: String,
    /// RFC 3339 submission instant.
    pub timestamp: String,
    #[serde(flatten)]
    pub scores: ScoreCard,
    pub raw_json: String,
}

impl AssessmentRow {
    /// One-line rendering for the recent-submissions CLI listing.
    pub fn summary_line(&self) -> String {
        format!(
            "#{} {} | {} | IOS {} EOS {} (confidence {}%) | {}",
            self.id,
            self.subject_name,
            self.scores.classification.label(),
            self.scores.ios,
            self.scores.eos,
            self.scores.confidence,
            self.timestamp
        )
    }
}

/// Insert payload for a freshly scored assessment.
#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub user_id: i64,
    pub subject_name: String,
    pub timestamp: String,
    pub scores: ScoreCard,
    pub raw_json: String,
}

/// Stored user account. Deliberately not serializable as a whole so the
/// password hash cannot leak into a response body.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub role: String,
    pub created_at: String,
}

/// Insert payload for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub role: String,
    pub created_at: String,
}

/// Request body for the register endpoint. Absent email or password
/// deserializes to an empty string and fails the blank-field checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response body shared by register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}
