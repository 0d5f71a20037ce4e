use super::domain::{AssessmentRow, NewAssessment, NewUser, UserAccount};

/// Storage abstraction so the service layer can be exercised in isolation.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: NewAssessment) -> Result<AssessmentRow, RepositoryError>;
    /// Most recent rows first, at most `limit` of them.
    fn recent(&self, limit: usize) -> Result<Vec<AssessmentRow>, RepositoryError>;
}

/// Account storage behind register and login.
pub trait UserRepository: Send + Sync {
    fn create(&self, user: NewUser) -> Result<UserAccount, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
