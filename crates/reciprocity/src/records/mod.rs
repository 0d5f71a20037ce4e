pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentRow, AssessmentSubmission, AuthResponse, LoginRequest, NewAssessment, NewUser,
    RegisterRequest, UserAccount,
};
pub use export::{ExportError, EXPORT_COLUMNS};
pub use repository::{AssessmentRepository, RepositoryError, UserRepository};
pub use router::assessment_router;
pub use service::{AssessmentService, ServiceError, DEFAULT_LIST_LIMIT};
