//! Guided-interview assessment: the question script, the interview session
//! state machine, domain aggregation, scoring, and report rendering.

pub mod aggregate;
pub mod domain;
pub mod quotient;
pub mod report;
pub mod scoring;
pub mod script;
pub mod session;
pub mod transcript;

pub use domain::{Answer, Classification, Domain, DomainScores, RaterGroup};
pub use report::{AssessmentDossier, AssessmentOutcome, GroupOutcome};
pub use scoring::{score, ScoreCard};
pub use script::{AssessmentScript, FollowUpRule, QuestionKind, QuestionTemplate, SectionTemplate};
pub use session::{InterviewSession, SessionError, Stage};
pub use transcript::{TranscriptError, TranscriptImporter};
