// src/grading/mod.rs

//! Quiz grading and per-subject performance reporting.
//!
//! Letters travel on the wire ('A' is the first alternative) but are resolved
//! to 0-based indices by [`answer_key`] before anything is compared.

pub mod answer_key;
pub mod engine;
pub mod guard;
pub mod history;
pub mod report;
pub mod score;

use std::fmt;

use crate::store::StoreError;

pub use engine::{GradedAttempt, QuestionOutcome, grade_attempt};
pub use guard::{GradedSubmission, submit_answers};
pub use history::submission_history;
pub use report::{SubjectPerformance, aggregate_by_subject, subject_performance};
pub use score::{format_grade, format_percentage, grade_on_ten, round2};

/// Failures of the grading flow.
#[derive(Debug, Clone, PartialEq)]
pub enum GradingError {
    /// The referenced quiz has no persisted record.
    QuizNotFound(i64),

    /// The user already has a graded submission for this quiz.
    AlreadySubmitted { user_id: i64, quiz_id: i64 },

    /// The quiz has no questions, so no grade can be computed.
    EmptyQuestionSet(i64),

    /// A stored answer key does not point inside its alternatives list.
    InvalidAnswerKey { question_id: i64, key: String },

    /// The persistence layer failed.
    StorageUnavailable(String),
}

impl fmt::Display for GradingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradingError::QuizNotFound(id) => write!(f, "Quiz {} not found", id),
            GradingError::AlreadySubmitted { .. } => write!(f, "Quiz already answered"),
            GradingError::EmptyQuestionSet(id) => write!(f, "Quiz {} has no questions", id),
            GradingError::InvalidAnswerKey { question_id, key } => write!(
                f,
                "Question {} has an answer key '{}' outside its alternatives",
                question_id, key
            ),
            GradingError::StorageUnavailable(msg) => write!(f, "Storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for GradingError {}

impl From<StoreError> for GradingError {
    fn from(err: StoreError) -> Self {
        GradingError::StorageUnavailable(err.to_string())
    }
}
