// src/store/mod.rs

//! Persistence boundary.
//!
//! Handlers never talk to a database directly: they receive a [`DynStore`]
//! through `AppState`. `main` decides which implementation backs it.

pub mod memory;
pub mod postgres;

use std::{fmt, sync::Arc};

use async_trait::async_trait;

use crate::models::{
    quiz::{NewQuiz, Question, Quiz, QuizOverview},
    submission::{NewSubmission, Submission, SubmissionRecord},
    summary::{NewSummary, Summary, SummaryFilter},
    user::{NewUser, User},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Shared handle to the configured store.
pub type DynStore = Arc<dyn Store>;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The backend could not be reached or the query failed.
    Unavailable(String),

    /// A unique constraint rejected the write.
    Duplicate(String),

    /// A persisted row could not be mapped back into the domain model.
    Corrupt(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "storage unavailable: {}", msg),
            StoreError::Duplicate(msg) => write!(f, "duplicate record: {}", msg),
            StoreError::Corrupt(msg) => write!(f, "corrupt record: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate(db_err.message().to_string())
            }
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn create_summary(&self, summary: NewSummary) -> Result<Summary, StoreError>;
    async fn find_summary(&self, id: i64) -> Result<Option<Summary>, StoreError>;
    /// Newest first.
    async fn list_summaries(&self, filter: &SummaryFilter) -> Result<Vec<Summary>, StoreError>;

    /// Writes the quiz and all its questions, or nothing.
    async fn create_quiz(&self, quiz: NewQuiz) -> Result<Quiz, StoreError>;
    async fn find_quiz(&self, id: i64) -> Result<Option<Quiz>, StoreError>;
    async fn list_quizzes(&self, subject: Option<&str>) -> Result<Vec<QuizOverview>, StoreError>;
    /// Questions of a quiz in their answering order (ascending id).
    async fn quiz_questions(&self, quiz_id: i64) -> Result<Vec<Question>, StoreError>;

    async fn has_submission(&self, user_id: i64, quiz_id: i64) -> Result<bool, StoreError>;

    /// Inserts the submission unless one already exists for the same
    /// (user, quiz) pair, in which case nothing is written and `None` is
    /// returned. The check and the insert are a single atomic step.
    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<Option<Submission>, StoreError>;

    /// All submissions of a user joined with their quiz, newest first.
    async fn list_submissions(&self, user_id: i64) -> Result<Vec<SubmissionRecord>, StoreError>;
}
