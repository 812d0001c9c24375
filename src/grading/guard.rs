// src/grading/guard.rs

use super::{GradingError, engine::grade_attempt, score::grade_on_ten};
use crate::{
    models::submission::{AnswerReview, NewSubmission, Submission},
    store::Store,
};

/// A persisted submission together with its answer sheet.
#[derive(Debug, Clone)]
pub struct GradedSubmission {
    pub submission: Submission,
    pub answer_sheet: Vec<AnswerReview>,
}

/// Grades and records one user's answers to one quiz.
///
/// At most one submission exists per (user, quiz). The existence check up
/// front only avoids grading work; the store's conditional insert is what
/// keeps two concurrent requests from both landing.
pub async fn submit_answers(
    store: &dyn Store,
    user_id: i64,
    quiz_id: i64,
    answers: Vec<Option<String>>,
) -> Result<GradedSubmission, GradingError> {
    store
        .find_quiz(quiz_id)
        .await?
        .ok_or(GradingError::QuizNotFound(quiz_id))?;

    if store.has_submission(user_id, quiz_id).await? {
        return Err(GradingError::AlreadySubmitted { user_id, quiz_id });
    }

    let questions = store.quiz_questions(quiz_id).await?;
    let attempt = grade_attempt(quiz_id, &questions, &answers)?;
    let grade = grade_on_ten(quiz_id, attempt.correct_count, attempt.total())?;

    let submission = store
        .insert_submission(NewSubmission {
            user_id,
            quiz_id,
            answers,
            correct_count: attempt.correct_count as i32,
            grade,
        })
        .await?
        .ok_or(GradingError::AlreadySubmitted { user_id, quiz_id })?;

    tracing::info!(
        user_id,
        quiz_id,
        correct = attempt.correct_count,
        total = attempt.total(),
        grade,
        "quiz submission graded"
    );

    Ok(GradedSubmission {
        answer_sheet: AnswerReview::sheet(&questions, &attempt),
        submission,
    })
}
