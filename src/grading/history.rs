// src/grading/history.rs

use super::{GradingError, engine::grade_attempt, score::round2};
use crate::{
    models::submission::{AnswerReview, SubmissionHistoryEntry},
    store::Store,
};

/// Lists a user's submissions, newest first, each with its answer sheet.
///
/// Sheets are rebuilt by regrading the stored answers against the quiz's
/// current questions. A quiz that has since lost all its questions yields an
/// empty sheet instead of failing the whole listing.
pub async fn submission_history(
    store: &dyn Store,
    user_id: i64,
) -> Result<Vec<SubmissionHistoryEntry>, GradingError> {
    let records = store.list_submissions(user_id).await?;
    let mut entries = Vec::with_capacity(records.len());

    for record in records {
        let questions = store.quiz_questions(record.quiz_id).await?;
        let answer_sheet = match grade_attempt(record.quiz_id, &questions, &record.answers) {
            Ok(attempt) => AnswerReview::sheet(&questions, &attempt),
            Err(GradingError::EmptyQuestionSet(_)) => Vec::new(),
            Err(err) => return Err(err),
        };

        entries.push(SubmissionHistoryEntry {
            quiz_id: record.quiz_id,
            title: record.quiz_title,
            subject: record.subject,
            grade: round2(record.grade),
            correct_count: record.correct_count,
            total: record.question_count,
            created_at: record.created_at,
            answer_sheet,
        });
    }

    Ok(entries)
}
