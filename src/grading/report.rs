// src/grading/report.rs

use std::collections::BTreeMap;

use serde::Serialize;

use super::{
    GradingError,
    score::{format_grade, format_percentage},
};
use crate::{config::DEFAULT_SUBJECT, models::submission::SubmissionRecord, store::Store};

/// Per-subject rollup of a user's submissions. Derived on every request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubjectPerformance {
    #[serde(rename = "materia")]
    pub subject: String,
    #[serde(rename = "quizzes_respondidos")]
    pub submissions: i64,
    #[serde(skip)]
    pub total_correct: i64,
    #[serde(skip)]
    pub total_questions: i64,
    /// Mean grade, two decimals.
    #[serde(rename = "media_nota")]
    pub average_grade: String,
    /// Share of correct answers, two decimals with a `%` suffix.
    #[serde(rename = "percentual_acerto")]
    pub percentage_correct: String,
}

#[derive(Default)]
struct Tally {
    submissions: i64,
    correct: i64,
    questions: i64,
    grade_sum: f64,
}

/// Groups submissions by quiz subject, sorted by subject name.
/// Subjects without submissions never appear.
pub fn aggregate_by_subject(records: &[SubmissionRecord]) -> Vec<SubjectPerformance> {
    let mut by_subject: BTreeMap<&str, Tally> = BTreeMap::new();

    for record in records {
        let subject = match record.subject.trim() {
            "" => DEFAULT_SUBJECT,
            subject => subject,
        };
        let tally = by_subject.entry(subject).or_default();
        tally.submissions += 1;
        tally.correct += i64::from(record.correct_count);
        tally.questions += record.question_count;
        tally.grade_sum += record.grade;
    }

    by_subject
        .into_iter()
        .map(|(subject, tally)| SubjectPerformance {
            subject: subject.to_string(),
            submissions: tally.submissions,
            total_correct: tally.correct,
            total_questions: tally.questions,
            average_grade: format_grade(tally.grade_sum / tally.submissions as f64),
            percentage_correct: format_percentage(tally.correct, tally.questions),
        })
        .collect()
}

/// Recomputes a user's per-subject performance from their full history.
pub async fn subject_performance(
    store: &dyn Store,
    user_id: i64,
) -> Result<Vec<SubjectPerformance>, GradingError> {
    let records = store.list_submissions(user_id).await?;
    Ok(aggregate_by_subject(&records))
}
