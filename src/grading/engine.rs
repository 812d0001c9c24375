// src/grading/engine.rs

use super::{
    GradingError,
    answer_key::{resolve_answer_key, resolve_submitted},
};
use crate::models::quiz::Question;

/// Result of grading one question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionOutcome {
    pub question_id: i64,
    /// Index of the correct alternative.
    pub correct_index: usize,
    /// Index the user picked, if the answer resolved to a letter.
    pub selected_index: Option<usize>,
    pub is_correct: bool,
}

/// Per-question outcomes plus the tally, in question order.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedAttempt {
    pub outcomes: Vec<QuestionOutcome>,
    pub correct_count: usize,
}

impl GradedAttempt {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Grades `answers` positionally against `questions`.
///
/// Questions past the end of `answers` count as unanswered; extra answers are
/// ignored. Every answer key is resolved before anything is compared, so a
/// single broken key fails the whole attempt.
pub fn grade_attempt(
    quiz_id: i64,
    questions: &[Question],
    answers: &[Option<String>],
) -> Result<GradedAttempt, GradingError> {
    if questions.is_empty() {
        return Err(GradingError::EmptyQuestionSet(quiz_id));
    }

    let mut outcomes = Vec::with_capacity(questions.len());
    let mut correct_count = 0;

    for (position, question) in questions.iter().enumerate() {
        let correct_index =
            resolve_answer_key(question.id, &question.alternatives, &question.answer_key)?;
        let selected_index = resolve_submitted(answers.get(position).and_then(|a| a.as_deref()));

        let is_correct = selected_index == Some(correct_index);
        if is_correct {
            correct_count += 1;
        }

        outcomes.push(QuestionOutcome {
            question_id: question.id,
            correct_index,
            selected_index,
            is_correct,
        });
    }

    Ok(GradedAttempt {
        outcomes,
        correct_count,
    })
}
