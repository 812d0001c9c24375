// src/models/submission.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

use crate::grading::{GradedAttempt, SubjectPerformance};

use super::quiz::Question;

/// Represents the 'submissions' table in the database.
/// One graded attempt of one user at one quiz; never updated after insert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: i64,
    #[serde(rename = "usuario_id")]
    pub user_id: i64,
    pub quiz_id: i64,
    /// Raw answers as submitted, by question position.
    #[serde(rename = "respostas")]
    pub answers: Json<Vec<Option<String>>>,
    #[serde(rename = "acertos")]
    pub correct_count: i32,
    #[serde(rename = "nota")]
    pub grade: f64,
    #[serde(rename = "criado_em")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user_id: i64,
    pub quiz_id: i64,
    pub answers: Vec<Option<String>>,
    pub correct_count: i32,
    pub grade: f64,
}

/// Submission joined with its quiz, as read back for history and reporting.
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionRecord {
    pub id: i64,
    pub quiz_id: i64,
    pub quiz_title: String,
    pub subject: String,
    pub answers: Json<Vec<Option<String>>>,
    pub correct_count: i32,
    pub grade: f64,
    /// Number of questions the quiz holds at read time.
    pub question_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting quiz answers.
/// Both fields are optional so that missing ones surface as 400 instead of a rejection.
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub quiz_id: Option<i64>,
    /// One letter per question, in question order. `null` leaves a question unanswered.
    pub respostas: Option<Vec<Option<String>>>,
}

/// One line of the answer sheet returned after grading.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnswerReview {
    #[serde(rename = "pergunta")]
    pub prompt: String,
    #[serde(rename = "alternativas")]
    pub alternatives: Vec<String>,
    /// Text of the correct alternative.
    #[serde(rename = "correta")]
    pub correct: String,
    /// Text of the chosen alternative, `None` when unanswered or out of range.
    #[serde(rename = "resposta_usuario")]
    pub selected: Option<String>,
    #[serde(rename = "acertou")]
    pub is_correct: bool,
}

impl AnswerReview {
    /// Builds the answer sheet for a graded attempt. `questions` must be the
    /// slice the attempt was graded against.
    pub fn sheet(questions: &[Question], attempt: &GradedAttempt) -> Vec<AnswerReview> {
        questions
            .iter()
            .zip(&attempt.outcomes)
            .map(|(question, outcome)| {
                let alternatives = question.alternatives.0.clone();
                AnswerReview {
                    prompt: question.prompt.clone(),
                    correct: alternatives[outcome.correct_index].clone(),
                    selected: outcome
                        .selected_index
                        .and_then(|index| alternatives.get(index).cloned()),
                    is_correct: outcome.is_correct,
                    alternatives,
                }
            })
            .collect()
    }
}

/// Response body of a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmissionResult {
    #[serde(rename = "mensagem")]
    pub message: String,
    #[serde(rename = "nota")]
    pub grade: f64,
    #[serde(rename = "acertos")]
    pub correct_count: usize,
    #[serde(rename = "gabarito")]
    pub answer_sheet: Vec<AnswerReview>,
}

/// One entry of the caller's submission history.
#[derive(Debug, Serialize)]
pub struct SubmissionHistoryEntry {
    pub quiz_id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "materia")]
    pub subject: String,
    #[serde(rename = "nota")]
    pub grade: f64,
    #[serde(rename = "acertos")]
    pub correct_count: i32,
    pub total: i64,
    #[serde(rename = "criado_em")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "gabarito")]
    pub answer_sheet: Vec<AnswerReview>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionHistory {
    pub quizzes_respondidos: Vec<SubmissionHistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct PerformanceReport {
    pub desempenho: Vec<SubjectPerformance>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::grade_attempt;

    #[test]
    fn sheet_reports_alternative_texts() {
        let questions = vec![Question {
            id: 1,
            quiz_id: 1,
            prompt: "Capital do Brasil?".to_string(),
            alternatives: Json(vec![
                "São Paulo".to_string(),
                "Brasília".to_string(),
                "Rio".to_string(),
            ]),
            answer_key: "B".to_string(),
            created_at: chrono::Utc::now(),
        }];

        let attempt = grade_attempt(1, &questions, &[Some("a".to_string())]).unwrap();
        let sheet = AnswerReview::sheet(&questions, &attempt);

        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet[0].correct, "Brasília");
        assert_eq!(sheet[0].selected.as_deref(), Some("São Paulo"));
        assert!(!sheet[0].is_correct);

        let attempt = grade_attempt(1, &questions, &[Some("Z".to_string())]).unwrap();
        let sheet = AnswerReview::sheet(&questions, &attempt);
        assert_eq!(sheet[0].selected, None);
    }
}
