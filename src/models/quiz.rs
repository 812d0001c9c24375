// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use validator::Validate;

use crate::config::{MAX_ALTERNATIVES, MIN_ALTERNATIVES, MIN_QUIZ_QUESTIONS};

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quiz {
    pub id: i64,

    #[serde(rename = "titulo")]
    pub title: String,

    #[serde(rename = "materia")]
    pub subject: String,

    #[serde(rename = "professor_id")]
    pub teacher_id: Option<i64>,

    #[serde(rename = "turma_id")]
    pub class_id: Option<i64>,

    #[serde(rename = "criado_em")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,

    #[serde(rename = "pergunta")]
    pub prompt: String,

    /// Ordered alternatives, stored as a JSON array.
    #[serde(rename = "alternativas")]
    pub alternatives: Json<Vec<String>>,

    /// Letter of the correct alternative ('A' is the first one).
    #[serde(rename = "correta")]
    pub answer_key: String,

    #[serde(rename = "criado_em")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Quiz row with its question count, used for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizOverview {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "materia")]
    pub subject: String,
    #[serde(rename = "turma_id")]
    pub class_id: Option<i64>,
    #[serde(rename = "total_perguntas")]
    pub question_count: i64,
    #[serde(rename = "criado_em")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for sending a question to a student (excludes the answer key).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    #[serde(rename = "pergunta")]
    pub prompt: String,
    #[serde(rename = "alternativas")]
    pub alternatives: Vec<String>,
}

impl From<Question> for PublicQuestion {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            prompt: question.prompt,
            alternatives: question.alternatives.0,
        }
    }
}

/// A quiz ready to be answered.
#[derive(Debug, Serialize)]
pub struct QuizDetail {
    #[serde(flatten)]
    pub quiz: Quiz,
    #[serde(rename = "perguntas")]
    pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub prompt: String,
    pub alternatives: Vec<String>,
    pub answer_key: String,
}

#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub title: String,
    pub subject: String,
    pub teacher_id: Option<i64>,
    pub class_id: Option<i64>,
    pub questions: Vec<NewQuestion>,
}

/// DTO for one question inside a quiz creation request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[serde(rename = "pergunta")]
    #[validate(length(min = 1, max = 2000))]
    pub prompt: String,

    #[serde(rename = "alternativas")]
    #[validate(custom(function = validate_alternatives))]
    pub alternatives: Vec<String>,

    #[serde(rename = "correta")]
    #[validate(length(min = 1, max = 10))]
    pub answer_key: String,
}

/// DTO for creating a quiz together with its questions.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[serde(rename = "titulo")]
    #[validate(length(min = 1, max = 150))]
    pub title: String,

    #[serde(rename = "materia")]
    #[validate(length(max = 100))]
    pub subject: Option<String>,

    #[serde(rename = "turma_id")]
    pub class_id: Option<i64>,

    /// Must hold at least `MIN_QUIZ_QUESTIONS` entries; checked by `validate_question_count`.
    #[serde(rename = "perguntas", default)]
    #[validate(nested)]
    pub questions: Vec<CreateQuestionRequest>,
}

impl CreateQuizRequest {
    pub fn validate_question_count(&self) -> Result<(), String> {
        if self.questions.len() < MIN_QUIZ_QUESTIONS {
            return Err(format!(
                "A quiz must contain at least {} questions.",
                MIN_QUIZ_QUESTIONS
            ));
        }
        Ok(())
    }
}

/// Query parameters for listing quizzes.
#[derive(Debug, Default, Deserialize)]
pub struct QuizListParams {
    pub materia: Option<String>,
}

fn validate_alternatives(alternatives: &[String]) -> Result<(), validator::ValidationError> {
    if alternatives.len() < MIN_ALTERNATIVES || alternatives.len() > MAX_ALTERNATIVES {
        return Err(validator::ValidationError::new("alternatives_count_out_of_range"));
    }
    for alternative in alternatives {
        if alternative.trim().is_empty() {
            return Err(validator::ValidationError::new("alternative_cannot_be_empty"));
        }
        if alternative.len() > 500 {
            return Err(validator::ValidationError::new("alternative_too_long"));
        }
    }
    Ok(())
}
