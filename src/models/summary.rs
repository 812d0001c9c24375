// src/models/summary.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'summaries' table in the database.
/// A study summary published by a teacher for one class.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Summary {
    pub id: i64,

    #[serde(rename = "titulo")]
    pub title: Option<String>,

    /// Sanitized HTML body.
    #[serde(rename = "conteudo")]
    pub content: String,

    #[serde(rename = "materia")]
    pub subject: String,

    #[serde(rename = "professor_id")]
    pub teacher_id: Option<i64>,

    #[serde(rename = "turma_id")]
    pub class_id: Option<i64>,

    #[serde(rename = "criado_em")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSummary {
    pub title: Option<String>,
    pub content: String,
    pub subject: String,
    pub teacher_id: i64,
    pub class_id: Option<i64>,
}

/// DTO for publishing a summary.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSummaryRequest {
    #[serde(rename = "titulo")]
    #[validate(length(max = 150, message = "Title must be at most 150 characters."))]
    pub title: Option<String>,

    #[serde(rename = "conteudo")]
    #[validate(length(min = 1, max = 50000, message = "Content must not be empty."))]
    pub content: String,

    #[serde(rename = "materia")]
    #[validate(length(min = 1, max = 100, message = "Subject must be between 1 and 100 characters."))]
    pub subject: String,

    #[serde(rename = "turma_id")]
    pub class_id: Option<i64>,
}

/// Query parameters for listing summaries.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryListParams {
    /// Subject filter. `Todas` means no filter.
    pub materia: Option<String>,
    /// Case-insensitive keyword matched against title and content.
    pub busca: Option<String>,
}

/// Resolved filter handed to the store.
#[derive(Debug, Clone, Default)]
pub struct SummaryFilter {
    pub class_id: i64,
    pub subject: Option<String>,
    pub search: Option<String>,
}

impl SummaryListParams {
    pub fn into_filter(self, class_id: i64) -> SummaryFilter {
        SummaryFilter {
            class_id,
            subject: self
                .materia
                .filter(|subject| !subject.is_empty() && subject != "Todas"),
            search: self
                .busca
                .map(|keyword| keyword.trim().to_string())
                .filter(|keyword| !keyword.is_empty()),
        }
    }
}
