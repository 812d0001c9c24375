// src/handlers/quizzes.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    config::DEFAULT_SUBJECT,
    error::AppError,
    grading::answer_key::resolve_answer_key,
    models::quiz::{CreateQuizRequest, NewQuestion, NewQuiz, QuizDetail, QuizListParams},
    store::DynStore,
    utils::jwt::Claims,
};

/// Creates a quiz together with its questions.
///
/// Teachers and admins only. Every answer key must point at one of its
/// question's alternatives, so broken keys are caught before anyone answers.
pub async fn create_quiz(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    payload
        .validate_question_count()
        .map_err(AppError::BadRequest)?;

    let mut questions = Vec::with_capacity(payload.questions.len());
    for (position, question) in payload.questions.into_iter().enumerate() {
        resolve_answer_key(position as i64 + 1, &question.alternatives, &question.answer_key)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        questions.push(NewQuestion {
            prompt: question.prompt,
            alternatives: question.alternatives,
            answer_key: question.answer_key.trim().to_uppercase(),
        });
    }

    let subject = payload
        .subject
        .map(|subject| subject.trim().to_string())
        .filter(|subject| !subject.is_empty())
        .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

    let quiz = store
        .create_quiz(NewQuiz {
            title: payload.title,
            subject,
            teacher_id: Some(claims.user_id()?),
            class_id: payload.class_id,
            questions,
        })
        .await?;

    tracing::info!(quiz_id = quiz.id, subject = %quiz.subject, "quiz created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "mensagem": "Quiz created successfully",
            "quiz_id": quiz.id
        })),
    ))
}

/// Lists quizzes with their question counts, optionally for one subject.
pub async fn list_quizzes(
    State(store): State<DynStore>,
    Query(params): Query<QuizListParams>,
) -> Result<impl IntoResponse, AppError> {
    let subject = params
        .materia
        .as_deref()
        .filter(|subject| !subject.is_empty() && *subject != "Todas");

    let quizzes = store.list_quizzes(subject).await?;
    Ok(Json(quizzes))
}

/// Retrieves a quiz ready to be answered (answer keys hidden).
pub async fn get_quiz(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store
        .find_quiz(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let questions = store
        .quiz_questions(id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(QuizDetail { quiz, questions }))
}
