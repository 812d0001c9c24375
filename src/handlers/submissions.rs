// src/handlers/submissions.rs

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    grading::{round2, submission_history, subject_performance, submit_answers},
    models::submission::{
        PerformanceReport, SubmissionHistory, SubmissionResult, SubmitQuizRequest,
    },
    store::DynStore,
    utils::jwt::Claims,
};

/// Submits a user's answers to a quiz and grades them.
///
/// * Rejects a second submission for the same quiz.
/// * Compares answers by position with the quiz's answer keys.
/// * Grade = correct / total * 10, rounded to two decimals.
pub async fn submit_quiz(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<SubmitQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;

    let (Some(quiz_id), Some(answers)) = (req.quiz_id, req.respostas) else {
        return Err(AppError::BadRequest(
            "quiz_id and respostas (array) are required".to_string(),
        ));
    };

    let graded = submit_answers(store.as_ref(), claims.user_id()?, quiz_id, answers).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResult {
            message: "Quiz answered successfully".to_string(),
            grade: round2(graded.submission.grade),
            correct_count: graded.submission.correct_count as usize,
            answer_sheet: graded.answer_sheet,
        }),
    ))
}

/// Lists the caller's graded submissions with their answer sheets.
pub async fn list_submissions(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let entries = submission_history(store.as_ref(), claims.user_id()?).await?;

    Ok(Json(SubmissionHistory {
        quizzes_respondidos: entries,
    }))
}

/// Per-subject performance of the caller, recomputed from all submissions.
pub async fn get_performance(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let desempenho = subject_performance(store.as_ref(), claims.user_id()?).await?;

    Ok(Json(PerformanceReport { desempenho }))
}
