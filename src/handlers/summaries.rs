// src/handlers/summaries.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        summary::{CreateSummaryRequest, NewSummary, SummaryListParams},
        user::Role,
    },
    store::DynStore,
    utils::{html::clean_html, jwt::Claims},
};

/// Publishes a study summary.
/// Teachers only; the author is taken from the token.
pub async fn create_summary(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateSummaryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    if claims.role() != Some(Role::Teacher) {
        return Err(AppError::Forbidden(
            "Only teachers can publish summaries".to_string(),
        ));
    }

    let Json(payload) = payload?;
    payload.validate()?;

    let summary = store
        .create_summary(NewSummary {
            title: payload.title,
            content: clean_html(&payload.content),
            subject: payload.subject,
            teacher_id: claims.user_id()?,
            class_id: payload.class_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(summary)))
}

/// Lists the summaries of the caller's class, optionally filtered by subject
/// and keyword.
pub async fn list_summaries(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<SummaryListParams>,
) -> Result<impl IntoResponse, AppError> {
    let user = store
        .find_user(claims.user_id()?)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let class_id = user
        .class_id
        .ok_or(AppError::BadRequest("User has no class".to_string()))?;

    let summaries = store.list_summaries(&params.into_filter(class_id)).await?;

    Ok(Json(summaries))
}

/// Retrieves a single summary.
/// Students may only read summaries whose class matches theirs; a student
/// without a class can read summaries that have no class either.
pub async fn get_summary(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let summary = store
        .find_summary(id)
        .await?
        .ok_or(AppError::NotFound("Summary not found".to_string()))?;

    if claims.role() == Some(Role::Student) {
        let user = store
            .find_user(claims.user_id()?)
            .await?
            .ok_or(AppError::NotFound("User not found".to_string()))?;

        if user.class_id != summary.class_id {
            return Err(AppError::Forbidden(
                "Summary not available for your class".to_string(),
            ));
        }
    }

    Ok(Json(summary))
}
