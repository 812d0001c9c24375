// src/handlers/auth.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{CreateUserRequest, LoginRequest, NewUser, Role},
    store::{DynStore, StoreError},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Registers a new user.
///
/// Only students and teachers can sign themselves up; admins are seeded.
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(store): State<DynStore>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let role = match Role::parse(&payload.role) {
        Some(role @ (Role::Student | Role::Teacher)) => role,
        _ => {
            return Err(AppError::BadRequest(
                "Invalid tipo: use \"aluno\" or \"professor\"".to_string(),
            ));
        }
    };

    let email = payload.email.trim().to_lowercase();
    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;

    let user = store
        .create_user(NewUser {
            name: payload.name,
            email,
            password_hash,
            role,
            cpf: payload.cpf,
            birthday: payload.birthday,
            class_id: payload.class_id,
        })
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration of the same email.
            StoreError::Duplicate(_) => AppError::Conflict("Email already registered".to_string()),
            other => {
                tracing::error!("Failed to register user: {}", other);
                AppError::from(other)
            }
        })?;

    tracing::info!(user_id = user.id, role = %user.role, "user registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns a JWT token.
///
/// Unknown emails are a 404 and wrong passwords a 401.
pub async fn login(
    State(store): State<DynStore>,
    State(config): State<Config>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();
    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::AuthError("Invalid password".to_string()));
    }

    let token = sign_jwt(user.id, user.role, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "usuario": user
    })))
}
