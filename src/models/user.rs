// src/models/user.rs

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

static CPF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{3}\.\d{3}\.\d{3}-\d{2}|\d{11})$").expect("CPF pattern is valid")
});

/// Account role. Serialized with the wire names the mobile client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "aluno")]
    Student,
    #[serde(rename = "professor")]
    Teacher,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "aluno",
            Role::Teacher => "professor",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "aluno" => Some(Role::Student),
            "professor" => Some(Role::Teacher),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,

    #[serde(rename = "nome")]
    pub name: String,

    /// Unique login email.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password_hash: String,

    #[serde(rename = "tipo")]
    pub role: Role,

    pub cpf: Option<String>,

    #[serde(rename = "aniversario")]
    pub birthday: Option<chrono::NaiveDate>,

    /// Class the user belongs to. Students only see summaries of their own class.
    #[serde(rename = "turma_id")]
    pub class_id: Option<i64>,

    #[serde(rename = "criado_em")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Insert payload handed to the store once the password has been hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub cpf: Option<String>,
    pub birthday: Option<chrono::NaiveDate>,
    pub class_id: Option<i64>,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(rename = "nome")]
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name length must be between 1 and 255 characters."
    ))]
    pub name: String,

    #[validate(email(message = "Email address is not valid."))]
    pub email: String,

    #[serde(rename = "senha")]
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password length must be between 6 and 128 characters."
    ))]
    pub password: String,

    /// Raw role string; only `aluno` and `professor` may self-register.
    #[serde(rename = "tipo")]
    pub role: String,

    #[validate(custom(function = validate_cpf))]
    pub cpf: Option<String>,

    #[serde(rename = "aniversario")]
    pub birthday: Option<chrono::NaiveDate>,

    #[serde(rename = "turma_id")]
    pub class_id: Option<i64>,
}

fn validate_cpf(cpf: &str) -> Result<(), validator::ValidationError> {
    if !CPF_PATTERN.is_match(cpf) {
        return Err(validator::ValidationError::new("invalid_cpf"));
    }
    Ok(())
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255))]
    pub email: String,
    #[serde(rename = "senha")]
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}
