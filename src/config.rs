// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Minimum number of questions a quiz must carry to be published.
pub const MIN_QUIZ_QUESTIONS: usize = 5;

/// Bounds on the number of alternatives per question.
pub const MIN_ALTERNATIVES: usize = 2;
pub const MAX_ALTERNATIVES: usize = 5;

/// Subject used when a quiz or summary is created without one.
pub const DEFAULT_SUBJECT: &str = "Geral";

/// Default token lifetime: 3 days.
const DEFAULT_JWT_EXPIRATION: u64 = 3 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` only when `MEMORY_STORE=true` opted
    /// into the throwaway in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url = resolve_database_url(
            env::var("DATABASE_URL").ok(),
            env::var("MEMORY_STORE").ok().as_deref(),
        )?;

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;

        let jwt_expiration = match env::var("JWT_EXPIRATION") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|e| format!("JWT_EXPIRATION must be a number of seconds: {}", e))?,
            Err(_) => DEFAULT_JWT_EXPIRATION,
        };

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| format!("PORT must be a valid port number: {}", e))?,
            Err(_) => 3001,
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8081".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            port,
            cors_origins,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        })
    }
}

/// `DATABASE_URL` is required unless `MEMORY_STORE` is explicitly `true`.
fn resolve_database_url(
    database_url: Option<String>,
    memory_store: Option<&str>,
) -> Result<Option<String>, String> {
    match database_url.filter(|url| !url.is_empty()) {
        Some(url) => Ok(Some(url)),
        None if memory_store.is_some_and(|flag| flag.eq_ignore_ascii_case("true")) => Ok(None),
        None => Err(
            "DATABASE_URL must be set (MEMORY_STORE=true runs on a non-persistent store)"
                .to_string(),
        ),
    }
}
