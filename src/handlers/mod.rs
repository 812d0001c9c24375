// src/handlers/mod.rs

pub mod auth;
pub mod quizzes;
pub mod submissions;
pub mod summaries;
pub mod users;
