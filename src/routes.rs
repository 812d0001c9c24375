// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, quizzes, submissions, summaries, users},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware, teacher_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, users, summaries, quizzes, submissions).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store handle and configuration).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_layer = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new().route("/login", post(auth::login));

    let user_routes = Router::new()
        .route("/", post(auth::register))
        .merge(
            Router::new()
                .route("/me", get(users::get_me))
                .layer(auth_layer.clone()),
        )
        .merge(
            Router::new()
                .route("/", get(users::list_users))
                // Auth first, then the admin check
                .layer(
                    ServiceBuilder::new()
                        .layer(auth_layer.clone())
                        .layer(middleware::from_fn(admin_middleware)),
                ),
        );

    let summary_routes = Router::new()
        .route(
            "/",
            get(summaries::list_summaries).post(summaries::create_summary),
        )
        .route("/{id}", get(summaries::get_summary))
        .layer(auth_layer.clone());

    let quiz_routes = Router::new()
        .route("/", get(quizzes::list_quizzes))
        .route("/{id}", get(quizzes::get_quiz))
        .merge(
            Router::new()
                .route("/", post(quizzes::create_quiz))
                .layer(middleware::from_fn(teacher_middleware)),
        )
        .layer(auth_layer.clone());

    let submission_routes = Router::new()
        .route(
            "/",
            post(submissions::submit_quiz).get(submissions::list_submissions),
        )
        .route("/performance", get(submissions::get_performance))
        .layer(auth_layer);

    Router::new()
        .route("/", get(|| async { "Memora API up" }))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/summaries", summary_routes)
        .nest("/quizzes", quiz_routes)
        .nest("/quiz-submissions", submission_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
