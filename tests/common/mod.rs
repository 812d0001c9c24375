// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use memora_backend::{config::Config, routes, state::AppState, store::MemoryStore};
use serde_json::{Value, json};

pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

/// Spawns the app on a random port, backed by a fresh in-memory store.
pub async fn spawn_app() -> TestApp {
    let config = Config {
        database_url: None,
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8081".to_string()],
        admin_email: None,
        admin_password: None,
    };

    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        store: store.clone(),
        config,
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        store,
        client: reqwest::Client::new(),
    }
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}@memora.test", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, role: &str, class_id: Option<i64>) -> (String, String) {
        let email = unique_email(role);
        let password = "password123".to_string();

        let response = self
            .client
            .post(self.url("/users"))
            .json(&json!({
                "nome": "Test User",
                "email": email,
                "senha": password,
                "tipo": role,
                "turma_id": class_id
            }))
            .send()
            .await
            .expect("Register failed");
        assert_eq!(response.status().as_u16(), 201);

        (email, password)
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let body: Value = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "senha": password }))
            .send()
            .await
            .expect("Login failed")
            .json()
            .await
            .expect("Failed to parse login json");

        body["token"].as_str().expect("Token not found").to_string()
    }

    /// Registers and logs in a fresh user, returning the bearer token.
    pub async fn token_for(&self, role: &str, class_id: Option<i64>) -> String {
        let (email, password) = self.register(role, class_id).await;
        self.login(&email, &password).await
    }

    pub async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
