// tests/common/mod.rs

use std::sync::Arc;

use quiz_backend::{
    config::Config,
    routes,
    state::AppState,
    store::{MemoryStore, SharedStore},
    utils::hash::hash_password,
};
use serde_json::{Value, json};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse";

/// Spawns the app on a random port, backed by a fresh in-memory store.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
pub async fn spawn_app() -> String {
    spawn_app_with_store(Arc::new(MemoryStore::new())).await
}

/// Same as [`spawn_app`] over a caller-supplied store.
pub async fn spawn_app_with_store(store: SharedStore) -> String {
    let config = Config {
        database_url: None,
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        admin_username: Some(ADMIN_USERNAME.to_string()),
        admin_password_hash: Some(hash_password(ADMIN_PASSWORD).unwrap()),
        cors_origin: "http://localhost:5173".to_string(),
        port: 0,
    };

    let state = AppState { store, config };
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

pub async fn admin_token(client: &reqwest::Client, address: &str) -> String {
    let resp: Value = client
        .post(format!("{}/api/admin/login", address))
        .json(&json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    resp["token"].as_str().expect("Token not found").to_string()
}

/// Adds a question whose correct option is "A". Returns the raw response.
pub async fn add_question(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    category: &str,
    marks: i64,
) -> reqwest::Response {
    client
        .post(format!("{}/api/admin/questions", address))
        .bearer_auth(token)
        .json(&json!({
            "category": category,
            "questionText": format!("{}-mark question", marks),
            "options": [
                { "text": "A", "isCorrect": true },
                { "text": "B", "isCorrect": false }
            ],
            "marks": marks
        }))
        .send()
        .await
        .expect("Failed to add question")
}
