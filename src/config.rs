// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Sum of question marks a category must reach before students can take it.
/// Also the hard ceiling enforced when adding questions.
pub const CATEGORY_MARKS_CAP: i64 = 100;

pub const DEFAULT_QUIZ_TIME: i32 = 30;
pub const DEFAULT_PASSING_PERCENTAGE: f64 = 40.0;
pub const DEFAULT_TOTAL_QUESTIONS: i32 = 100;

/// Process settings, read once at startup.
///
/// Quiz parameters (time limit, pass mark, question cap) are not here; they
/// live in storage as [`crate::models::quiz_config::QuizConfig`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. When absent the service runs on the
    /// in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub admin_username: Option<String>,
    /// Argon2 hash of `ADMIN_PASSWORD`, computed at startup.
    pub admin_password_hash: Option<String>,
    pub cors_origin: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let admin_username = env::var("ADMIN_USERNAME").ok();

        // Hashed later by main, once tracing is up.
        let admin_password_hash = None;

        let cors_origin = env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            admin_username,
            admin_password_hash,
            cors_origin,
            port,
        }
    }
}
