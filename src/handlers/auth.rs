// src/handlers/auth.rs

use axum::{extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    extract::Json,
    utils::{
        hash::verify_password,
        jwt::{ADMIN_ROLE, sign_jwt},
    },
};

/// DTO for admin login.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,
}

/// Authenticates the administrator and returns a JWT token.
///
/// Credentials come from `ADMIN_USERNAME` / `ADMIN_PASSWORD`. When they are
/// not configured every attempt is refused.
pub async fn login(
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (Some(username), Some(password_hash)) =
        (&config.admin_username, &config.admin_password_hash)
    else {
        tracing::warn!("Admin login attempted but no admin credentials are configured");
        return Err(AppError::AuthError("Admin login is not configured".to_string()));
    };

    let username_ok = payload.username == *username;
    // Always verified: response time must not reveal whether the username matched.
    let password_ok = verify_password(&payload.password, password_hash)?;

    if !(username_ok && password_ok) {
        tracing::warn!("Failed admin login for '{}'", payload.username);
        return Err(AppError::AuthError("Invalid credentials".to_string()));
    }

    let token = sign_jwt(username, ADMIN_ROLE, &config.jwt_secret, config.jwt_expiration)?;
    tracing::info!("Admin '{}' logged in", username);

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "token": token,
        "tokenType": "Bearer",
        "expiresIn": config.jwt_expiration,
        "user": {
            "username": username,
            "role": ADMIN_ROLE,
        }
    })))
}
