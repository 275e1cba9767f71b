// src/extract.rs

use axum::{
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection},
    },
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

/// `axum::Json` whose rejection is an `AppError`, so malformed bodies get
/// the usual `{ success: false, message }` envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// `axum::extract::Path` with an `AppError` rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        name: String,
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"other":1}"#))
            .unwrap();

        let err = Json::<Payload>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("name")));
    }

    #[tokio::test]
    async fn missing_content_type_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .body(Body::from(r#"{"name":"x"}"#))
            .unwrap();

        let err = Json::<Payload>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
