use axum::{ http::StatusCode, response::IntoResponse, Json };
use serde_json::{ json, Map, Value };
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")] Validation(String),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Upstream error ({status}): {message}")] Upstream {
        status: StatusCode,
        message: String,
        upstream_status: Option<u16>,
        detail: Option<String>,
    },

    #[error("Not found: {0}")] NotFound(String),

    #[error("Internal server error")] InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream { status, .. } => *status,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let mut body = Map::new();

        match self {
            AppError::Validation(msg) | AppError::Config(msg) | AppError::NotFound(msg) => {
                body.insert("error".into(), json!(msg));
            }
            AppError::Upstream { message, upstream_status, detail, .. } => {
                body.insert("error".into(), json!(message));
                if let Some(code) = upstream_status {
                    body.insert("spoonacularStatus".into(), json!(code));
                }
                if let Some(detail) = detail {
                    body.insert("detail".into(), json!(detail));
                }
            }
            AppError::InternalError(e) => {
                tracing::error!("Handler error: {:#}", e);
                body.insert("error".into(), json!("Server error"));
            }
        }

        (status, Json(Value::Object(body))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn upstream_error_carries_diagnostics() {
        let (status, body) = body_json(AppError::Upstream {
            status: StatusCode::PAYMENT_REQUIRED,
            message: "Upstream API error".into(),
            upstream_status: Some(402),
            detail: Some("quota".into()),
        }).await;

        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body["error"], "Upstream API error");
        assert_eq!(body["spoonacularStatus"], 402);
        assert_eq!(body["detail"], "quota");
    }

    #[tokio::test]
    async fn internal_error_hides_cause() {
        let (status, body) = body_json(anyhow::anyhow!("secret stack").into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Server error" }));
    }

    #[tokio::test]
    async fn validation_error_is_bad_request() {
        let (status, body) = body_json(AppError::Validation("Missing id parameter".into())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing id parameter" }));
    }
}
