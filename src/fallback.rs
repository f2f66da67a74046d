use axum::http::StatusCode;
use std::{ fmt, str::FromStr };

use crate::{ error::AppError, services::spoonacular_service::SpoonacularError, utils::preview };

/// What a handler does when the upstream cannot answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Serve mock data whenever a mock exists for the request.
    PreferMock,
    /// Never serve mocks; surface config and upstream errors.
    Strict,
}

#[derive(Debug)]
pub enum Resolution {
    ServeMock,
    Fail(AppError),
}

impl FallbackPolicy {
    /// Terminal decision for a failed upstream call. `mock_available` is false for
    /// handlers that have no mock data at all.
    pub fn resolve(self, err: SpoonacularError, mock_available: bool) -> Resolution {
        if self == FallbackPolicy::PreferMock && mock_available && err.is_recoverable() {
            tracing::warn!("Serving mock data: {}", err);
            return Resolution::ServeMock;
        }

        Resolution::Fail(self.surface(err))
    }

    /// Maps an upstream failure to the error the client sees.
    pub fn surface(self, err: SpoonacularError) -> AppError {
        match err {
            SpoonacularError::MissingApiKey =>
                AppError::Config("Missing SPOONACULAR_KEY env var".to_string()),
            SpoonacularError::Timeout =>
                upstream(StatusCode::BAD_GATEWAY, "Upstream API timed out", None, None),
            SpoonacularError::Network(_) =>
                upstream(StatusCode::BAD_GATEWAY, "Upstream API unreachable", None, None),
            SpoonacularError::Decode(msg) =>
                AppError::InternalError(anyhow::anyhow!("Failed to parse Spoonacular response: {}", msg)),
            SpoonacularError::Status { status, body } => {
                let passthrough = match self {
                    FallbackPolicy::PreferMock => status >= 400,
                    FallbackPolicy::Strict => status == 402 || status == 429,
                };
                let code = if passthrough {
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
                } else {
                    StatusCode::BAD_GATEWAY
                };
                let detail = Some(preview(&body)).filter(|d| !d.is_empty());

                upstream(code, "Upstream API error", Some(status), detail)
            }
        }
    }
}

fn upstream(
    status: StatusCode,
    message: &str,
    upstream_status: Option<u16>,
    detail: Option<String>
) -> AppError {
    AppError::Upstream {
        status,
        message: message.to_string(),
        upstream_status,
        detail,
    }
}

impl FromStr for FallbackPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prefer_mock" | "mock" => Ok(FallbackPolicy::PreferMock),
            "strict" => Ok(FallbackPolicy::Strict),
            other => anyhow::bail!("Unknown RECIPE_FALLBACK policy: {}", other),
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackPolicy::PreferMock => f.write_str("prefer_mock"),
            FallbackPolicy::Strict => f.write_str("strict"),
        }
    }
}
