use axum::{ extract::State, http::StatusCode, Json };
use serde_json::{ json, Value };

use crate::state::AppState;

pub async fn status_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let upstream = if state.spoonacular_service.has_api_key() { "configured" } else { "missing_key" };

    (
        StatusCode::OK,
        Json(
            json!({
            "status": "healthy",
            "service": "Recipe Proxy API",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "environment": if state.config.is_production() { "production" } else { "development" },
            "upstream": upstream,
            "fallback": state.config.fallback.to_string(),
        })
        ),
    )
}
