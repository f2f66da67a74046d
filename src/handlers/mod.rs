pub mod ingredients;
pub mod recipes;
pub mod status;

use axum::{
    http::{ header, HeaderName, HeaderValue },
    response::{ IntoResponse, Response },
    Json,
};
use serde::Serialize;

use crate::models::DataSource;

pub const CACHE_DIRECTIVE: &str = "s-maxage=600, stale-while-revalidate=3600";
pub const DATA_SOURCE_HEADER: &str = "x-data-source";

/// 200 JSON response with the shared cache directive.
pub fn cached_json<T: Serialize>(source: DataSource, body: T) -> Response {
    (
        [
            (header::CACHE_CONTROL, HeaderValue::from_static(CACHE_DIRECTIVE)),
            (HeaderName::from_static(DATA_SOURCE_HEADER), HeaderValue::from_static(source.as_str())),
        ],
        Json(body),
    ).into_response()
}
