use axum::response::Response;

use crate::{
    error::AppError,
    handlers::cached_json,
    models::{ DataSource, IngredientSuggestion },
    normalize,
    state::AppState,
    utils::clip,
};

pub const MAX_NAME_CHARS: usize = 120;

pub async fn autocomplete(state: &AppState, query: Option<&str>) -> Result<Response, AppError> {
    let query = clip(query, MAX_NAME_CHARS);

    if query.is_empty() {
        return Ok(cached_json(DataSource::Live, Vec::<IngredientSuggestion>::new()));
    }

    let items = state.spoonacular_service
        .autocomplete_ingredients(&query).await
        .map_err(|e| state.config.fallback.surface(e))?;

    let suggestions: Vec<_> = items.into_iter().map(normalize::ingredient_suggestion).collect();

    Ok(cached_json(DataSource::Live, suggestions))
}

/// Search by name, then fetch the first match's info for 100 g.
pub async fn ingredient_info(state: &AppState, name: Option<&str>) -> Result<Response, AppError> {
    let name = clip(name, MAX_NAME_CHARS);

    if name.is_empty() {
        return Err(AppError::Validation("Missing name parameter".to_string()));
    }

    tracing::info!("Looking up ingredient: {}", name);

    let hit = state.spoonacular_service
        .search_ingredient(&name).await
        .map_err(|e| state.config.fallback.surface(e))?;

    let id = hit
        .and_then(|h| h.id)
        .ok_or_else(|| AppError::NotFound(format!("No ingredient found for '{}'", name)))?;

    let info = state.spoonacular_service
        .get_ingredient_information(id).await
        .map_err(|e| state.config.fallback.surface(e))?;

    Ok(
        cached_json(
            DataSource::Live,
            normalize::ingredient_info(info, &state.config.spoonacular.image_cdn)
        )
    )
}

pub async fn substitutes(state: &AppState, name: Option<&str>) -> Result<Response, AppError> {
    let name = clip(name, MAX_NAME_CHARS);

    if name.is_empty() {
        return Err(AppError::Validation("Missing name parameter".to_string()));
    }

    let response = state.spoonacular_service
        .get_substitutes(&name).await
        .map_err(|e| state.config.fallback.surface(e))?;

    Ok(cached_json(DataSource::Live, normalize::substitutes(response)))
}
