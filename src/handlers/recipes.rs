use axum::{ extract::{ Query, State }, response::Response };
use serde::Deserialize;

use crate::{
    error::AppError,
    fallback::Resolution,
    handlers::{ cached_json, ingredients },
    models::{ DataSource, SearchResponse },
    normalize,
    services::{ mock_catalog, spoonacular_service::RecipeSearch },
    state::AppState,
    utils::{ clip, clip_opt },
};

pub const MAX_QUERY_CHARS: usize = 300;
pub const MAX_FILTER_CHARS: usize = 120;
pub const MAX_ID_CHARS: usize = 64;

#[derive(Debug, Default, Deserialize)]
pub struct RecipesQuery {
    pub mode: Option<String>,
    pub q: Option<String>,
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    pub intolerances: Option<String>,
    pub query: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    pub id: Option<String>,
}

/// `GET /recipes`: recipe search, or an ingredient lookup selected by `mode`.
pub async fn recipes(
    State(state): State<AppState>,
    Query(params): Query<RecipesQuery>
) -> Result<Response, AppError> {
    let mode = params.mode.as_deref().map(str::trim).unwrap_or_default().to_lowercase();

    match mode.as_str() {
        "" | "search" => search_recipes(&state, &params).await,
        "autocomplete" => ingredients::autocomplete(&state, params.query.as_deref()).await,
        "info" => ingredients::ingredient_info(&state, params.name.as_deref()).await,
        "subs" | "substitutes" => ingredients::substitutes(&state, params.name.as_deref()).await,
        other => Err(AppError::Validation(format!("Unknown mode: {}", other))),
    }
}

async fn search_recipes(state: &AppState, params: &RecipesQuery) -> Result<Response, AppError> {
    let search = RecipeSearch {
        query: clip(params.q.as_deref(), MAX_QUERY_CHARS),
        cuisine: clip_opt(params.cuisine.as_deref(), MAX_FILTER_CHARS),
        diet: clip_opt(params.diet.as_deref(), MAX_FILTER_CHARS),
        intolerances: clip_opt(params.intolerances.as_deref(), MAX_FILTER_CHARS),
    };

    if search.query.is_empty() && search.cuisine.is_none() {
        return Err(AppError::Validation("Missing q or cuisine parameter".to_string()));
    }

    tracing::info!("Searching recipes: q={:?} cuisine={:?}", search.query, search.cuisine);

    match state.spoonacular_service.search_recipes(&search).await {
        Ok(items) => {
            let results: Vec<_> = items.into_iter().map(normalize::search_result).collect();
            tracing::info!("Returning {} recipes", results.len());
            Ok(cached_json(DataSource::Live, SearchResponse { results }))
        }
        Err(e) =>
            match state.config.fallback.resolve(e, true) {
                Resolution::ServeMock =>
                    Ok(
                        cached_json(DataSource::Mock, SearchResponse {
                            results: mock_catalog::search_results(),
                        })
                    ),
                Resolution::Fail(err) => Err(err),
            }
    }
}

/// `GET /recipe?id=`: single recipe detail.
pub async fn get_recipe(
    State(state): State<AppState>,
    Query(params): Query<RecipeQuery>
) -> Result<Response, AppError> {
    let id = params.id.as_deref().map(str::trim).unwrap_or_default().to_string();

    if id.is_empty() {
        return Err(AppError::Validation("Missing id parameter".to_string()));
    }
    if id.chars().count() > MAX_ID_CHARS {
        return Err(AppError::Validation(format!("id must be at most {} characters", MAX_ID_CHARS)));
    }

    tracing::info!("Fetching recipe detail: {}", id);

    match state.spoonacular_service.get_recipe_information(&id).await {
        Ok(info) => Ok(cached_json(DataSource::Live, normalize::recipe_detail(info))),
        Err(e) =>
            match state.config.fallback.resolve(e, true) {
                Resolution::ServeMock =>
                    mock_catalog
                        ::detail(&id)
                        .map(|detail| cached_json(DataSource::Mock, detail))
                        .ok_or_else(|| AppError::NotFound(format!("Recipe {} not found", id))),
                Resolution::Fail(err) => Err(err),
            }
    }
}
