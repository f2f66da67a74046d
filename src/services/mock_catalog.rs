use std::{ collections::BTreeMap, sync::LazyLock };

use crate::{
    models::{ RecipeDetail, SearchResultItem },
    normalize,
    services::spoonacular_service::RecipeInformation,
};

const MOCK_RECIPES_JSON: &str = include_str!("mock_recipes.json");

/// Upstream-shaped mock records; both client shapes are derived from these
/// through the same normalizer live data goes through.
static MOCK_RECIPES: LazyLock<Vec<RecipeInformation>> = LazyLock::new(|| {
    serde_json::from_str(MOCK_RECIPES_JSON).expect("Invalid embedded mock recipe catalog")
});

pub static MOCK_DETAILS: LazyLock<BTreeMap<i64, RecipeDetail>> = LazyLock::new(|| {
    MOCK_RECIPES.iter()
        .cloned()
        .map(normalize::recipe_detail)
        .map(|detail| (detail.id, detail))
        .collect()
});

pub static MOCK_RESULTS: LazyLock<Vec<SearchResultItem>> = LazyLock::new(|| {
    MOCK_RECIPES.iter().cloned().map(normalize::search_result).collect()
});

pub fn search_results() -> Vec<SearchResultItem> {
    MOCK_RESULTS.clone()
}

/// Mock entry for a raw `id` parameter; non-numeric ids never match.
pub fn detail(id: &str) -> Option<RecipeDetail> {
    let id: i64 = id.trim().parse().ok()?;
    MOCK_DETAILS.get(&id).cloned()
}
