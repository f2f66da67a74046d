use serde::{ Deserialize, Serialize };

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub image: String,
    pub source: String,
    pub cuisine: String,
    /// Reserved; the upstream has no reliable country field.
    pub country: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub url: String,
    pub source_name: String,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub cuisines: Vec<String>,
    pub diets: Vec<String>,
    pub summary: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientSuggestion {
    pub id: i64,
    pub name: String,
    pub aisle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientInfo {
    pub id: i64,
    pub name: String,
    pub aisle: String,
    pub calories: Option<f64>,
    pub image: String,
    pub possible_units: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientSubstitutes {
    pub substitutes: Vec<String>,
    pub message: String,
}

/// Where a successful payload came from; sent as `X-Data-Source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    Mock,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Live => "live",
            DataSource::Mock => "mock",
        }
    }
}
