use reqwest::Client;
use serde::{ de::DeserializeOwned, Deserialize };
use std::sync::Arc;
use thiserror::Error;

use crate::{ config::SpoonacularConfig, utils::preview };

pub const AUTOCOMPLETE_PAGE_SIZE: u32 = 8;
pub const INFO_AMOUNT: u32 = 100;
pub const INFO_UNIT: &str = "g";

#[derive(Debug, Error)]
pub enum SpoonacularError {
    #[error("SPOONACULAR_KEY is not configured")] MissingApiKey,

    #[error("Spoonacular request timed out")] Timeout,

    #[error("Failed to reach Spoonacular: {0}")] Network(#[source] reqwest::Error),

    #[error("Spoonacular API error: {status}")] Status {
        status: u16,
        body: String,
    },

    #[error("Failed to parse Spoonacular response: {0}")] Decode(String),
}

impl SpoonacularError {
    /// Failures a mock payload may stand in for: outages, quota, and a missing key.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SpoonacularError::MissingApiKey |
            SpoonacularError::Timeout |
            SpoonacularError::Network(_) |
            SpoonacularError::Decode(_) => true,
            SpoonacularError::Status { status, .. } => {
                *status == 402 || *status == 429 || *status >= 500
            }
        }
    }

    fn from_transport(path: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            tracing::error!("Spoonacular request timed out: {} - {}", path, e);
            SpoonacularError::Timeout
        } else {
            tracing::error!("Failed to reach Spoonacular: {} - {}", path, e);
            SpoonacularError::Network(e)
        }
    }
}

pub type Result<T> = std::result::Result<T, SpoonacularError>;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ComplexSearchResponse {
    pub results: Option<Vec<RecipeInformation>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecipeInformation {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub source_url: Option<String>,
    pub spoonacular_source_url: Option<String>,
    pub source_name: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub cuisines: Option<Vec<String>>,
    pub diets: Option<Vec<String>>,
    pub summary: Option<String>,
    pub instructions: Option<String>,
    pub extended_ingredients: Option<Vec<ExtendedIngredient>>,
    pub analyzed_instructions: Option<Vec<AnalyzedInstruction>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ExtendedIngredient {
    pub name: Option<String>,
    pub original: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzedInstruction {
    pub steps: Option<Vec<InstructionStep>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct InstructionStep {
    pub step: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AutocompleteIngredient {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub aisle: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IngredientSearchResponse {
    pub results: Option<Vec<IngredientSearchHit>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct IngredientSearchHit {
    pub id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngredientInformation {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub aisle: Option<String>,
    pub image: Option<String>,
    pub possible_units: Option<Vec<String>>,
    pub nutrition: Option<IngredientNutrition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IngredientNutrition {
    pub nutrients: Option<Vec<Nutrient>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Nutrient {
    pub name: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubstitutesResponse {
    pub substitutes: Option<Vec<String>>,
    pub message: Option<String>,
}

/// Already-clipped search parameters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecipeSearch {
    pub query: String,
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    pub intolerances: Option<String>,
}

#[derive(Clone)]
pub struct SpoonacularService {
    client: Arc<Client>,
    api_key: Option<String>,
    base_url: String,
    search_page_size: u32,
}

impl SpoonacularService {
    pub fn new(config: &SpoonacularConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_page_size: config.search_page_size,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(SpoonacularError::MissingApiKey)
    }

    /// Query string for `complexSearch`, in the order it is sent.
    pub fn search_params(&self, api_key: &str, search: &RecipeSearch) -> Vec<(&'static str, String)> {
        let mut params = vec![("apiKey", api_key.to_string())];

        if !search.query.is_empty() {
            params.push(("query", search.query.clone()));
        }

        params.push(("number", self.search_page_size.to_string()));
        params.push(("addRecipeInformation", "true".to_string()));
        params.push(("fillIngredients", "true".to_string()));

        if let Some(cuisine) = &search.cuisine {
            params.push(("cuisine", cuisine.clone()));
        }
        if let Some(diet) = &search.diet {
            params.push(("diet", diet.clone()));
        }
        if let Some(intolerances) = &search.intolerances {
            params.push(("intolerances", intolerances.clone()));
        }

        params
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)]
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!("Calling Spoonacular: {}", path);

        let response = self.client
            .get(&url)
            .query(params)
            .send().await
            .map_err(|e| SpoonacularError::from_transport(path, e))?;

        let status = response.status();
        tracing::debug!("Spoonacular response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Spoonacular error: {} {} - {}", path, status, preview(&error_text));
            return Err(SpoonacularError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let response_text = response
            .text().await
            .map_err(|e| SpoonacularError::from_transport(path, e))?;

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!("Failed to parse Spoonacular response for {}: {}", path, e);
            SpoonacularError::Decode(e.to_string())
        })
    }

    pub async fn search_recipes(&self, search: &RecipeSearch) -> Result<Vec<RecipeInformation>> {
        let params = self.search_params(self.api_key()?, search);

        let result: ComplexSearchResponse = self.get_json("/recipes/complexSearch", &params).await?;

        Ok(result.results.unwrap_or_default())
    }

    pub async fn get_recipe_information(&self, id: &str) -> Result<RecipeInformation> {
        let api_key = self.api_key()?;
        let path = format!("/recipes/{}/information", urlencoding::encode(id));

        self.get_json(
            &path,
            &[
                ("apiKey", api_key.to_string()),
                ("includeNutrition", "false".to_string()),
            ]
        ).await
    }

    pub async fn autocomplete_ingredients(&self, query: &str) -> Result<Vec<AutocompleteIngredient>> {
        let api_key = self.api_key()?;

        let result: Option<Vec<AutocompleteIngredient>> = self.get_json(
            "/food/ingredients/autocomplete",
            &[
                ("apiKey", api_key.to_string()),
                ("query", query.to_string()),
                ("number", AUTOCOMPLETE_PAGE_SIZE.to_string()),
                ("metaInformation", "true".to_string()),
            ]
        ).await?;

        Ok(result.unwrap_or_default())
    }

    /// First ingredient matching `name`, if any.
    pub async fn search_ingredient(&self, name: &str) -> Result<Option<IngredientSearchHit>> {
        let api_key = self.api_key()?;

        let result: IngredientSearchResponse = self.get_json(
            "/food/ingredients/search",
            &[
                ("apiKey", api_key.to_string()),
                ("query", name.to_string()),
                ("number", "1".to_string()),
            ]
        ).await?;

        Ok(result.results.unwrap_or_default().into_iter().next())
    }

    pub async fn get_ingredient_information(&self, id: i64) -> Result<IngredientInformation> {
        let api_key = self.api_key()?;
        let path = format!("/food/ingredients/{}/information", id);

        self.get_json(
            &path,
            &[
                ("apiKey", api_key.to_string()),
                ("amount", INFO_AMOUNT.to_string()),
                ("unit", INFO_UNIT.to_string()),
            ]
        ).await
    }

    pub async fn get_substitutes(&self, name: &str) -> Result<SubstitutesResponse> {
        let api_key = self.api_key()?;

        self.get_json(
            "/food/ingredients/substitutes",
            &[
                ("apiKey", api_key.to_string()),
                ("ingredientName", name.to_string()),
            ]
        ).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{ io, sync::Mutex };

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn service(page_size: u32) -> SpoonacularService {
        let mut config = SpoonacularConfig::new(Some("k".into()), "http://localhost:9/");
        config.search_page_size = page_size;
        SpoonacularService::new(&config).unwrap()
    }

    #[test]
    fn search_params_keep_fixed_order() {
        let search = RecipeSearch {
            query: "pasta".into(),
            cuisine: Some("italian".into()),
            diet: None,
            intolerances: Some("gluten".into()),
        };

        let params = service(12).search_params("k", &search);

        assert_eq!(params, vec![
            ("apiKey", "k".to_string()),
            ("query", "pasta".to_string()),
            ("number", "12".to_string()),
            ("addRecipeInformation", "true".to_string()),
            ("fillIngredients", "true".to_string()),
            ("cuisine", "italian".to_string()),
            ("intolerances", "gluten".to_string()),
        ]);
    }

    #[test]
    fn cuisine_only_search_omits_query() {
        let search = RecipeSearch { cuisine: Some("thai".into()), ..Default::default() };

        let params = service(20).search_params("k", &search);

        assert!(params.iter().all(|(name, _)| *name != "query"));
        assert!(params.contains(&("number", "20".to_string())));
    }

    #[test]
    fn missing_key_is_reported_before_any_request() {
        let config = SpoonacularConfig::new(None, "http://localhost:9");
        let service = SpoonacularService::new(&config).unwrap();

        assert!(!service.has_api_key());
        assert!(matches!(service.api_key(), Err(SpoonacularError::MissingApiKey)));
    }

    #[test]
    fn recoverable_failures() {
        let status = |code| SpoonacularError::Status { status: code, body: String::new() };

        assert!(status(402).is_recoverable());
        assert!(status(429).is_recoverable());
        assert!(status(502).is_recoverable());
        assert!(!status(404).is_recoverable());
        assert!(!status(401).is_recoverable());
        assert!(SpoonacularError::Timeout.is_recoverable());
    }

    #[test]
    fn tolerates_sparse_and_null_fields() {
        let info: RecipeInformation = serde_json
            ::from_str(r#"{"id": 7, "cuisines": null, "extendedIngredients": null, "servings": null}"#)
            .unwrap();

        assert_eq!(info.id, Some(7));
        assert!(info.cuisines.is_none());
        assert!(info.extended_ingredients.is_none());
        assert!(info.title.is_none());
    }

    #[tokio::test]
    async fn unreachable_upstream_is_logged_with_path() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber
            ::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let config = SpoonacularConfig::new(Some("k".into()), "http://127.0.0.1:1");
        let err = SpoonacularService::new(&config)
            .unwrap()
            .get_recipe_information("1001").await
            .unwrap_err();

        assert!(matches!(err, SpoonacularError::Network(_)));
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Failed to reach Spoonacular: /recipes/1001/information"), "{}", output);
    }
}
