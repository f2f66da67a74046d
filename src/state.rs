use std::sync::Arc;

use crate::{ config::Config, services::spoonacular_service::SpoonacularService };

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub spoonacular_service: Arc<SpoonacularService>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let spoonacular_service = Arc::new(SpoonacularService::new(&config.spoonacular)?);

        if spoonacular_service.has_api_key() {
            tracing::info!("Initialized Spoonacular service ({})", config.spoonacular.base_url);
        } else {
            tracing::warn!("SPOONACULAR_KEY is not set; fallback policy is {}", config.fallback);
        }

        Ok(Self {
            config,
            spoonacular_service,
        })
    }
}
