use std::{ env, time::Duration };

use crate::fallback::FallbackPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub spoonacular: SpoonacularConfig,
    pub fallback: FallbackPolicy,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct SpoonacularConfig {
    /// `None` when `SPOONACULAR_KEY` is unset; the fallback policy decides what that means.
    pub api_key: Option<String>,
    pub base_url: String,
    pub image_cdn: String,
    pub timeout: Duration,
    pub search_page_size: u32,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub cors_enabled: bool,
    pub allowed_origins: Vec<String>,
}

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";
pub const DEFAULT_IMAGE_CDN: &str = "https://spoonacular.com/cdn/ingredients_100x100";

impl SpoonacularConfig {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            image_cdn: DEFAULT_IMAGE_CDN.to_string(),
            timeout: Duration::from_secs(10),
            search_page_size: 12,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy
            ::from_filename(".env.local")
            .or_else(|_| dotenvy::dotenv())
            .ok();

        let environment = env
            ::var("NODE_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase();

        let is_production = environment == "production";

        let dev_origins = env::var("DEV_FRONTEND_ORIGIN").unwrap_or_default();
        let prod_origins = env::var("PRODUCTION_FRONTEND_ORIGIN").unwrap_or_default();

        let allowed_origins: Vec<String> = (if is_production { prod_origins } else { dev_origins })
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let api_key = env
            ::var("SPOONACULAR_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let config = Config {
            server: ServerConfig {
                port: env
                    ::var("PORT")
                    .unwrap_or_else(|_| "4000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                environment: if is_production {
                    Environment::Production
                } else {
                    Environment::Development
                },
            },
            spoonacular: SpoonacularConfig {
                api_key,
                base_url: env
                    ::var("SPOONACULAR_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                image_cdn: env
                    ::var("SPOONACULAR_IMAGE_CDN")
                    .unwrap_or_else(|_| DEFAULT_IMAGE_CDN.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                timeout: Duration::from_secs(
                    env
                        ::var("SPOONACULAR_TIMEOUT_SECS")
                        .unwrap_or_else(|_| "10".to_string())
                        .parse()?
                ),
                search_page_size: env
                    ::var("RECIPE_SEARCH_PAGE_SIZE")
                    .unwrap_or_else(|_| "12".to_string())
                    .parse()?,
            },
            fallback: env
                ::var("RECIPE_FALLBACK")
                .unwrap_or_else(|_| "prefer_mock".to_string())
                .parse()?,
            security: SecurityConfig {
                cors_enabled: is_production,
                allowed_origins,
            },
        };

        Ok(config)
    }

    /// Development config pointed at an arbitrary upstream, used by tests and local tooling.
    pub fn with_upstream(spoonacular: SpoonacularConfig, fallback: FallbackPolicy) -> Self {
        Config {
            server: ServerConfig {
                port: 4000,
                host: "127.0.0.1".to_string(),
                environment: Environment::Development,
            },
            spoonacular,
            fallback,
            security: SecurityConfig {
                cors_enabled: false,
                allowed_origins: Vec::new(),
            },
        }
    }

    pub fn is_production(&self) -> bool {
        self.server.environment == Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_config_defaults() {
        let config = Config::with_upstream(
            SpoonacularConfig::new(Some("key".into()), "http://localhost:9"),
            FallbackPolicy::Strict
        );

        assert_eq!(config.spoonacular.search_page_size, 12);
        assert_eq!(config.spoonacular.timeout, Duration::from_secs(10));
        assert_eq!(config.spoonacular.image_cdn, DEFAULT_IMAGE_CDN);
        assert!(!config.is_production());
        assert!(!config.security.cors_enabled);
    }
}
