use crate::{FoodLookupError, clamp_page_size};
use secrecy::SecretString;

pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: SecretString,
    pub base_url: String,
    pub page_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, FoodLookupError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, FoodLookupError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let api = get("FOOD_DB_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| FoodLookupError::Config("FOOD_DB_API_KEY missing".into()))?;
        let base_url = get("FOOD_DB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let page_size = clamp_page_size(get("FOOD_DB_PAGE_SIZE").and_then(|v| v.trim().parse().ok()));
        Ok(Self {
            api_key: SecretString::new(api.into()),
            base_url,
            page_size,
        })
    }
}
