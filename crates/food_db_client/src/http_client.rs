//! HTTP client implementation for a FoodData Central style search API.
//!
//! This module provides a reqwest-based implementation of the [`FoodDatabase`](crate::FoodDatabase) trait.

use crate::config::Config;
use crate::{FoodCandidate, FoodDatabase, FoodLookupError, SearchRequest};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Client for the food search API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestFoodClient {
    base_url: String,
    api_key: SecretString,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<FoodCandidate>,
}

impl ReqwestFoodClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "https://api.nal.usda.gov/fdc/v1")
    /// * `api_key` - The API key sent with every request
    pub fn new(base_url: &str, api_key: SecretString) -> Self {
        Self::with_client(base_url, api_key, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, api_key: SecretString, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(&cfg.base_url, cfg.api_key.clone())
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, FoodLookupError> {
        let resp = request.send().await?;
        self.handle_response(resp).await
    }

    /// Handle a response, converting status codes to errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, FoodLookupError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| FoodLookupError::Decode(e.to_string()))
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> FoodLookupError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        FoodLookupError::Status {
            status,
            body: body_snippet,
        }
    }
}

#[async_trait]
impl FoodDatabase for ReqwestFoodClient {
    async fn search_foods(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<FoodCandidate>, FoodLookupError> {
        let url = format!("{}/foods/search", self.base_url);
        let page_size = request.page_size().to_string();
        let pairs = [
            ("query", request.query()),
            ("pageSize", page_size.as_str()),
            ("api_key", self.api_key.expose_secret()),
        ];
        tracing::debug!(query = request.query(), page_size = request.page_size(), "food search");
        metrics::counter!("food_db_requests_total").increment(1);

        let result: Result<SearchResponse, FoodLookupError> =
            self.execute_json(self.client.get(&url).query(&pairs)).await;
        match result {
            Ok(resp) => {
                tracing::debug!(results = resp.foods.len(), "food search completed");
                Ok(resp.foods)
            }
            Err(e) => {
                metrics::counter!("food_db_failures_total").increment(1);
                tracing::warn!(error = %e, "food search failed");
                Err(e)
            }
        }
    }
}
