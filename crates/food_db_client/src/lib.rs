//! Minimal `FoodDatabase` trait and a reqwest-based client for food search.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod nutrients;

pub use nutrients::{ExtractedMacros, extract_macros};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 12;
/// Largest page the lookup will ever request.
pub const MAX_PAGE_SIZE: u32 = 50;

#[derive(Debug, Error)]
pub enum FoodLookupError {
    #[error("search query must not be empty")]
    InvalidQuery,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("food database returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode food database response: {0}")]
    Decode(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl FoodLookupError {
    /// Single human-readable line for the person running the search.
    ///
    /// Transport failures, non-success statuses and undecodable bodies all
    /// read the same: the caller cannot act on the difference.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidQuery => "Enter a food name to search for.".to_string(),
            Self::Config(msg) => format!("Food search is not configured: {msg}"),
            Self::Http(_) | Self::Status { .. } | Self::Decode(_) => {
                "Food search failed. Check your connection and API key, then try again."
                    .to_string()
            }
        }
    }
}

/// Clamp a requested page size into `[1, MAX_PAGE_SIZE]`, defaulting when absent.
pub fn clamp_page_size(page_size: Option<u32>) -> u32 {
    page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

/// A validated search: non-empty query and a clamped page size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    page_size: u32,
}

impl SearchRequest {
    pub fn new(query: &str, page_size: Option<u32>) -> Result<Self, FoodLookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FoodLookupError::InvalidQuery);
        }
        Ok(Self {
            query: query.to_string(),
            page_size: clamp_page_size(page_size),
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

/// One food returned by a search.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodCandidate {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub fdc_id: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub brand_owner: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_f64")]
    pub serving_size: Option<f64>,
    #[serde(default)]
    pub serving_size_unit: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

impl FoodCandidate {
    /// Brand name, falling back to the brand owner for branded foods that only carry one.
    pub fn brand(&self) -> Option<&str> {
        self.brand_name
            .as_deref()
            .or(self.brand_owner.as_deref())
            .map(str::trim)
            .filter(|b| !b.is_empty())
    }

    /// Human serving label such as `"40 g"`, when the record has a size.
    pub fn serving_label(&self) -> Option<String> {
        let size = self.serving_size?;
        let unit = self
            .serving_size_unit
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        let size = if size.fract() == 0.0 {
            format!("{}", size as i64)
        } else {
            format!("{size}")
        };
        if unit.is_empty() {
            Some(size)
        } else {
            Some(format!("{size} {unit}"))
        }
    }
}

/// One nutrient row. Search responses use `value`, detail responses use `amount`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodNutrient {
    #[serde(default)]
    pub nutrient_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub nutrient_number: Option<String>,
    #[serde(default)]
    pub unit_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_f64")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_f64")]
    pub amount: Option<f64>,
}

impl FoodNutrient {
    pub fn quantity(&self) -> Option<f64> {
        self.value.or(self.amount)
    }
}

fn deserialize_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string().into()),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

fn deserialize_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(serde_json::Value::String(s)) => {
            s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    })
}

#[async_trait]
pub trait FoodDatabase: Send + Sync + 'static {
    /// Run one free-text search. Never retried by the implementation.
    async fn search_foods(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<FoodCandidate>, FoodLookupError>;
}
