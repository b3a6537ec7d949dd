use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::{config::Config, models::recipe::Composition};

#[derive(Debug, Error)]
pub enum NutritionError {
    #[error("Nutrition lookup is not configured")]
    NotConfigured,

    #[error("Nutrition API responded with status {0}")]
    Upstream(u16),

    #[error("Nutrition API request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Client for the Edamam nutrition-data API.
pub struct NutritionService {
    pub client: Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl NutritionService {
    pub fn new(config: &Config) -> Self {
        let credentials = match (&config.edamam_api_id, &config.edamam_api_key) {
            (Some(id), Some(key)) => Some((id.clone(), key.clone())),
            _ => None,
        };
        Self {
            client: Client::new(),
            base_url: config.edamam_base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Nutrition analysis for a comma-separated ingredient list, returned as the API's JSON.
    pub async fn analyze(&self, ingredients: &str) -> Result<Value, NutritionError> {
        let (app_id, app_key) = self
            .credentials
            .as_ref()
            .ok_or(NutritionError::NotConfigured)?;

        let res = self
            .client
            .get(format!("{}/api/nutrition-data", self.base_url))
            .query(&[
                ("app_id", app_id.as_str()),
                ("app_key", app_key.as_str()),
                ("nutrition-type", "cooking"),
                ("ingr", ingredients),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(NutritionError::Upstream(status.as_u16()));
        }
        Ok(res.json::<Value>().await?)
    }
}

/// Render compositions as `"{quantity} {unit} {ingredient}"`, comma-separated.
pub fn ingredients_query(compositions: &[Composition]) -> String {
    compositions
        .iter()
        .map(|c| format!("{} {} {}", c.quantity, c.measure_unity, c.ingredient.name))
        .collect::<Vec<_>>()
        .join(",")
}
