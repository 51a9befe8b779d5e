//! Client for the recipe catalog backend (trending, search and category
//! listings).

use log::{debug, info};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

use crate::error::{error_body_message, CatalogError};
use crate::model::RecipeSummary;

/// Categories the backend can list
pub const CATEGORIES: [&str; 10] = [
    "desserts",
    "drinks",
    "breakfast",
    "lunch",
    "healthy",
    "appetizers-and-snacks",
    "salads",
    "side-dishes",
    "soups",
    "bread",
];

pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Recipes currently trending
    pub async fn trending(&self) -> Result<Vec<RecipeSummary>, CatalogError> {
        let response = self
            .client
            .get(format!("{}/discover-trending", self.base_url))
            .send()
            .await?;
        read_listing(response).await
    }

    /// Recipes matching a free-text query
    pub async fn search(&self, query: &str) -> Result<Vec<RecipeSummary>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::EmptyQuery);
        }

        info!("Searching catalog for '{}'", query);
        let response = self
            .client
            .get(format!("{}/search-recipes", self.base_url))
            .query(&[("query", query)])
            .send()
            .await?;
        read_listing(response).await
    }

    /// Recipes in one of [`CATEGORIES`] (matched case-insensitively)
    pub async fn category(&self, category: &str) -> Result<Vec<RecipeSummary>, CatalogError> {
        let category = normalize_category(category)?;

        let response = self
            .client
            .get(format!("{}/category-recipes", self.base_url))
            .query(&[("category", category)])
            .send()
            .await?;
        read_listing(response).await
    }
}

fn normalize_category(category: &str) -> Result<&'static str, CatalogError> {
    let wanted = category.trim().to_lowercase();
    CATEGORIES
        .iter()
        .find(|c| **c == wanted)
        .copied()
        .ok_or_else(|| CatalogError::UnknownCategory(category.to_string()))
}

async fn read_listing(response: Response) -> Result<Vec<RecipeSummary>, CatalogError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::Status {
            status: status.as_u16(),
            message: error_body_message(&body),
        });
    }

    let body: Value = response.json().await?;
    let recipes: Vec<RecipeSummary> =
        serde_json::from_value(body).map_err(|e| CatalogError::Status {
            status: status.as_u16(),
            message: format!("unexpected listing format: {}", e),
        })?;
    debug!("Catalog returned {} recipes", recipes.len());
    Ok(recipes)
}
