//! App-analysis (technology) and language operations.

use reqwest::Method;
use serde::Serialize;

use crate::client::{fields, DojoClient};
use crate::response::DojoResponse;

use super::DEFAULT_LIMIT;

/// Filters for listing technologies detected on a product.
#[derive(Debug, Clone, Serialize)]
pub struct TechnologyQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "product__id", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,
    #[serde(rename = "name__icontains", skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for TechnologyQuery {
    fn default() -> Self {
        Self {
            id: None,
            product_id: None,
            name_contains: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

/// A technology-to-product mapping.
#[derive(Debug, Clone, Serialize)]
pub struct NewTechnology {
    pub product: u64,
    pub user: u64,
    pub name: String,
    /// Detection confidence in percent.
    pub confidence: u32,
    pub version: String,
    pub icon: String,
    pub website: String,
}

/// Filters for listing language records.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "product__id", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,
    #[serde(
        rename = "language_type__language__icontains",
        skip_serializing_if = "Option::is_none"
    )]
    pub language_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for LanguageQuery {
    fn default() -> Self {
        Self {
            id: None,
            product_id: None,
            language_name: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

/// A language-to-product mapping with line counts.
#[derive(Debug, Clone, Serialize)]
pub struct NewLanguage {
    pub product: u64,
    pub language_type: u64,
    pub user: u64,
    pub files: u64,
    pub code: u64,
    pub blank: u64,
    pub comment: u64,
}

/// Filters for listing language types.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageTypeQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "language__icontains", skip_serializing_if = "Option::is_none")]
    pub language_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for LanguageTypeQuery {
    fn default() -> Self {
        Self {
            id: None,
            language_name: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

impl DojoClient {
    /// Retrieves technologies, optionally filtered by product or name.
    pub async fn list_technologies(&self, query: &TechnologyQuery) -> DojoResponse {
        self.dispatch(Method::GET, "app_analysis/", fields(query), None, None)
            .await
    }

    /// Maps a technology onto a product.
    pub async fn create_technology(&self, technology: &NewTechnology) -> DojoResponse {
        self.dispatch(Method::POST, "app_analysis/", None, fields(technology), None)
            .await
    }

    /// Deletes a technology mapping.
    pub async fn delete_technology(&self, id: u64) -> DojoResponse {
        self.dispatch(
            Method::DELETE,
            &format!("app_analysis/{id}/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Deletes every technology mapping of a product.
    pub async fn delete_product_technologies(&self, product_id: u64) {
        let query = TechnologyQuery {
            product_id: Some(product_id),
            ..Default::default()
        };
        let listing = self.list_technologies(&query).await;
        for id in record_ids(&listing) {
            self.delete_technology(id).await;
        }
    }

    /// Retrieves language records, optionally filtered.
    pub async fn list_languages(&self, query: &LanguageQuery) -> DojoResponse {
        self.dispatch(Method::GET, "languages/", fields(query), None, None)
            .await
    }

    /// Maps a language onto a product.
    pub async fn create_language(&self, language: &NewLanguage) -> DojoResponse {
        self.dispatch(Method::POST, "languages/", None, fields(language), None)
            .await
    }

    /// Deletes a language record.
    pub async fn delete_language(&self, id: u64) -> DojoResponse {
        self.dispatch(Method::DELETE, &format!("languages/{id}/"), None, None, None)
            .await
    }

    /// Deletes every language record of a product.
    pub async fn delete_product_languages(&self, product_id: u64) {
        let query = LanguageQuery {
            product_id: Some(product_id),
            ..Default::default()
        };
        let listing = self.list_languages(&query).await;
        for id in record_ids(&listing) {
            self.delete_language(id).await;
        }
    }

    /// Retrieves language types, optionally filtered by name.
    pub async fn list_language_types(&self, query: &LanguageTypeQuery) -> DojoResponse {
        self.dispatch(Method::GET, "language_types/", fields(query), None, None)
            .await
    }

    /// Looks up a language type id by language name (first match).
    pub async fn get_language_type_id(&self, language_name: &str) -> Option<u64> {
        let query = LanguageTypeQuery {
            language_name: Some(language_name.to_string()),
            ..Default::default()
        };
        let response = self.list_language_types(&query).await;
        response.results()?.first()?.get("id")?.as_u64()
    }
}

fn record_ids(response: &DojoResponse) -> Vec<u64> {
    response
        .results()
        .map(|results| {
            results
                .iter()
                .filter_map(|record| record.get("id")?.as_u64())
                .collect()
        })
        .unwrap_or_default()
}
