//! Tool type, tool configuration and tool-product operations.

use reqwest::Method;
use serde::Serialize;

use crate::client::{fields, DojoClient};
use crate::response::DojoResponse;

use super::DEFAULT_LIMIT;

/// Filters for listing tool types.
#[derive(Debug, Clone, Serialize)]
pub struct ToolTypeQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "name__contains", skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for ToolTypeQuery {
    fn default() -> Self {
        Self {
            id: None,
            name_contains: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

/// Filters for listing tool configurations.
#[derive(Debug, Clone, Serialize)]
pub struct ToolConfigurationQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "name__icontains", skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
    #[serde(rename = "tool_type__id", skip_serializing_if = "Option::is_none")]
    pub tool_type_id: Option<u64>,
    #[serde(rename = "url__contains", skip_serializing_if = "Option::is_none")]
    pub url_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for ToolConfigurationQuery {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            name_contains: None,
            tool_type_id: None,
            url_contains: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

/// Fields for creating a tool configuration.
#[derive(Debug, Clone, Serialize)]
pub struct NewToolConfiguration {
    pub name: String,
    pub tool_type: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// "API", "Password" or "SSH".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl NewToolConfiguration {
    pub fn new(name: &str, tool_type: u64) -> Self {
        Self {
            name: name.to_string(),
            tool_type,
            description: None,
            url: None,
            authentication_type: None,
            extras: None,
            username: None,
            password: None,
            auth_title: None,
            ssh: None,
            api_key: None,
        }
    }
}

/// Filters for listing tool-product settings.
#[derive(Debug, Clone, Serialize)]
pub struct ToolProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "url__iregex", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        rename = "tool_project_id__contains",
        skip_serializing_if = "Option::is_none"
    )]
    pub tool_project_id: Option<String>,
    #[serde(
        rename = "tool_configuration__id",
        skip_serializing_if = "Option::is_none"
    )]
    pub tool_configuration_id: Option<u64>,
    #[serde(rename = "product__id", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for ToolProductQuery {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            url: None,
            tool_project_id: None,
            tool_configuration_id: None,
            product_id: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

impl DojoClient {
    /// Retrieves tool types, optionally filtered by name.
    pub async fn list_tool_types(&self, query: &ToolTypeQuery) -> DojoResponse {
        self.dispatch(Method::GET, "tool_types/", fields(query), None, None)
            .await
    }

    /// Retrieves a tool type by id.
    pub async fn get_tool_type(&self, tool_type_id: u64) -> DojoResponse {
        self.dispatch(
            Method::GET,
            &format!("tool_types/{tool_type_id}/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Retrieves tool configurations, optionally filtered.
    pub async fn list_tool_configurations(
        &self,
        query: &ToolConfigurationQuery,
    ) -> DojoResponse {
        self.dispatch(Method::GET, "tool_configurations/", fields(query), None, None)
            .await
    }

    /// Retrieves a tool configuration by id.
    pub async fn get_tool_configuration(&self, id: u64) -> DojoResponse {
        self.dispatch(
            Method::GET,
            &format!("tool_configurations/{id}/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Creates a tool configuration.
    pub async fn create_tool_configuration(
        &self,
        configuration: &NewToolConfiguration,
    ) -> DojoResponse {
        self.dispatch(
            Method::POST,
            "tool_configurations/",
            None,
            fields(configuration),
            None,
        )
        .await
    }

    /// Retrieves tool-product settings, optionally filtered.
    pub async fn list_tool_products(&self, query: &ToolProductQuery) -> DojoResponse {
        self.dispatch(
            Method::GET,
            "tool_product_settings/",
            fields(query),
            None,
            None,
        )
        .await
    }
}
