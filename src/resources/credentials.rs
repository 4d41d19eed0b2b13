//! Credential and credential-mapping operations.

use reqwest::Method;
use serde::Serialize;

use crate::client::{fields, DojoClient};
use crate::response::DojoResponse;

use super::DEFAULT_LIMIT;

/// Filters for listing globally configured credentials.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialQuery {
    #[serde(rename = "name__contains", skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
    #[serde(rename = "username__contains", skip_serializing_if = "Option::is_none")]
    pub username_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for CredentialQuery {
    fn default() -> Self {
        Self {
            name_contains: None,
            username_contains: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

/// Filters for listing credential mappings.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialMappingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "product__id__in", skip_serializing_if = "Option::is_none")]
    pub product_id_in: Option<String>,
    #[serde(rename = "engagement__id__in", skip_serializing_if = "Option::is_none")]
    pub engagement_id_in: Option<String>,
    #[serde(rename = "test__id__in", skip_serializing_if = "Option::is_none")]
    pub test_id_in: Option<String>,
    #[serde(rename = "finding__id__in", skip_serializing_if = "Option::is_none")]
    pub finding_id_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for CredentialMappingQuery {
    fn default() -> Self {
        Self {
            name: None,
            product_id_in: None,
            engagement_id_in: None,
            test_id_in: None,
            finding_id_in: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

impl DojoClient {
    /// Retrieves all globally configured credentials.
    pub async fn list_credentials(&self, query: &CredentialQuery) -> DojoResponse {
        self.dispatch(Method::GET, "credentials/", fields(query), None, None)
            .await
    }

    /// Retrieves a credential using the given credential id.
    pub async fn get_credential(&self, credential_id: u64) -> DojoResponse {
        self.dispatch(
            Method::GET,
            &format!("credentials/{credential_id}/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Retrieves credentials mapped to products, engagements, tests or
    /// findings.
    pub async fn list_credential_mappings(
        &self,
        query: &CredentialMappingQuery,
    ) -> DojoResponse {
        self.dispatch(Method::GET, "credential_mappings/", fields(query), None, None)
            .await
    }

    /// Retrieves a credential mapping by id.
    pub async fn get_credential_mapping(&self, mapping_id: u64) -> DojoResponse {
        self.dispatch(
            Method::GET,
            &format!("credential_mappings/{mapping_id}/"),
            None,
            None,
            None,
        )
        .await
    }
}
