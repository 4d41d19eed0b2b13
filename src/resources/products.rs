//! Product, product-type, product-member and API-scan-configuration
//! operations.

use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crate::client::{fields, DojoClient};
use crate::response::DojoResponse;

use super::{collect_strings, find_id, DEFAULT_LIMIT};

/// Filters for listing products.
#[derive(Debug, Clone, Serialize)]
pub struct ProductQuery {
    /// Search by exact product name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Search by product name substring, case-insensitive.
    #[serde(rename = "name__icontains", skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_exact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            name: None,
            name_contains: None,
            name_exact: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

/// Fields for creating a product.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    /// Product type id.
    pub prod_type: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NewProduct {
    pub fn new(name: &str, description: &str, prod_type: u64) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            prod_type,
            tags: None,
        }
    }
}

/// Fields for replacing or amending a product.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prod_type: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_users: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_simple_risk_acceptance: Option<bool>,
}

/// Filters for listing product members.
#[derive(Debug, Clone, Serialize)]
pub struct ProductMemberQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Model names to prefetch into the response (product, role, user).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefetch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for ProductMemberQuery {
    fn default() -> Self {
        Self {
            id: None,
            prefetch: None,
            product_id: None,
            user_id: None,
            limit: Some(10000),
        }
    }
}

/// A user's membership in a product, with a role
/// (1 API importer, 2 Writer, 3 Maintainer, 4 Owner, 5 Reader).
#[derive(Debug, Clone, Serialize)]
pub struct ProductMembership {
    pub product: u64,
    pub user: u64,
    pub role: u64,
}

/// Ties a product to a tool configuration for API-based imports.
#[derive(Debug, Clone, Serialize)]
pub struct ApiScanConfiguration {
    pub product: u64,
    pub tool_configuration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_key_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_key_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_key_3: Option<String>,
}

impl DojoClient {
    /// Retrieves products, optionally filtered by name.
    pub async fn list_products(&self, query: &ProductQuery) -> DojoResponse {
        self.dispatch(Method::GET, "products/", fields(query), None, None)
            .await
    }

    /// Retrieves a product using the given product id.
    pub async fn get_product(&self, product_id: u64) -> DojoResponse {
        self.dispatch(
            Method::GET,
            &format!("products/{product_id}/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Creates a product with the given properties.
    pub async fn create_product(&self, product: &NewProduct) -> DojoResponse {
        self.dispatch(Method::POST, "products/", None, fields(product), None)
            .await
    }

    /// Replaces a product's fields.
    pub async fn set_product(&self, product_id: u64, update: &ProductUpdate) -> DojoResponse {
        self.dispatch(
            Method::PUT,
            &format!("products/{product_id}/"),
            None,
            fields(update),
            None,
        )
        .await
    }

    /// Amends a product's fields.
    pub async fn patch_product(&self, product_id: u64, update: &ProductUpdate) -> DojoResponse {
        self.dispatch(
            Method::PATCH,
            &format!("products/{product_id}/"),
            None,
            fields(update),
            None,
        )
        .await
    }

    /// Deletes a product using the given product id.
    pub async fn delete_product(&self, product_id: u64) -> DojoResponse {
        self.dispatch(
            Method::DELETE,
            &format!("products/{product_id}/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Generates a product report. A non-`full` report excludes notes,
    /// images, the executive summary and the table of contents.
    pub async fn generate_product_report(&self, product_id: u64, full: bool) -> DojoResponse {
        let body = (!full).then(|| {
            json!({
                "include_finding_notes": false,
                "include_finding_images": false,
                "include_executive_summary": false,
                "include_table_of_contents": false,
            })
        });
        self.dispatch(
            Method::POST,
            &format!("products/{product_id}/generate_report/"),
            None,
            body,
            None,
        )
        .await
    }

    /// All product names known to the server.
    pub async fn list_product_names(&self) -> Vec<String> {
        collect_strings(self.list_products(&ProductQuery::default()).await, "name")
    }

    /// Looks up a product id by name (first match of the name filter).
    pub async fn get_product_id_by_name(&self, name: &str) -> Option<u64> {
        let query = ProductQuery {
            name: Some(name.to_string()),
            ..Default::default()
        };
        let response = self.list_products(&query).await;
        response.results()?.first()?.get("id")?.as_u64()
    }

    /// Looks up a product id by exact name.
    pub async fn get_product_id_by_exact_name(&self, name: &str) -> Option<u64> {
        let query = ProductQuery {
            name_exact: Some(name.to_string()),
            ..Default::default()
        };
        let response = self.list_products(&query).await;
        response.results()?.first()?.get("id")?.as_u64()
    }

    /// Fetches a full product record by name, if one matches exactly.
    pub async fn get_product_by_name(&self, name: &str) -> Option<DojoResponse> {
        let listing = self.list_products(&ProductQuery::default()).await;
        let id = find_id(listing.results()?, "name", name)?;
        Some(self.get_product(id).await)
    }

    /// Retrieves all product types.
    pub async fn list_product_types(&self) -> DojoResponse {
        self.dispatch(Method::GET, "product_types/", None, None, None)
            .await
    }

    /// Looks up a product type id by name.
    pub async fn get_product_type_id_by_name(&self, name: &str) -> Option<u64> {
        let response = self.list_product_types().await;
        find_id(response.results()?, "name", name)
    }

    /// Creates a product type.
    pub async fn create_product_type(&self, name: &str) -> DojoResponse {
        self.dispatch(
            Method::POST,
            "product_types/",
            None,
            Some(json!({ "name": name })),
            None,
        )
        .await
    }

    /// Deletes a product type.
    pub async fn delete_product_type(&self, product_type_id: u64) -> DojoResponse {
        self.dispatch(
            Method::DELETE,
            &format!("product_types/{product_type_id}/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Retrieves product members, optionally filtered.
    pub async fn list_product_members(&self, query: &ProductMemberQuery) -> DojoResponse {
        self.dispatch(Method::GET, "product_members/", fields(query), None, None)
            .await
    }

    /// Adds a user to a product.
    pub async fn add_product_member(&self, membership: &ProductMembership) -> DojoResponse {
        self.dispatch(
            Method::POST,
            "product_members/",
            None,
            fields(membership),
            None,
        )
        .await
    }

    /// Replaces a product-member record.
    pub async fn update_product_member(
        &self,
        id: u64,
        membership: &ProductMembership,
    ) -> DojoResponse {
        self.dispatch(
            Method::PUT,
            &format!("product_members/{id}/"),
            None,
            fields(membership),
            None,
        )
        .await
    }

    /// Removes a member from a product.
    pub async fn delete_product_member(&self, id: u64) -> DojoResponse {
        self.dispatch(
            Method::DELETE,
            &format!("product_members/{id}/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Ties a tool configuration to a product for API-based imports.
    pub async fn create_product_api_scan_configuration(
        &self,
        configuration: &ApiScanConfiguration,
    ) -> DojoResponse {
        self.dispatch(
            Method::POST,
            "product_api_scan_configurations/",
            None,
            fields(configuration),
            None,
        )
        .await
    }

    /// Retrieves the API scan configurations of a product.
    pub async fn list_product_api_scan_configurations(
        &self,
        product_id: u64,
    ) -> DojoResponse {
        self.dispatch(
            Method::GET,
            "product_api_scan_configurations/",
            Some(json!({ "product": product_id })),
            None,
            None,
        )
        .await
    }
}
