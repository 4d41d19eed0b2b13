//! Group, group-member and product-group operations.

use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crate::client::{fields, DojoClient};
use crate::response::DojoResponse;

use super::DEFAULT_LIMIT;

/// Fields for creating a group.
#[derive(Debug, Clone, Serialize)]
pub struct NewGroup {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_provider: Option<String>,
}

impl NewGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            social_provider: None,
        }
    }
}

/// A user's membership in a group, with a role.
#[derive(Debug, Clone, Serialize)]
pub struct GroupMembership {
    pub group: u64,
    pub user: u64,
    pub role: u64,
}

/// A group's grant on a product, with a role.
#[derive(Debug, Clone, Serialize)]
pub struct ProductGroupGrant {
    pub product: u64,
    pub group: u64,
    pub role: u64,
}

impl DojoClient {
    /// Retrieves all groups.
    pub async fn list_groups(&self) -> DojoResponse {
        self.dispatch(
            Method::GET,
            "dojo_groups/",
            Some(json!({ "limit": DEFAULT_LIMIT })),
            None,
            None,
        )
        .await
    }

    /// Creates a group.
    pub async fn create_group(&self, group: &NewGroup) -> DojoResponse {
        self.dispatch(Method::POST, "dojo_groups/", None, fields(group), None)
            .await
    }

    /// Retrieves group members, optionally restricted to one group.
    pub async fn list_group_members(&self, group_id: Option<u64>) -> DojoResponse {
        let query = group_id.map(|id| json!({ "group_id": id }));
        self.dispatch(Method::GET, "dojo_group_members/", query, None, None)
            .await
    }

    /// Retrieves a single group-member record.
    pub async fn get_group_member(&self, id: u64) -> DojoResponse {
        self.dispatch(
            Method::GET,
            &format!("dojo_group_members/{id}/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Adds a user to a group.
    pub async fn add_group_member(&self, membership: &GroupMembership) -> DojoResponse {
        self.dispatch(
            Method::POST,
            "dojo_group_members/",
            None,
            fields(membership),
            None,
        )
        .await
    }

    /// Replaces a group-member record.
    pub async fn update_group_member(
        &self,
        id: u64,
        membership: &GroupMembership,
    ) -> DojoResponse {
        self.dispatch(
            Method::PUT,
            &format!("dojo_group_members/{id}/"),
            None,
            fields(membership),
            None,
        )
        .await
    }

    /// Removes a user from a group.
    pub async fn delete_group_member(&self, id: u64) -> DojoResponse {
        self.dispatch(
            Method::DELETE,
            &format!("dojo_group_members/{id}/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Grants a group a role on a product.
    pub async fn add_product_group(&self, grant: &ProductGroupGrant) -> DojoResponse {
        self.dispatch(Method::POST, "product_groups/", None, fields(grant), None)
            .await
    }

    /// Retrieves the groups granted access to a product.
    pub async fn list_product_groups(&self, product_id: u64) -> DojoResponse {
        self.dispatch(
            Method::GET,
            "product_groups/",
            Some(json!({ "limit": DEFAULT_LIMIT, "product_id": product_id })),
            None,
            None,
        )
        .await
    }

    /// Revokes a product-group grant.
    pub async fn delete_product_group(&self, id: u64) -> DojoResponse {
        self.dispatch(
            Method::DELETE,
            &format!("product_groups/{id}/"),
            None,
            None,
            None,
        )
        .await
    }
}
