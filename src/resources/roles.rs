//! Role and global-role operations.

use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crate::client::{fields, DojoClient};
use crate::response::DojoResponse;

use super::DEFAULT_LIMIT;

/// A user's assignment to a global role.
///
/// `group` and `role` are serialized even when unset: the service treats
/// an explicit null as "clear the value", which is what the assignment
/// endpoints expect.
#[derive(Debug, Clone, Serialize)]
pub struct GlobalRoleAssignment {
    pub user: u64,
    pub group: Option<u64>,
    pub role: Option<u64>,
}

impl DojoClient {
    /// Retrieves all roles (Maintainer, Owner, ...).
    pub async fn list_roles(&self) -> DojoResponse {
        self.dispatch(
            Method::GET,
            "roles/",
            Some(json!({ "limit": DEFAULT_LIMIT })),
            None,
            None,
        )
        .await
    }

    /// Retrieves all global-role assignments.
    pub async fn list_global_roles(&self) -> DojoResponse {
        self.dispatch(
            Method::GET,
            "global_roles/",
            Some(json!({ "limit": DEFAULT_LIMIT })),
            None,
            None,
        )
        .await
    }

    /// Adds a user to a global role.
    pub async fn assign_global_role(&self, assignment: &GlobalRoleAssignment) -> DojoResponse {
        self.dispatch(Method::POST, "global_roles/", None, fields(assignment), None)
            .await
    }

    /// Amends an existing global-role assignment.
    pub async fn update_global_role(
        &self,
        id: u64,
        assignment: &GlobalRoleAssignment,
    ) -> DojoResponse {
        self.dispatch(
            Method::PATCH,
            &format!("global_roles/{id}/"),
            None,
            fields(assignment),
            None,
        )
        .await
    }
}
