//! User and user-contact-info operations.

use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crate::client::{fields, DojoClient};
use crate::response::DojoResponse;

use super::{collect_strings, find_id, DEFAULT_LIMIT};

/// Filters for listing users.
#[derive(Debug, Clone, Serialize)]
pub struct UserQuery {
    /// Search by username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Search by email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Number of records to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            username: None,
            email: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

/// Fields for creating a user.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl NewUser {
    /// A new active, non-superuser account.
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            is_active: true,
            is_superuser: None,
            first_name: None,
            last_name: None,
            email: None,
        }
    }
}

/// Fields for amending a user. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Filters for listing user contact infos.
#[derive(Debug, Clone, Serialize)]
pub struct ContactInfoQuery {
    #[serde(rename = "user", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_execution: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefetch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for ContactInfoQuery {
    fn default() -> Self {
        Self {
            user_id: None,
            slack_username: None,
            slack_user_id: None,
            block_execution: None,
            cell_number: None,
            github_username: None,
            twitter_username: None,
            title: None,
            prefetch: None,
            offset: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

/// Contact info fields tied to a user.
#[derive(Debug, Clone, Serialize)]
pub struct ContactInfo {
    pub user: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_execution: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_password_reset: Option<bool>,
}

impl ContactInfo {
    pub fn for_user(user: u64) -> Self {
        Self {
            user,
            title: None,
            phone_number: None,
            cell_number: None,
            twitter_username: None,
            github_username: None,
            slack_username: None,
            slack_user_id: None,
            block_execution: None,
            force_password_reset: None,
        }
    }
}

impl DojoClient {
    /// Retrieves users, optionally filtered by username or email.
    pub async fn list_users(&self, query: &UserQuery) -> DojoResponse {
        self.dispatch(Method::GET, "users/", fields(query), None, None)
            .await
    }

    /// Retrieves a user using the given user id.
    pub async fn get_user(&self, user_id: u64) -> DojoResponse {
        self.dispatch(Method::GET, &format!("users/{user_id}/"), None, None, None)
            .await
    }

    /// Creates a user account.
    pub async fn create_user(&self, user: &NewUser) -> DojoResponse {
        self.dispatch(Method::POST, "users/", None, fields(user), None)
            .await
    }

    /// Amends a user account.
    pub async fn patch_user(&self, user_id: u64, update: &UserUpdate) -> DojoResponse {
        self.dispatch(
            Method::PATCH,
            &format!("users/{user_id}/"),
            None,
            fields(update),
            None,
        )
        .await
    }

    /// Deletes a user using the given user id.
    pub async fn delete_user(&self, user_id: u64) -> DojoResponse {
        self.dispatch(Method::DELETE, &format!("users/{user_id}/"), None, None, None)
            .await
    }

    /// Checks what would be removed if the user were deleted.
    pub async fn user_delete_preview(&self, user_id: u64) -> DojoResponse {
        self.dispatch(
            Method::GET,
            &format!("users/{user_id}/delete_preview/"),
            Some(json!({ "limit": 2000 })),
            None,
            None,
        )
        .await
    }

    /// Looks up a user id by exact username.
    pub async fn get_user_id_by_name(&self, username: &str) -> Option<u64> {
        let query = UserQuery {
            username: Some(username.to_string()),
            ..Default::default()
        };
        let response = self.list_users(&query).await;
        find_id(response.results()?, "username", username)
    }

    /// Looks up a user id by exact email address.
    pub async fn get_user_id_by_email(&self, email: &str) -> Option<u64> {
        let query = UserQuery {
            email: Some(email.to_string()),
            ..Default::default()
        };
        let response = self.list_users(&query).await;
        find_id(response.results()?, "email", email)
    }

    /// All usernames known to the server.
    pub async fn list_usernames(&self) -> Vec<String> {
        collect_strings(self.list_users(&UserQuery::default()).await, "username")
    }

    /// All user email addresses known to the server.
    pub async fn list_user_emails(&self) -> Vec<String> {
        collect_strings(self.list_users(&UserQuery::default()).await, "email")
    }

    /// Retrieves contact infos, optionally filtered.
    pub async fn list_user_contact_infos(&self, query: &ContactInfoQuery) -> DojoResponse {
        self.dispatch(Method::GET, "user_contact_infos/", fields(query), None, None)
            .await
    }

    /// Retrieves a contact info record by id.
    pub async fn get_user_contact_info(&self, id: u64) -> DojoResponse {
        self.dispatch(
            Method::GET,
            &format!("user_contact_infos/{id}/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Sets a user's contact info.
    pub async fn create_user_contact_info(&self, info: &ContactInfo) -> DojoResponse {
        self.dispatch(Method::POST, "user_contact_infos/", None, fields(info), None)
            .await
    }

    /// Amends an existing contact info record.
    pub async fn update_user_contact_info(&self, id: u64, info: &ContactInfo) -> DojoResponse {
        self.dispatch(
            Method::PATCH,
            &format!("user_contact_infos/{id}/"),
            None,
            fields(info),
            None,
        )
        .await
    }
}
