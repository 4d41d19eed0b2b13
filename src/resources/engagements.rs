//! Engagement operations.

use chrono::NaiveDate;
use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crate::client::{fields, DojoClient};
use crate::response::DojoResponse;

use super::DEFAULT_LIMIT;

/// Filters for listing engagements.
#[derive(Debug, Clone, Serialize)]
pub struct EngagementQuery {
    /// Engagement status: In Progress, On Hold, Completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "product", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for EngagementQuery {
    fn default() -> Self {
        Self {
            status: None,
            product_id: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

/// Fields for creating an engagement.
#[derive(Debug, Clone, Serialize)]
pub struct NewEngagement {
    pub name: String,
    /// Product the engagement belongs to.
    pub product: u64,
    /// Testing lead, from the user table.
    pub lead: u64,
    /// Engagement status: In Progress, On Hold, Completed.
    pub status: String,
    pub target_start: NaiveDate,
    pub target_end: NaiveDate,
    pub active: bool,
    pub pen_test: bool,
    pub check_list: bool,
    pub threat_model: bool,
    pub risk_path: String,
    /// Test strategy URLs.
    pub test_strategy: String,
    /// Progress measured in percent.
    pub progress: String,
    pub done_testing: bool,
    /// Interactive or CI/CD.
    pub engagement_type: String,
    pub deduplication_on_engagement: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Build id from the build server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_tag: Option<String>,
    /// Tool configuration id of the build server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_server: Option<u64>,
    /// Tool configuration id of the source code management server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_code_management_server: Option<u64>,
    /// Link to the source code commit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_code_management_uri: Option<String>,
    /// Tool configuration id of the orchestration engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orchestration_engine: Option<u64>,
}

impl NewEngagement {
    /// An active CI/CD engagement with deduplication enabled.
    pub fn new(
        name: &str,
        product: u64,
        lead: u64,
        status: &str,
        target_start: NaiveDate,
        target_end: NaiveDate,
    ) -> Self {
        Self {
            name: name.to_string(),
            product,
            lead,
            status: status.to_string(),
            target_start,
            target_end,
            active: true,
            pen_test: false,
            check_list: false,
            threat_model: false,
            risk_path: String::new(),
            test_strategy: String::new(),
            progress: String::new(),
            done_testing: false,
            engagement_type: "CI/CD".to_string(),
            deduplication_on_engagement: true,
            description: None,
            build_id: None,
            commit_hash: None,
            branch_tag: None,
            build_server: None,
            source_code_management_server: None,
            source_code_management_uri: None,
            orchestration_engine: None,
        }
    }
}

/// Fields for amending an engagement. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngagementUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "product", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,
    #[serde(rename = "lead", skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_end: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pen_test: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_list: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat_model: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done_testing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_code_management_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_tag: Option<String>,
}

impl DojoClient {
    /// Retrieves engagements, optionally filtered by status or product.
    pub async fn list_engagements(&self, query: &EngagementQuery) -> DojoResponse {
        self.dispatch(Method::GET, "engagements/", fields(query), None, None)
            .await
    }

    /// Retrieves an engagement using the given engagement id.
    pub async fn get_engagement(&self, engagement_id: u64) -> DojoResponse {
        self.dispatch(
            Method::GET,
            &format!("engagements/{engagement_id}/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Creates an engagement with the given properties.
    pub async fn create_engagement(&self, engagement: &NewEngagement) -> DojoResponse {
        self.dispatch(Method::POST, "engagements/", None, fields(engagement), None)
            .await
    }

    /// Amends an engagement.
    pub async fn update_engagement(
        &self,
        engagement_id: u64,
        update: &EngagementUpdate,
    ) -> DojoResponse {
        self.dispatch(
            Method::PATCH,
            &format!("engagements/{engagement_id}/"),
            None,
            fields(update),
            None,
        )
        .await
    }

    /// Closes an engagement.
    pub async fn close_engagement(&self, engagement_id: u64) -> DojoResponse {
        self.dispatch(
            Method::POST,
            &format!("engagements/{engagement_id}/close/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Deletes an engagement using the given engagement id.
    pub async fn delete_engagement(&self, engagement_id: u64) -> DojoResponse {
        self.dispatch(
            Method::DELETE,
            &format!("engagements/{engagement_id}/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Generates an engagement report. A non-`full` report excludes
    /// notes, images and the table of contents.
    pub async fn generate_engagement_report(
        &self,
        engagement_id: u64,
        full: bool,
        include_executive_summary: bool,
    ) -> DojoResponse {
        let mut body = json!({ "include_executive_summary": include_executive_summary });
        if !full {
            body["include_finding_notes"] = json!(false);
            body["include_finding_images"] = json!(false);
            body["include_table_of_contents"] = json!(false);
        }
        self.dispatch(
            Method::POST,
            &format!("engagements/{engagement_id}/generate_report/"),
            None,
            Some(body),
            None,
        )
        .await
    }

    /// Ids of all active engagements belonging to a product.
    pub async fn list_engagement_ids_by_product(&self, product_id: u64) -> Vec<u64> {
        let response = self.list_engagements(&EngagementQuery::default()).await;
        response
            .results()
            .map(|results| {
                results
                    .iter()
                    .filter(|engagement| {
                        engagement.get("product").and_then(|p| p.as_u64()) == Some(product_id)
                            && engagement.get("active").and_then(|a| a.as_bool()) != Some(false)
                    })
                    .filter_map(|engagement| engagement.get("id")?.as_u64())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Looks up an active engagement by name within a product. Returns
    /// the id only when exactly one engagement matches.
    pub async fn get_engagement_id_by_name(
        &self,
        engagement_name: &str,
        product_id: u64,
    ) -> Option<u64> {
        let response = self.list_engagements(&EngagementQuery::default()).await;
        let matches: Vec<u64> = response
            .results()?
            .iter()
            .filter(|engagement| {
                engagement.get("product").and_then(|p| p.as_u64()) == Some(product_id)
                    && engagement.get("active").and_then(|a| a.as_bool()) != Some(false)
                    && engagement.get("name").and_then(|n| n.as_str()) == Some(engagement_name)
            })
            .filter_map(|engagement| engagement.get("id")?.as_u64())
            .collect();
        match matches.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }
}
