//! SLA configuration and system settings operations.

use reqwest::Method;
use serde::Serialize;

use crate::client::{fields, DojoClient};
use crate::response::DojoResponse;

/// Remediation deadlines in days, per severity level.
#[derive(Debug, Clone, Serialize)]
pub struct SlaConfiguration {
    pub name: String,
    pub description: String,
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

/// Fields for amending an SLA configuration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SlaConfigurationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<u32>,
}

/// The full system settings record, replaced wholesale with PUT.
///
/// Defaults mirror a stock installation: audit log, benchmarks and
/// finding SLAs on, integrations off.
#[derive(Debug, Clone, Serialize)]
pub struct SystemSettings {
    pub enable_slack_notifications: bool,
    pub enable_auditlog: bool,
    pub enable_deduplication: bool,
    pub delete_duplicates: bool,
    pub max_dupes: u32,
    pub enable_jira: bool,
    pub s_finding_severity_naming: bool,
    pub false_positive_history: bool,
    pub display_endpoint_uri: bool,
    pub enable_benchmark: bool,
    pub enable_template_match: bool,
    pub engagement_auto_close: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_auto_close_days: Option<u32>,
    pub enable_product_grade: bool,
    pub product_grade_a: bool,
    pub product_grade_b: bool,
    pub product_grade_c: bool,
    pub product_grade_d: bool,
    pub product_grade_f: bool,
    pub enable_finding_sla: bool,
    pub sla_critical: u32,
    pub sla_high: u32,
    pub sla_medium: u32,
    pub sla_low: u32,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            enable_slack_notifications: false,
            enable_auditlog: true,
            enable_deduplication: false,
            delete_duplicates: false,
            max_dupes: 0,
            enable_jira: false,
            s_finding_severity_naming: false,
            false_positive_history: false,
            display_endpoint_uri: false,
            enable_benchmark: true,
            enable_template_match: false,
            engagement_auto_close: false,
            engagement_auto_close_days: None,
            enable_product_grade: false,
            product_grade_a: false,
            product_grade_b: false,
            product_grade_c: false,
            product_grade_d: false,
            product_grade_f: false,
            enable_finding_sla: true,
            sla_critical: 30,
            sla_high: 60,
            sla_medium: 90,
            sla_low: 180,
        }
    }
}

/// Fields for amending the system settings. Unset fields are left
/// untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemSettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_auditlog: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_deduplication: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_duplicates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_dupes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_jira: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s_finding_severity_naming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub false_positive_history: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_endpoint_uri: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_benchmark: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_template_match: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_auto_close: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_auto_close_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_product_grade: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_grade_a: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_grade_b: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_grade_c: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_grade_d: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_grade_f: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_finding_sla: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla_critical: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla_high: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla_medium: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla_low: Option<u32>,
}

impl DojoClient {
    /// Retrieves all SLA configurations.
    pub async fn get_sla_configurations(&self) -> DojoResponse {
        self.dispatch(Method::GET, "sla_configurations/", None, None, None)
            .await
    }

    /// Creates an SLA configuration.
    pub async fn create_sla_configuration(
        &self,
        configuration: &SlaConfiguration,
    ) -> DojoResponse {
        self.dispatch(
            Method::POST,
            "sla_configurations/",
            None,
            fields(configuration),
            None,
        )
        .await
    }

    /// Replaces an SLA configuration's fields.
    pub async fn update_sla_configuration(
        &self,
        id: u64,
        update: &SlaConfigurationUpdate,
    ) -> DojoResponse {
        self.dispatch(
            Method::PUT,
            &format!("sla_configurations/{id}/"),
            None,
            fields(update),
            None,
        )
        .await
    }

    /// Retrieves the system settings.
    pub async fn get_system_settings(&self) -> DojoResponse {
        self.dispatch(Method::GET, "system_settings/", None, None, None)
            .await
    }

    /// Replaces the system settings record (the singleton row `1`).
    pub async fn update_system_settings(&self, settings: &SystemSettings) -> DojoResponse {
        self.dispatch(
            Method::PUT,
            "system_settings/1/",
            None,
            fields(settings),
            None,
        )
        .await
    }

    /// Amends individual system settings.
    pub async fn patch_system_settings(&self, update: &SystemSettingsUpdate) -> DojoResponse {
        self.dispatch(
            Method::PATCH,
            "system_settings/1/",
            None,
            fields(update),
            None,
        )
        .await
    }
}
