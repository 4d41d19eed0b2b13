//! Finding operations: search, lifecycle, notes and risk acceptance.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::{fields, DojoClient};
use crate::response::DojoResponse;

use super::DEFAULT_LIMIT;

/// Finding severity levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// The numerical severity tag the service pairs with each level.
    pub fn numerical(self) -> &'static str {
        match self {
            Severity::Info => "S0",
            Severity::Low => "S1",
            Severity::Medium => "S2",
            Severity::High => "S3",
            Severity::Critical => "S4",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Info => "Info",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        };
        f.write_str(name)
    }
}

/// Filters for listing findings. Field names follow the service's filter
/// grammar (`severity__lt`, `date__gt`, ...).
#[derive(Debug, Clone, Serialize)]
pub struct FindingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_mitigated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mitigated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(rename = "severity__lt", skip_serializing_if = "Option::is_none")]
    pub severity_lt: Option<Severity>,
    #[serde(rename = "severity__gt", skip_serializing_if = "Option::is_none")]
    pub severity_gt: Option<Severity>,
    #[serde(rename = "severity__contains", skip_serializing_if = "Option::is_none")]
    pub severity_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "url__contains", skip_serializing_if = "Option::is_none")]
    pub url_contains: Option<String>,
    #[serde(rename = "date__lt", skip_serializing_if = "Option::is_none")]
    pub date_before: Option<NaiveDate>,
    #[serde(rename = "date__gt", skip_serializing_if = "Option::is_none")]
    pub date_after: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "test__engagement", skip_serializing_if = "Option::is_none")]
    pub engagement_id: Option<u64>,
    #[serde(
        rename = "test__engagement__product",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_id: Option<u64>,
    #[serde(rename = "test", skip_serializing_if = "Option::is_none")]
    pub test_id: Option<u64>,
    #[serde(rename = "build_id__contains", skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_fields: Option<bool>,
    /// Scanner that reported the finding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_by: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for FindingQuery {
    fn default() -> Self {
        Self {
            id: None,
            active: None,
            is_mitigated: None,
            duplicate: None,
            mitigated: None,
            severity: None,
            verified: None,
            severity_lt: None,
            severity_gt: None,
            severity_contains: None,
            title: None,
            url_contains: None,
            date_before: None,
            date_after: None,
            date: None,
            engagement_id: None,
            product_id: None,
            test_id: None,
            build_id: None,
            related_fields: None,
            found_by: None,
            offset: None,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

/// Fields for creating a finding.
#[derive(Debug, Clone, Serialize)]
pub struct NewFinding {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub cwe: u32,
    pub date: NaiveDate,
    pub product: u64,
    pub engagement: u64,
    pub test: u64,
    /// Reporter of the finding, from the user table.
    pub reporter: u64,
    pub impact: String,
    pub active: bool,
    pub verified: bool,
    pub mitigation: String,
    pub references: Option<String>,
    pub build_id: Option<String>,
    pub line: u32,
    pub file_path: Option<String>,
    pub static_finding: bool,
    pub dynamic_finding: bool,
    pub false_p: bool,
    pub duplicate: bool,
    pub out_of_scope: bool,
    pub under_review: bool,
    pub under_defect_review: bool,
    /// Derived from `severity` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numerical_severity: Option<String>,
    pub found_by: Vec<u64>,
    pub tags: Vec<String>,
}

impl NewFinding {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: &str,
        description: &str,
        severity: Severity,
        date: NaiveDate,
        product: u64,
        engagement: u64,
        test: u64,
        reporter: u64,
    ) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            severity,
            cwe: 0,
            date,
            product,
            engagement,
            test,
            reporter,
            impact: String::new(),
            active: true,
            verified: false,
            mitigation: String::new(),
            references: None,
            build_id: None,
            line: 0,
            file_path: None,
            static_finding: false,
            dynamic_finding: false,
            false_p: false,
            duplicate: false,
            out_of_scope: false,
            under_review: false,
            under_defect_review: false,
            numerical_severity: None,
            found_by: Vec::new(),
            tags: Vec::new(),
        }
    }
}

/// Fields for replacing or amending a finding. Unset fields are left
/// untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FindingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwe: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "product", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,
    #[serde(rename = "engagement", skip_serializing_if = "Option::is_none")]
    pub engagement_id: Option<u64>,
    #[serde(rename = "test", skip_serializing_if = "Option::is_none")]
    pub test_id: Option<u64>,
    #[serde(rename = "reporter", skip_serializing_if = "Option::is_none")]
    pub reporter_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_mitigated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mitigation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub false_p: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvssv3_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvssv3: Option<String>,
}

/// A risk acceptance for one vulnerability id.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAcceptance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vulnerability_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_by: Option<String>,
}

/// A note attached to a finding.
#[derive(Debug, Clone, Serialize)]
pub struct NoteEntry {
    pub entry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_type: Option<u64>,
}

impl NoteEntry {
    pub fn new(entry: &str) -> Self {
        Self {
            entry: entry.to_string(),
            private: None,
            note_type: None,
        }
    }
}

/// Fields for closing a finding. `mitigated` defaults to the current
/// time when unset.
#[derive(Debug, Clone, Default)]
pub struct CloseFinding {
    pub mitigated: Option<DateTime<Utc>>,
    pub false_p: bool,
    pub out_of_scope: bool,
    pub duplicate: bool,
}

impl DojoClient {
    /// Returns a filtered list of findings.
    pub async fn list_findings(&self, query: &FindingQuery) -> DojoResponse {
        self.dispatch(Method::GET, "findings/", fields(query), None, None)
            .await
    }

    /// Retrieves a finding using the given finding id.
    pub async fn get_finding(&self, finding_id: u64, related_fields: bool) -> DojoResponse {
        self.dispatch(
            Method::GET,
            &format!("findings/{finding_id}/"),
            Some(json!({ "related_fields": related_fields })),
            None,
            None,
        )
        .await
    }

    /// Creates a finding. The numerical severity is derived from the
    /// severity level unless set explicitly.
    pub async fn create_finding(&self, finding: &NewFinding) -> DojoResponse {
        let mut body = fields(finding).unwrap_or_else(|| json!({}));
        if finding.numerical_severity.is_none() {
            body["numerical_severity"] = Value::from(finding.severity.numerical());
        }
        self.dispatch(Method::POST, "findings/", None, Some(body), None)
            .await
    }

    /// Replaces a finding's fields.
    pub async fn set_finding(&self, finding_id: u64, update: &FindingUpdate) -> DojoResponse {
        self.dispatch(
            Method::PUT,
            &format!("findings/{finding_id}/"),
            None,
            fields(update),
            None,
        )
        .await
    }

    /// Amends a finding's fields.
    pub async fn patch_finding(&self, finding_id: u64, update: &FindingUpdate) -> DojoResponse {
        self.dispatch(
            Method::PATCH,
            &format!("findings/{finding_id}/"),
            None,
            fields(update),
            None,
        )
        .await
    }

    /// Deletes a finding.
    pub async fn delete_finding(&self, finding_id: u64) -> DojoResponse {
        self.dispatch(
            Method::DELETE,
            &format!("findings/{finding_id}/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Marks a finding as mitigated.
    pub async fn close_finding(&self, finding_id: u64, close: &CloseFinding) -> DojoResponse {
        let mitigated = close.mitigated.unwrap_or_else(Utc::now);
        let body = json!({
            "is_mitigated": true,
            "mitigated": mitigated.to_rfc3339(),
            "false_p": close.false_p,
            "out_of_scope": close.out_of_scope,
            "duplicate": close.duplicate,
        });
        self.dispatch(
            Method::POST,
            &format!("findings/{finding_id}/close/"),
            None,
            Some(body),
            None,
        )
        .await
    }

    /// Accepts the risk of the given vulnerabilities. The endpoint takes
    /// an array body.
    pub async fn accept_risks(&self, acceptances: &[RiskAcceptance]) -> DojoResponse {
        let body = serde_json::to_value(acceptances).unwrap_or(Value::Null);
        self.dispatch(Method::POST, "findings/accept_risks/", None, Some(body), None)
            .await
    }

    /// Attaches a note to a finding.
    pub async fn add_finding_note(&self, finding_id: u64, note: &NoteEntry) -> DojoResponse {
        self.dispatch(
            Method::POST,
            &format!("findings/{finding_id}/notes/"),
            None,
            fields(note),
            None,
        )
        .await
    }

    /// Retrieves the notes attached to a finding.
    pub async fn list_finding_notes(&self, finding_id: u64) -> DojoResponse {
        self.dispatch(
            Method::GET,
            &format!("findings/{finding_id}/notes/"),
            None,
            None,
            None,
        )
        .await
    }

    /// Deletes a risk acceptance.
    pub async fn delete_risk_acceptance(&self, id: u64) -> DojoResponse {
        self.dispatch(
            Method::DELETE,
            &format!("risk_acceptance/{id}/"),
            None,
            None,
            None,
        )
        .await
    }
}
