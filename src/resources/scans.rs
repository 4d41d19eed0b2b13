//! Scan upload and re-upload operations.
//!
//! These endpoints take multipart form bodies: scan-file bytes alongside
//! string-typed metadata parts. The dispatcher leaves content-type
//! negotiation to the transport so the multipart boundary is set
//! correctly.

use std::path::PathBuf;

use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tokio::fs;

use crate::client::DojoClient;
use crate::error::Result;
use crate::response::DojoResponse;

use super::Severity;

/// Fields for uploading a scan file to an engagement.
#[derive(Debug, Clone)]
pub struct ScanUpload {
    pub engagement: u64,
    /// Scan type as the service names it (e.g. "ZAP Scan").
    pub scan_type: String,
    pub active: bool,
    pub verified: bool,
    pub close_old_findings: bool,
    pub skip_duplicates: bool,
    pub scan_date: NaiveDate,
    /// Path to the scan file; metadata-only imports may omit it.
    pub file: Option<PathBuf>,
    pub tags: Option<String>,
    pub build_id: Option<String>,
    pub minimum_severity: Severity,
    pub deduplication_on_engagement: bool,
    pub close_old_findings_product_scope: bool,
}

impl ScanUpload {
    pub fn new(engagement: u64, scan_type: &str, scan_date: NaiveDate) -> Self {
        Self {
            engagement,
            scan_type: scan_type.to_string(),
            active: true,
            verified: false,
            close_old_findings: false,
            skip_duplicates: false,
            scan_date,
            file: None,
            tags: None,
            build_id: None,
            minimum_severity: Severity::Low,
            deduplication_on_engagement: true,
            close_old_findings_product_scope: false,
        }
    }
}

/// Fields for re-uploading a scan file to an existing test, or creating
/// the context on the fly (`auto_create_context` with the product and
/// engagement name fields).
#[derive(Debug, Clone)]
pub struct ScanReupload {
    /// Path to the scan file.
    pub file: PathBuf,
    pub scan_type: String,
    pub test: Option<u64>,
    pub active: Option<bool>,
    pub verified: Option<bool>,
    pub scan_date: Option<NaiveDate>,
    pub tags: Option<String>,
    pub do_not_reactivate: Option<bool>,
    pub endpoint_to_add: Option<u64>,
    pub product_type_name: Option<String>,
    pub product_name: Option<String>,
    pub engagement_name: Option<String>,
    pub engagement_end_date: Option<NaiveDate>,
    pub source_code_management_uri: Option<String>,
    pub test_title: Option<String>,
    pub auto_create_context: Option<bool>,
    pub deduplication_on_engagement: Option<bool>,
    pub push_to_jira: Option<bool>,
    pub close_old_findings: Option<bool>,
    pub close_old_findings_product_scope: Option<bool>,
    pub build_id: Option<String>,
    pub api_scan_configuration: Option<u64>,
    pub service: Option<String>,
    pub environment: Option<String>,
    pub lead: Option<u64>,
    pub group_by: Option<String>,
    pub auto_group_by: Option<String>,
    pub create_finding_groups_for_all_findings: Option<bool>,
    pub engagement_id: Option<u64>,
    pub product_id: Option<u64>,
    pub product_type_id: Option<u64>,
    pub version: Option<String>,
    pub branch_tag: Option<String>,
    pub commit_hash: Option<String>,
    pub minimum_severity: Severity,
}

impl ScanReupload {
    pub fn new(file: impl Into<PathBuf>, scan_type: &str) -> Self {
        Self {
            file: file.into(),
            scan_type: scan_type.to_string(),
            test: None,
            active: None,
            verified: None,
            scan_date: None,
            tags: None,
            do_not_reactivate: None,
            endpoint_to_add: None,
            product_type_name: None,
            product_name: None,
            engagement_name: None,
            engagement_end_date: None,
            source_code_management_uri: None,
            test_title: None,
            auto_create_context: None,
            deduplication_on_engagement: None,
            push_to_jira: None,
            close_old_findings: None,
            close_old_findings_product_scope: None,
            build_id: None,
            api_scan_configuration: None,
            service: None,
            environment: None,
            lead: None,
            group_by: None,
            auto_group_by: None,
            create_finding_groups_for_all_findings: None,
            engagement_id: None,
            product_id: None,
            product_type_id: None,
            version: None,
            branch_tag: None,
            commit_hash: None,
            minimum_severity: Severity::Info,
        }
    }
}

impl DojoClient {
    /// Uploads and processes a scan file.
    ///
    /// # Errors
    ///
    /// Fails only when the scan file cannot be read; the request outcome
    /// itself is reported through the envelope.
    pub async fn upload_scan(&self, upload: &ScanUpload) -> Result<DojoResponse> {
        let mut form = Form::new()
            .text("engagement", upload.engagement.to_string())
            .text("scan_type", upload.scan_type.clone())
            .text("active", upload.active.to_string())
            .text("verified", upload.verified.to_string())
            .text("close_old_findings", upload.close_old_findings.to_string())
            .text("skip_duplicates", upload.skip_duplicates.to_string())
            .text("scan_date", upload.scan_date.to_string())
            .text("build_id", upload.build_id.clone().unwrap_or_default())
            .text("minimum_severity", upload.minimum_severity.to_string())
            .text(
                "deduplication_on_engagement",
                upload.deduplication_on_engagement.to_string(),
            )
            .text(
                "close_old_findings_product_scope",
                upload.close_old_findings_product_scope.to_string(),
            );

        if let Some(tags) = &upload.tags {
            form = form.text("tags", tags.clone());
        }
        if let Some(path) = &upload.file {
            form = form.part("file", file_part(path).await?);
        }

        Ok(self
            .dispatch(Method::POST, "import-scan/", None, None, Some(form))
            .await)
    }

    /// Re-uploads and processes a scan file.
    ///
    /// # Errors
    ///
    /// Fails only when the scan file cannot be read.
    pub async fn reupload_scan(&self, upload: &ScanReupload) -> Result<DojoResponse> {
        let mut form = Form::new()
            .text("scan_type", upload.scan_type.clone())
            .text("minimum_severity", upload.minimum_severity.to_string())
            .part("file", file_part(&upload.file).await?);

        form = opt_number(form, "test", upload.test);
        form = opt_bool(form, "active", upload.active);
        form = opt_bool(form, "verified", upload.verified);
        form = opt_text(form, "scan_date", upload.scan_date.map(|d| d.to_string()));
        form = opt_text(form, "tags", upload.tags.clone());
        form = opt_bool(form, "do_not_reactivate", upload.do_not_reactivate);
        form = opt_number(form, "endpoint_to_add", upload.endpoint_to_add);
        form = opt_text(form, "product_type_name", upload.product_type_name.clone());
        form = opt_text(form, "product_name", upload.product_name.clone());
        form = opt_text(form, "engagement_name", upload.engagement_name.clone());
        form = opt_text(
            form,
            "engagement_end_date",
            upload.engagement_end_date.map(|d| d.to_string()),
        );
        form = opt_text(
            form,
            "source_code_management_uri",
            upload.source_code_management_uri.clone(),
        );
        form = opt_text(form, "test_title", upload.test_title.clone());
        form = opt_bool(form, "auto_create_context", upload.auto_create_context);
        form = opt_bool(
            form,
            "deduplication_on_engagement",
            upload.deduplication_on_engagement,
        );
        form = opt_bool(form, "push_to_jira", upload.push_to_jira);
        form = opt_bool(form, "close_old_findings", upload.close_old_findings);
        form = opt_bool(
            form,
            "close_old_findings_product_scope",
            upload.close_old_findings_product_scope,
        );
        form = opt_text(form, "build_id", upload.build_id.clone());
        form = opt_number(form, "api_scan_configuration", upload.api_scan_configuration);
        form = opt_text(form, "service", upload.service.clone());
        form = opt_text(form, "environment", upload.environment.clone());
        form = opt_number(form, "lead", upload.lead);
        form = opt_text(form, "group_by", upload.group_by.clone());
        form = opt_text(form, "auto_group_by", upload.auto_group_by.clone());
        form = opt_bool(
            form,
            "create_finding_groups_for_all_findings",
            upload.create_finding_groups_for_all_findings,
        );
        form = opt_number(form, "engagement_id", upload.engagement_id);
        form = opt_number(form, "product_id", upload.product_id);
        form = opt_number(form, "product_type_id", upload.product_type_id);
        form = opt_text(form, "version", upload.version.clone());
        form = opt_text(form, "branch_tag", upload.branch_tag.clone());
        form = opt_text(form, "commit_hash", upload.commit_hash.clone());

        Ok(self
            .dispatch(Method::POST, "reimport-scan/", None, None, Some(form))
            .await)
    }

    /// Uploads build metadata (commit file changes) to an engagement.
    /// The payload is a JSON document sent as a file part.
    pub async fn upload_build_details(
        &self,
        engagement_id: u64,
        build_json: &str,
    ) -> DojoResponse {
        let form = Form::new()
            .text("engagement", engagement_id.to_string())
            .part("file", Part::text(build_json.to_string()));
        self.dispatch(Method::POST, "build_details/", None, None, Some(form))
            .await
    }
}

/// Read the scan file into memory (exactly once) and wrap it as a named
/// multipart part.
async fn file_part(path: &std::path::Path) -> Result<Part> {
    let bytes = fs::read(path).await?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scan".to_string());
    Ok(Part::bytes(bytes).file_name(name))
}

fn opt_text(form: Form, key: &'static str, value: Option<String>) -> Form {
    match value {
        Some(value) => form.text(key, value),
        None => form,
    }
}

fn opt_bool(form: Form, key: &'static str, value: Option<bool>) -> Form {
    opt_text(form, key, value.map(|v| v.to_string()))
}

fn opt_number(form: Form, key: &'static str, value: Option<u64>) -> Form {
    opt_text(form, key, value.map(|v| v.to_string()))
}
