use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: String,
    pub started_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Terminal state of one manifest check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestOutcome {
    /// No version declaration found; never counted as an error.
    Skipped,
    NoChange,
    AutoFixed,
    Error,
}

/// Per-manifest result consumed by the summary renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestCheckResult {
    /// Path relative to the repository root.
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_version: Option<String>,

    pub outdated: bool,
    pub outcome: ManifestOutcome,
    pub status_text: String,

    /// Maintenance and provisioning notes; informational only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_change: Option<FileChange>,
}

impl ManifestCheckResult {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            found_version: None,
            updated_version: None,
            outdated: false,
            outcome: ManifestOutcome::Skipped,
            status_text: "-".to_string(),
            advisories: vec![],
            file_change: None,
        }
    }

    pub fn status_icon(&self) -> &'static str {
        if self.outdated { "❌" } else { "✅" }
    }
}

/// Hashes of a rewritten manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub sha256_before: String,
    pub sha256_after: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pass,
    Warn,
    Fail,
}

/// Run-level report written as `report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,

    #[serde(default)]
    pub dry_run: bool,

    pub status: ReportStatus,

    #[serde(default)]
    pub results: Vec<ManifestCheckResult>,

    /// Manifests rewritten (or, in dry-run, planned for rewriting), in check order.
    #[serde(default)]
    pub updated_files: Vec<String>,

    pub error_count: u64,
    pub has_errors: bool,
}

impl CheckReport {
    pub fn new(tool: ToolInfo, run: RunInfo) -> Self {
        Self {
            schema: crate::schema::UI5CHECK_REPORT_V1.to_string(),
            tool,
            run,
            dry_run: false,
            status: ReportStatus::Pass,
            results: vec![],
            updated_files: vec![],
            error_count: 0,
            has_errors: false,
        }
    }

    /// Recomputes the derived verdict fields from the collected results.
    pub fn finalize(&mut self) {
        self.has_errors = self.error_count > 0;
        let any_advisory = self.results.iter().any(|r| !r.advisories.is_empty());
        self.status = if self.has_errors {
            ReportStatus::Fail
        } else if !self.updated_files.is_empty() || any_advisory {
            ReportStatus::Warn
        } else {
            ReportStatus::Pass
        };
    }
}
