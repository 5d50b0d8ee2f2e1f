//! Clap-free settings for the check pipeline.

use camino::Utf8PathBuf;
use ui5check_domain::CheckConfig;
use ui5check_types::VERSION_OVERVIEW_URL;

/// Where the version overview document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    Url(String),
    File(Utf8PathBuf),
}

impl Default for CatalogLocation {
    fn default() -> Self {
        Self::Url(VERSION_OVERVIEW_URL.to_string())
    }
}

/// Settings for the check pipeline.
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub repo_root: Utf8PathBuf,
    pub out_dir: Utf8PathBuf,

    /// Directory glob patterns; each is expanded as `<pattern>/manifest.json`.
    pub manifest_paths: Vec<String>,

    // Decision
    pub fix_outdated: bool,
    pub use_lts: bool,
    pub eom_allowed: bool,
    pub allowed_days_before_eocp: u32,

    // Apply behaviour
    pub dry_run: bool,

    pub catalog: CatalogLocation,
}

impl CheckSettings {
    pub fn check_config(&self) -> CheckConfig {
        CheckConfig {
            fix_outdated: self.fix_outdated,
            use_lts: self.use_lts,
            eom_allowed: self.eom_allowed,
            allowed_days_before_eocp: self.allowed_days_before_eocp,
        }
    }
}

impl Default for CheckSettings {
    fn default() -> Self {
        let check = CheckConfig::default();
        Self {
            repo_root: Utf8PathBuf::from("."),
            out_dir: Utf8PathBuf::from("artifacts/ui5check"),
            manifest_paths: Vec::new(),
            fix_outdated: check.fix_outdated,
            use_lts: check.use_lts,
            eom_allowed: check.eom_allowed,
            allowed_days_before_eocp: check.allowed_days_before_eocp,
            dry_run: false,
            catalog: CatalogLocation::default(),
        }
    }
}
