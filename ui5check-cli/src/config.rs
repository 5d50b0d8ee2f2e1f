//! Configuration file loading for ui5check.
//!
//! Discovers and loads `ui5check.toml` from the repository root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;
use ui5check_core::settings::CatalogLocation;
use ui5check_domain::CheckConfig;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "ui5check.toml";

pub const DEFAULT_OUT_DIR: &str = "artifacts/ui5check";

/// Top-level configuration from ui5check.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Ui5CheckConfig {
    pub check: CheckSection,
    pub catalog: CatalogSection,
    pub output: OutputSection,
}

/// Check section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckSection {
    /// Directory glob patterns, each expanded as `<pattern>/manifest.json`.
    pub manifest_paths: Vec<String>,

    /// Rewrite outdated declarations instead of failing.
    pub fix_outdated: bool,

    /// Repair towards the first LTS line.
    pub use_lts: bool,

    /// Accept out-of-maintenance lines without an advisory.
    pub eom_allowed: bool,

    pub allowed_days_before_eocp: u32,
}

impl Default for CheckSection {
    fn default() -> Self {
        let check = CheckConfig::default();
        Self {
            manifest_paths: Vec::new(),
            fix_outdated: check.fix_outdated,
            use_lts: check.use_lts,
            eom_allowed: check.eom_allowed,
            allowed_days_before_eocp: check.allowed_days_before_eocp,
        }
    }
}

/// Catalog section of the config. `file` wins over `url` when both are set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSection {
    pub url: Option<String>,
    pub file: Option<Utf8PathBuf>,
}

/// Output section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub dir: Utf8PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: Utf8PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

/// Discover the ui5check.toml config file.
///
/// Returns `None` if no config file is found at the repository root.
pub fn discover_config(repo_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = repo_root.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a ui5check.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<Ui5CheckConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<Ui5CheckConfig> {
    let config: Ui5CheckConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from repo root, or return default if not found.
pub fn load_or_default(repo_root: &Utf8Path) -> anyhow::Result<Ui5CheckConfig> {
    match discover_config(repo_root) {
        Some(path) => load_config(&path),
        None => Ok(Ui5CheckConfig::default()),
    }
}

/// CLI values that can override the config file.
#[derive(Debug, Clone, Default)]
pub struct CheckOverrides {
    pub manifest_paths: Vec<String>,
    pub fix_outdated: bool,
    pub use_lts: bool,
    pub eom_allowed: bool,
    pub allowed_days_before_eocp: Option<u32>,
    pub catalog_url: Option<String>,
    pub catalog_file: Option<Utf8PathBuf>,
    pub out_dir: Option<Utf8PathBuf>,
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    /// Patterns from the config file, extended by CLI patterns.
    pub manifest_paths: Vec<String>,
    pub fix_outdated: bool,
    pub use_lts: bool,
    pub eom_allowed: bool,
    pub allowed_days_before_eocp: u32,
    pub catalog: CatalogLocation,
    /// Output directory as configured; relative paths are resolved by the caller.
    pub out_dir: Utf8PathBuf,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: Ui5CheckConfig,
}

impl ConfigMerger {
    pub fn new(config: Ui5CheckConfig) -> Self {
        Self { config }
    }

    /// Merge with check command CLI arguments.
    ///
    /// CLI patterns extend the config file list, boolean flags OR with the file value, and
    /// scalar values replace it. A CLI catalog choice replaces the file's catalog section.
    pub fn merge_check_args(self, cli: &CheckOverrides) -> MergedConfig {
        let check = self.config.check;

        let mut manifest_paths = check.manifest_paths;
        for pattern in &cli.manifest_paths {
            if !manifest_paths.contains(pattern) {
                manifest_paths.push(pattern.clone());
            }
        }

        MergedConfig {
            manifest_paths,
            fix_outdated: cli.fix_outdated || check.fix_outdated,
            use_lts: cli.use_lts || check.use_lts,
            eom_allowed: cli.eom_allowed || check.eom_allowed,
            allowed_days_before_eocp: cli
                .allowed_days_before_eocp
                .unwrap_or(check.allowed_days_before_eocp),
            catalog: merge_catalog(
                &self.config.catalog,
                cli.catalog_url.clone(),
                cli.catalog_file.clone(),
            ),
            out_dir: cli.out_dir.clone().unwrap_or(self.config.output.dir),
        }
    }

    /// Catalog location for commands that only read the catalog.
    pub fn merge_catalog_args(
        self,
        catalog_url: Option<String>,
        catalog_file: Option<Utf8PathBuf>,
    ) -> CatalogLocation {
        merge_catalog(&self.config.catalog, catalog_url, catalog_file)
    }
}

fn merge_catalog(
    file_cfg: &CatalogSection,
    cli_url: Option<String>,
    cli_file: Option<Utf8PathBuf>,
) -> CatalogLocation {
    if let Some(path) = cli_file {
        return CatalogLocation::File(path);
    }
    if let Some(url) = cli_url {
        return CatalogLocation::Url(url);
    }
    if let Some(path) = &file_cfg.file {
        return CatalogLocation::File(path.clone());
    }
    match &file_cfg.url {
        Some(url) => CatalogLocation::Url(url.clone()),
        None => CatalogLocation::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use ui5check_types::VERSION_OVERVIEW_URL;

    #[test]
    fn test_parse_example_config() {
        let contents = r#"
[check]
manifest_paths = ["app/*/webapp", "router"]
fix_outdated = true
use_lts = true
eom_allowed = false
allowed_days_before_eocp = 45

[catalog]
url = "https://example.test/versionoverview.json"

[output]
dir = "out/ui5"
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(config.check.manifest_paths, vec!["app/*/webapp", "router"]);
        assert!(config.check.fix_outdated);
        assert!(config.check.use_lts);
        assert!(!config.check.eom_allowed);
        assert_eq!(config.check.allowed_days_before_eocp, 45);
        assert_eq!(
            config.catalog.url.as_deref(),
            Some("https://example.test/versionoverview.json")
        );
        assert_eq!(config.output.dir, "out/ui5");
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.check.manifest_paths.is_empty());
        assert!(!config.check.fix_outdated);
        assert_eq!(config.check.allowed_days_before_eocp, 30);
        assert_eq!(config.output.dir, DEFAULT_OUT_DIR);
        assert!(config.catalog.url.is_none());
    }

    #[test]
    fn test_negative_days_are_rejected() {
        let err = parse_config("[check]\nallowed_days_before_eocp = -1\n").unwrap_err();
        assert!(format!("{err:#}").contains("invalid TOML"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(parse_config("[check]\nfixOutdated = true\n").is_err());
    }

    #[test]
    fn test_merge_cli_extends_and_ors() {
        let config = Ui5CheckConfig {
            check: CheckSection {
                manifest_paths: vec!["app".to_string()],
                use_lts: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CheckOverrides {
            manifest_paths: vec!["app".to_string(), "router".to_string()],
            fix_outdated: true,
            allowed_days_before_eocp: Some(10),
            ..Default::default()
        };

        let merged = ConfigMerger::new(config).merge_check_args(&cli);
        assert_eq!(merged.manifest_paths, vec!["app", "router"]);
        assert!(merged.fix_outdated);
        assert!(merged.use_lts);
        assert!(!merged.eom_allowed);
        assert_eq!(merged.allowed_days_before_eocp, 10);
        assert_eq!(merged.out_dir, DEFAULT_OUT_DIR);
        assert_eq!(
            merged.catalog,
            CatalogLocation::Url(VERSION_OVERVIEW_URL.to_string())
        );
    }

    #[test]
    fn test_catalog_precedence() {
        let config = Ui5CheckConfig {
            catalog: CatalogSection {
                url: Some("https://config.test/v.json".to_string()),
                file: None,
            },
            ..Default::default()
        };
        assert_eq!(
            ConfigMerger::new(config.clone()).merge_catalog_args(None, None),
            CatalogLocation::Url("https://config.test/v.json".to_string())
        );
        assert_eq!(
            ConfigMerger::new(config.clone())
                .merge_catalog_args(None, Some(Utf8PathBuf::from("local.json"))),
            CatalogLocation::File(Utf8PathBuf::from("local.json"))
        );
        assert_eq!(
            ConfigMerger::new(config)
                .merge_catalog_args(Some("https://cli.test/v.json".to_string()), None),
            CatalogLocation::Url("https://cli.test/v.json".to_string())
        );
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        assert!(discover_config(&root).is_none());

        fs::write(root.join(CONFIG_FILE_NAME), "[check]\nmanifest_paths = [\"a\"]\n").unwrap();
        assert_eq!(discover_config(&root), Some(root.join(CONFIG_FILE_NAME)));
        let config = load_or_default(&root).unwrap();
        assert_eq!(config.check.manifest_paths, vec!["a"]);
    }

    #[test]
    fn test_load_or_default_returns_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let config = load_or_default(&root).unwrap();
        assert!(config.check.manifest_paths.is_empty());
    }
}
