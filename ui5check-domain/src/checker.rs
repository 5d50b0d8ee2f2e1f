use crate::error::CheckError;
use crate::manifest::{Declaration, ManifestVersion, PLATFORM_SECTION, VERSION_KEY, parse_declaration};
use crate::validate::{Validation, validate};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use ui5check_types::catalog::{Catalog, CatalogLine};
use ui5check_types::report::{ManifestCheckResult, ManifestOutcome};

pub const DEFAULT_ALLOWED_DAYS_BEFORE_EOCP: u32 = 30;

#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub fix_outdated: bool,
    pub use_lts: bool,
    /// Suppresses the out-of-maintenance advisory.
    pub eom_allowed: bool,
    /// Window before the end of cloud provisioning in which an advisory is raised.
    pub allowed_days_before_eocp: u32,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            fix_outdated: false,
            use_lts: false,
            eom_allowed: false,
            allowed_days_before_eocp: DEFAULT_ALLOWED_DAYS_BEFORE_EOCP,
        }
    }
}

/// Rewrite the caller should perform for an auto-fixed manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFix {
    pub target_version: String,
    pub lts: bool,
}

/// The decision for one manifest.
///
/// `fix` is set exactly when `result.outcome` is [`ManifestOutcome::AutoFixed`].
#[derive(Debug, Clone)]
pub struct ManifestCheck {
    pub result: ManifestCheckResult,
    pub fix: Option<PlannedFix>,
}

/// Per-run decision engine.
///
/// Holds the run-wide error counter; manifests are checked one at a time in caller order.
pub struct Checker<'a> {
    config: CheckConfig,
    catalog: &'a Catalog,
    now: DateTime<Utc>,
    error_count: u64,
}

impl<'a> Checker<'a> {
    pub fn new(config: CheckConfig, catalog: &'a Catalog, now: DateTime<Utc>) -> Self {
        Self {
            config,
            catalog,
            now,
            error_count: 0,
        }
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Classify one manifest.
    ///
    /// Returns an error only for fatal conditions: unreadable JSON, or repair requested with no
    /// eligible target line.
    pub fn check(&mut self, path: &str, content: &str) -> Result<ManifestCheck, CheckError> {
        let mut result = ManifestCheckResult::new(path);

        let declaration = parse_declaration(content).map_err(|e| CheckError::ManifestRead {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let (raw, parsed) = match declaration {
            Declaration::Absent => {
                result.status_text = format!(
                    "No section '{PLATFORM_SECTION}/{VERSION_KEY}' found. Skipping check"
                );
                info!(path, "no version declaration, skipping");
                return Ok(ManifestCheck { result, fix: None });
            }
            Declaration::Unparseable { raw } => (raw, None),
            Declaration::Found(v) => (v.raw.clone(), Some(v)),
        };
        result.found_version = Some(raw.clone());

        let validation = parsed
            .as_ref()
            .map(|v| validate(v, self.catalog))
            .unwrap_or_default();
        debug!(
            path,
            version = %raw,
            acceptable = validation.acceptable,
            patch_acceptable = validation.patch_acceptable,
            "validated manifest version"
        );

        if validation.patch_acceptable {
            result.outcome = ManifestOutcome::NoChange;
            result.status_text = "No change required".to_string();
            result.advisories = self.advisories(parsed.as_ref());
            return Ok(ManifestCheck { result, fix: None });
        }

        if self.config.fix_outdated {
            let target_version = self.target_version(parsed.as_ref())?;
            info!(path, from = %raw, to = %target_version, "planning version update");
            result.outcome = ManifestOutcome::AutoFixed;
            result.updated_version = Some(target_version.clone());
            return Ok(ManifestCheck {
                result,
                fix: Some(PlannedFix {
                    target_version,
                    lts: self.config.use_lts,
                }),
            });
        }

        self.error_count += 1;
        result.outdated = true;
        result.outcome = ManifestOutcome::Error;
        result.status_text = error_text(path, &raw, parsed.as_ref(), validation);
        result.advisories = self.advisories(parsed.as_ref());
        warn!(path, "{}", result.status_text);

        Ok(ManifestCheck { result, fix: None })
    }

    fn target_line(&self) -> Result<&'a CatalogLine, CheckError> {
        let line = if self.config.use_lts {
            self.catalog.first_lts_line()
        } else {
            self.catalog.first_line()
        };
        line.ok_or(CheckError::NoEligibleVersion {
            lts: self.config.use_lts,
        })
    }

    /// A wildcard declaration stays a wildcard; a pinned one moves to the line's newest patch.
    fn target_version(&self, current: Option<&ManifestVersion>) -> Result<String, CheckError> {
        let line = self.target_line()?;
        let wildcard = current.is_some_and(|v| v.wildcard_patch);

        Ok(match line.latest_patch() {
            Some(patch) if !wildcard => {
                format!("{}.{}.{}", line.version.major, line.version.minor, patch)
            }
            Some(_) => format!("{}.*", line.key()),
            None => line.raw.clone(),
        })
    }

    fn advisories(&self, current: Option<&ManifestVersion>) -> Vec<String> {
        let Some(line) = current.and_then(|v| self.catalog.line(&v.version)) else {
            return vec![];
        };

        let mut out = Vec::new();
        if line.is_out_of_maintenance && !self.config.eom_allowed {
            out.push(format!("Version {} is out of maintenance", line.key()));
        }

        if let Some(info) = &line.eocp_info {
            if !info.has_passed_eocp {
                out.push(format!(
                    "Version {} reached end of cloud provisioning on {}",
                    line.key(),
                    info.eocp_date
                ));
            } else {
                let days_left = (info.eocp_date - self.now.date_naive()).num_days();
                if days_left <= i64::from(self.config.allowed_days_before_eocp) {
                    out.push(format!(
                        "Version {} reaches end of cloud provisioning on {}",
                        line.key(),
                        info.eocp_date
                    ));
                }
            }
        }

        for note in &out {
            warn!(version = %line.key(), "{note}");
        }
        out
    }
}

fn error_text(
    path: &str,
    raw: &str,
    parsed: Option<&ManifestVersion>,
    validation: Validation,
) -> String {
    match parsed {
        Some(v) if validation.acceptable => format!(
            "Patch {} of version {}.{} is not available",
            v.version.patch, v.version.major, v.version.minor
        ),
        _ => format!("Version {raw} in file {path} is invalid or no longer available"),
    }
}

/// Status text for an auto-fixed manifest once the rewrite has been handled.
pub fn updated_status_text(lts: bool, written: bool) -> String {
    let kind = if lts { "LTS " } else { "" };
    if written {
        format!("Version has been updated to latest {kind}version")
    } else {
        format!("Version would be updated to latest {kind}version")
    }
}
