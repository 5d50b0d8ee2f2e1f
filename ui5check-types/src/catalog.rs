use crate::version::Version;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Date-window facts derived from a `Q<n>/<year>` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EocpInfo {
    /// True while the quarter's last day still lies ahead of "now".
    ///
    /// The name follows the published overview; it reads as "provisioning not yet ended".
    pub has_passed_eocp: bool,

    /// True when "now" lies strictly between the quarter's first and last day.
    pub in_eocp_quarter: bool,

    /// Day span between the quarter's first and last day (quarter length, not a countdown).
    pub remaining_days: i64,

    /// Last calendar day of the quarter (UTC).
    pub eocp_date: NaiveDate,
}

/// One supported major.minor line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogLine {
    /// The line's version string as published, e.g. `1.132.*`.
    pub raw: String,

    /// Coerced version; only major and minor are meaningful.
    pub version: Version,

    pub is_lts: bool,
    pub is_out_of_maintenance: bool,

    /// Published patch numbers of this line.
    #[serde(default)]
    pub allowed_patches: BTreeSet<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eocp_info: Option<EocpInfo>,
}

impl CatalogLine {
    pub fn key(&self) -> String {
        self.version.line_key()
    }

    pub fn latest_patch(&self) -> Option<u64> {
        self.allowed_patches.last().copied()
    }
}

/// One published patch-level version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPatch {
    pub version: Version,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eocp_info: Option<EocpInfo>,
}

/// Lookup structures built once per run from the overview document.
///
/// Both maps keep the document's order; "first line" selection depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Keyed by `major.minor`.
    pub lines: IndexMap<String, CatalogLine>,

    /// Keyed by the published full version string.
    pub patches: IndexMap<String, CatalogPatch>,
}

impl Catalog {
    pub fn line(&self, version: &Version) -> Option<&CatalogLine> {
        self.lines.get(&version.line_key())
    }

    pub fn first_line(&self) -> Option<&CatalogLine> {
        self.lines.values().next()
    }

    pub fn first_lts_line(&self) -> Option<&CatalogLine> {
        self.lines.values().find(|l| l.is_lts)
    }

    /// True when at least one published patch belongs to the version's major.minor line.
    pub fn has_patch_in_line(&self, version: &Version) -> bool {
        self.patches.values().any(|p| p.version.same_line(version))
    }
}
