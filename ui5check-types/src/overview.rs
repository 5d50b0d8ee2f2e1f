use serde::{Deserialize, Serialize};

/// Support state literal used by the overview for maintained lines.
pub const SUPPORT_MAINTENANCE: &str = "Maintenance";

/// The published version overview document.
///
/// Reading is tolerant:
/// - Unknown fields are ignored.
/// - Missing lists deserialize as empty.
///
/// Whether an empty `versions` list is acceptable is decided by the catalog builder, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionOverview {
    #[serde(default)]
    pub versions: Vec<VersionEntry>,

    #[serde(default)]
    pub patches: Vec<PatchEntry>,
}

/// One major.minor line, e.g. `1.132.*`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: String,

    /// "Maintenance" or "Out of maintenance".
    #[serde(default)]
    pub support: String,

    #[serde(default)]
    pub lts: bool,

    /// End of maintenance label, e.g. `Q4/2026`.
    #[serde(default)]
    pub eom: String,

    /// End of cloud provisioning label, e.g. `Q2/2027`.
    #[serde(default)]
    pub eocp: String,
}

impl VersionEntry {
    pub fn is_out_of_maintenance(&self) -> bool {
        self.support != SUPPORT_MAINTENANCE
    }
}

/// One fully qualified published patch, e.g. `1.132.1`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchEntry {
    pub version: String,

    #[serde(default)]
    pub eocp: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

impl PatchEntry {
    /// Removed or hidden patches are not offered for provisioning.
    pub fn is_published(&self) -> bool {
        !self.removed.unwrap_or(false) && !self.hidden.unwrap_or(false)
    }
}
