//! Error types for ui5check-domain.
//!
//! Every variant here is fatal for the run. Per-manifest problems (unknown line, stale patch,
//! missing declaration) are outcomes recorded on the result, not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    /// The overview document could not be obtained or parsed.
    #[error("failed to load UI5 versions: {message}")]
    CatalogFetch { message: String },

    /// The overview parsed but holds no usable version line.
    #[error("No UI5 versions found in response")]
    EmptyCatalog,

    /// Repair was requested but no line qualifies as a target.
    #[error("No valid {kind}UI5 version found to update", kind = lts_label(.lts))]
    NoEligibleVersion { lts: bool },

    /// A manifest could not be read or is not valid JSON.
    #[error("failed to read manifest {path}: {message}")]
    ManifestRead { path: String, message: String },
}

fn lts_label(lts: &bool) -> &'static str {
    if *lts { "LTS " } else { "" }
}
