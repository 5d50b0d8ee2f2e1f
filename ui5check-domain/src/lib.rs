//! Domain logic: turn the published version overview + manifest contents into per-manifest
//! decisions.
//!
//! This crate owns *whether* a manifest is acceptable and *what* it should be changed to. It does
//! not own *how* the change is written; that's the `ui5check-edit` crate.

mod catalog;
mod checker;
mod eocp;
mod error;
mod manifest;
mod ports;
mod validate;

pub use catalog::build_catalog;
pub use checker::{CheckConfig, Checker, ManifestCheck, PlannedFix, updated_status_text};
pub use eocp::EocpCalculator;
pub use error::CheckError;
pub use manifest::{
    Declaration, ManifestVersion, PLATFORM_SECTION, VERSION_KEY, parse_declaration,
    parse_version_string,
};
pub use ports::{FsRepoView, RepoView};
pub use validate::{Validation, validate};
