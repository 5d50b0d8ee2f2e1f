//! Shared DTOs (schemas-as-code) for the ui5check workspace.
//!
//! # Design constraints
//! - The overview types mirror a document published by a third party; reading is tolerant.
//! - The report types are serialized to disk and consumed by other tooling.
//! - Prefer adding optional fields over changing semantics.

pub mod catalog;
pub mod overview;
pub mod report;
pub mod version;

/// Schema identifiers.
pub mod schema {
    pub const UI5CHECK_REPORT_V1: &str = "ui5check.report.v1";
}

/// Location of the published version overview.
pub const VERSION_OVERVIEW_URL: &str = "https://ui5.sap.com/versionoverview.json";

/// Human-readable page listing the versions usable in SAP BTP.
pub const VERSION_OVERVIEW_PAGE: &str = "https://ui5.sap.com/versionoverview.html";
