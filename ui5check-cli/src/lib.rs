//! Library half of the `ui5check` binary: config discovery and CI integration.

pub mod config;
pub mod github;
