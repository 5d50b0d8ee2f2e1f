//! Embeddable core library for ui5check.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking
//! into other hosts (a CI action wrapper, an editor integration).
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits:
//! - [`CatalogSource`](ports::CatalogSource) loads the published version overview
//! - [`WritePort`](ports::WritePort) writes files and creates directories
//! - [`RepoView`] reads manifests relative to the repository root
//!
//! The [`adapters`] module provides filesystem and HTTP backed implementations.
//!
//! # Entry points
//!
//! - [`run_check`](pipeline::run_check) checks (and optionally repairs) manifests
//! - [`load_catalog`](pipeline::load_catalog) builds the catalog on its own

pub mod adapters;
pub mod discover;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use ui5check_domain::{CheckError, FsRepoView, RepoView};
