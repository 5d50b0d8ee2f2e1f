//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;
use ui5check_types::overview::VersionOverview;

/// Source of the published version overview document.
pub trait CatalogSource {
    fn load_catalog(&self) -> anyhow::Result<VersionOverview>;

    /// Where the document comes from, for logs.
    fn describe(&self) -> String;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
