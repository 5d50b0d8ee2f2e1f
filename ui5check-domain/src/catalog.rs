use crate::eocp::EocpCalculator;
use crate::error::CheckError;
use std::collections::BTreeSet;
use tracing::{debug, warn};
use ui5check_types::catalog::{Catalog, CatalogLine, CatalogPatch};
use ui5check_types::overview::VersionOverview;
use ui5check_types::version::Version;

/// Build the run's lookup structures from the overview document.
///
/// - Removed or hidden patches are dropped.
/// - Each line collects the patch numbers published for its major.minor.
/// - A repeated major.minor keeps its first position but takes the later entry's data.
pub fn build_catalog(
    doc: &VersionOverview,
    eocp: &mut EocpCalculator,
) -> Result<Catalog, CheckError> {
    if doc.versions.is_empty() {
        return Err(CheckError::EmptyCatalog);
    }

    let mut catalog = Catalog::default();

    for p in doc.patches.iter().filter(|p| p.is_published()) {
        let Some(version) = Version::coerce(&p.version) else {
            debug!(version = %p.version, "skipping patch without a version number");
            continue;
        };
        catalog.patches.insert(
            p.version.clone(),
            CatalogPatch {
                version,
                eocp_info: eocp.info(&p.eocp),
            },
        );
    }

    for v in &doc.versions {
        let Some(version) = Version::coerce(&v.version) else {
            warn!(version = %v.version, "skipping version line without a version number");
            continue;
        };

        let allowed_patches: BTreeSet<u64> = catalog
            .patches
            .values()
            .filter(|p| p.version.same_line(&version))
            .map(|p| p.version.patch)
            .collect();

        let line = CatalogLine {
            raw: v.version.clone(),
            version,
            is_lts: v.lts,
            is_out_of_maintenance: v.is_out_of_maintenance(),
            allowed_patches,
            eocp_info: eocp.info(&v.eocp),
        };
        catalog.lines.insert(line.key(), line);
    }

    if catalog.lines.is_empty() {
        return Err(CheckError::EmptyCatalog);
    }

    debug!(
        lines = catalog.lines.len(),
        patches = catalog.patches.len(),
        "built version catalog"
    );
    Ok(catalog)
}
