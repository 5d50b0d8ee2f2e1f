use crate::manifest::ManifestVersion;
use ui5check_types::catalog::Catalog;

/// Two-flag verdict: `acceptable` answers "is the line known", `patch_acceptable` answers
/// "is this exact declaration usable".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Validation {
    pub acceptable: bool,
    pub patch_acceptable: bool,
}

pub fn validate(manifest: &ManifestVersion, catalog: &Catalog) -> Validation {
    if manifest.wildcard_patch {
        let ok = catalog.has_patch_in_line(&manifest.version);
        return Validation {
            acceptable: ok,
            patch_acceptable: ok,
        };
    }

    match catalog.line(&manifest.version) {
        Some(line) => Validation {
            acceptable: true,
            patch_acceptable: line.allowed_patches.contains(&manifest.version.patch),
        },
        None => Validation::default(),
    }
}
