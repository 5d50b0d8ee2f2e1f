//! Resolve configured directory patterns to `manifest.json` files.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern, glob_with};
use tracing::debug;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Expand each pattern as `<repo_root>/<pattern>/manifest.json`.
///
/// Returned paths are relative to `repo_root` and `/`-separated. Matches of one pattern are
/// sorted; patterns contribute in the order given and a path matched twice is kept once.
/// An empty result is not an error here; the pipeline decides that.
pub fn discover_manifests(
    repo_root: &Utf8Path,
    patterns: &[String],
) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::default()
    };
    let root = Pattern::escape(repo_root.as_str());

    let mut out: Vec<Utf8PathBuf> = Vec::new();
    for pattern in patterns {
        let trimmed = pattern.trim().trim_end_matches('/');
        let full = if trimmed.is_empty() || trimmed == "." {
            format!("{root}/{MANIFEST_FILE}")
        } else {
            format!("{root}/{trimmed}/{MANIFEST_FILE}")
        };
        debug!(pattern = %full, "resolving manifest pattern");

        let mut matched = Vec::new();
        for entry in glob_with(&full, options).with_context(|| format!("glob {}", full))? {
            let path = entry.map_err(|e| anyhow::anyhow!("glob error: {e}"))?;
            if !path.is_file() {
                continue;
            }
            let path = Utf8PathBuf::from_path_buf(path)
                .map_err(|p| anyhow::anyhow!("non UTF-8 path: {}", p.display()))?;
            matched.push(relative_to(repo_root, &path));
        }
        matched.sort();

        for rel in matched {
            if !out.contains(&rel) {
                out.push(rel);
            }
        }
    }

    Ok(out)
}

fn relative_to(root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    let rel = path.strip_prefix(root).unwrap_or(path);
    Utf8PathBuf::from(rel.as_str().replace('\\', "/"))
}
