//! Edit engine for manifest version declarations.
//!
//! Responsibilities:
//! - Rewrite the `sap.platform.cf/ui5VersionNumber` value in place, leaving every other byte alone.
//! - Generate a unified diff preview of the rewrites.
//! - Hash file contents before and after a rewrite.

use camino::{Utf8Path, Utf8PathBuf};
use diffy::PatchFormatter;
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use tracing::debug;
use ui5check_types::report::FileChange;

/// Opening of the platform section up to the first quote of the version value, the value itself,
/// and its closing quote. Keys before `ui5VersionNumber` are allowed as long as they are not objects.
static VERSION_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"("sap\.platform\.cf"\s*:\s*\{[^{}]*?"ui5VersionNumber"\s*:\s*")([^"]*)(")"#)
        .expect("valid version field regex")
});

/// Replace the declared version with `new_version`.
///
/// Returns `raw` unchanged when the field is not present in the expected shape.
pub fn rewrite_version(raw: &str, new_version: &str) -> String {
    if !VERSION_FIELD.is_match(raw) {
        debug!("version field not found, leaving manifest untouched");
        return raw.to_string();
    }

    VERSION_FIELD
        .replacen(raw, 1, |caps: &Captures| {
            format!("{}{}{}", &caps[1], new_version, &caps[3])
        })
        .into_owned()
}

/// One manifest's contents before and after a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedFile {
    pub path: Utf8PathBuf,
    pub before: String,
    pub after: String,
}

impl EditedFile {
    pub fn is_changed(&self) -> bool {
        self.before != self.after
    }

    pub fn file_change(&self) -> FileChange {
        file_change(&self.path, &self.before, &self.after)
    }
}

/// Rewrite a manifest in memory. Returns `None` when the rewrite would not change the text.
pub fn edit_manifest(path: &Utf8Path, before: &str, new_version: &str) -> Option<EditedFile> {
    let after = rewrite_version(before, new_version);
    let edit = EditedFile {
        path: path.to_path_buf(),
        before: before.to_string(),
        after,
    };
    edit.is_changed().then_some(edit)
}

pub fn file_change(path: &Utf8Path, before: &str, after: &str) -> FileChange {
    FileChange {
        path: path.to_string(),
        sha256_before: sha256_hex(before.as_bytes()),
        sha256_after: sha256_hex(after.as_bytes()),
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Render a git-style unified diff of all changed files, in the order given.
pub fn render_patch(edits: &[EditedFile]) -> String {
    let mut out = String::new();
    let formatter = PatchFormatter::new();

    for edit in edits.iter().filter(|e| e.is_changed()) {
        out.push_str(&format!("diff --git a/{0} b/{0}\n", edit.path));
        out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", edit.path));

        let patch = diffy::create_patch(&edit.before, &edit.after);
        let body = formatter.fmt_patch(&patch).to_string();
        // diffy emits its own ---/+++ header; the git header above replaces it.
        for line in body.lines().skip_while(|l| l.starts_with("---") || l.starts_with("+++")) {
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}
