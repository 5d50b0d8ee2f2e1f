use regex::Regex;
use std::sync::LazyLock;
use ui5check_types::version::Version;

/// Manifest section holding the platform version declaration.
pub const PLATFORM_SECTION: &str = "sap.platform.cf";

/// Key of the version declaration inside [`PLATFORM_SECTION`].
pub const VERSION_KEY: &str = "ui5VersionNumber";

static WILDCARD_PATCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\*").expect("valid wildcard regex"));

/// A declared version, after `x`/`X` is normalized to `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestVersion {
    pub raw: String,
    /// Coerced triple; a wildcard patch coerces to 0 and is not meaningful.
    pub version: Version,
    pub wildcard_patch: bool,
}

/// What a manifest declares at `sap.platform.cf/ui5VersionNumber`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// Section or key missing, or the value is empty.
    Absent,
    /// A value is present but does not contain a version number.
    Unparseable { raw: String },
    Found(ManifestVersion),
}

/// Locate the version declaration in a manifest document.
///
/// Fails only when the content is not JSON.
pub fn parse_declaration(content: &str) -> Result<Declaration, serde_json::Error> {
    let doc: serde_json::Value = serde_json::from_str(content)?;
    let Some(value) = doc.get(PLATFORM_SECTION).and_then(|s| s.get(VERSION_KEY)) else {
        return Ok(Declaration::Absent);
    };

    let raw = match value {
        serde_json::Value::Null => return Ok(Declaration::Absent),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if raw.is_empty() {
        return Ok(Declaration::Absent);
    }

    Ok(match parse_version_string(&raw) {
        Some(v) => Declaration::Found(v),
        None => Declaration::Unparseable {
            raw: normalize(&raw),
        },
    })
}

/// Parse a declared version string such as `1.120.3`, `1.120.*` or `1.120.x`.
pub fn parse_version_string(raw: &str) -> Option<ManifestVersion> {
    let raw = normalize(raw);
    let version = Version::coerce(&raw)?;
    let wildcard_patch = WILDCARD_PATCH.is_match(&raw);
    Some(ManifestVersion {
        raw,
        version,
        wildcard_patch,
    })
}

/// Only the first `x`/`X` is treated as the wildcard marker.
fn normalize(raw: &str) -> String {
    match raw.find(['x', 'X']) {
        Some(idx) => format!("{}*{}", &raw[..idx], &raw[idx + 1..]),
        None => raw.to_string(),
    }
}
