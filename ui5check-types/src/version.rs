use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static VERSION_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("valid version regex")
});

/// A concrete `major.minor.patch` triple.
///
/// Ordering is numeric, component by component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Pulls the first `N[.N[.N]]` run out of free-form text.
    ///
    /// Missing components become zero, so `1.132.*` coerces to `1.132.0` and `v1` to `1.0.0`.
    /// Returns `None` when the text contains no digits or a component does not fit in a `u64`.
    pub fn coerce(text: &str) -> Option<Self> {
        let caps = VERSION_RUN.captures(text)?;
        let part = |n: usize| -> Option<u64> {
            caps.get(n).map_or(Some(0), |m| m.as_str().parse().ok())
        };
        Some(Self::new(part(1)?, part(2)?, part(3)?))
    }

    /// Lookup key of the major.minor line this version belongs to.
    pub fn line_key(&self) -> String {
        line_key(self.major, self.minor)
    }

    pub fn same_line(&self, other: &Version) -> bool {
        self.major == other.major && self.minor == other.minor
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

pub fn line_key(major: u64, minor: u64) -> String {
    format!("{major}.{minor}")
}
