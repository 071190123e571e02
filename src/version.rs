use regex::Regex;
use serde::Serialize;
use std::{fmt, str::FromStr, sync::LazyLock};

static VERSION_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9])([0-9]{1,16})(?:\.([0-9]{1,16}))?(?:\.([0-9]{1,16}))?(?:$|[^0-9])")
        .ok()
});

/// Minimum server version accepted when none is configured
pub const DEFAULT_MIN_VERSION: ServerVersion = ServerVersion::new(9, 4, 0);

/// `major.minor.patch` triple, ordered numerically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ServerVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ServerVersion {
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Extract the first version-like number run from free-form text
    ///
    /// `"PostgreSQL 14.2 on x86_64-pc-linux-gnu"` coerces to `14.2.0`, missing
    /// components default to zero. Returns `None` when nothing numeric is found.
    #[must_use]
    pub fn coerce(text: &str) -> Option<Self> {
        let re = VERSION_RE.as_ref()?;
        let caps = re.captures(text)?;

        let part = |i: usize| -> Option<u64> {
            caps.get(i).map_or(Some(0), |m| m.as_str().parse().ok())
        };

        Some(Self::new(part(1)?, part(2)?, part(3)?))
    }
}

impl FromStr for ServerVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::coerce(s).ok_or_else(|| format!("Invalid version: {s}"))
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
