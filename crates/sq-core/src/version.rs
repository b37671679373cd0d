//! Server version parsing.
//!
//! SonarQube reports versions with a build number (`9.9.1.69595`); only the
//! first three components take part in comparisons.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A `(major, minor, patch)` version, ordered lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a dotted version string, ignoring components past the third.
    ///
    /// Missing minor/patch components default to 0 (`"10"` → `10.0.0`).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidVersion`] if the string is empty or a
    /// retained component is not a number.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidVersion(value.to_string()));
        }

        let mut parts = [0_u32; 3];
        for (slot, component) in parts.iter_mut().zip(trimmed.split('.')) {
            *slot = component
                .parse()
                .map_err(|_| CoreError::InvalidVersion(value.to_string()))?;
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl FromStr for Version {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
