#![deny(missing_docs)]

//! # RAML Versions
//!
//! Parsed version gate. Comparison is on the parsed enum, never on strings,
//! so `"1.10"` and `"1.2"` both land on [`RamlVersion::V10`].

use crate::error::{RamlError, RamlResult};
use std::fmt;
use std::str::FromStr;

/// Supported RAML language versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RamlVersion {
    /// RAML 0.8.
    V08,
    /// RAML 1.0 and any later 1.x revision.
    V10,
}

impl RamlVersion {
    /// Parses `"0.8"`, `"1.0"`, `"1.x"` or a `#%RAML x.y` header line.
    pub fn parse(input: &str) -> RamlResult<Self> {
        let trimmed = input.trim();
        let number = trimmed
            .strip_prefix("#%RAML")
            .map(str::trim)
            .unwrap_or(trimmed);
        let number = number.split_whitespace().next().unwrap_or_default();

        let mut parts = number.splitn(2, '.');
        let major = parts.next().and_then(|p| p.parse::<u32>().ok());
        let minor = match parts.next() {
            Some(p) => p.parse::<u32>().ok(),
            None => Some(0),
        };

        match (major, minor) {
            (Some(0), Some(8)) => Ok(Self::V08),
            (Some(1), Some(_)) => Ok(Self::V10),
            _ => Err(RamlError::UnsupportedVersion(input.to_string())),
        }
    }

    /// Canonical version string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V08 => "0.8",
            Self::V10 => "1.0",
        }
    }

    /// Whether the `examples` facet and structured examples exist.
    pub fn supports_examples(self) -> bool {
        self >= Self::V10
    }
}

impl FromStr for RamlVersion {
    type Err = RamlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RamlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
