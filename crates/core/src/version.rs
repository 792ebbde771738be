//! Requested Kenbot version.

use crate::{Error, Result};
use std::fmt;

/// Input value selecting the newest published release.
pub const LATEST_INPUT: &str = "latest";

/// Path marker the distribution servers resolve to the newest release.
pub const LATEST_RELEASE_MARKER: &str = "[RELEASE]";

/// Major version line served under [`LATEST_RELEASE_MARKER`].
pub const LATEST_MAJOR: &str = "2";

/// A Kenbot version as requested by the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolVersion {
    /// Always download the newest release; never served from cache.
    Latest,
    /// An exact version such as `2.8.7`.
    Pinned(String),
}

impl ToolVersion {
    /// Parse the `version` action input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::configuration_with_help(
                "The 'version' input must be set",
                "Use an exact version such as 2.8.7, or 'latest'",
            ));
        }
        if input == LATEST_INPUT {
            Ok(Self::Latest)
        } else {
            Ok(Self::Pinned(input.to_string()))
        }
    }

    /// Version segment used in release paths and as the cache key.
    #[must_use]
    pub fn release(&self) -> &str {
        match self {
            Self::Latest => LATEST_RELEASE_MARKER,
            Self::Pinned(version) => version,
        }
    }

    /// Major version line, i.e. everything before the first `.`.
    #[must_use]
    pub fn major(&self) -> &str {
        match self {
            Self::Latest => LATEST_MAJOR,
            Self::Pinned(version) => version.split('.').next().unwrap_or(version),
        }
    }

    /// Whether a cached copy may satisfy this version.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        matches!(self, Self::Pinned(_))
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.release())
    }
}
