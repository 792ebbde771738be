//! Action configuration.
//!
//! Everything the action reads from its environment is collected here once,
//! at startup. Code below the entry point receives an [`ActionConfig`]
//! instead of reading process variables itself.

use crate::auth::Credentials;
use std::path::PathBuf;

/// Action input holding the requested Kenbot version.
pub const VERSION_INPUT: &str = "version";
/// Artifactory repository proxying the Kenbot releases.
pub const RELEASES_REPO_VAR: &str = "KS_RELEASES_REPO";
/// JFrog platform URL used with [`RELEASES_REPO_VAR`].
pub const PLATFORM_URL_VAR: &str = "KS_URL";
/// Access token for the JFrog platform.
pub const ACCESS_TOKEN_VAR: &str = "KS_ACCESS_TOKEN";
/// User name for the JFrog platform.
pub const USER_VAR: &str = "KS_USER";
/// Password for the JFrog platform.
pub const PASSWORD_VAR: &str = "KS_PASSWORD";
/// Branch Kenbot compares against; exported by the action when unset.
pub const BASE_BRANCH_VAR: &str = "KS_GIT_BASE_BRANCH";

/// Configuration for one action run.
#[derive(Debug, Clone, Default)]
pub struct ActionConfig {
    /// Raw `version` input; may be empty.
    pub version: String,
    /// Artifactory repository to download through.
    pub releases_repo: Option<String>,
    /// Base URL of the JFrog platform.
    pub platform_url: Option<String>,
    /// Credentials for private downloads.
    pub credentials: Credentials,
    /// User supplied base branch.
    pub base_branch: Option<String>,
    /// Runner tool cache root.
    pub tool_cache_dir: PathBuf,
    /// Scratch directory for downloads.
    pub temp_dir: PathBuf,
}

impl ActionConfig {
    /// Assemble the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Assemble the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        Self {
            version: lookup(&input_var(VERSION_INPUT))
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            releases_repo: var(RELEASES_REPO_VAR),
            platform_url: var(PLATFORM_URL_VAR),
            credentials: Credentials {
                access_token: var(ACCESS_TOKEN_VAR),
                username: var(USER_VAR),
                password: var(PASSWORD_VAR),
            },
            base_branch: var(BASE_BRANCH_VAR),
            tool_cache_dir: var("RUNNER_TOOL_CACHE")
                .map_or_else(default_tool_cache_dir, PathBuf::from),
            temp_dir: var("RUNNER_TEMP").map_or_else(std::env::temp_dir, PathBuf::from),
        }
    }
}

/// Environment variable the runner uses for an action input.
#[must_use]
pub fn input_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Tool cache location outside a hosted runner, `~/.cache/kenbot-action/tools`.
#[must_use]
pub fn default_tool_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("kenbot-action")
        .join("tools")
}
