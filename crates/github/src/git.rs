//! Current branch lookup for the checked out repository.

use async_trait::async_trait;
use kenbot_action_core::{Error, Result};
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// Source of the branch the workspace is checked out on.
#[async_trait]
pub trait BranchSource: Send + Sync {
    /// Name of the current branch.
    async fn current_branch(&self) -> Result<String>;
}

/// Asks the `git` CLI in a working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    work_dir: PathBuf,
}

impl GitCli {
    /// Query the repository at `work_dir`.
    #[must_use]
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    async fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .await
            .map_err(Error::branch_lookup)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::branch_lookup(stderr.trim()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl BranchSource for GitCli {
    /// The checked out branch, or for a detached HEAD the ref it was
    /// detached at (e.g. the tag of a tag push).
    async fn current_branch(&self) -> Result<String> {
        debug!(work_dir = ?self.work_dir, "Reading current branch");
        let branch = self.git(&["branch", "--show-current"]).await?;
        if !branch.is_empty() {
            debug!(%branch, "Current branch");
            return Ok(branch);
        }

        let listing = self.git(&["branch"]).await?;
        let detached = parse_current_branch(&listing)
            .ok_or_else(|| Error::branch_lookup("HEAD is not on a branch"))?;
        debug!(%detached, "HEAD is detached");
        Ok(detached)
    }
}

/// Name of the `*` entry in `git branch` output.
///
/// `(HEAD detached at v1.0.0)` and `(HEAD detached from 1a2b3c4)` yield the
/// ref after `at` / `from`; other parenthesised entries such as
/// `(no branch, rebasing main)` yield `None`.
fn parse_current_branch(listing: &str) -> Option<String> {
    let current = listing
        .lines()
        .find_map(|line| line.trim_start().strip_prefix("* "))?
        .trim();

    if let Some(inner) = current.strip_prefix('(').and_then(|c| c.strip_suffix(')')) {
        let inner = inner.strip_prefix("HEAD ").unwrap_or(inner);
        return inner
            .strip_prefix("detached at ")
            .or_else(|| inner.strip_prefix("detached from "))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
    }
    (!current.is_empty()).then(|| current.to_string())
}
