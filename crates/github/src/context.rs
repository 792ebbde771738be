//! GitHub Actions event context.
//!
//! Built from the variables the runner sets for every job plus the event
//! payload at `GITHUB_EVENT_PATH`.

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Snapshot of the event that triggered the workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitHubContext {
    /// Event name, e.g. `pull_request` or `push`.
    pub event_name: String,
    /// Repository in `owner/name` form.
    pub repository: Option<String>,
    /// Repository owner.
    pub owner: Option<String>,
    /// Pull request or issue number for events that have one.
    pub issue_number: Option<u64>,
    /// Fully qualified ref that triggered the workflow.
    pub git_ref: String,
}

impl GitHubContext {
    /// Read the context from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the context through an arbitrary variable lookup.
    ///
    /// A missing or unreadable event payload is logged and otherwise ignored.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let payload = var("GITHUB_EVENT_PATH")
            .map(|path| EventPayload::read(Path::new(&path)))
            .unwrap_or_default();

        let repository = var("GITHUB_REPOSITORY").or_else(|| {
            payload
                .repository
                .as_ref()
                .and_then(|r| r.full_name.clone())
        });
        let owner = var("GITHUB_REPOSITORY_OWNER")
            .or_else(|| {
                repository
                    .as_deref()
                    .and_then(|r| r.split_once('/'))
                    .map(|(owner, _)| owner.to_string())
            })
            .or_else(|| {
                payload
                    .repository
                    .as_ref()
                    .and_then(|r| r.owner.as_ref())
                    .map(|o| o.login.clone())
            });
        let git_ref = var("GITHUB_REF").unwrap_or_default();
        let issue_number = payload.number().or_else(|| parse_pr_number(&git_ref));

        Self {
            event_name: var("GITHUB_EVENT_NAME").unwrap_or_default(),
            repository,
            owner,
            issue_number,
            git_ref,
        }
    }

    /// Repository short name: everything after the first `/`, if non-empty.
    #[must_use]
    pub fn repository_name(&self) -> Option<&str> {
        self.repository
            .as_deref()
            .map(|repo| repo.split_once('/').map_or(repo, |(_, name)| name))
            .filter(|name| !name.is_empty())
    }
}

/// Extract a PR number from a ref such as `refs/pull/123/merge`.
#[must_use]
pub fn parse_pr_number(git_ref: &str) -> Option<u64> {
    git_ref
        .strip_prefix("refs/pull/")?
        .split('/')
        .next()?
        .parse()
        .ok()
}

/// The parts of the webhook payload the action uses.
#[derive(Debug, Default, Deserialize)]
struct EventPayload {
    issue: Option<Numbered>,
    pull_request: Option<Numbered>,
    number: Option<u64>,
    repository: Option<PayloadRepository>,
}

#[derive(Debug, Deserialize)]
struct Numbered {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct PayloadRepository {
    full_name: Option<String>,
    owner: Option<PayloadOwner>,
}

#[derive(Debug, Deserialize)]
struct PayloadOwner {
    login: String,
}

impl EventPayload {
    fn read(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!(?path, error = %e, "Event payload not readable");
                return Self::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(?path, error = %e, "Ignoring malformed event payload");
            Self::default()
        })
    }

    /// Issue number first, then pull request number, then the top-level `number`.
    fn number(&self) -> Option<u64> {
        self.issue
            .as_ref()
            .or(self.pull_request.as_ref())
            .map(|n| n.number)
            .or(self.number)
    }
}
