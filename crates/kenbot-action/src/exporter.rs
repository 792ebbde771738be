//! Exports the triggering event's repository context for Kenbot.

use kenbot_action_core::Result;
use kenbot_action_github::{ActionsRunner, GitHubContext};
use tracing::debug;

/// Git provider Kenbot talks to.
pub const GIT_PROVIDER_VAR: &str = "KS_GIT_PROVIDER";
/// Owner of the scanned repository.
pub const GIT_OWNER_VAR: &str = "KS_GIT_OWNER";
/// Short name of the scanned repository.
pub const GIT_REPO_VAR: &str = "KS_GIT_REPO";
/// Pull request (or issue) that triggered the run.
pub const GIT_PULL_REQUEST_ID_VAR: &str = "KS_GIT_PULL_REQUEST_ID";

const GIT_PROVIDER: &str = "github";

/// Export the repository context and return the event name.
///
/// Missing context fields are exported as empty values, except the
/// repository name which is only exported when known.
///
/// # Errors
///
/// Returns an error if the runner's env file cannot be written.
pub fn export_context(context: &GitHubContext, runner: &mut ActionsRunner) -> Result<String> {
    runner.export_variable(GIT_PROVIDER_VAR, GIT_PROVIDER)?;
    runner.export_variable(GIT_OWNER_VAR, context.owner.as_deref().unwrap_or_default())?;
    if let Some(name) = context.repository_name() {
        runner.export_variable(GIT_REPO_VAR, name)?;
    }
    let pull_request = context
        .issue_number
        .map(|n| n.to_string())
        .unwrap_or_default();
    runner.export_variable(GIT_PULL_REQUEST_ID_VAR, &pull_request)?;

    debug!(event = %context.event_name, owner = ?context.owner, %pull_request, "Exported context");
    Ok(context.event_name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_request_context() {
        let context = GitHubContext {
            event_name: "pull_request".into(),
            repository: Some("acme/widgets".into()),
            owner: Some("acme".into()),
            issue_number: Some(42),
            git_ref: "refs/pull/42/merge".into(),
        };
        let mut runner = ActionsRunner::default();

        let event = export_context(&context, &mut runner).unwrap();

        assert_eq!(event, "pull_request");
        assert_eq!(runner.variable(GIT_PROVIDER_VAR), Some("github"));
        assert_eq!(runner.variable(GIT_OWNER_VAR), Some("acme"));
        assert_eq!(runner.variable(GIT_REPO_VAR), Some("widgets"));
        assert_eq!(runner.variable(GIT_PULL_REQUEST_ID_VAR), Some("42"));
    }

    #[test]
    fn test_missing_fields_do_not_fail() {
        let context = GitHubContext {
            event_name: "push".into(),
            ..GitHubContext::default()
        };
        let mut runner = ActionsRunner::default();

        assert_eq!(export_context(&context, &mut runner).unwrap(), "push");
        assert_eq!(runner.variable(GIT_OWNER_VAR), Some(""));
        assert_eq!(runner.variable(GIT_PULL_REQUEST_ID_VAR), Some(""));
        assert_eq!(runner.variable(GIT_REPO_VAR), None);
    }

    #[test]
    fn test_empty_repository_name_is_not_exported() {
        let context = GitHubContext {
            event_name: "push".into(),
            repository: Some("acme/".into()),
            owner: Some("acme".into()),
            ..GitHubContext::default()
        };
        let mut runner = ActionsRunner::default();

        export_context(&context, &mut runner).unwrap();

        assert_eq!(runner.variable(GIT_REPO_VAR), None);
        assert_eq!(runner.variable(GIT_OWNER_VAR), Some("acme"));
    }

    #[test]
    fn test_writes_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join("github_env");
        let context = GitHubContext {
            event_name: "schedule".into(),
            repository: Some("acme/widgets".into()),
            owner: Some("acme".into()),
            ..GitHubContext::default()
        };
        let mut runner = ActionsRunner::new(Some(env_file.clone()), None);

        export_context(&context, &mut runner).unwrap();

        let contents = std::fs::read_to_string(env_file).unwrap();
        assert!(contents.starts_with("KS_GIT_PROVIDER<<ghadelimiter_"));
        assert!(contents.contains("\ngithub\n"));
        assert!(contents.contains("KS_GIT_REPO<<ghadelimiter_"));
        assert!(contents.contains("\nwidgets\n"));
    }
}
