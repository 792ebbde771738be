//! kenbot-action
//!
//! Installs Kenbot on a GitHub Actions runner and runs the scan that matches
//! the workflow trigger: `scan-pull-request` for pull request events,
//! `scan-repository` for pushes, schedules and manual dispatches.
//!
//! The binary is a thin wrapper around [`run`]; the stages live in
//! [`dispatch`] with their collaborators behind traits so they can be
//! replaced in tests.

/// Command line interface and exit codes
pub mod cli;
pub mod dispatch;
pub mod exporter;
pub mod tracing;

use cli::Cli;
use dispatch::{Dispatcher, ProcessExecutor};
use kenbot_action_core::ActionConfig;
use kenbot_action_github::{ActionsRunner, GitCli, GitHubContext, commands};
use kenbot_action_tools_release::{HttpDownloader, ReleaseInstaller};

/// Run the action with configuration from the runner environment.
///
/// Configured secrets are masked before anything else is logged.
///
/// # Errors
///
/// Returns the failure of any stage as a diagnostic report.
pub async fn run(cli: &Cli) -> miette::Result<()> {
    let config = ActionConfig::from_env();
    for secret in config.credentials.secrets() {
        commands::add_mask(secret);
    }

    let context = GitHubContext::from_env();
    let mut runner = ActionsRunner::from_env();
    let work_dir = cli.work_dir();

    let dispatcher = Dispatcher::new(
        ReleaseInstaller::new(HttpDownloader::new()?),
        GitCli::new(&work_dir),
        ProcessExecutor::new(&work_dir),
    );
    dispatcher.run(&config, &context, &mut runner).await?;
    Ok(())
}
