//! Event dispatch: export context, install Kenbot, run the matching scan.

use crate::exporter::export_context;
use async_trait::async_trait;
use kenbot_action_core::config::BASE_BRANCH_VAR;
use kenbot_action_core::{ActionConfig, Error, Result};
use kenbot_action_github::{ActionsRunner, BranchSource, GitHubContext};
use kenbot_action_tools_release::{InstalledTool, ToolInstaller};
use std::fmt;
use std::path::PathBuf;
use tracing::{Instrument, debug, error, info, info_span};

/// Kenbot subcommand selected by the triggering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanCommand {
    /// Scan the changes of a pull request.
    PullRequest,
    /// Scan a branch and open fix pull requests.
    Repository,
}

impl ScanCommand {
    /// Select the scan for a workflow event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEvent`] for any other event.
    pub fn from_event(event: &str) -> Result<Self> {
        match event {
            "pull_request" | "pull_request_target" => Ok(Self::PullRequest),
            "push" | "schedule" | "workflow_dispatch" => Ok(Self::Repository),
            other => Err(Error::unsupported_event(other)),
        }
    }

    /// Subcommand argument passed to Kenbot.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PullRequest => "scan-pull-request",
            Self::Repository => "scan-repository",
        }
    }
}

impl fmt::Display for ScanCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of one action run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing done yet.
    Idle,
    /// Repository context exported.
    ContextExported,
    /// Kenbot installed and on the search path.
    ToolReady,
    /// Kenbot started.
    Dispatched,
    /// Kenbot exited with code 0.
    Success,
    /// A stage failed.
    Failed,
}

impl Stage {
    /// Name used in log events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ContextExported => "context-exported",
            Self::ToolReady => "tool-ready",
            Self::Dispatched => "dispatched",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs the installed Kenbot executable.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Run `command` and return the process exit code.
    async fn execute(
        &self,
        tool: &InstalledTool,
        command: ScanCommand,
        runner: &ActionsRunner,
    ) -> Result<i32>;
}

/// Spawns Kenbot as a child process sharing the action's stdio.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    work_dir: PathBuf,
}

impl ProcessExecutor {
    /// Run Kenbot in `work_dir`.
    #[must_use]
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }
}

#[async_trait]
impl ToolExecutor for ProcessExecutor {
    async fn execute(
        &self,
        tool: &InstalledTool,
        command: ScanCommand,
        runner: &ActionsRunner,
    ) -> Result<i32> {
        let status = runner
            .command(&tool.executable)
            .arg(command.as_str())
            .current_dir(&self.work_dir)
            .status()
            .await
            .map_err(|e| Error::io(e, "spawn Kenbot", Some(tool.executable.clone())))?;

        // Killed by a signal: no exit code.
        Ok(status.code().unwrap_or(-1))
    }
}

/// Wires the run together.
pub struct Dispatcher {
    installer: Box<dyn ToolInstaller>,
    branches: Box<dyn BranchSource>,
    executor: Box<dyn ToolExecutor>,
}

impl Dispatcher {
    /// Dispatcher using the given collaborators.
    #[must_use]
    pub fn new(
        installer: impl ToolInstaller + 'static,
        branches: impl BranchSource + 'static,
        executor: impl ToolExecutor + 'static,
    ) -> Self {
        Self {
            installer: Box::new(installer),
            branches: Box::new(branches),
            executor: Box::new(executor),
        }
    }

    /// Export the context, install Kenbot and run the scan for the event.
    ///
    /// # Errors
    ///
    /// Returns the first failure of any stage, including a non-zero Kenbot
    /// exit code as [`Error::ToolExecution`].
    pub async fn run(
        &self,
        config: &ActionConfig,
        context: &GitHubContext,
        runner: &mut ActionsRunner,
    ) -> Result<()> {
        let span = info_span!(
            "dispatch",
            event = %context.event_name,
            correlation_id = %crate::tracing::correlation_id(),
        );
        let mut stage = Stage::Idle;
        let result = self
            .run_stages(config, context, runner, &mut stage)
            .instrument(span)
            .await;

        match &result {
            Ok(()) => info!(stage = %Stage::Success, "Kenbot finished"),
            Err(e) => error!(stage = %Stage::Failed, reached = %stage, error = %e, "Kenbot action failed"),
        }
        result
    }

    async fn run_stages(
        &self,
        config: &ActionConfig,
        context: &GitHubContext,
        runner: &mut ActionsRunner,
        stage: &mut Stage,
    ) -> Result<()> {
        let event = export_context(context, runner)?;
        advance(stage, Stage::ContextExported);

        let tool = self.installer.install(config, runner).await?;
        advance(stage, Stage::ToolReady);

        let command = ScanCommand::from_event(&event)?;
        if config.base_branch.is_none() {
            let base = match command {
                ScanCommand::PullRequest => context.git_ref.clone(),
                ScanCommand::Repository => self.branches.current_branch().await?,
            };
            runner.export_variable(BASE_BRANCH_VAR, &base)?;
        }

        info!(%command, executable = ?tool.executable, "Running Kenbot");
        advance(stage, Stage::Dispatched);
        let code = self.executor.execute(&tool, command, runner).await?;
        if code != 0 {
            return Err(Error::ToolExecution { code });
        }
        Ok(())
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!(from = %stage, to = %next, "Stage");
    *stage = next;
}
