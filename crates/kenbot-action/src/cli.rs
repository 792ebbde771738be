use crate::tracing::{Level, LogLevel, TracingConfig, TracingFormat};
use clap::Parser;
use std::path::PathBuf;

/// Exit code for a successful run
pub const EXIT_OK: i32 = 0;
/// Exit code for any failure; the runner marks the step as failed
pub const EXIT_FAILURE: i32 = 1;

/// Install Kenbot and run the scan matching the workflow trigger.
///
/// Configuration comes from the runner environment: the `version` action
/// input, the `KS_*` variables and the `GITHUB_*` / `RUNNER_*` variables
/// the runner sets for every step.
#[derive(Parser, Debug, Clone)]
#[command(name = "kenbot-action", version, about)]
pub struct Cli {
    /// Log level for kenbot-action's own diagnostics
    #[arg(long, value_enum, env = "KENBOT_ACTION_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Log output format
    #[arg(
        long,
        value_enum,
        env = "KENBOT_ACTION_LOG_FORMAT",
        default_value = "compact"
    )]
    pub log_format: TracingFormat,

    /// Checked out repository; the current branch is read from here
    #[arg(long, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,
}

impl Cli {
    /// Tracing setup for this invocation.
    ///
    /// An explicit `--log-level` wins; otherwise step debug logging on the
    /// runner (`RUNNER_DEBUG=1`) selects debug output.
    #[must_use]
    pub fn tracing_config(&self, runner_debug: bool) -> TracingConfig {
        let level = match (self.log_level, runner_debug) {
            (Some(level), _) => level.into(),
            (None, true) => Level::DEBUG,
            (None, false) => Level::INFO,
        };
        TracingConfig {
            format: self.log_format,
            level,
            filter: None,
        }
    }

    /// Directory the git branch query runs in.
    #[must_use]
    pub fn work_dir(&self) -> PathBuf {
        self.workspace
            .clone()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Whether the runner has step debug logging enabled.
#[must_use]
pub fn runner_debug_enabled() -> bool {
    std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1")
}
