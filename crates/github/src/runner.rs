//! GitHub Actions runner integration.
//!
//! Variables and PATH entries exported by the action are kept on an
//! [`ActionsRunner`] and applied to the Kenbot process explicitly. They are
//! also appended to the runner's `GITHUB_ENV` / `GITHUB_PATH` files so later
//! workflow steps see them. The process environment itself is never mutated.

use kenbot_action_core::{Error, Result};
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exported state for one action run.
#[derive(Debug, Default)]
pub struct ActionsRunner {
    env_file: Option<PathBuf>,
    path_file: Option<PathBuf>,
    inherited_path: Option<OsString>,
    variables: BTreeMap<String, String>,
    path: Vec<PathBuf>,
}

impl ActionsRunner {
    /// Runner writing to the given file commands, if any.
    #[must_use]
    pub fn new(env_file: Option<PathBuf>, path_file: Option<PathBuf>) -> Self {
        Self {
            env_file,
            path_file,
            ..Self::default()
        }
    }

    /// Runner for the current job, using `GITHUB_ENV`, `GITHUB_PATH` and `PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        let file = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            inherited_path: std::env::var_os("PATH"),
            ..Self::new(file("GITHUB_ENV"), file("GITHUB_PATH"))
        }
    }

    /// Search path the Kenbot process starts from.
    #[must_use]
    pub fn with_inherited_path(mut self, path: impl Into<OsString>) -> Self {
        self.inherited_path = Some(path.into());
        self
    }

    /// Export a variable to the Kenbot process and to later steps.
    ///
    /// # Errors
    ///
    /// Returns an error if the env file cannot be written or the value
    /// collides with the generated heredoc delimiter.
    pub fn export_variable(&mut self, name: &str, value: &str) -> Result<()> {
        debug!(name, "Exporting variable");
        if let Some(file) = &self.env_file {
            let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
            if name.contains(&delimiter) || value.contains(&delimiter) {
                return Err(Error::configuration(format!(
                    "Unexpected input: value of {name} should not contain the delimiter \"{delimiter}\""
                )));
            }
            append_line(file, &format!("{name}<<{delimiter}\n{value}\n{delimiter}"))?;
        }
        self.variables.insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Value of a variable exported during this run.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Prepend a directory to the Kenbot process search path and to later steps.
    ///
    /// # Errors
    ///
    /// Returns an error if the path file cannot be written.
    pub fn add_path(&mut self, dir: &Path) -> Result<()> {
        debug!(?dir, "Adding to PATH");
        if let Some(file) = &self.path_file {
            append_line(file, &dir.to_string_lossy())?;
        }
        self.path.push(dir.to_path_buf());
        Ok(())
    }

    /// Directories added during this run, in insertion order.
    #[must_use]
    pub fn path_entries(&self) -> &[PathBuf] {
        &self.path
    }

    /// `PATH` for the Kenbot process: added directories, newest first, then
    /// the inherited search path.
    #[must_use]
    pub fn search_path(&self) -> Option<OsString> {
        let inherited = self
            .inherited_path
            .iter()
            .flat_map(|p| std::env::split_paths(p).collect::<Vec<_>>());
        std::env::join_paths(self.path.iter().rev().cloned().chain(inherited)).ok()
    }

    /// A command with the exported variables and search path applied.
    #[must_use]
    pub fn command(&self, program: impl AsRef<OsStr>) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(program);
        cmd.envs(&self.variables);
        if let Some(path) = self.search_path() {
            cmd.env("PATH", path);
        }
        cmd
    }
}

fn append_line(file: &Path, line: &str) -> Result<()> {
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .map_err(|e| Error::io(e, "open", Some(file.to_path_buf())))?;
    writeln!(f, "{line}").map_err(|e| Error::io(e, "write", Some(file.to_path_buf())))
}

/// Workflow commands understood by the runner log parser.
pub mod commands {
    /// Escape a workflow command message.
    #[must_use]
    pub fn escape_data(value: &str) -> String {
        value
            .replace('%', "%25")
            .replace('\r', "%0D")
            .replace('\n', "%0A")
    }

    /// Format a workflow command line.
    #[must_use]
    pub fn format(command: &str, message: &str) -> String {
        format!("::{command}::{}", escape_data(message))
    }

    #[allow(clippy::print_stdout)]
    fn issue(command: &str, message: &str) {
        println!("{}", format(command, message));
    }

    /// Start a collapsible log group.
    pub fn start_group(name: &str) {
        issue("group", name);
    }

    /// End the current log group.
    pub fn end_group() {
        issue("endgroup", "");
    }

    /// Report an error annotation.
    pub fn error(message: &str) {
        issue("error", message);
    }

    /// Write a debug message, shown when step debug logging is enabled.
    pub fn debug(message: &str) {
        issue("debug", message);
    }

    /// Ask the runner to redact a value from all further log output.
    pub fn add_mask(value: &str) {
        if !value.is_empty() {
            issue("add-mask", value);
        }
    }
}
