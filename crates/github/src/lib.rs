//! GitHub Actions integration for kenbot-action.
//!
//! This crate provides:
//! - [`GitHubContext`] for the event that triggered the workflow
//! - [`ActionsRunner`] for exported variables, PATH entries and workflow commands
//! - [`BranchSource`] / [`GitCli`] for the checked out branch

pub mod context;
pub mod git;
pub mod runner;

pub use context::GitHubContext;
pub use git::{BranchSource, GitCli};
pub use runner::{ActionsRunner, commands};
