//! Kenbot release installer for kenbot-action.
//!
//! Resolves a Kenbot release for the host platform, downloads it from the
//! public distribution host or a private Artifactory repository, and keeps
//! it in the runner tool cache.
//!
//! # Example
//!
//! ```ignore
//! use kenbot_action_tools_release::{HttpDownloader, ReleaseInstaller, ToolInstaller};
//!
//! let installer = ReleaseInstaller::new(HttpDownloader::new()?);
//! let tool = installer.install(&config, &mut runner).await?;
//! println!("Kenbot at {}", tool.executable.display());
//! ```

pub mod cache;
pub mod download;
pub mod install;

pub use cache::ToolCache;
pub use download::{Downloader, HttpDownloader};
pub use install::{InstalledTool, ReleaseInstaller, ToolInstaller};
