//! Core types and release resolution for kenbot-action.
//!
//! Everything in this crate is free of side effects apart from reading the
//! process environment in [`ActionConfig::from_env`]:
//!
//! - [`platform`] - host platform detection and release tags
//! - [`version`] - the requested Kenbot version
//! - [`auth`] - credentials and the `Authorization` header
//! - [`release`] - release download URLs
//! - [`config`] - the configuration assembled at startup

pub mod auth;
pub mod config;
mod error;
pub mod platform;
pub mod release;
pub mod version;

pub use auth::{Credentials, authorization_header};
pub use config::ActionConfig;
pub use error::{Error, Result};
pub use platform::{Platform, PlatformTag, platform_tag};
pub use release::{DownloadTarget, TOOL_NAME, release_url};
pub use version::ToolVersion;
