//! Kenbot installation: cache lookup, download and PATH registration.

use crate::cache::ToolCache;
use crate::download::Downloader;
use async_trait::async_trait;
use kenbot_action_core::{
    ActionConfig, DownloadTarget, Error, Platform, Result, TOOL_NAME, ToolVersion,
    authorization_header, release_url,
};
use kenbot_action_github::{ActionsRunner, commands};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// A Kenbot executable ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledTool {
    /// Directory added to the search path.
    pub dir: PathBuf,
    /// Full path of the executable.
    pub executable: PathBuf,
    /// Version that was installed.
    pub version: ToolVersion,
    /// Whether the executable came from the tool cache.
    pub from_cache: bool,
}

/// Makes the Kenbot executable available to the run.
#[async_trait]
pub trait ToolInstaller: Send + Sync {
    /// Ensure Kenbot is installed and its directory is on the runner's search path.
    async fn install(
        &self,
        config: &ActionConfig,
        runner: &mut ActionsRunner,
    ) -> Result<InstalledTool>;
}

/// Installs Kenbot release binaries through the runner tool cache.
pub struct ReleaseInstaller {
    downloader: Box<dyn Downloader>,
    platform: Platform,
}

impl ReleaseInstaller {
    /// Installer for the current platform.
    #[must_use]
    pub fn new(downloader: impl Downloader + 'static) -> Self {
        Self {
            downloader: Box::new(downloader),
            platform: Platform::current(),
        }
    }

    /// Install for a different platform than the host.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}

#[async_trait]
impl ToolInstaller for ReleaseInstaller {
    async fn install(
        &self,
        config: &ActionConfig,
        runner: &mut ActionsRunner,
    ) -> Result<InstalledTool> {
        let file_name = self.platform.executable_name();
        let version = ToolVersion::parse(&config.version)?;
        let cache = ToolCache::new(&config.tool_cache_dir);

        if version.is_cacheable() {
            if let Some(dir) = cache
                .find(TOOL_NAME, version.release(), &self.platform.arch)
                .await
            {
                info!(%version, ?dir, "Using cached Kenbot");
                runner.add_path(&dir)?;
                return Ok(InstalledTool {
                    executable: dir.join(file_name),
                    dir,
                    version,
                    from_cache: true,
                });
            }
        }

        let target = DownloadTarget::new(&version, file_name, config.releases_repo.clone());
        let url = release_url(&target, self.platform.tag(), config.platform_url.as_deref())?;
        commands::debug(&format!("Downloading Kenbot from {url}"));
        info!(%version, platform = %self.platform, %url, "Downloading Kenbot");

        let authorization = authorization_header(
            config.releases_repo.as_deref().unwrap_or_default(),
            &config.credentials,
        );
        let download = config.temp_dir.join(uuid::Uuid::new_v4().to_string());
        self.downloader
            .download(&url, authorization.as_deref(), &download)
            .await?;

        let dir = cache
            .cache_file(&download, file_name, TOOL_NAME, version.release(), &self.platform.arch)
            .await?;
        if let Err(e) = tokio::fs::remove_file(&download).await {
            debug!(?download, error = %e, "Leaving downloaded file behind");
        }

        let executable = dir.join(file_name);
        if !self.platform.is_windows() {
            make_executable(&executable).await?;
        }
        let sha256 = compute_file_sha256(&executable).await?;
        info!(%version, executable = ?executable, %sha256, "Installed Kenbot");

        runner.add_path(&dir)?;
        Ok(InstalledTool {
            dir,
            executable,
            version,
            from_cache: false,
        })
    }
}

/// Set the executable to read and execute for everyone, no write (`0o555`).
#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o555))
        .await
        .map_err(|e| Error::io(e, "chmod", Some(path.to_path_buf())))
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Compute SHA256 hash of a file.
async fn compute_file_sha256(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| Error::io(e, "open", Some(path.to_path_buf())))?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .map_err(|e| Error::io(e, "read", Some(path.to_path_buf())))?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
