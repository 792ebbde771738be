//! Kenbot release URLs.
//!
//! Releases are served either from the public distribution site or, when a
//! releases repository is configured, through an Artifactory remote
//! repository proxying that site:
//!
//! ```text
//! https://khulnasoft.github.io/kenbot/v{major}/{version}/kenbot-{tag}/{file}
//! {KS_URL}/artifactory/{repo}/artifactory/kenbot/v{major}/{version}/kenbot-{tag}/{file}
//! ```

use crate::platform::PlatformTag;
use crate::version::ToolVersion;
use crate::{Error, Result};

/// Name of the tool, used in release paths and as the cache key.
pub const TOOL_NAME: &str = "kenbot";

/// Public distribution site.
pub const DISTRIBUTION_URL: &str = "https://khulnasoft.github.io";

/// A release artifact to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Major version line (`v{major}` path segment).
    pub major: String,
    /// Full version, or the latest-release marker.
    pub version: String,
    /// Executable file name (`kenbot` or `kenbot.exe`).
    pub file_name: String,
    /// Artifactory repository proxying the distribution site, if any.
    pub releases_repo: Option<String>,
}

impl DownloadTarget {
    /// Target for a requested version.
    #[must_use]
    pub fn new(
        version: &ToolVersion,
        file_name: impl Into<String>,
        releases_repo: Option<String>,
    ) -> Self {
        Self {
            major: version.major().to_string(),
            version: version.release().to_string(),
            file_name: file_name.into(),
            releases_repo: releases_repo.filter(|repo| !repo.is_empty()),
        }
    }
}

/// Build the download URL for `target` on the given platform.
///
/// # Errors
///
/// Returns an invalid configuration error if a releases repository is set
/// but `base_url` is missing or empty.
pub fn release_url(
    target: &DownloadTarget,
    tag: PlatformTag,
    base_url: Option<&str>,
) -> Result<String> {
    let path = format!(
        "{TOOL_NAME}/v{}/{}/{TOOL_NAME}-{tag}/{}",
        target.major, target.version, target.file_name
    );

    let Some(repo) = target.releases_repo.as_deref().filter(|r| !r.is_empty()) else {
        return Ok(format!("{DISTRIBUTION_URL}/{path}"));
    };

    let base_url = base_url.filter(|url| !url.is_empty()).ok_or_else(|| {
        Error::configuration_with_help(
            "Failed while downloading Kenbot from Artifactory, KS_URL must be set",
            "Set KS_URL to your JFrog platform URL, or unset KS_RELEASES_REPO",
        )
    })?;
    let base_url = base_url.strip_suffix('/').unwrap_or(base_url);

    Ok(format!("{base_url}/artifactory/{repo}/artifactory/{path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::platform_tag;
    use proptest::prelude::*;

    const PLATFORMS: [(&str, &str, &str); 8] = [
        ("win32", "amd64", "windows-amd64"),
        ("darwin", "amd64", "mac-386"),
        ("linux", "amd64", "linux-amd64"),
        ("linux", "arm64", "linux-arm64"),
        ("linux", "386", "linux-386"),
        ("linux", "arm", "linux-arm"),
        ("linux", "ppc64", "linux-ppc64"),
        ("linux", "ppc64le", "linux-ppc64le"),
    ];

    fn target(major: &str, version: &str, file: &str, repo: Option<&str>) -> DownloadTarget {
        DownloadTarget {
            major: major.into(),
            version: version.into(),
            file_name: file.into(),
            releases_repo: repo.map(String::from),
        }
    }

    #[test]
    fn test_public_url() {
        let t = target("1", "1.2.3", "khulnasoft.exe", None);
        assert_eq!(
            release_url(&t, platform_tag("win32", "amd64"), None).unwrap(),
            "https://khulnasoft.github.io/kenbot/v1/1.2.3/kenbot-windows-amd64/khulnasoft.exe"
        );
    }

    #[test]
    fn test_public_url_all_platforms() {
        let t = target("1", "1.2.3", "khulnasoft", None);
        for (os, arch, tag) in PLATFORMS {
            assert_eq!(
                release_url(&t, platform_tag(os, arch), Some("https://ignored.example")).unwrap(),
                format!("https://khulnasoft.github.io/kenbot/v1/1.2.3/kenbot-{tag}/khulnasoft")
            );
        }
    }

    #[test]
    fn test_private_url_strips_one_trailing_slash() {
        let t = target("2", "2.8.7", "kenbot", Some("remote"));
        assert_eq!(
            release_url(&t, platform_tag("linux", "arm64"), Some("https://example.com/")).unwrap(),
            "https://example.com/artifactory/remote/artifactory/kenbot/v2/2.8.7/kenbot-linux-arm64/kenbot"
        );
        assert_eq!(
            release_url(&t, PlatformTag::LinuxArm64, Some("https://example.com//")).unwrap(),
            "https://example.com//artifactory/remote/artifactory/kenbot/v2/2.8.7/kenbot-linux-arm64/kenbot"
        );
    }

    #[test]
    fn test_private_url_all_platforms() {
        let t = target("2", "2.8.7", "khulnasoft", Some("kenbot-remote"));
        for (os, arch, tag) in PLATFORMS {
            assert_eq!(
                release_url(&t, platform_tag(os, arch), Some("https://mykenbot.com/")).unwrap(),
                format!(
                    "https://mykenbot.com/artifactory/kenbot-remote/artifactory/kenbot/v2/2.8.7/kenbot-{tag}/khulnasoft"
                )
            );
        }
    }

    #[test]
    fn test_private_url_requires_base_url() {
        let t = target("2", "2.8.7", "kenbot", Some("remote"));
        for base in [None, Some("")] {
            let err = release_url(&t, PlatformTag::LinuxAmd64, base).unwrap_err();
            assert!(matches!(err, Error::InvalidConfiguration { .. }));
            assert!(err.to_string().contains("KS_URL"));
        }
    }

    #[test]
    fn test_latest_target() {
        let t = DownloadTarget::new(&ToolVersion::Latest, "kenbot", Some(String::new()));
        assert_eq!(t.releases_repo, None);
        assert_eq!(
            release_url(&t, PlatformTag::LinuxAmd64, None).unwrap(),
            "https://khulnasoft.github.io/kenbot/v2/[RELEASE]/kenbot-linux-amd64/kenbot"
        );
    }

    proptest! {
        #[test]
        fn prop_release_url_is_pure(
            os in "[a-z0-9]{0,8}",
            arch in "[a-z0-9]{0,8}",
            version in "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
            repo in proptest::option::of("[a-z-]{1,12}"),
        ) {
            let t = DownloadTarget::new(&ToolVersion::Pinned(version), "kenbot", repo);
            let first = release_url(&t, platform_tag(&os, &arch), Some("https://example.com/"));
            let second = release_url(&t, platform_tag(&os, &arch), Some("https://example.com/"));
            prop_assert_eq!(platform_tag(&os, &arch), platform_tag(&os, &arch));
            prop_assert_eq!(first.ok(), second.ok());
        }
    }
}
