//! Platform detection and release tag mapping.
//!
//! Host names use the runner vocabulary (`win32`, `darwin`, `linux` for the
//! OS and `x64`, `ia32`, `arm`, `arm64`, `ppc64`, `ppc64le` for the CPU),
//! which is what Kenbot release paths are keyed on.

use std::fmt;

/// Host operating system and CPU architecture names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    /// Operating system name (e.g. `linux`, `darwin`, `win32`).
    pub os: String,
    /// CPU architecture name (e.g. `x64`, `arm64`, `ppc64le`).
    pub arch: String,
}

impl Platform {
    /// Create a new platform.
    #[must_use]
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Get the current platform.
    #[must_use]
    pub fn current() -> Self {
        let os = match std::env::consts::OS {
            "windows" => "win32",
            "macos" => "darwin",
            other => other,
        };
        Self::new(os, current_arch())
    }

    /// Whether this is a Windows-family OS.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.os.starts_with("win")
    }

    /// Name of the Kenbot executable on this platform.
    #[must_use]
    pub fn executable_name(&self) -> &'static str {
        if self.is_windows() {
            "kenbot.exe"
        } else {
            "kenbot"
        }
    }

    /// Release tag for this platform.
    #[must_use]
    pub fn tag(&self) -> PlatformTag {
        platform_tag(&self.os, &self.arch)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

fn current_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "x86" => "ia32",
        "aarch64" => "arm64",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        "powerpc64" => "ppc64",
        other => other,
    }
}

/// Platform segment of a Kenbot release path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformTag {
    /// `windows-amd64`
    WindowsAmd64,
    /// `mac-386`
    Mac386,
    /// `linux-amd64`
    LinuxAmd64,
    /// `linux-386`
    Linux386,
    /// `linux-arm`
    LinuxArm,
    /// `linux-arm64`
    LinuxArm64,
    /// `linux-ppc64`
    LinuxPpc64,
    /// `linux-ppc64le`
    LinuxPpc64le,
}

impl PlatformTag {
    /// The tag as it appears in release URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WindowsAmd64 => "windows-amd64",
            Self::Mac386 => "mac-386",
            Self::LinuxAmd64 => "linux-amd64",
            Self::Linux386 => "linux-386",
            Self::LinuxArm => "linux-arm",
            Self::LinuxArm64 => "linux-arm64",
            Self::LinuxPpc64 => "linux-ppc64",
            Self::LinuxPpc64le => "linux-ppc64le",
        }
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an OS and architecture name to a release tag.
///
/// Matching is substring based and ordered, so `ppc64le` is checked before
/// `ppc64`. Anything unrecognised falls through to the generic Linux tags.
#[must_use]
pub fn platform_tag(os: &str, arch: &str) -> PlatformTag {
    if os.starts_with("win") {
        return PlatformTag::WindowsAmd64;
    }
    if os.contains("darwin") {
        return PlatformTag::Mac386;
    }
    if arch.contains("arm") {
        return if arch.contains("64") {
            PlatformTag::LinuxArm64
        } else {
            PlatformTag::LinuxArm
        };
    }
    if arch.contains("ppc64le") {
        return PlatformTag::LinuxPpc64le;
    }
    if arch.contains("ppc64") {
        return PlatformTag::LinuxPpc64;
    }
    if arch.contains("64") {
        PlatformTag::LinuxAmd64
    } else {
        PlatformTag::Linux386
    }
}
