//! Release channel semantics.
//!
//! The channel decides three distinct version strings that are easy to mix
//! up:
//!
//! - the *dist version* embedded in build output filenames (`nightly` and
//!   `beta` builds always use the channel literal, stable builds the actual
//!   version),
//! - the *pinned version* the mirror configuration uses to select exactly
//!   one upstream toolchain (`nightly-2024-05-01` style for nightly),
//! - the *manifest location* inside the mirror's dist tree (nightly
//!   manifests live in a dated subdirectory).

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A toolchain release channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Versioned stable release.
    Stable,
    /// Beta pre-release.
    Beta,
    /// Dated nightly.
    Nightly,
    /// Local development build.
    Dev,
}

impl Channel {
    /// The version string embedded in build output filenames.
    ///
    /// Nightly and beta dist archives are named with the channel literal
    /// rather than the concrete version.
    pub fn dist_version<'a>(&self, version: &'a str) -> &'a str {
        match self {
            Channel::Nightly => "nightly",
            Channel::Beta => "beta",
            Channel::Stable | Channel::Dev => version,
        }
    }

    /// The version string the mirror configuration pins.
    pub fn pinned_version(&self, version: &str) -> String {
        match self {
            Channel::Nightly => format!("nightly-{}", version),
            _ => version.to_string(),
        }
    }

    /// Path of the channel manifest inside a dist directory.
    ///
    /// Nightly manifests live under a dated subdirectory
    /// (`dist/<version>/channel-rust-nightly.toml`); every other channel
    /// uses `dist/channel-rust-<version>.toml`.
    pub fn manifest_path(&self, dist_dir: &Path, version: &str) -> PathBuf {
        match self {
            Channel::Nightly => dist_dir.join(version).join("channel-rust-nightly.toml"),
            _ => dist_dir.join(format!("channel-rust-{}.toml", version)),
        }
    }

    /// Channel name as used on the command line and in URLs.
    pub fn name(&self) -> &'static str {
        match self {
            Channel::Stable => "stable",
            Channel::Beta => "beta",
            Channel::Nightly => "nightly",
            Channel::Dev => "dev",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stable" => Ok(Channel::Stable),
            "beta" => Ok(Channel::Beta),
            "nightly" => Ok(Channel::Nightly),
            "dev" => Ok(Channel::Dev),
            other => Err(format!(
                "unknown channel `{}` (expected stable, beta, nightly or dev)",
                other
            )),
        }
    }
}
