//! Derived paths inside the mirror tree.

use std::path::{Path, PathBuf};

use crate::channel::Channel;

/// Filename of the upstream-mirror pin configuration.
pub const MIRROR_CONFIG_FILENAME: &str = "mirror.toml";

/// Subdirectory of `dist/` holding custom-built artifacts.
pub const CUSTOM_DIR_NAME: &str = "custom";

/// Path derivation for a mirror directory.
///
/// Holds only the root; every other location is derived on demand so the
/// layout stays consistent across the publisher and synchronizer.
#[derive(Debug, Clone)]
pub struct MirrorLayout {
    root: PathBuf,
}

impl MirrorLayout {
    /// Create a layout rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The mirror root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The dist directory holding channel manifests.
    pub fn dist_dir(&self) -> PathBuf {
        self.root.join("dist")
    }

    /// The directory holding custom-built artifacts.
    pub fn custom_dir(&self) -> PathBuf {
        self.dist_dir().join(CUSTOM_DIR_NAME)
    }

    /// Path of the channel manifest for the given channel and version.
    pub fn manifest_path(&self, channel: Channel, version: &str) -> PathBuf {
        channel.manifest_path(&self.dist_dir(), version)
    }

    /// Path of the pin configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(MIRROR_CONFIG_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = MirrorLayout::new("/srv/mirror");

        assert_eq!(layout.root(), Path::new("/srv/mirror"));
        assert_eq!(layout.dist_dir(), PathBuf::from("/srv/mirror/dist"));
        assert_eq!(layout.custom_dir(), PathBuf::from("/srv/mirror/dist/custom"));
        assert_eq!(
            layout.config_path(),
            PathBuf::from("/srv/mirror/mirror.toml")
        );
    }

    #[test]
    fn test_manifest_path_follows_channel() {
        let layout = MirrorLayout::new("/srv/mirror");

        assert_eq!(
            layout.manifest_path(Channel::Stable, "1.78.0"),
            PathBuf::from("/srv/mirror/dist/channel-rust-1.78.0.toml")
        );
        assert_eq!(
            layout.manifest_path(Channel::Nightly, "2024-05-01"),
            PathBuf::from("/srv/mirror/dist/2024-05-01/channel-rust-nightly.toml")
        );
    }
}
