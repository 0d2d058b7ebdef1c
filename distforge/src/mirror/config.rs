//! Pin configuration for the upstream snapshot tool.
//!
//! The mirror tree is seeded by an external tool that downloads the
//! upstream release channel. Its configuration must pin exactly the
//! toolchain version being published, otherwise the tool prunes or fetches
//! unrelated versions and the custom artifacts end up referencing a
//! manifest that no longer exists.

use std::fs;
use std::io;
use std::path::PathBuf;

use toml_edit::{value, Array, DocumentMut, Item, Table};

use crate::channel::Channel;

use super::MirrorLayout;

/// Upstream dist server the snapshot tool mirrors from.
const UPSTREAM_SOURCE: &str = "https://static.rust-lang.org";

/// Write the pin configuration into the mirror root.
///
/// The configuration pins `pinned_rust_versions` to the single version
/// being published (`nightly-<date>` for nightly channels). Writing is
/// idempotent: the same channel and version always produce the same bytes.
///
/// # Returns
///
/// The path of the written configuration file.
///
/// # Errors
///
/// Propagates I/O errors from creating the mirror root or writing the file.
pub fn write_mirror_config(
    layout: &MirrorLayout,
    channel: Channel,
    version: &str,
) -> io::Result<PathBuf> {
    fs::create_dir_all(layout.root())?;

    let mut mirror = Table::new();
    mirror["retries"] = value(5);

    let mut rustup = Table::new();
    rustup["sync"] = value(true);
    rustup["download_xz"] = value(true);
    rustup["download_gz"] = value(false);
    rustup["download_threads"] = value(16);
    rustup["source"] = value(UPSTREAM_SOURCE);
    rustup["keep_latest_stables"] = value(0);
    rustup["keep_latest_betas"] = value(0);
    rustup["keep_latest_nightlies"] = value(0);
    let mut pinned = Array::new();
    pinned.push(channel.pinned_version(version));
    rustup["pinned_rust_versions"] = value(pinned);
    rustup["download_dev"] = value(true);

    let mut doc = DocumentMut::new();
    doc["mirror"] = Item::Table(mirror);
    doc["rustup"] = Item::Table(rustup);

    let path = layout.config_path();
    fs::write(&path, doc.to_string())?;
    Ok(path)
}
