//! Mirror directory layout, artifact naming and pin configuration.
//!
//! The mirror is a local directory tree that is later synchronized to the
//! remote object store:
//!
//! ```text
//! <mirror root>/
//!     mirror.toml                      pin configuration for the upstream
//!                                      snapshot tool
//!     dist/
//!         channel-rust-<version>.toml  channel manifest (+ sidecar, backup)
//!         custom/
//!             rust-std-<version>-<triple>-<hash>.tar.xz
//! ```
//!
//! All path derivation and filename construction lives here so the
//! publisher and synchronizer never assemble names on their own.

mod config;
mod layout;
mod naming;

pub use config::write_mirror_config;
pub use layout::MirrorLayout;
pub use naming::{built_artifact_filename, download_url, published_artifact_filename};
