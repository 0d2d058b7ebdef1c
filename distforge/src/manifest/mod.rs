//! Channel manifest model and patch engine.
//!
//! The channel manifest is the multi-level release descriptor consumed by
//! the toolchain installer: a `pkg` section keyed by package name, each
//! package carrying a `target` map of per-target availability records, and
//! the umbrella `rust` package additionally carrying an `extensions` list
//! per host target. Operators hand-maintain comments in these files, so the
//! document model preserves formatting and comments of everything it does
//! not touch.
//!
//! Split into two layers, tested independently:
//! - `document` - the comment-preserving document model (load, accessors,
//!   mutation primitives, serialization)
//! - `patch` - the idempotent registration algorithm and the persist step
//!   (checksum sidecar, hash-named backup)

mod document;
mod patch;

pub use document::{ChannelManifest, ManifestError, TargetRecord};
pub use patch::{persist_manifest, register_artifacts, ArtifactRecord, PatchSummary, PersistReceipt};

/// Package name of the umbrella package whose target entries carry
/// extension lists.
pub const UMBRELLA_PACKAGE: &str = "rust";

/// Package name of the auxiliary standard-library component this system
/// publishes.
pub const STD_COMPONENT: &str = "rust-std";
