//! Distforge - custom toolchain artifact publishing and mirror sync
//!
//! This library publishes custom-built toolchain artifacts into an
//! existing release-channel mirror and synchronizes that mirror to remote
//! object storage:
//!
//! - [`publish`] stages build outputs under content-addressed names and
//!   patches the channel manifest idempotently
//! - [`sync`] walks the mirror tree and uploads whatever the remote store
//!   is missing, refusing to overwrite diverged content unless forced
//!
//! Building the artifacts, checking out the upstream sources and seeding
//! the mirror from upstream are external collaborators; this crate only
//! registers and distributes what they produce.

pub mod buildenv;
pub mod channel;
pub mod digest;
pub mod log;
pub mod manifest;
pub mod mirror;
pub mod publish;
pub mod sync;
pub mod target;

pub use channel::Channel;
pub use mirror::MirrorLayout;
pub use publish::{publish, PublishConfig, PublishError, PublishReport};
pub use sync::{S3RemoteStore, SyncError, SyncOptions, SyncReport, Synchronizer};
pub use target::Target;
