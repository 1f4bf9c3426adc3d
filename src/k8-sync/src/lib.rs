//!
//! # Spec sync
//!
//! Mirror resources applied to a cluster as spec files in a git repository.
//! One pass scans the repository, upserts or deletes the file of each changed
//! resource and commits the result.
//!
mod error;
mod local;
mod memory;
mod reconcile;
mod repo;

pub use error::SyncError;
pub use local::LocalRepo;
pub use memory::InMemoryRepo;
pub use reconcile::*;
pub use repo::*;

pub use k8_spec::ApplicationRef;
pub use k8_sync_config::SyncOptions;
