//! Object storage gateway for finished slide images and uploaded
//! design assets.
//!
//! [`ObjectStorage`] is the seam the publish flow and the asset upload
//! endpoint talk to. Every call stores a brand-new object under the
//! caller-chosen key (keys embed a UUID, so repeated publishes never
//! collide or dedup) and answers with the public URL the social
//! platform will fetch.
//!
//! Providers: [`S3Storage`] for deployments, [`MemoryStorage`] for
//! tests and local development.

use async_trait::async_trait;

mod error;
mod memory;
mod s3;

pub use error::StorageError;
pub use memory::MemoryStorage;
pub use s3::S3Storage;

/// A stored object: the key it lives under and the public URL that
/// serves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

/// Write-only object store.
///
/// Implementations must be safe to share across request handlers; the
/// publish flow uploads sequentially, but the asset endpoint may call
/// concurrently.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key` and return the public URL.
    async fn store(&self, bytes: Vec<u8>, key: &str) -> Result<StoredObject, StorageError>;
}
