//! In-memory object storage provider.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{ObjectStorage, StorageError, StoredObject};

/// Keeps every stored object in a process-local map and serves
/// `memory://` URLs. Used by tests and by local development setups
/// that have no bucket.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: Mutex<Vec<(String, Vec<u8>)>>,
    capacity: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that accepts exactly `successes` uploads and fails
    /// every one after that. Lets tests drive the mid-batch upload
    /// failure path.
    pub fn failing_after(successes: usize) -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            capacity: Some(successes),
        }
    }

    /// Keys in storage order.
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Bytes stored under `key`, if any.
    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .find(|(stored, _)| stored == key)
            .map(|(_, bytes)| bytes.clone())
    }

    pub fn len(&self) -> usize {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn store(&self, bytes: Vec<u8>, key: &str) -> Result<StoredObject, StorageError> {
        let mut objects = self
            .objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(capacity) = self.capacity {
            if objects.len() >= capacity {
                return Err(StorageError::Upload {
                    key: key.to_string(),
                    detail: "memory store capacity reached".to_string(),
                });
            }
        }

        objects.push((key.to_string(), bytes));
        Ok(StoredObject {
            key: key.to_string(),
            url: format!("memory://{key}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn stores_objects_and_returns_memory_urls() {
        let storage = MemoryStorage::new();
        let stored = storage
            .store(vec![1, 2, 3], "posts/7/slide-01-x.png")
            .await
            .unwrap();

        assert_eq!(stored.url, "memory://posts/7/slide-01-x.png");
        assert_eq!(storage.object("posts/7/slide-01-x.png"), Some(vec![1, 2, 3]));
        assert_eq!(storage.keys(), vec!["posts/7/slide-01-x.png".to_string()]);
    }

    #[tokio::test]
    async fn repeated_stores_never_dedup() {
        let storage = MemoryStorage::new();
        storage.store(vec![1], "a.png").await.unwrap();
        storage.store(vec![2], "a.png").await.unwrap();
        assert_eq!(storage.len(), 2);
    }

    #[tokio::test]
    async fn failing_store_rejects_after_capacity() {
        let storage = MemoryStorage::failing_after(1);
        storage.store(vec![1], "a.png").await.unwrap();

        let result = storage.store(vec![2], "b.png").await;
        assert_matches!(result, Err(StorageError::Upload { ref key, .. }) if key == "b.png");
        assert_eq!(storage.len(), 1);
    }
}
