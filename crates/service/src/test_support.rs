#![cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::storage::{MemorySnapshotStore, RecordsDocument, SnapshotStore};

/// Memory store whose saves can be switched to fail.
#[derive(Default)]
pub struct FlakySnapshotStore {
    inner: MemorySnapshotStore,
    fail_saves: AtomicBool,
}

impl FlakySnapshotStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub async fn saved(&self) -> Option<RecordsDocument> {
        self.inner.saved().await
    }
}

#[async_trait]
impl SnapshotStore for FlakySnapshotStore {
    async fn load(&self) -> Result<RecordsDocument, ServiceError> {
        self.inner.load().await
    }

    async fn save(&self, document: &RecordsDocument) -> Result<(), ServiceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ServiceError::Storage("disk full".into()));
        }
        self.inner.save(document).await
    }
}
