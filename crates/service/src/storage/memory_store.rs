use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{RecordsDocument, SnapshotStore};
use crate::errors::ServiceError;

/// Keeps the last saved document in memory.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    saved: Mutex<Option<RecordsDocument>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Start from an existing document, as if it had been saved before.
    pub fn with_document(document: RecordsDocument) -> Arc<Self> {
        Arc::new(Self { saved: Mutex::new(Some(document)) })
    }

    /// Last saved document, if any save happened.
    pub async fn saved(&self) -> Option<RecordsDocument> {
        self.saved.lock().await.clone()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<RecordsDocument, ServiceError> {
        Ok(self.saved.lock().await.clone().unwrap_or_default())
    }

    async fn save(&self, document: &RecordsDocument) -> Result<(), ServiceError> {
        *self.saved.lock().await = Some(document.clone());
        Ok(())
    }
}
