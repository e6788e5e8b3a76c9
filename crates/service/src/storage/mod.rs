//! Snapshot persistence for the record store.
//!
//! The whole state is loaded once at startup and rewritten after every
//! successful mutation. `SnapshotStore` is the seam; the JSON file store is
//! what the server uses, the memory store backs tests and tooling.

pub mod json_file_store;
pub mod memory_store;

use std::collections::BTreeMap;

use async_trait::async_trait;
use models::{Course, Student};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

pub use json_file_store::JsonFileSnapshotStore;
pub use memory_store::MemorySnapshotStore;

/// Persisted document: `{"records": {...}, "courses": {...}}`.
/// Either top-level key may be missing and defaults to empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsDocument {
    #[serde(default)]
    pub records: BTreeMap<String, Student>,
    #[serde(default)]
    pub courses: BTreeMap<String, Course>,
}

/// Load-all / save-all persistence of a [`RecordsDocument`].
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Empty document when nothing has been saved yet.
    async fn load(&self) -> Result<RecordsDocument, ServiceError>;
    /// Overwrite the stored document.
    async fn save(&self, document: &RecordsDocument) -> Result<(), ServiceError>;
}
