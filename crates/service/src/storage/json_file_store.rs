use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::{RecordsDocument, SnapshotStore};
use crate::errors::ServiceError;

/// JSON file-backed snapshot store.
///
/// The file is rewritten in place on every save (no temp file + rename), so
/// a crash mid-write can leave a truncated document behind.
#[derive(Clone, Debug)]
pub struct JsonFileSnapshotStore {
    file_path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        Arc::new(Self { file_path: path.into() })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.file_path
    }

    fn storage_err(&self, action: &str, e: impl std::fmt::Display) -> ServiceError {
        ServiceError::Storage(format!("cannot {action} {}: {e}", self.file_path.display()))
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn load(&self) -> Result<RecordsDocument, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "no snapshot yet");
                return Ok(RecordsDocument::default());
            }
            Err(e) => return Err(self.storage_err("read", e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(RecordsDocument::default());
        }
        serde_json::from_slice(&bytes).map_err(|e| self.storage_err("parse", e))
    }

    async fn save(&self, document: &RecordsDocument) -> Result<(), ServiceError> {
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| self.storage_err("create directory for", e))?;
        }
        let data = serde_json::to_vec(document).map_err(|e| self.storage_err("serialize", e))?;
        fs::write(&self.file_path, data).await.map_err(|e| self.storage_err("write", e))?;
        debug!(path = %self.file_path.display(), students = document.records.len(), courses = document.courses.len(), "snapshot saved");
        Ok(())
    }
}
