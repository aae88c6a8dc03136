//! 离线文件列表

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::FILES_KEY;
use crate::application::ports::{FileLedgerPort, KeyValueStorePort, SessionScopedStore, StorageError};
use crate::domain::chat::Attachment;

/// 文件元数据（不含内容）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub timestamp: i64,
}

pub struct KvFileLedger {
    store: Arc<dyn KeyValueStorePort>,
}

impl KvFileLedger {
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<FileRecord>, StorageError> {
        match self.store.get(FILES_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }
}

impl FileLedgerPort for KvFileLedger {
    fn record(&self, file: &Attachment) -> Result<(), StorageError> {
        let mut records = self.list().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Stored file list is corrupt, starting over");
            Vec::new()
        });

        records.push(FileRecord {
            name: file.file_name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.size(),
            timestamp: Utc::now().timestamp_millis(),
        });

        let json = serde_json::to_string(&records)?;
        self.store.set(FILES_KEY, &json)
    }
}

impl SessionScopedStore for KvFileLedger {
    fn scope(&self) -> &'static str {
        "files"
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(FILES_KEY)
    }
}
