//! 对话记录持久化

use std::sync::Arc;

use super::TRANSCRIPT_KEY;
use crate::application::ports::{KeyValueStorePort, SessionScopedStore, StorageError};
use crate::domain::chat::TranscriptEntry;

/// 对话记录存储
pub struct TranscriptStore {
    store: Arc<dyn KeyValueStorePort>,
}

impl TranscriptStore {
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    /// 原始存储内容，不做问候语兜底
    pub fn stored(&self) -> Result<Option<Vec<TranscriptEntry>>, StorageError> {
        match self.store.get(TRANSCRIPT_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// 加载对话记录，缺失或损坏时返回只含问候语的新记录
    pub fn load(&self) -> Vec<TranscriptEntry> {
        match self.stored() {
            Ok(Some(entries)) if !entries.is_empty() => entries,
            Ok(_) => vec![TranscriptEntry::greeting()],
            Err(e) => {
                tracing::warn!(error = %e, "Error loading chat history");
                vec![TranscriptEntry::greeting()]
            }
        }
    }

    pub fn append(&self, entry: TranscriptEntry) -> Result<(), StorageError> {
        let mut entries = self.load();
        entries.push(entry);
        self.save(&entries)
    }

    /// 空记录不写入
    pub fn save(&self, entries: &[TranscriptEntry]) -> Result<(), StorageError> {
        if entries.is_empty() {
            return Ok(());
        }
        let json = serde_json::to_string(entries)?;
        self.store.set(TRANSCRIPT_KEY, &json)
    }
}

impl SessionScopedStore for TranscriptStore {
    fn scope(&self) -> &'static str {
        "messages"
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(TRANSCRIPT_KEY)
    }
}
