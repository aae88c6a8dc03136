//! Sled-based Key-Value Store Implementation

use sled::Db;
use std::path::Path;

use crate::application::ports::{KeyValueStorePort, StorageError};

/// Sled 键值存储
///
/// 进程重启后会话状态仍然保留
pub struct SledKeyValueStore {
    db: Db,
}

impl SledKeyValueStore {
    /// 打开（或创建）存储
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let db = sled::open(path).map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %path.display(),
            entries = db.len(),
            "SledKeyValueStore initialized"
        );

        Ok(Self { db })
    }
}

impl KeyValueStorePort for SledKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.db.get(key) {
            Ok(Some(data)) => String::from_utf8(data.to_vec())
                .map(Some)
                .map_err(|e| StorageError::SerializationError(e.to_string())),
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::DatabaseError(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.db
            .insert(key, value.as_bytes())
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.db
            .remove(key)
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.db
            .flush()
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = SledKeyValueStore::open(dir.path().join("test.sled")).unwrap();

        store.set("chat-session-id", "session-1").unwrap();
        assert_eq!(
            store.get("chat-session-id").unwrap().as_deref(),
            Some("session-1")
        );

        store.remove("chat-session-id").unwrap();
        assert_eq!(store.get("chat-session-id").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sled");

        {
            let store = SledKeyValueStore::open(&path).unwrap();
            store.set("chat-messages", "[]").unwrap();
            store.flush().unwrap();
        }

        let store = SledKeyValueStore::open(&path).unwrap();
        assert_eq!(store.get("chat-messages").unwrap().as_deref(), Some("[]"));
    }
}
