//! In-Memory Key-Value Store Implementation

use dashmap::DashMap;

use crate::application::ports::{KeyValueStorePort, StorageError};

/// 内存键值存储
///
/// 可选的字节配额用于模拟浏览器存储的容量限制
pub struct InMemoryKeyValueStore {
    entries: DashMap<String, String>,
    quota_bytes: Option<u64>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            quota_bytes: None,
        }
    }

    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            entries: DashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// 当前占用（键 + 值的字节数）
    pub fn used_bytes(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| (e.key().len() + e.value().len()) as u64)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStorePort for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|v| v.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota_bytes {
            let others: u64 = self
                .entries
                .iter()
                .filter(|e| e.key() != key)
                .map(|e| (e.key().len() + e.value().len()) as u64)
                .sum();
            let needed = others + (key.len() + value.len()) as u64;
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_remove() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_quota_exceeded() {
        let store = InMemoryKeyValueStore::with_quota(10);
        store.set("ab", "12345678").unwrap();
        // 覆盖同一个键只计算新值
        store.set("ab", "87654321").unwrap();

        let err = store.set("c", "1").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 12, limit: 10 }));
        assert_eq!(store.used_bytes(), 10);
    }
}
