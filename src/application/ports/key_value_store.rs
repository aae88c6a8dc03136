//! Key-Value Store Port - 本地持久化存储
//!
//! 同步的字符串键值存储，不自带容量限制，具体实现在 infrastructure 层

use thiserror::Error;

/// 存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage quota exceeded: need {needed} bytes, limit {limit} bytes")]
    QuotaExceeded { needed: u64, limit: u64 },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Key-Value Store Port
///
/// 只接受字符串值，二进制数据需由调用方先做文本编码
pub trait KeyValueStorePort: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// 删除键，键不存在时视为成功
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// 刷新到持久介质
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
