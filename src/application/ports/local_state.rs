//! Local State Ports - 会话范围的本地状态
//!
//! 会话 ID、对话记录、文件列表、音频列表都属于会话范围，重置时一并清除

use super::StorageError;
use crate::domain::chat::Attachment;

/// 可被重置清除的会话范围状态
pub trait SessionScopedStore: Send + Sync {
    /// 状态名称（用于日志）
    fn scope(&self) -> &'static str;

    fn clear(&self) -> Result<(), StorageError>;
}

/// 离线时收到的文件记录
pub trait FileLedgerPort: Send + Sync {
    fn record(&self, file: &Attachment) -> Result<(), StorageError>;
}
