//! Session Manager Port - 会话标识管理
//!
//! 进程内唯一的会话 ID，首次访问时创建，重置时销毁

use super::StorageError;

/// Session Manager Port
pub trait SessionManagerPort: Send + Sync {
    /// 返回当前会话 ID，不存在时创建并持久化
    fn current_session_id(&self) -> String;

    /// 删除会话 ID，下次访问会生成新的
    fn invalidate(&self) -> Result<(), StorageError>;
}
