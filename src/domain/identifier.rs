//! Identifier Service - 随机 v4 标识符
//!
//! 纯生成器，不保存状态，唯一性仅依赖熵

use uuid::Uuid;

/// 生成新的 v4 标识符
///
/// 格式: 8-4-4-4-12 小写十六进制，版本位固定为 `4`，变体位属于 `{8,9,a,b}`
pub fn new_id() -> String {
    new_uuid().to_string()
}

pub fn new_uuid() -> Uuid {
    Uuid::new_v4()
}
