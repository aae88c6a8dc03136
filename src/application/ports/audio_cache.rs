//! Audio Cache Port - 录音本地缓存
//!
//! 定义有界音频缓存的抽象接口，按插入顺序 FIFO 淘汰

use thiserror::Error;

use super::StorageError;
use crate::domain::audio::AudioAsset;

/// 默认最多保留的音频数量
pub const MAX_AUDIO_ASSETS: usize = 10;

/// Audio Cache 错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid cached asset {id}: {reason}")]
    InvalidEntry { id: String, reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Audio Cache Port
///
/// - persist: 追加到队尾，超出容量时从队头淘汰
/// - list: 按插入顺序返回
/// - clear: 整体删除
pub trait AudioCachePort: Send + Sync {
    fn persist(&self, asset: AudioAsset) -> Result<(), CacheError>;

    fn list(&self) -> Result<Vec<AudioAsset>, CacheError>;

    fn clear(&self) -> Result<(), CacheError>;
}
