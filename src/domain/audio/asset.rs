//! Audio Context - 音频资产

use chrono::Utc;
use uuid::Uuid;

/// 已录制并编码的音频资产
///
/// 持久化后由本地音频缓存独占
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAsset {
    pub id: Uuid,
    pub display_name: String,
    pub mime_kind: String,
    pub byte_size: u64,
    pub encoded_data: Vec<u8>,
    pub captured_at_epoch_ms: i64,
}

impl AudioAsset {
    pub fn new(
        id: Uuid,
        display_name: impl Into<String>,
        mime_kind: impl Into<String>,
        encoded_data: Vec<u8>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            mime_kind: mime_kind.into(),
            byte_size: encoded_data.len() as u64,
            encoded_data,
            captured_at_epoch_ms: Utc::now().timestamp_millis(),
        }
    }
}
