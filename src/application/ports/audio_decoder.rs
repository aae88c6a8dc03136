//! Audio Decoder Port - 音频解码
//!
//! 将任意压缩格式的字节解码为按声道分离的 PCM 缓冲区

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::{AudioError, PcmBuffer};

/// 解码错误
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Empty input")]
    EmptyInput,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Invalid buffer: {0}")]
    InvalidBuffer(#[from] AudioError),
}

#[async_trait]
pub trait AudioDecoderPort: Send + Sync {
    /// 解码音频
    ///
    /// # Arguments
    /// * `data` - 原始音频字节
    /// * `mime_type` - 声明的 MIME 类型，仅作为格式提示
    async fn decode(&self, data: &[u8], mime_type: &str) -> Result<PcmBuffer, DecodeError>;
}
