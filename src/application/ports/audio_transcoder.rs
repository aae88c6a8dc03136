//! Audio Transcoder Port - 音频转码抽象
//!
//! 将录制的任意格式音频转换为规范的 16 位 PCM WAV

use async_trait::async_trait;
use thiserror::Error;

use super::DecodeError;
use crate::domain::chat::Attachment;

/// 转码错误
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Decoding error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

/// 转码结果
#[derive(Debug, Clone)]
pub struct TranscodeResult {
    /// WAV 字节
    pub audio_data: Vec<u8>,
    /// 时长（毫秒）
    pub duration_ms: u64,
    /// 采样率
    pub sample_rate: u32,
    /// 声道数
    pub channels: u16,
    /// 原始大小（字节）
    pub original_size: usize,
    /// 转码后大小（字节）
    pub transcoded_size: usize,
}

#[async_trait]
pub trait AudioTranscoderPort: Send + Sync {
    /// 转码为规范 WAV（PCM16，交错声道）
    async fn transcode_to_wav(&self, captured: &Attachment)
        -> Result<TranscodeResult, TranscodeError>;
}
