//! Audio Capture Port - 录音采集
//!
//! start / stop 采集接口，stop 时返回原始编码字节和 MIME 类型

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::chat::Attachment;

/// 采集错误
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Microphone permission denied: {0}")]
    PermissionDenied(String),

    #[error("Capture already in progress")]
    AlreadyRecording,

    #[error("No capture in progress")]
    NotRecording,

    #[error("IO error: {0}")]
    IoError(String),
}

#[async_trait]
pub trait AudioCapturePort: Send + Sync {
    async fn start(&self) -> Result<(), CaptureError>;

    async fn stop(&self) -> Result<Attachment, CaptureError>;
}
