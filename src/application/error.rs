//! 应用层错误定义
//!
//! 只有重置、上传校验和录音采集会把错误交给调用方，发送路径上的错误都在内部降级

use thiserror::Error;

use crate::application::ports::{CaptureError, RemoteError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 录音采集错误
    #[error("Capture error: {0}")]
    CaptureError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 是否为麦克风权限问题（界面需要阻塞提示）
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::CaptureError(msg) if msg.starts_with("Microphone permission denied"))
    }
}

impl From<RemoteError> for ApplicationError {
    fn from(err: RemoteError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

impl From<CaptureError> for ApplicationError {
    fn from(err: CaptureError) -> Self {
        Self::CaptureError(err.to_string())
    }
}
