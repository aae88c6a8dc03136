//! Remote Agent Port - 远程 agent 通道
//!
//! 定义消息发送和会话重置的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::chat::{Attachment, ChatResponse, MessageKind};

/// 远程通道错误
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    ServiceError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 出站消息信封
///
/// 不变量: kind == Audio 时 attachment 为 WAV 字节且 text 为 None；
/// session_id / user_id 属于元数据，不属于正文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEnvelope {
    pub kind: MessageKind,
    pub text: Option<String>,
    pub attachment: Option<Attachment>,
    pub session_id: String,
    pub user_id: Option<String>,
}

impl OutboundEnvelope {
    /// 附件对应的表单字段名
    pub fn attachment_field(&self) -> &'static str {
        match self.kind {
            MessageKind::Audio => "audio",
            _ => "file",
        }
    }
}

/// Remote Agent Port
#[async_trait]
pub trait RemoteAgentPort: Send + Sync {
    /// 发送一条消息，每次调用只发一个请求，不重试
    async fn send_message(&self, envelope: &OutboundEnvelope) -> Result<ChatResponse, RemoteError>;

    /// 通知远程端作废会话
    async fn reset_session(&self, session_id: &str) -> Result<(), RemoteError>;
}
