//! Chat Commands - 对话相关命令

use crate::domain::chat::{Attachment, MessageKind};

/// 发送消息命令
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub content: String,
    pub kind: MessageKind,
    pub file: Option<Attachment>,
    pub user_id: Option<String>,
}

impl SendMessageCommand {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: MessageKind::Text,
            file: None,
            user_id: None,
        }
    }

    /// 普通文件，content 作为文字提示一起发送
    pub fn file(content: impl Into<String>, file: Attachment) -> Self {
        Self {
            content: content.into(),
            kind: MessageKind::File,
            file: Some(file),
            user_id: None,
        }
    }

    /// 录音，发送前转码为 WAV
    pub fn audio(captured: Attachment) -> Self {
        Self {
            content: String::new(),
            kind: MessageKind::Audio,
            file: Some(captured),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// 重置会话响应
#[derive(Debug, Clone)]
pub struct ResetChatResponse {
    /// 被作废的会话 ID
    pub previous_session_id: String,
    /// 已清除的本地状态
    pub cleared_scopes: Vec<&'static str>,
    /// 清除失败的本地状态（已记录日志）
    pub failed_scopes: Vec<&'static str>,
}
