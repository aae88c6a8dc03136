//! Chat Client - 对话客户端门面
//!
//! 展示层只通过这里访问: send / reset / current_session_id

use std::sync::Arc;

use crate::application::commands::handlers::{ResetChatHandler, SendMessageHandler};
use crate::application::commands::{ResetChatResponse, SendMessageCommand};
use crate::application::error::ApplicationError;
use crate::application::ports::SessionManagerPort;
use crate::domain::chat::{Attachment, DispatchOutcome};

/// 转写不可用时的占位文本
pub const TRANSCRIPTION_UNAVAILABLE: &str = "Audio transcription not available";

/// 默认上传大小上限 10MB
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

pub struct ChatClient {
    send_handler: SendMessageHandler,
    reset_handler: ResetChatHandler,
    session_manager: Arc<dyn SessionManagerPort>,
    max_upload_size: u64,
}

impl ChatClient {
    pub fn new(
        send_handler: SendMessageHandler,
        reset_handler: ResetChatHandler,
        session_manager: Arc<dyn SessionManagerPort>,
    ) -> Self {
        // 重置必须等发送路径的缓存写入落盘后再清除
        let reset_handler = reset_handler.with_pending_writes(send_handler.pending_writes());
        Self {
            send_handler,
            reset_handler,
            session_manager,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }

    pub fn with_max_upload_size(mut self, bytes: u64) -> Self {
        self.max_upload_size = bytes;
        self
    }

    /// 发送消息，总是返回回复
    pub async fn send(&self, cmd: SendMessageCommand) -> DispatchOutcome {
        self.send_handler.handle(cmd).await
    }

    /// 重置会话，远程失败时返回错误但本地状态已清除
    pub async fn reset(&self) -> Result<ResetChatResponse, ApplicationError> {
        self.reset_handler.handle().await
    }

    pub fn current_session_id(&self) -> String {
        self.session_manager.current_session_id()
    }

    /// 上传文件（不带文字）
    pub async fn upload_file(&self, file: Attachment) -> DispatchOutcome {
        self.send(SendMessageCommand::file("", file)).await
    }

    /// 发送录音并返回回复文本
    pub async fn transcribe_audio(&self, captured: Attachment) -> String {
        let response = self.send(SendMessageCommand::audio(captured)).await.into_response();
        if response.content.is_empty() {
            TRANSCRIPTION_UNAVAILABLE.to_string()
        } else {
            response.content
        }
    }

    /// 校验上传文件大小
    pub fn check_upload(&self, file: &Attachment) -> Result<(), ApplicationError> {
        if file.size() > self.max_upload_size {
            return Err(ApplicationError::validation(format!(
                "File size must be less than {}MB ({} is {} bytes)",
                self.max_upload_size / (1024 * 1024),
                file.file_name,
                file.size()
            )));
        }
        Ok(())
    }
}
