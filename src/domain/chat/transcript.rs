//! Chat Context - 对话记录条目

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ChatResponse, MessageKind};
use crate::domain::new_id;

/// 新会话的默认问候语
pub const GREETING: &str = "Hello! I'm your financial assistant. How can I help you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// 对话记录中的一条消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn user(content: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            id: new_id(),
            role: Role::User,
            content: content.into(),
            kind,
            image: None,
            actions: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(response: &ChatResponse) -> Self {
        Self {
            id: new_id(),
            role: Role::Assistant,
            content: response.content.clone(),
            kind: response.kind,
            image: response.image.clone(),
            actions: response.actions.clone(),
            timestamp: Utc::now(),
        }
    }

    pub fn greeting() -> Self {
        Self::assistant(&ChatResponse::text(GREETING))
    }
}
