//! Chat Context - 回复

use serde::{Deserialize, Serialize};

use super::MessageKind;

/// 统一回复结构
///
/// 远程 agent 和离线回复生成器产出同样的形状
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub actions: Vec<String>,
}

impl ChatResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: MessageKind::Text,
            image: None,
            actions: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }
}

/// 一次发送的结果，标记回复来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 远程 agent 的回复
    Live(ChatResponse),
    /// 远程不可用时本地生成的回复
    Synthetic(ChatResponse),
}

impl DispatchOutcome {
    pub fn response(&self) -> &ChatResponse {
        match self {
            Self::Live(r) | Self::Synthetic(r) => r,
        }
    }

    pub fn into_response(self) -> ChatResponse {
        match self {
            Self::Live(r) | Self::Synthetic(r) => r,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }
}
