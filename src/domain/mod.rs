//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Chat Context: 消息类型、回复、离线回复目录、对话记录
//! - Audio Context: PCM 缓冲区与已录制的音频资产

pub mod audio;
pub mod chat;

mod identifier;

pub use identifier::{new_id, new_uuid};
