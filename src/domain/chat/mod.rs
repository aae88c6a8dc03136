//! Chat Context - 对话限界上下文
//!
//! 职责:
//! - 消息类型与附件
//! - 统一回复结构（在线 / 离线）
//! - 离线回复目录
//! - 对话记录条目

mod response;
mod synthetic;
mod transcript;
mod value_objects;

pub use response::{ChatResponse, DispatchOutcome};
pub use synthetic::{CannedReply, SyntheticResponder, AUDIO_ACKNOWLEDGEMENT};
pub use transcript::{Role, TranscriptEntry, GREETING};
pub use value_objects::{
    extension_for_mime, mime_from_extension, Attachment, FileKind, MessageKind, WAV_MIME,
};
