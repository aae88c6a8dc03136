//! 基于键值存储的会话状态
//!
//! 所有状态以 JSON 字符串存放在固定的键下

mod audio_cache;
mod file_ledger;
mod session_manager;
mod transcript;

pub use audio_cache::KvAudioCache;
pub use file_ledger::{FileRecord, KvFileLedger};
pub use session_manager::KvSessionManager;
pub use transcript::TranscriptStore;

/// 会话 ID
pub const SESSION_ID_KEY: &str = "chat-session-id";
/// 对话记录
pub const TRANSCRIPT_KEY: &str = "chat-messages";
/// 离线收到的文件列表
pub const FILES_KEY: &str = "chat-files";
/// 录音缓存
pub const AUDIO_FILES_KEY: &str = "chat-audio-files";
