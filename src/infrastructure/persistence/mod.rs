//! Persistence Layer - 本地持久化
//!
//! - sled: 键值存储的 Sled 实现
//! - kv: 基于键值存储的会话状态（会话 ID、对话记录、文件列表、音频缓存）

pub mod kv;
pub mod sled;

pub use self::kv::{KvAudioCache, KvFileLedger, KvSessionManager, TranscriptStore};
pub use self::sled::SledKeyValueStore;
