//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（RemoteAgent、KeyValueStore、AudioCache、SessionManager 等）
//! - commands: 发送消息 / 重置会话命令及处理器
//! - chat_client: 面向展示层的门面
//! - error: 应用层错误定义

pub mod chat_client;
pub mod commands;
pub mod error;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use chat_client::{ChatClient, DEFAULT_MAX_UPLOAD_SIZE, TRANSCRIPTION_UNAVAILABLE};
pub use commands::{
    handlers::{ResetChatHandler, SendMessageHandler},
    ResetChatResponse, SendMessageCommand,
};
pub use error::ApplicationError;
pub use ports::{
    AudioCachePort, AudioCapturePort, AudioDecoderPort, AudioTranscoderPort, CacheError,
    CaptureError, DecodeError, FileLedgerPort, KeyValueStorePort, OutboundEnvelope,
    RemoteAgentPort, RemoteError, SessionManagerPort, SessionScopedStore, StorageError,
    TranscodeError, TranscodeResult, MAX_AUDIO_ASSETS,
};
