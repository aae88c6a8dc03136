//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_cache;
mod audio_capture;
mod audio_decoder;
mod audio_transcoder;
mod key_value_store;
mod local_state;
mod remote_agent;
mod session_manager;

pub use audio_cache::{AudioCachePort, CacheError, MAX_AUDIO_ASSETS};
pub use audio_capture::{AudioCapturePort, CaptureError};
pub use audio_decoder::{AudioDecoderPort, DecodeError};
pub use audio_transcoder::{AudioTranscoderPort, TranscodeError, TranscodeResult};
pub use key_value_store::{KeyValueStorePort, StorageError};
pub use local_state::{FileLedgerPort, SessionScopedStore};
pub use remote_agent::{OutboundEnvelope, RemoteAgentPort, RemoteError};
pub use session_manager::SessionManagerPort;
