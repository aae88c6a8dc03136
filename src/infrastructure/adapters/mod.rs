//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod agent;
pub mod capture;
pub mod decoder;
pub mod transcoder;

pub use agent::{HttpAgentClient, HttpAgentClientConfig};
pub use capture::FileAudioCapture;
pub use decoder::SymphoniaDecoder;
pub use transcoder::{encode_pcm16_wav, WavTranscoder};
