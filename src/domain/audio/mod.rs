//! Audio Context - 音频限界上下文
//!
//! 职责:
//! - 解码后的多声道浮点 PCM 缓冲区
//! - 本地缓存的录音资产

mod asset;
mod errors;
mod pcm;

pub use asset::AudioAsset;
pub use errors::AudioError;
pub use pcm::PcmBuffer;
