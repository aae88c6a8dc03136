//! Audio Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AudioError {
    #[error("无效的采样率: {0}")]
    InvalidSampleRate(u32),

    #[error("音频缓冲区没有声道")]
    NoChannels,

    #[error("声道数过多: {0}")]
    TooManyChannels(usize),

    #[error("声道 {channel} 长度不一致: 期望 {expected}, 实际 {found}")]
    ChannelLengthMismatch {
        channel: usize,
        expected: usize,
        found: usize,
    },

    #[error("交错样本数 {samples} 不是声道数 {channels} 的整数倍")]
    RaggedInterleave { samples: usize, channels: u16 },
}
