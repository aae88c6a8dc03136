//! 音频转码

mod wav_transcoder;

pub use wav_transcoder::{encode_pcm16_wav, WavTranscoder};
