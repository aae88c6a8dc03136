//! WAV Transcoder - 录音转码为规范 PCM16 WAV
//!
//! 流程：
//! - 解码器把任意格式的录音解码为按声道分离的 PCM
//! - 编码为 16 位、交错声道的 RIFF/WAVE 文件（44 字节头 + 样本）
//!
//! 输入已是 WAV 时同样重新编码，输出总是规范格式

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::ports::{AudioDecoderPort, AudioTranscoderPort, TranscodeError, TranscodeResult};
use crate::domain::audio::PcmBuffer;
use crate::domain::chat::Attachment;

const WAV_HEADER_LEN: usize = 44;
const BITS_PER_SAMPLE: u16 = 16;
const PCM_FORMAT: u16 = 1;

/// WAV 转码器
pub struct WavTranscoder {
    decoder: Arc<dyn AudioDecoderPort>,
}

impl WavTranscoder {
    pub fn new(decoder: Arc<dyn AudioDecoderPort>) -> Self {
        Self { decoder }
    }
}

/// 浮点样本转 16 位整数
///
/// 先限幅到 [-1, 1]，负数乘 32768，非负数乘 32767，向零截断
fn to_pcm16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}

/// 将 PCM 缓冲区编码为 16 位 PCM WAV
///
/// 样本按帧交错写入：frame0 的所有声道，然后 frame1，依此类推
pub fn encode_pcm16_wav(buffer: &PcmBuffer) -> Result<Vec<u8>, TranscodeError> {
    let num_channels = buffer.channel_count();
    let sample_rate = buffer.sample_rate();
    let frames = buffer.frame_count();

    let block_align = u16::try_from(num_channels as u32 * (BITS_PER_SAMPLE / 8) as u32)
        .map_err(|_| {
            TranscodeError::EncodingError(format!("Too many channels: {}", num_channels))
        })?;
    let byte_rate = u32::try_from(sample_rate as u64 * block_align as u64).map_err(|_| {
        TranscodeError::EncodingError(format!("Byte rate overflow at {} Hz", sample_rate))
    })?;

    let data_size = frames as u64 * block_align as u64;
    let riff_size = u32::try_from(36 + data_size).map_err(|_| {
        TranscodeError::EncodingError(format!("Audio too long for WAV: {} frames", frames))
    })?;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + data_size as usize);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&riff_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&PCM_FORMAT.to_le_bytes());
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data_size as u32).to_le_bytes());

    for frame in 0..frames {
        for channel in buffer.channels() {
            wav.extend_from_slice(&to_pcm16(channel[frame]).to_le_bytes());
        }
    }

    Ok(wav)
}

#[async_trait]
impl AudioTranscoderPort for WavTranscoder {
    async fn transcode_to_wav(
        &self,
        captured: &Attachment,
    ) -> Result<TranscodeResult, TranscodeError> {
        if captured.bytes.is_empty() {
            return Err(TranscodeError::InvalidInput("Empty recording".to_string()));
        }

        let original_size = captured.bytes.len();
        let buffer = self
            .decoder
            .decode(&captured.bytes, &captured.mime_type)
            .await?;
        let audio_data = encode_pcm16_wav(&buffer)?;

        tracing::debug!(
            source_mime = %captured.mime_type,
            original_size,
            wav_size = audio_data.len(),
            sample_rate = buffer.sample_rate(),
            channels = buffer.channel_count(),
            "Transcoded recording to WAV"
        );

        Ok(TranscodeResult {
            transcoded_size: audio_data.len(),
            audio_data,
            duration_ms: buffer.duration_ms(),
            sample_rate: buffer.sample_rate(),
            channels: buffer.channel_count(),
            original_size,
        })
    }
}
