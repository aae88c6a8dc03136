//! Symphonia Decoder - 基于 symphonia 的通用音频解码器
//!
//! 支持 symphonia 启用的所有容器/编码（wav、mp3、flac、ogg/vorbis），
//! MIME 类型只作为探测提示

use async_trait::async_trait;
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioDecoderPort, DecodeError};
use crate::domain::audio::PcmBuffer;
use crate::domain::chat::extension_for_mime;

/// Symphonia 解码器
///
/// 解码是 CPU 密集操作，在阻塞线程池中执行
#[derive(Debug, Default, Clone)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self
    }

    fn decode_blocking(
        data: Vec<u8>,
        extension: Option<&'static str>,
    ) -> Result<PcmBuffer, DecodeError> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = extension {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| DecodeError::UnsupportedFormat(format!("Probe failed: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| DecodeError::DecodingError("No audio track found".to_string()))?;
        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;
        let mut channels = track.codec_params.channels.map(|c| c.count());

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| DecodeError::UnsupportedFormat(format!("No decoder: {}", e)))?;

        let mut samples: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => {
                    return Err(DecodeError::DecodingError(format!(
                        "Packet read error: {}",
                        e
                    )));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(SymphoniaError::DecodeError(e)) => {
                    tracing::warn!("Decode error (skipping packet): {}", e);
                    continue;
                }
                Err(e) => {
                    return Err(DecodeError::DecodingError(e.to_string()));
                }
            };

            let spec = *decoded.spec();
            sample_rate.get_or_insert(spec.rate);
            channels.get_or_insert(spec.channels.count());

            let num_frames = decoded.frames();
            let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);
            let actual_samples = num_frames * spec.channels.count();
            samples.extend(&sample_buf.samples()[..actual_samples]);
        }

        let sample_rate = sample_rate
            .ok_or_else(|| DecodeError::DecodingError("Unknown sample rate".to_string()))?;
        let channels = channels
            .ok_or_else(|| DecodeError::DecodingError("Unknown channel count".to_string()))?;
        let channels = u16::try_from(channels)
            .map_err(|_| DecodeError::DecodingError(format!("Too many channels: {}", channels)))?;

        Ok(PcmBuffer::from_interleaved(sample_rate, channels, &samples)?)
    }
}

#[async_trait]
impl AudioDecoderPort for SymphoniaDecoder {
    async fn decode(&self, data: &[u8], mime_type: &str) -> Result<PcmBuffer, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::EmptyInput);
        }

        let data = data.to_vec();
        let essence = mime_type.split(';').next().unwrap_or_default().trim();
        let extension = Some(extension_for_mime(essence)).filter(|ext| *ext != "bin");

        tokio::task::spawn_blocking(move || Self::decode_blocking(data, extension))
            .await
            .map_err(|e| DecodeError::DecodingError(format!("Decode task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::AudioTranscoderPort;
    use crate::domain::chat::Attachment;
    use crate::infrastructure::adapters::WavTranscoder;
    use std::sync::Arc;

    fn hound_wav(channels: u16, sample_rate: u32, frames: &[Vec<i16>]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut bytes = Vec::new();
        {
            let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
            for frame in frames {
                for &sample in frame {
                    writer.write_sample(sample).unwrap();
                }
            }
            writer.finalize().unwrap();
        }
        bytes
    }

    #[tokio::test]
    async fn test_decode_stereo_wav() {
        let frames: Vec<Vec<i16>> = (0..200).map(|i| vec![i * 100, -(i * 100)]).collect();
        let wav = hound_wav(2, 22050, &frames);

        let buffer = SymphoniaDecoder::new().decode(&wav, "audio/wav").await.unwrap();

        assert_eq!(buffer.sample_rate(), 22050);
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.frame_count(), 200);
        let left = buffer.channel(0).unwrap();
        let right = buffer.channel(1).unwrap();
        assert!((left[10] - 1000.0 / 32768.0).abs() < 1e-4);
        assert!((right[10] + 1000.0 / 32768.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_mime_is_only_a_hint() {
        let wav = hound_wav(1, 8000, &[vec![0], vec![1], vec![2]]);

        let buffer = SymphoniaDecoder::new()
            .decode(&wav, "application/octet-stream")
            .await
            .unwrap();

        assert_eq!(buffer.frame_count(), 3);
    }

    #[tokio::test]
    async fn test_decode_rejects_bad_input() {
        let decoder = SymphoniaDecoder::new();

        assert!(matches!(
            decoder.decode(&[], "audio/wav").await,
            Err(DecodeError::EmptyInput)
        ));
        assert!(decoder
            .decode(b"definitely not audio data at all", "audio/webm")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_reencodes_wav_input_to_pcm16() {
        let frames: Vec<Vec<i16>> = (0..50).map(|i| vec![i * 10]).collect();
        let wav = hound_wav(1, 16000, &frames);
        let transcoder = WavTranscoder::new(Arc::new(SymphoniaDecoder::new()));

        let result = transcoder
            .transcode_to_wav(&Attachment::new("take.wav", "audio/wav", wav))
            .await
            .unwrap();

        let reader = hound::WavReader::new(Cursor::new(result.audio_data)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 50);
    }
}
