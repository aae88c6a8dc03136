//! Audio Context - PCM 缓冲区
//!
//! 解码后的按声道分离的浮点样本，样本范围约定为 `[-1, 1]`

use super::AudioError;

/// 解码后的音频缓冲区
///
/// 不变量:
/// - sample_rate > 0
/// - 至少一个声道，且所有声道长度相同
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl PcmBuffer {
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate(sample_rate));
        }
        if channels.is_empty() {
            return Err(AudioError::NoChannels);
        }
        if channels.len() > u16::MAX as usize {
            return Err(AudioError::TooManyChannels(channels.len()));
        }

        let expected = channels[0].len();
        if let Some((channel, data)) = channels
            .iter()
            .enumerate()
            .find(|(_, data)| data.len() != expected)
        {
            return Err(AudioError::ChannelLengthMismatch {
                channel,
                expected,
                found: data.len(),
            });
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// 从交错样本（帧优先、声道次之）构建
    pub fn from_interleaved(
        sample_rate: u32,
        channel_count: u16,
        samples: &[f32],
    ) -> Result<Self, AudioError> {
        if channel_count == 0 {
            return Err(AudioError::NoChannels);
        }
        let count = channel_count as usize;
        if samples.len() % count != 0 {
            return Err(AudioError::RaggedInterleave {
                samples: samples.len(),
                channels: channel_count,
            });
        }

        let frames = samples.len() / count;
        let mut channels = vec![Vec::with_capacity(frames); count];
        for frame in samples.chunks_exact(count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Self::new(sample_rate, channels)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn duration_ms(&self) -> u64 {
        self.frame_count() as u64 * 1000 / self.sample_rate as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_buffers() {
        assert_eq!(
            PcmBuffer::new(0, vec![vec![0.0]]),
            Err(AudioError::InvalidSampleRate(0))
        );
        assert_eq!(PcmBuffer::new(16000, vec![]), Err(AudioError::NoChannels));
        assert_eq!(
            PcmBuffer::new(16000, vec![vec![0.0; 4], vec![0.0; 3]]),
            Err(AudioError::ChannelLengthMismatch {
                channel: 1,
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn test_from_interleaved_splits_channels() {
        let buffer = PcmBuffer::from_interleaved(8000, 2, &[0.1, -0.1, 0.2, -0.2, 0.3, -0.3])
            .unwrap();
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.frame_count(), 3);
        assert_eq!(buffer.channel(0).unwrap(), &[0.1, 0.2, 0.3]);
        assert_eq!(buffer.channel(1).unwrap(), &[-0.1, -0.2, -0.3]);
    }

    #[test]
    fn test_from_interleaved_rejects_partial_frame() {
        let result = PcmBuffer::from_interleaved(8000, 2, &[0.1, 0.2, 0.3]);
        assert!(matches!(result, Err(AudioError::RaggedInterleave { .. })));
    }

    #[test]
    fn test_duration() {
        let buffer = PcmBuffer::new(16000, vec![vec![0.0; 8000]]).unwrap();
        assert_eq!(buffer.duration_ms(), 500);
    }
}
