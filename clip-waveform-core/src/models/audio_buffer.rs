use std::time::Duration;

use super::error::CaptureError;

/// A finished, immutable clip of interleaved multichannel audio.
///
/// Sample for frame `f`, channel `c` lives at index `c + f * channel_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channel_count: u32,
    samples: Vec<f32>,
}

impl AudioBuffer {
    pub fn new(sample_rate: u32, channel_count: u32, samples: Vec<f32>) -> Result<Self, CaptureError> {
        if sample_rate == 0 {
            return Err(CaptureError::InvalidBuffer("sample rate must be positive".into()));
        }
        if channel_count == 0 {
            return Err(CaptureError::InvalidBuffer("channel count must be at least 1".into()));
        }
        if samples.len() % channel_count as usize != 0 {
            return Err(CaptureError::InvalidBuffer(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                channel_count
            )));
        }
        Ok(Self {
            sample_rate,
            channel_count,
            samples,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u32 {
        self.channel_count
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channel_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback length of the clip.
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frame_count() as f64 / self.sample_rate as f64)
    }

    /// Iterate the samples of a single channel in frame order.
    ///
    /// Yields nothing when `channel` is out of range.
    pub fn channel(&self, channel: u32) -> impl Iterator<Item = f32> + '_ {
        let start = if channel < self.channel_count {
            channel as usize
        } else {
            self.samples.len()
        };
        self.samples[start..]
            .iter()
            .step_by(self.channel_count as usize)
            .copied()
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}
