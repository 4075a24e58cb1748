//! cpal input capture backend.
//!
//! Opens an input stream on a named device at the requested sample rate and
//! converts whatever sample format the device delivers to f32 before writing
//! it into the session's bounded capture buffer.

use std::collections::HashMap;

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{
    BufferSize, Device, FromSample, Host, Sample, SampleFormat, SampleRate, SizedSample, Stream, StreamConfig,
    SupportedStreamConfigRange,
};
use clip_waveform_core::models::error::CaptureError;
use clip_waveform_core::traits::capture_backend::{CaptureBackend, CaptureHandle, SharedCaptureBuffer};

use crate::device_catalog::find_input_device;

/// Capture backend built on the default cpal host.
///
/// Keeps one live stream per device name. The stream callback runs on a
/// cpal-managed thread and only locks the shared buffer long enough to copy
/// the converted block in.
pub struct CpalCaptureBackend {
    host: Host,
    streams: HashMap<String, Stream>,
}

impl CpalCaptureBackend {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
            streams: HashMap::new(),
        }
    }

    /// Whether a stream is currently open on `device`.
    pub fn is_capturing(&self, device: &str) -> bool {
        self.streams.contains_key(device)
    }
}

impl Default for CpalCaptureBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for CpalCaptureBackend {
    fn open(&mut self, device: &str, max_seconds: u32, sample_rate: u32) -> Result<CaptureHandle, CaptureError> {
        if self.is_capturing(device) {
            return Err(CaptureError::ConfigurationFailed(format!(
                "capture already running on '{}'",
                device
            )));
        }

        let input = find_input_device(&self.host, device)?;
        let range = pick_config(&input, sample_rate)?;
        let config = StreamConfig {
            channels: range.channels(),
            sample_rate: SampleRate(sample_rate),
            buffer_size: BufferSize::Default,
        };

        log::debug!(
            "opening '{}': format={:?} channels={} sample_rate={}Hz",
            device,
            range.sample_format(),
            config.channels,
            sample_rate
        );

        let handle = CaptureHandle::new(device, sample_rate, u32::from(config.channels), max_seconds);
        let sink = handle.sink();

        let stream = match range.sample_format() {
            SampleFormat::F32 => build_stream::<f32>(&input, &config, device, sink)?,
            SampleFormat::I16 => build_stream::<i16>(&input, &config, device, sink)?,
            SampleFormat::U16 => build_stream::<u16>(&input, &config, device, sink)?,
            SampleFormat::I32 => build_stream::<i32>(&input, &config, device, sink)?,
            other => {
                return Err(CaptureError::DeviceUnavailable(format!(
                    "unsupported sample format: {:?}",
                    other
                )))
            }
        };

        stream
            .play()
            .map_err(|e| CaptureError::DeviceUnavailable(format!("failed to start stream: {}", e)))?;

        self.streams.insert(device.to_string(), stream);
        Ok(handle)
    }

    fn close(&mut self, device: &str) -> Result<(), CaptureError> {
        let stream = self.streams.remove(device).ok_or(CaptureError::NoActiveDevice)?;
        if let Err(e) = stream.pause() {
            log::debug!("failed to pause stream on '{}': {}", device, e);
        }
        drop(stream);
        Ok(())
    }
}

/// Choose the input configuration to open `device` with at `sample_rate`.
///
/// Prefers float formats over integer ones, then stereo or mono layouts
/// over wider ones.
fn pick_config(device: &Device, sample_rate: u32) -> Result<SupportedStreamConfigRange, CaptureError> {
    let configs = device
        .supported_input_configs()
        .map_err(|e| CaptureError::DeviceUnavailable(format!("failed to query input configs: {}", e)))?;

    configs
        .filter(|range| range.min_sample_rate().0 <= sample_rate && sample_rate <= range.max_sample_rate().0)
        .filter(|range| format_rank(range.sample_format()) > 0)
        .max_by_key(|range| {
            let channels = range.channels();
            (format_rank(range.sample_format()), channels <= 2, channels)
        })
        .ok_or_else(|| CaptureError::DeviceUnavailable(format!("{} Hz is not supported by this device", sample_rate)))
}

pub(crate) fn format_rank(format: SampleFormat) -> u8 {
    match format {
        SampleFormat::F32 => 4,
        SampleFormat::I32 => 3,
        SampleFormat::I16 => 2,
        SampleFormat::U16 => 1,
        _ => 0,
    }
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    name: &str,
    sink: SharedCaptureBuffer,
) -> Result<Stream, CaptureError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let name = name.to_string();
    let err_fn = move |err| log::error!("input stream error on '{}': {}", name, err);

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let mut buffer = sink.lock();
                if buffer.is_full() {
                    return;
                }
                let converted: Vec<f32> = data.iter().map(|&s| f32::from_sample(s)).collect();
                buffer.write(&converted);
            },
            err_fn,
            None,
        )
        .map_err(|e| CaptureError::DeviceUnavailable(format!("failed to build input stream: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_formats_rank_above_integer() {
        assert!(format_rank(SampleFormat::F32) > format_rank(SampleFormat::I32));
        assert!(format_rank(SampleFormat::I16) > format_rank(SampleFormat::U16));
        assert_eq!(format_rank(SampleFormat::U8), 0);
    }
}
