//! Input device enumeration via cpal.
//!
//! Lists the default host's capture devices by name and folds each device's
//! supported stream configurations into a single sample-rate range.

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host, SampleFormat};

use clip_waveform_core::models::error::CaptureError;
use clip_waveform_core::traits::device_catalog::DeviceCatalog;

use crate::cpal_capture::format_rank;

/// Device catalog backed by the default cpal host.
pub struct CpalDeviceCatalog {
    host: Host,
}

impl CpalDeviceCatalog {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }

    /// Name of the host's default input device, if there is one.
    pub fn default_device_name(&self) -> Option<String> {
        self.host.default_input_device().and_then(|d| d.name().ok())
    }
}

impl Default for CpalDeviceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceCatalog for CpalDeviceCatalog {
    fn input_devices(&self) -> Result<Vec<String>, CaptureError> {
        let devices = self
            .host
            .input_devices()
            .map_err(|e| CaptureError::Backend(format!("failed to enumerate input devices: {}", e)))?;

        let mut names = Vec::new();
        for (i, device) in devices.enumerate() {
            match device.name() {
                Ok(name) => names.push(name),
                Err(e) => log::debug!("skipping input device {} without a name: {}", i, e),
            }
        }
        Ok(names)
    }

    fn sample_rate_range(&self, device: &str) -> Result<(u32, u32), CaptureError> {
        let device = find_input_device(&self.host, device)?;
        let configs = device
            .supported_input_configs()
            .map_err(|e| CaptureError::Backend(format!("failed to query input configs: {}", e)))?;

        capturable_rate_range(
            configs.map(|range| (range.sample_format(), range.min_sample_rate().0, range.max_sample_rate().0)),
        )
        .ok_or_else(|| CaptureError::Backend("device reports no usable input configurations".into()))
    }
}

/// Fold the rate ranges of the configurations the capture backend can open.
fn capturable_rate_range(ranges: impl IntoIterator<Item = (SampleFormat, u32, u32)>) -> Option<(u32, u32)> {
    ranges
        .into_iter()
        .filter(|&(format, _, _)| format_rank(format) > 0)
        .map(|(_, min, max)| (min, max))
        .reduce(|(min_a, max_a), (min_b, max_b)| (min_a.min(min_b), max_a.max(max_b)))
}

/// Look up an input device by its exact name.
pub(crate) fn find_input_device(host: &Host, name: &str) -> Result<Device, CaptureError> {
    let mut devices = host
        .input_devices()
        .map_err(|e| CaptureError::Backend(format!("failed to enumerate input devices: {}", e)))?;

    devices
        .find(|d| d.name().map(|n| n == name).unwrap_or(false))
        .ok_or_else(|| CaptureError::DeviceUnavailable(format!("input device '{}' not found", name)))
}
