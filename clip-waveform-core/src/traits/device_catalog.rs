use crate::models::error::CaptureError;

/// Source of input devices and their sample-rate ranges.
pub trait DeviceCatalog {
    /// Input device names in the order the platform reports them.
    ///
    /// An empty list means no microphone is present.
    fn input_devices(&self) -> Result<Vec<String>, CaptureError>;

    /// Inclusive `(min, max)` sample rates `device` accepts.
    fn sample_rate_range(&self, device: &str) -> Result<(u32, u32), CaptureError>;
}
