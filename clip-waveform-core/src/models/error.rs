use thiserror::Error;

/// Errors that can occur while capturing a clip.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("a recording is already in progress")]
    AlreadyRecording,

    #[error("no recording in progress")]
    NotRecording,

    #[error("device not available: {0}")]
    DeviceUnavailable(String),

    #[error("recording has no active capture device")]
    NoActiveDevice,

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("invalid audio buffer: {0}")]
    InvalidBuffer(String),

    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Errors that can occur while rendering a waveform.
///
/// Layouts too small to draw into are not errors; they yield a blank image.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    #[error("audio buffer contains no frames")]
    EmptyBuffer,
}

/// Errors surfaced by the record/visualize controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VisualizerError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("no input devices available")]
    NoDevices,

    #[error("device '{0}' offers no sample rates")]
    NoSampleRates(String),

    #[error("selection index {0} is out of range")]
    InvalidSelection(usize),
}
