//! # clip-waveform-core
//!
//! Platform-agnostic core for recording a bounded microphone clip and
//! drawing it as a per-channel waveform.
//!
//! Provides the capture state machine, sample-rate negotiation and the
//! waveform rasterizer. Platform backends (cpal) implement the
//! `CaptureBackend` and `DeviceCatalog` traits and plug into the generic
//! `CaptureSession` and `DeviceCapabilityResolver`.
//!
//! ## Architecture
//!
//! ```text
//! clip-waveform-core (this crate)
//! ├── traits/       ← CaptureBackend, DeviceCatalog, CaptureDelegate, PlaybackSink
//! ├── models/       ← AudioBuffer, CaptureError, CaptureState, RenderTarget, PixelBuffer, etc.
//! ├── processing/   ← CaptureBuffer, waveform rendering
//! ├── devices/      ← DeviceCapabilityResolver
//! └── session/      ← CaptureSession, Visualizer (record/stop toggle)
//! ```

pub mod devices;
pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use devices::resolver::{offered_rates, DeviceCapabilityResolver};
pub use models::audio_buffer::AudioBuffer;
pub use models::config::{CaptureConfiguration, DEFAULT_CANDIDATE_SAMPLE_RATES};
pub use models::device::DeviceCapability;
pub use models::error::{CaptureError, RenderError, VisualizerError};
pub use models::render::{PixelBuffer, RenderStyle, RenderTarget, Rgba};
pub use models::state::CaptureState;
pub use processing::capture_buffer::CaptureBuffer;
pub use processing::waveform::{render_waveform, WaveformRenderer};
pub use session::capture::CaptureSession;
pub use session::visualizer::{DeviceOption, ToggleOutcome, Visualizer};
pub use traits::capture_backend::{CaptureBackend, CaptureHandle, SharedCaptureBuffer};
pub use traits::capture_delegate::CaptureDelegate;
pub use traits::device_catalog::DeviceCatalog;
pub use traits::playback::PlaybackSink;
