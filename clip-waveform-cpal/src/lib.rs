//! # clip-waveform-cpal
//!
//! cpal backend for clip-waveform.
//!
//! Provides:
//! - `CpalCaptureBackend`: Non-looping input capture into the session's bounded buffer
//! - `CpalDeviceCatalog`: Input device names and sample-rate ranges from the default host
//!
//! ## Usage
//! ```ignore
//! use clip_waveform_core::{CaptureConfiguration, CaptureSession, DeviceCapabilityResolver};
//! use clip_waveform_cpal::{CpalCaptureBackend, CpalDeviceCatalog};
//!
//! let config = CaptureConfiguration::default();
//! let resolver = DeviceCapabilityResolver::new(CpalDeviceCatalog::new());
//! let mut session = CaptureSession::new(CpalCaptureBackend::new(), &config);
//! ```

pub mod cpal_capture;
pub mod device_catalog;

pub use cpal_capture::CpalCaptureBackend;
pub use device_catalog::CpalDeviceCatalog;
