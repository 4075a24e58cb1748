use std::sync::Arc;

use chrono::Utc;

use crate::models::audio_buffer::AudioBuffer;
use crate::models::config::CaptureConfiguration;
use crate::models::error::CaptureError;
use crate::models::state::CaptureState;
use crate::traits::capture_backend::{CaptureBackend, CaptureHandle};
use crate::traits::capture_delegate::CaptureDelegate;

/// Records one bounded clip at a time from an injected capture backend.
///
/// ```text
/// [CaptureBackend] ─audio thread─▶ [CaptureHandle buffer] ─stop()─▶ AudioBuffer
/// ```
///
/// `start` and `stop` return immediately; the backend fills the bounded
/// buffer in the background until `stop` is called or the ceiling is hit.
/// The session is driven from a single control thread (`&mut self`).
pub struct CaptureSession<B: CaptureBackend> {
    backend: B,
    max_duration_secs: u32,
    state: CaptureState,
    handle: Option<CaptureHandle>,
    delegate: Option<Arc<dyn CaptureDelegate>>,
}

impl<B: CaptureBackend> CaptureSession<B> {
    pub fn new(backend: B, config: &CaptureConfiguration) -> Self {
        Self::with_max_duration(backend, config.max_duration_secs)
    }

    /// Session whose recordings stop growing after `max_duration_secs`.
    pub fn with_max_duration(backend: B, max_duration_secs: u32) -> Self {
        Self {
            backend,
            max_duration_secs: max_duration_secs.max(1),
            state: CaptureState::Idle,
            handle: None,
            delegate: None,
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CaptureDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    /// Time since the current recording started.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        self.state.elapsed()
    }

    pub fn max_duration_secs(&self) -> u32 {
        self.max_duration_secs
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start recording. Transitions: idle → recording.
    ///
    /// `sample_rate` is passed through to the backend unchecked; pick it from
    /// the device's offered rates.
    pub fn start(&mut self, device: &str, sample_rate: u32) -> Result<(), CaptureError> {
        if self.state.is_recording() {
            return self.reject(CaptureError::AlreadyRecording);
        }
        if device.is_empty() {
            return self.reject(CaptureError::ConfigurationFailed("device name is empty".into()));
        }
        if sample_rate == 0 {
            return self.reject(CaptureError::ConfigurationFailed("sample rate must be positive".into()));
        }

        let handle = match self.backend.open(device, self.max_duration_secs, sample_rate) {
            Ok(handle) => handle,
            Err(CaptureError::DeviceUnavailable(reason)) => {
                return self.reject(CaptureError::DeviceUnavailable(reason));
            }
            Err(other) => {
                return self.reject(CaptureError::DeviceUnavailable(format!("{}: {}", device, other)));
            }
        };

        log::info!(
            "recording from '{}' at {} Hz, {} channel(s), up to {}s",
            device,
            sample_rate,
            handle.channels(),
            self.max_duration_secs
        );

        self.handle = Some(handle);
        self.set_state(CaptureState::Recording {
            device: device.to_string(),
            sample_rate,
            started_at: Utc::now(),
        });
        Ok(())
    }

    /// Stop recording and return exactly the frames captured.
    /// Transitions: recording → idle.
    pub fn stop(&mut self) -> Result<AudioBuffer, CaptureError> {
        let (device, sample_rate) = match &self.state {
            CaptureState::Recording { device, sample_rate, .. } => (device.clone(), *sample_rate),
            CaptureState::Idle => return self.reject(CaptureError::NotRecording),
        };

        let Some(handle) = self.handle.take() else {
            if let Err(e) = self.backend.close(&device) {
                log::warn!("failed to close capture on '{}': {}", device, e);
            }
            self.set_state(CaptureState::Idle);
            return self.reject(CaptureError::NoActiveDevice);
        };

        if let Err(e) = self.backend.close(&device) {
            log::warn!("failed to close capture on '{}': {}", device, e);
        }

        let (samples, frames) = self.backend.read_back(&handle);
        self.set_state(CaptureState::Idle);

        let clip = AudioBuffer::new(sample_rate, handle.channels(), samples)?;
        log::info!(
            "recorded {} frames ({:.2}s) from '{}'",
            frames,
            clip.duration().as_secs_f64(),
            device
        );
        Ok(clip)
    }

    // --- Internal helpers ---

    fn set_state(&mut self, new_state: CaptureState) {
        self.state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&self.state);
        }
    }

    fn reject<T>(&self, error: CaptureError) -> Result<T, CaptureError> {
        log::warn!("capture request rejected: {}", error);
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(&error);
        }
        Err(error)
    }
}

impl<B: CaptureBackend> Drop for CaptureSession<B> {
    fn drop(&mut self) {
        if let Some(device) = self.state.device() {
            if let Err(e) = self.backend.close(device) {
                log::warn!("failed to close capture on '{}' during drop: {}", device, e);
            }
        }
    }
}
