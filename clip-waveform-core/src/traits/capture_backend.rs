use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::error::CaptureError;
use crate::processing::capture_buffer::CaptureBuffer;

/// Shared sample store a backend's audio thread writes into.
pub type SharedCaptureBuffer = Arc<Mutex<CaptureBuffer>>;

/// An open, non-looping capture on one device.
///
/// Returned by [`CaptureBackend::open`]; the backend keeps a clone of
/// [`CaptureHandle::sink`] and writes interleaved f32 frames into it until
/// closed or until the buffer reaches its ceiling.
#[derive(Debug, Clone)]
pub struct CaptureHandle {
    device: String,
    sample_rate: u32,
    channels: u32,
    buffer: SharedCaptureBuffer,
}

impl CaptureHandle {
    /// Allocate a handle whose buffer holds at most `max_seconds` of audio.
    pub fn new(device: &str, sample_rate: u32, channels: u32, max_seconds: u32) -> Self {
        let channels = channels.max(1);
        Self {
            device: device.to_string(),
            sample_rate,
            channels,
            buffer: Arc::new(Mutex::new(CaptureBuffer::for_duration(
                max_seconds,
                sample_rate,
                channels as usize,
            ))),
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Buffer the platform callback writes into.
    pub fn sink(&self) -> SharedCaptureBuffer {
        Arc::clone(&self.buffer)
    }

    /// Drain the complete frames written so far.
    ///
    /// Returns `(samples, frames_written)`; `samples` holds exactly
    /// `frames_written * channels` values.
    pub fn read_back(&self) -> (Vec<f32>, usize) {
        let mut buffer = self.buffer.lock();
        let frames = buffer.frames_written();
        let dropped = buffer.dropped_samples();
        if dropped > 0 {
            log::info!(
                "capture on '{}' hit its {}-frame ceiling, {} samples dropped",
                self.device,
                buffer.capacity_frames(),
                dropped
            );
        }
        (buffer.take_frames(), frames)
    }
}

/// Platform audio-input primitive.
///
/// Implemented by:
/// - `CpalCaptureBackend` (clip-waveform-cpal)
/// - test fakes
pub trait CaptureBackend {
    /// Start non-looping capture on `device` at `sample_rate`.
    ///
    /// Samples are delivered on a platform thread into the returned handle's
    /// buffer, which is bounded to `max_seconds` of audio.
    fn open(&mut self, device: &str, max_seconds: u32, sample_rate: u32) -> Result<CaptureHandle, CaptureError>;

    /// Stop capturing on `device` and release its stream.
    fn close(&mut self, device: &str) -> Result<(), CaptureError>;

    /// Read back whatever a closed capture recorded.
    fn read_back(&mut self, handle: &CaptureHandle) -> (Vec<f32>, usize) {
        handle.read_back()
    }
}
