use crate::models::audio_buffer::AudioBuffer;
use crate::models::error::CaptureError;

/// Output device the finished clip is handed to for playback.
pub trait PlaybackSink {
    fn play(&mut self, clip: &AudioBuffer) -> Result<(), CaptureError>;
}
