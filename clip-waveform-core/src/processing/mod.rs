pub mod capture_buffer;
pub mod waveform;
