pub mod audio_buffer;
pub mod config;
pub mod device;
pub mod error;
pub mod render;
pub mod state;
