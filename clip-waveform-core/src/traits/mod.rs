pub mod capture_backend;
pub mod capture_delegate;
pub mod device_catalog;
pub mod playback;
