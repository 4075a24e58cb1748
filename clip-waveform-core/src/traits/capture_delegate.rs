use crate::models::error::CaptureError;
use crate::models::state::CaptureState;

/// Event delegate for capture session notifications.
///
/// Methods are called synchronously from `start`/`stop`, on the caller's thread.
pub trait CaptureDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, state: &CaptureState);

    /// Called when `start` or `stop` is rejected or fails.
    fn on_error(&self, error: &CaptureError);
}
