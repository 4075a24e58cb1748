use chrono::{DateTime, Utc};

/// Capture session state machine.
///
/// ```text
/// idle ──start(device, rate)──▶ recording ──stop──▶ idle
/// ```
///
/// Transitions happen only through explicit `start`/`stop` calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Recording {
        device: String,
        sample_rate: u32,
        started_at: DateTime<Utc>,
    },
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    /// Device being recorded from, if any.
    pub fn device(&self) -> Option<&str> {
        match self {
            Self::Recording { device, .. } => Some(device),
            Self::Idle => None,
        }
    }

    /// Sample rate of the active recording, if any.
    pub fn sample_rate(&self) -> Option<u32> {
        match self {
            Self::Recording { sample_rate, .. } => Some(*sample_rate),
            Self::Idle => None,
        }
    }

    /// Wall-clock time elapsed since recording started.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        match self {
            Self::Recording { started_at, .. } => Some(Utc::now() - *started_at),
            Self::Idle => None,
        }
    }
}
