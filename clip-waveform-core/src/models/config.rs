use serde::{Deserialize, Serialize};

use super::error::CaptureError;
use super::render::{RenderStyle, RenderTarget};

/// Sample rates offered when the device range allows them.
pub const DEFAULT_CANDIDATE_SAMPLE_RATES: [u32; 8] = [8000, 11025, 16000, 22050, 32000, 44100, 48000, 96000];

/// Configuration for capture and display.
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfiguration {
    /// Longest clip a single recording may hold, in seconds (default: 30).
    pub max_duration_secs: u32,

    /// Rates offered for selection in addition to each device's range endpoints.
    pub candidate_sample_rates: Vec<u32>,

    /// Image size and layout the waveform is drawn into.
    pub target: RenderTarget,

    /// Waveform colours.
    pub style: RenderStyle,
}

impl CaptureConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_duration_secs == 0 {
            return Err("max duration must be at least one second".into());
        }
        if self.candidate_sample_rates.contains(&0) {
            return Err("candidate sample rates must be positive".into());
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, CaptureError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CaptureError::ConfigurationFailed(format!("failed to parse configuration: {}", e)))?;
        config.validate().map_err(CaptureError::ConfigurationFailed)?;
        Ok(config)
    }
}

impl Default for CaptureConfiguration {
    fn default() -> Self {
        Self {
            max_duration_secs: 30,
            candidate_sample_rates: DEFAULT_CANDIDATE_SAMPLE_RATES.to_vec(),
            target: RenderTarget::default(),
            style: RenderStyle::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = CaptureConfiguration::default();
        assert_eq!(config.max_duration_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = CaptureConfiguration::from_json(
            r#"{ "max_duration_secs": 5, "target": { "width": 100, "height": 40, "horizontal_margin": 2, "channel_spacing": 1 } }"#,
        )
        .unwrap();

        assert_eq!(config.max_duration_secs, 5);
        assert_eq!(config.target.width, 100);
        assert_eq!(config.candidate_sample_rates, DEFAULT_CANDIDATE_SAMPLE_RATES.to_vec());
        assert_eq!(config.style, RenderStyle::default());
    }

    #[test]
    fn rejects_zero_duration() {
        let err = CaptureConfiguration::from_json(r#"{ "max_duration_secs": 0 }"#).unwrap_err();
        assert!(matches!(err, CaptureError::ConfigurationFailed(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(CaptureConfiguration::from_json("{ not json").is_err());
    }
}
