use serde::{Deserialize, Serialize};

/// Sample-rate capability of an input device.
///
/// `min_rate..=max_rate` is the inclusive range the device accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapability {
    pub name: String,
    pub min_rate: u32,
    pub max_rate: u32,
}

impl DeviceCapability {
    pub fn supports(&self, sample_rate: u32) -> bool {
        (self.min_rate..=self.max_rate).contains(&sample_rate)
    }
}
