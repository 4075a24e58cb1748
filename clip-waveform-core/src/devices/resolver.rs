//! Device enumeration and sample-rate negotiation.

use std::collections::BTreeSet;

use crate::models::device::DeviceCapability;
use crate::models::error::CaptureError;
use crate::traits::device_catalog::DeviceCatalog;

/// Resolves which devices exist and which sample rates to offer for each.
///
/// Capabilities are queried fresh on every call; nothing is cached.
pub struct DeviceCapabilityResolver<C: DeviceCatalog> {
    catalog: C,
}

impl<C: DeviceCatalog> DeviceCapabilityResolver<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Input device names, in platform order. May be empty.
    pub fn enumerate(&self) -> Result<Vec<String>, CaptureError> {
        let devices = self.catalog.input_devices()?;
        if devices.is_empty() {
            log::warn!("no input devices found");
        }
        Ok(devices)
    }

    pub fn capabilities(&self, device: &str) -> Result<DeviceCapability, CaptureError> {
        let (min, max) = self.catalog.sample_rate_range(device)?;
        let (min_rate, max_rate) = if min <= max {
            (min, max)
        } else {
            log::warn!("device '{}' reported inverted rate range {}..{}", device, min, max);
            (max, min)
        };
        Ok(DeviceCapability {
            name: device.to_string(),
            min_rate,
            max_rate,
        })
    }

    /// Sample rates to offer for `device`: its range endpoints plus every
    /// candidate inside the range, ascending.
    pub fn offered_rates(&self, device: &str, candidates: &[u32]) -> Result<Vec<u32>, CaptureError> {
        Ok(offered_rates(&self.capabilities(device)?, candidates))
    }
}

/// `{min_rate, max_rate}` plus the candidates within `[min_rate, max_rate]`,
/// sorted ascending without duplicates. Never empty.
pub fn offered_rates(capability: &DeviceCapability, candidates: &[u32]) -> Vec<u32> {
    let mut rates = BTreeSet::from([capability.min_rate, capability.max_rate]);
    rates.extend(candidates.iter().copied().filter(|&rate| capability.supports(rate)));
    rates.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::models::config::DEFAULT_CANDIDATE_SAMPLE_RATES;

    struct FakeCatalog {
        devices: Vec<(&'static str, u32, u32)>,
    }

    impl DeviceCatalog for FakeCatalog {
        fn input_devices(&self) -> Result<Vec<String>, CaptureError> {
            Ok(self.devices.iter().map(|(name, _, _)| name.to_string()).collect())
        }

        fn sample_rate_range(&self, device: &str) -> Result<(u32, u32), CaptureError> {
            let ranges: HashMap<_, _> = self.devices.iter().map(|&(n, min, max)| (n, (min, max))).collect();
            ranges
                .get(device)
                .copied()
                .ok_or_else(|| CaptureError::DeviceUnavailable(device.to_string()))
        }
    }

    fn resolver() -> DeviceCapabilityResolver<FakeCatalog> {
        DeviceCapabilityResolver::new(FakeCatalog {
            devices: vec![
                ("Built-in Microphone", 16000, 48000),
                ("USB Interface", 44100, 192000),
                ("Fixed Headset", 16000, 16000),
                ("Odd Range", 12000, 47000),
                ("Inverted", 48000, 8000),
            ],
        })
    }

    fn assert_well_formed(rates: &[u32], min: u32, max: u32) {
        assert_eq!(rates.first(), Some(&min));
        assert_eq!(rates.last(), Some(&max));
        assert!(rates.windows(2).all(|w| w[0] < w[1]), "not strictly ascending: {:?}", rates);
    }

    #[test]
    fn enumerates_in_platform_order() {
        let devices = resolver().enumerate().unwrap();
        assert_eq!(devices[0], "Built-in Microphone");
        assert_eq!(devices.len(), 5);
    }

    #[test]
    fn empty_catalog_is_valid() {
        let resolver = DeviceCapabilityResolver::new(FakeCatalog { devices: Vec::new() });
        assert!(resolver.enumerate().unwrap().is_empty());
    }

    #[test]
    fn offers_candidates_inside_range() {
        let rates = resolver()
            .offered_rates("Built-in Microphone", &DEFAULT_CANDIDATE_SAMPLE_RATES)
            .unwrap();
        assert_eq!(rates, vec![16000, 22050, 32000, 44100, 48000]);
    }

    #[test]
    fn endpoints_added_when_not_candidates() {
        let rates = resolver().offered_rates("Odd Range", &[8000, 16000, 44100, 96000]).unwrap();
        assert_eq!(rates, vec![12000, 16000, 44100, 47000]);
    }

    #[test]
    fn empty_candidates_yield_endpoints() {
        let rates = resolver().offered_rates("USB Interface", &[]).unwrap();
        assert_eq!(rates, vec![44100, 192000]);
    }

    #[test]
    fn single_rate_device() {
        let rates = resolver().offered_rates("Fixed Headset", &[16000, 16000, 48000]).unwrap();
        assert_eq!(rates, vec![16000]);
    }

    #[test]
    fn duplicate_and_unsorted_candidates() {
        let rates = resolver()
            .offered_rates("USB Interface", &[96000, 48000, 96000, 44100, 8000, 48000])
            .unwrap();
        assert_eq!(rates, vec![44100, 48000, 96000, 192000]);
    }

    #[test]
    fn well_formed_for_every_device_and_candidate_set() {
        let resolver = resolver();
        let candidate_sets: [&[u32]; 4] = [&[], &DEFAULT_CANDIDATE_SAMPLE_RATES, &[1, u32::MAX], &[47000, 12000, 12000]];

        for device in resolver.enumerate().unwrap() {
            let capability = resolver.capabilities(&device).unwrap();
            for candidates in candidate_sets {
                let rates = offered_rates(&capability, candidates);
                assert_well_formed(&rates, capability.min_rate, capability.max_rate);
            }
        }
    }

    #[test]
    fn inverted_range_is_normalized() {
        let capability = resolver().capabilities("Inverted").unwrap();
        assert_eq!((capability.min_rate, capability.max_rate), (8000, 48000));
    }

    #[test]
    fn unknown_device_propagates_error() {
        let err = resolver().offered_rates("Missing", &[]).unwrap_err();
        assert_eq!(err, CaptureError::DeviceUnavailable("Missing".into()));
    }
}
