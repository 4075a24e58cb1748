//! Record/stop toggle that turns each finished clip into a waveform image.
//!
//! Holds everything a front end needs to drive the recorder: the device list
//! with the sample rates each one offers, the current selection, and whether
//! the controls should be enabled. Widgets are left to the caller.

use crate::devices::resolver::DeviceCapabilityResolver;
use crate::models::audio_buffer::AudioBuffer;
use crate::models::error::{CaptureError, VisualizerError};
use crate::models::render::PixelBuffer;
use crate::processing::waveform::WaveformRenderer;
use crate::session::capture::CaptureSession;
use crate::traits::capture_backend::CaptureBackend;
use crate::traits::device_catalog::DeviceCatalog;
use crate::traits::playback::PlaybackSink;

/// A selectable input device and the rates offered for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceOption {
    pub name: String,
    /// Ascending; empty when the device's capabilities could not be read.
    pub rates: Vec<u32>,
}

/// What a call to [`Visualizer::toggle`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Started { device: String, sample_rate: u32 },
    Stopped { clip: AudioBuffer, image: PixelBuffer },
}

pub struct Visualizer<B: CaptureBackend> {
    session: CaptureSession<B>,
    renderer: WaveformRenderer,
    playback: Option<Box<dyn PlaybackSink>>,
    options: Vec<DeviceOption>,
    selected_device: usize,
    selected_rate: usize,
}

impl<B: CaptureBackend> Visualizer<B> {
    /// Build the controller and its device list.
    ///
    /// Fails only if the device list itself cannot be read; a device whose
    /// rate range cannot be queried is listed with no rates.
    pub fn new<C: DeviceCatalog>(
        session: CaptureSession<B>,
        renderer: WaveformRenderer,
        resolver: &DeviceCapabilityResolver<C>,
        candidate_rates: &[u32],
    ) -> Result<Self, VisualizerError> {
        let mut visualizer = Self {
            session,
            renderer,
            playback: None,
            options: Vec::new(),
            selected_device: 0,
            selected_rate: 0,
        };
        visualizer.refresh_devices(resolver, candidate_rates)?;
        Ok(visualizer)
    }

    pub fn set_playback(&mut self, playback: Box<dyn PlaybackSink>) {
        self.playback = Some(playback);
    }

    /// Re-read the device list and reset the selection to the first entry.
    pub fn refresh_devices<C: DeviceCatalog>(
        &mut self,
        resolver: &DeviceCapabilityResolver<C>,
        candidate_rates: &[u32],
    ) -> Result<(), VisualizerError> {
        if self.session.is_recording() {
            return Err(CaptureError::AlreadyRecording.into());
        }

        self.options = resolver
            .enumerate()?
            .into_iter()
            .map(|name| {
                let rates = resolver.offered_rates(&name, candidate_rates).unwrap_or_else(|e| {
                    log::warn!("could not read sample rates for '{}': {}", name, e);
                    Vec::new()
                });
                DeviceOption { name, rates }
            })
            .collect();
        self.selected_device = 0;
        self.selected_rate = 0;
        Ok(())
    }

    pub fn devices(&self) -> &[DeviceOption] {
        &self.options
    }

    pub fn selected_device(&self) -> Option<&DeviceOption> {
        self.options.get(self.selected_device)
    }

    pub fn selected_rate(&self) -> Option<u32> {
        self.selected_device()
            .and_then(|option| option.rates.get(self.selected_rate))
            .copied()
    }

    /// Whether the record/stop control should be enabled.
    pub fn can_toggle(&self) -> bool {
        self.session.is_recording() || self.selected_rate().is_some()
    }

    /// Whether the device and rate pickers should be enabled.
    pub fn can_change_selection(&self) -> bool {
        !self.session.is_recording() && !self.options.is_empty()
    }

    /// Choose a device by index; the rate selection resets to its lowest rate.
    pub fn select_device(&mut self, index: usize) -> Result<(), VisualizerError> {
        self.ensure_idle()?;
        if index >= self.options.len() {
            return Err(VisualizerError::InvalidSelection(index));
        }
        self.selected_device = index;
        self.selected_rate = 0;
        Ok(())
    }

    /// Choose a rate by index into the selected device's offered rates.
    pub fn select_rate(&mut self, index: usize) -> Result<(), VisualizerError> {
        self.ensure_idle()?;
        let offered = self.selected_device().map_or(0, |option| option.rates.len());
        if index >= offered {
            return Err(VisualizerError::InvalidSelection(index));
        }
        self.selected_rate = index;
        Ok(())
    }

    /// Start recording with the current selection, or stop and render.
    ///
    /// On stop the clip is rendered with the renderer's target and handed to
    /// the playback sink, if one is set. Playback failures are logged only.
    pub fn toggle(&mut self) -> Result<ToggleOutcome, VisualizerError> {
        if self.session.is_recording() {
            let clip = self.session.stop()?;
            let image = self.renderer.render(&clip)?;
            if let Some(ref mut playback) = self.playback {
                if let Err(e) = playback.play(&clip) {
                    log::warn!("playback failed: {}", e);
                }
            }
            return Ok(ToggleOutcome::Stopped { clip, image });
        }

        let option = self.selected_device().ok_or(VisualizerError::NoDevices)?;
        let sample_rate = self
            .selected_rate()
            .ok_or_else(|| VisualizerError::NoSampleRates(option.name.clone()))?;
        let device = option.name.clone();

        self.session.start(&device, sample_rate)?;
        Ok(ToggleOutcome::Started { device, sample_rate })
    }

    pub fn session(&self) -> &CaptureSession<B> {
        &self.session
    }

    pub fn renderer(&self) -> &WaveformRenderer {
        &self.renderer
    }

    /// Mutable access for resizing the render target.
    pub fn renderer_mut(&mut self) -> &mut WaveformRenderer {
        &mut self.renderer
    }

    fn ensure_idle(&self) -> Result<(), VisualizerError> {
        if self.session.is_recording() {
            return Err(CaptureError::AlreadyRecording.into());
        }
        Ok(())
    }
}
