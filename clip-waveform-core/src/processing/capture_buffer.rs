/// Bounded, non-looping store for interleaved capture samples.
///
/// Filled from the platform audio thread; wrap in
/// `Arc<parking_lot::Mutex<CaptureBuffer>>` for cross-thread access.
///
/// Once `capacity_frames` frames have been written, further samples are
/// dropped: the recording simply ends at the ceiling.
#[derive(Debug)]
pub struct CaptureBuffer {
    samples: Vec<f32>,
    channels: usize,
    capacity_frames: usize,
    dropped_samples: u64,
}

impl CaptureBuffer {
    /// `channels` is clamped to at least 1.
    pub fn new(capacity_frames: usize, channels: usize) -> Self {
        let channels = channels.max(1);
        Self {
            samples: Vec::with_capacity(capacity_frames * channels),
            channels,
            capacity_frames,
            dropped_samples: 0,
        }
    }

    /// Sized for `max_seconds` of audio at `sample_rate`.
    pub fn for_duration(max_seconds: u32, sample_rate: u32, channels: usize) -> Self {
        Self::new(max_seconds as usize * sample_rate as usize, channels)
    }

    /// Append interleaved samples, dropping whatever does not fit.
    ///
    /// Returns the number of samples accepted.
    pub fn write(&mut self, samples: &[f32]) -> usize {
        let room = self.capacity_samples() - self.samples.len();
        let accepted = samples.len().min(room);
        self.samples.extend_from_slice(&samples[..accepted]);
        self.dropped_samples += (samples.len() - accepted) as u64;
        accepted
    }

    /// Complete frames written so far.
    pub fn frames_written(&self) -> usize {
        self.samples.len() / self.channels
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn capacity_frames(&self) -> usize {
        self.capacity_frames
    }

    /// Samples discarded after the ceiling was reached.
    pub fn dropped_samples(&self) -> u64 {
        self.dropped_samples
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity_samples()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Remove and return every complete frame written so far.
    ///
    /// A trailing partial frame is discarded.
    pub fn take_frames(&mut self) -> Vec<f32> {
        let whole = self.frames_written() * self.channels;
        self.samples.truncate(whole);
        std::mem::take(&mut self.samples)
    }

    /// Reset the buffer to empty state.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.dropped_samples = 0;
    }

    fn capacity_samples(&self) -> usize {
        self.capacity_frames * self.channels
    }
}
