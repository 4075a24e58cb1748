//! Downsamples a multichannel clip into a fixed-size bar plot.
//!
//! Every channel gets its own horizontal band. Each pixel column of a band
//! averages `|sample|` over a window of frames and draws a bar upward from
//! the band's baseline. Bars are scaled against the minimum and maximum
//! magnitude of the whole clip, so all channels share one vertical scale.

use crate::models::audio_buffer::AudioBuffer;
use crate::models::error::RenderError;
use crate::models::render::{PixelBuffer, RenderStyle, RenderTarget};

/// Renders clips into a retained target size.
#[derive(Debug, Clone, Default)]
pub struct WaveformRenderer {
    target: RenderTarget,
    style: RenderStyle,
}

impl WaveformRenderer {
    pub fn new(target: RenderTarget, style: RenderStyle) -> Self {
        Self { target, style }
    }

    pub fn target(&self) -> RenderTarget {
        self.target
    }

    /// Change the image size used by subsequent renders.
    pub fn set_target(&mut self, target: RenderTarget) {
        self.target = target;
    }

    pub fn style(&self) -> RenderStyle {
        self.style
    }

    pub fn render(&self, buffer: &AudioBuffer) -> Result<PixelBuffer, RenderError> {
        render_waveform(buffer, &self.target, &self.style)
    }
}

/// Draw `buffer` into a fresh `target.width * target.height` image.
///
/// Layouts that leave no room for bars (bands thinner than one row, or
/// fewer frames than plot columns) return the blank background image.
pub fn render_waveform(
    buffer: &AudioBuffer,
    target: &RenderTarget,
    style: &RenderStyle,
) -> Result<PixelBuffer, RenderError> {
    let frame_count = buffer.frame_count();
    if frame_count == 0 {
        return Err(RenderError::EmptyBuffer);
    }

    let mut image = PixelBuffer::filled(target.width, target.height, style.background);

    let Some(layout) = Layout::compute(target, buffer.channel_count(), frame_count) else {
        log::debug!(
            "waveform layout {}x{} too small for {} channels / {} frames, leaving blank",
            target.width,
            target.height,
            buffer.channel_count(),
            frame_count
        );
        return Ok(image);
    };

    let bounds = MagnitudeBounds::of(buffer.samples());

    for channel in 0..buffer.channel_count() {
        let y_offset = layout.band_origin(channel);

        for x in 0..layout.working_width {
            let start = x as usize * layout.samples_per_pixel;
            let Some(mean) = window_mean(buffer, channel, start, layout.samples_per_pixel) else {
                continue;
            };

            let t = bounds.normalize(mean);
            let bar = (t * layout.height_per_channel as f32).round_ties_even() as u32;
            let column = target.horizontal_margin + x;

            for y in y_offset..=y_offset + bar {
                image.set(column, y, style.foreground);
            }
        }
    }

    Ok(image)
}

/// Band and column geometry for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    channel_spacing: u32,
    height_per_channel: u32,
    working_width: u32,
    samples_per_pixel: usize,
}

impl Layout {
    fn compute(target: &RenderTarget, channel_count: u32, frame_count: usize) -> Option<Self> {
        let channels = u64::from(channel_count.max(1));
        let total_padding = u64::from(target.channel_spacing) * (channels + 1);
        let height_per_channel = u64::from(target.height).checked_sub(total_padding)? / channels;
        if height_per_channel == 0 {
            return None;
        }

        let working_width = u64::from(target.width).checked_sub(2 * u64::from(target.horizontal_margin))?;
        if working_width == 0 {
            return None;
        }

        let samples_per_pixel = frame_count as u64 / working_width;
        if samples_per_pixel == 0 {
            return None;
        }

        // both fit: they are bounded by target.height / target.width
        Some(Self {
            channel_spacing: target.channel_spacing,
            height_per_channel: height_per_channel as u32,
            working_width: working_width as u32,
            samples_per_pixel: samples_per_pixel as usize,
        })
    }

    /// Baseline row of a channel's band.
    fn band_origin(&self, channel: u32) -> u32 {
        self.channel_spacing + channel * (self.channel_spacing + self.height_per_channel)
    }
}

/// Smallest and largest `|sample|` across every channel of a clip.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MagnitudeBounds {
    min: f32,
    max: f32,
}

impl MagnitudeBounds {
    fn of(samples: &[f32]) -> Self {
        samples.iter().map(|s| s.abs()).fold(
            Self {
                min: f32::INFINITY,
                max: f32::NEG_INFINITY,
            },
            |bounds, magnitude| Self {
                min: bounds.min.min(magnitude),
                max: bounds.max.max(magnitude),
            },
        )
    }

    /// Position of `value` between the bounds, clamped to `[0, 1]`.
    ///
    /// A clip with a single magnitude (e.g. silence) maps everything to 0.
    fn normalize(&self, value: f32) -> f32 {
        if self.max > self.min {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Mean `|sample|` of `channel` over frames `[start, start + len)`.
///
/// Frames past the end of the clip are skipped; `None` when none remain.
fn window_mean(buffer: &AudioBuffer, channel: u32, start: usize, len: usize) -> Option<f32> {
    let channels = buffer.channel_count() as usize;
    let end = (start + len).min(buffer.frame_count());
    if start >= end {
        return None;
    }

    let samples = buffer.samples();
    let sum: f32 = (start..end).map(|frame| samples[channel as usize + frame * channels].abs()).sum();
    Some(sum / (end - start) as f32)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::models::render::Rgba;

    fn target(width: u32, height: u32, horizontal_margin: u32, channel_spacing: u32) -> RenderTarget {
        RenderTarget {
            width,
            height,
            horizontal_margin,
            channel_spacing,
        }
    }

    fn stereo_ramp() -> AudioBuffer {
        AudioBuffer::new(
            48000,
            2,
            vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 4.0, 4.0, 3.0, 3.0, 2.0, 2.0, 1.0, 1.0],
        )
        .unwrap()
    }

    /// Foreground rows painted contiguously upward from `y_offset`.
    fn bar_rows(image: &PixelBuffer, column: u32, y_offset: u32) -> u32 {
        (y_offset..image.height())
            .take_while(|&y| image.get(column, y) == Some(Rgba::BLACK))
            .count() as u32
    }

    fn is_blank(image: &PixelBuffer) -> bool {
        image.pixels().iter().all(|&p| p == Rgba::WHITE)
    }

    #[test]
    fn empty_buffer_is_an_error() {
        let buffer = AudioBuffer::new(44100, 1, Vec::new()).unwrap();
        let err = render_waveform(&buffer, &RenderTarget::default(), &RenderStyle::default()).unwrap_err();
        assert_eq!(err, RenderError::EmptyBuffer);
    }

    #[test]
    fn output_matches_target_size() {
        let buffer = AudioBuffer::new(8000, 3, (0..3000).map(|i| (i as f32 * 0.01).sin()).collect()).unwrap();
        for t in [target(100, 60, 5, 5), target(37, 91, 0, 0), target(1000, 1, 0, 0)] {
            let image = render_waveform(&buffer, &t, &RenderStyle::default()).unwrap();
            assert_eq!(image.len(), (t.width * t.height) as usize);
            assert_eq!(image.width(), t.width);
            assert_eq!(image.height(), t.height);
        }
    }

    #[test]
    fn ramp_columns_average_their_window() {
        let buffer = stereo_ramp();
        assert_relative_eq!(window_mean(&buffer, 0, 0, 2).unwrap(), 1.5);
        assert_relative_eq!(window_mean(&buffer, 0, 2, 2).unwrap(), 3.5);
        assert_relative_eq!(window_mean(&buffer, 1, 6, 2).unwrap(), 1.5);
    }

    #[test]
    fn trailing_window_is_truncated_and_empty_window_skipped() {
        let buffer = stereo_ramp();
        // frames 6..8 only; the rest of the window runs past the clip
        assert_relative_eq!(window_mean(&buffer, 0, 6, 4).unwrap(), 1.5);
        assert_eq!(window_mean(&buffer, 0, 8, 2), None);
    }

    #[test]
    fn quieter_window_draws_shorter_bar() {
        // working width 4 over 8 frames: 2 frames per column, 20 rows per band
        let t = target(8, 46, 2, 2);
        let image = render_waveform(&stereo_ramp(), &t, &RenderStyle::default()).unwrap();

        for y_offset in [2, 24] {
            let first = bar_rows(&image, 2, y_offset);
            let second = bar_rows(&image, 3, y_offset);
            assert!(first < second);
            // mean 1.5 against [1, 4] -> round(20 / 6) = 3 rows above the baseline
            assert_eq!(first, 4);
            // mean 3.5 -> round(20 * 5 / 6) = 17 rows above the baseline
            assert_eq!(second, 18);
            // symmetric ramp
            assert_eq!(bar_rows(&image, 4, y_offset), second);
            assert_eq!(bar_rows(&image, 5, y_offset), first);
        }
    }

    #[test]
    fn margins_and_spacing_stay_blank() {
        let t = target(8, 46, 2, 2);
        let image = render_waveform(&stereo_ramp(), &t, &RenderStyle::default()).unwrap();

        for y in 0..t.height {
            for x in [0, 1, 6, 7] {
                assert_eq!(image.get(x, y), Some(Rgba::WHITE));
            }
        }
        for x in 0..t.width {
            assert_eq!(image.get(x, 0), Some(Rgba::WHITE));
            assert_eq!(image.get(x, 1), Some(Rgba::WHITE));
        }
    }

    #[test]
    fn silence_draws_single_row_bars() {
        let buffer = AudioBuffer::new(44100, 2, vec![0.0; 200]).unwrap();
        let t = target(20, 30, 0, 2);
        let image = render_waveform(&buffer, &t, &RenderStyle::default()).unwrap();

        // (30 - 6) / 2 = 12 rows per band
        for y_offset in [2, 16] {
            for x in 0..t.width {
                assert_eq!(bar_rows(&image, x, y_offset), 1);
            }
        }
    }

    #[test]
    fn constant_magnitude_draws_single_row_bars() {
        let buffer = AudioBuffer::new(44100, 1, vec![0.5, -0.5, 0.5, -0.5, 0.5, -0.5]).unwrap();
        let t = target(3, 10, 0, 0);
        let image = render_waveform(&buffer, &t, &RenderStyle::default()).unwrap();

        for x in 0..t.width {
            assert_eq!(bar_rows(&image, x, 0), 1);
        }
    }

    #[test]
    fn channels_share_one_scale() {
        let buffer = AudioBuffer::new(44100, 2, vec![1.0, 0.5, -1.0, 0.5, 1.0, -0.5, -1.0, 0.5]).unwrap();
        let t = target(2, 26, 0, 2);
        let image = render_waveform(&buffer, &t, &RenderStyle::default()).unwrap();

        // 10 rows per band; loud channel spans the band, quiet channel sits at the minimum
        assert_eq!(bar_rows(&image, 0, 2), 11);
        assert_eq!(bar_rows(&image, 0, 14), 1);
    }

    #[test]
    fn bars_past_the_top_edge_are_clipped() {
        let buffer = AudioBuffer::new(44100, 1, vec![0.0, 0.0, 1.0, 1.0]).unwrap();
        let t = target(2, 10, 0, 0);
        let image = render_waveform(&buffer, &t, &RenderStyle::default()).unwrap();

        assert_eq!(bar_rows(&image, 1, 0), 10);
        assert_eq!(bar_rows(&image, 0, 0), 1);
    }

    #[test]
    fn too_short_for_bands_renders_blank() {
        let buffer = AudioBuffer::new(44100, 2, vec![0.3; 400]).unwrap();
        let image = render_waveform(&buffer, &target(100, 16, 0, 5), &RenderStyle::default()).unwrap();
        assert_eq!(image.len(), 1600);
        assert!(is_blank(&image));
    }

    #[test]
    fn fewer_frames_than_columns_renders_blank() {
        let buffer = AudioBuffer::new(44100, 1, vec![0.3, 0.9, 0.1]).unwrap();
        let image = render_waveform(&buffer, &target(14, 20, 5, 1), &RenderStyle::default()).unwrap();
        assert!(is_blank(&image));
    }

    #[test]
    fn margins_wider_than_image_render_blank() {
        let buffer = AudioBuffer::new(44100, 1, vec![0.3; 100]).unwrap();
        let image = render_waveform(&buffer, &target(10, 20, 5, 1), &RenderStyle::default()).unwrap();
        assert!(is_blank(&image));

        let image = render_waveform(&buffer, &target(10, 20, 8, 1), &RenderStyle::default()).unwrap();
        assert!(is_blank(&image));
    }

    #[test]
    fn uses_style_colours() {
        let style = RenderStyle {
            background: Rgba([10, 20, 30, 255]),
            foreground: Rgba([200, 0, 0, 255]),
        };
        let buffer = AudioBuffer::new(44100, 1, vec![0.0; 4]).unwrap();
        let image = render_waveform(&buffer, &target(2, 4, 0, 1), &style).unwrap();

        assert_eq!(image.get(0, 0), Some(style.background));
        assert_eq!(image.get(0, 1), Some(style.foreground));
    }

    #[test]
    fn renderer_is_repeatable_and_retargetable() {
        let buffer = stereo_ramp();
        let mut renderer = WaveformRenderer::new(target(8, 46, 2, 2), RenderStyle::default());

        let first = renderer.render(&buffer).unwrap();
        assert_eq!(renderer.render(&buffer).unwrap(), first);

        renderer.set_target(target(6, 20, 1, 1));
        let resized = renderer.render(&buffer).unwrap();
        assert_eq!(resized.len(), 120);
        assert_eq!(renderer.target().width, 6);
    }
}
