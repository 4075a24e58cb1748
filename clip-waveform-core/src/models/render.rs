use serde::{Deserialize, Serialize};

/// Pixel dimensions and layout the waveform is drawn into.
///
/// Supplied by whoever owns the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderTarget {
    pub width: u32,
    pub height: u32,
    /// Blank columns left on each side of the plot.
    pub horizontal_margin: u32,
    /// Blank rows above, below and between channel bands.
    pub channel_spacing: u32,
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self {
            width: 512,
            height: 256,
            horizontal_margin: 5,
            channel_spacing: 5,
        }
    }
}

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);
    pub const BLACK: Rgba = Rgba([0, 0, 0, 255]);
}

/// Colours used when painting a waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub background: Rgba,
    pub foreground: Rgba,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            foreground: Rgba::BLACK,
        }
    }
}

/// Row-major RGBA image.
///
/// Row 0 is the bottom of the image: `y` grows upward, the way a texture
/// is addressed. Use [`PixelBuffer::rows_top_down`] to blit onto surfaces
/// whose origin is the top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// Create an image filled with a single colour.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set a pixel. Coordinates outside the image are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Rows ordered from the top of the image to the bottom.
    pub fn rows_top_down(&self) -> impl Iterator<Item = &[Rgba]> + '_ {
        // chunks_exact panics on zero, and a zero-width image has no rows to yield
        let width = (self.width as usize).max(1);
        self.pixels.chunks_exact(width).rev()
    }

    /// Flatten to tightly packed RGBA bytes, bottom row first.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.0).collect()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }
}
