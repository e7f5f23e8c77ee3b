//! The in-memory image: a grid of three 8-bit samples per pixel.
//!
//! Samples are stored blue, green, red (channel 0/1/2). The order only
//! matters at the edges: decoding converts into it and the display path
//! converts out of it.

use image::RgbImage;

/// Samples per pixel.
pub const CHANNELS: usize = 3;

/// One of the three colour channels, indexed by its position in a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Blue = 0,
    Green = 1,
    Red = 2,
}

impl Channel {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> char {
        match self {
            Channel::Blue => 'B',
            Channel::Green => 'G',
            Channel::Red => 'R',
        }
    }

    /// Parse user input: surrounding whitespace is ignored, case is not
    /// significant. Only the single letters R, G and B are accepted.
    pub fn from_letter(input: &str) -> Option<Channel> {
        match input.trim().to_uppercase().as_str() {
            "B" => Some(Channel::Blue),
            "G" => Some(Channel::Green),
            "R" => Some(Channel::Red),
            _ => None,
        }
    }
}

/// Three-channel pixel grid. Width and height are always non-zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// All-black buffer. Panics on a zero dimension.
    pub fn new(width: u32, height: u32) -> Self {
        Self::new_filled(width, height, [0, 0, 0])
    }

    /// Buffer with every pixel set to `bgr`. Panics on a zero dimension.
    pub fn new_filled(width: u32, height: u32, bgr: [u8; 3]) -> Self {
        assert!(width > 0 && height > 0, "pixel buffer must not be empty");
        let data = bgr.repeat(width as usize * height as usize);
        Self { width, height, data }
    }

    /// Wrap raw BGR samples. Returns `None` for a zero dimension or a length
    /// mismatch.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if data.len() != width as usize * height as usize * CHANNELS {
            return None;
        }
        Some(Self { width, height, data })
    }

    /// Convert from a decoded RGB image.
    pub fn from_rgb_image(img: &RgbImage) -> Option<Self> {
        let data = img
            .as_raw()
            .chunks_exact(CHANNELS)
            .flat_map(|p| [p[2], p[1], p[0]])
            .collect();
        Self::from_raw(img.width(), img.height(), data)
    }

    /// Convert to display order (red, green, blue).
    pub fn to_rgb_image(&self) -> RgbImage {
        let raw: Vec<u8> = self
            .data
            .chunks_exact(CHANNELS)
            .flat_map(|p| [p[2], p[1], p[0]])
            .collect();
        // Length and dimensions come from a valid buffer.
        RgbImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride() + x as usize * CHANNELS
    }

    /// BGR samples at (x, y). Panics when out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Set the BGR samples at (x, y). Panics when out of bounds.
    pub fn put_pixel(&mut self, x: u32, y: u32, bgr: [u8; 3]) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&bgr);
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(CHANNELS).map(|p| [p[0], p[1], p[2]])
    }
}
