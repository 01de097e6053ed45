// Core value types shared by the tracking pipeline, the canvas and the windows.

use image::{GrayImage, Rgb, RgbImage};

/// Packed pixels ready for a minifb window.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Pack an RGB image into 0x00RRGGBB pixels.
    pub fn from_rgb(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| pack_rgb(p[0], p[1], p[2]))
            .collect();
        Self { width: w as usize, height: h as usize, pixels }
    }

    /// Binary mask as black/white pixels.
    pub fn from_mask(mask: &GrayImage) -> Self {
        let (w, h) = mask.dimensions();
        let pixels = mask
            .pixels()
            .map(|p| if p[0] > 0 { 0x00_FF_FF_FF } else { 0 })
            .collect();
        Self { width: w as usize, height: h as usize, pixels }
    }

    /// Mask pixels in pure green on black, like an overlay of the tracked blob.
    pub fn from_mask_green(mask: &GrayImage) -> Self {
        let (w, h) = mask.dimensions();
        let pixels = mask
            .pixels()
            .map(|p| if p[0] > 0 { 0x00_00_FF_00 } else { 0 })
            .collect();
        Self { width: w as usize, height: h as usize, pixels }
    }
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Integer pixel position on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }
}

/// Sub-pixel blob center (mean of pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

impl Centroid {
    /// Nearest pixel, used wherever the centroid feeds drawing.
    pub fn to_point(self) -> Point {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }
}

/// The three pen colors offered by the command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintColor {
    Red,
    Green,
    Blue,
}

impl PaintColor {
    pub fn rgb(self) -> Rgb<u8> {
        match self {
            PaintColor::Red => Rgb([255, 0, 0]),
            PaintColor::Green => Rgb([0, 255, 0]),
            PaintColor::Blue => Rgb([0, 0, 255]),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaintColor::Red => "RED",
            PaintColor::Green => "GREEN",
            PaintColor::Blue => "BLUE",
        }
    }
}

/// Which pointer feeds the drawing this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerMode {
    /// Centroid of the tracked color blob
    Blob,
    /// Mouse on the canvas window
    Mouse,
}

impl PointerMode {
    pub fn toggled(self) -> Self {
        match self {
            PointerMode::Blob => PointerMode::Mouse,
            PointerMode::Mouse => PointerMode::Blob,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PointerMode::Blob => "BLOB",
            PointerMode::Mouse => "MOUSE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_rounds_to_nearest_pixel() {
        let c = Centroid { x: 10.5, y: 3.49 };
        assert_eq!(c.to_point(), Point::new(11, 3));
    }

    #[test]
    fn packs_rgb_image_row_major() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(1, 0, Rgb([0x12, 0x34, 0x56]));
        let fb = FrameBuffer::from_rgb(&img);
        assert_eq!(fb.pixels, vec![0, 0x00_12_34_56]);
    }

    #[test]
    fn toggling_mode_twice_is_identity() {
        assert_eq!(PointerMode::Blob.toggled(), PointerMode::Mouse);
        assert_eq!(PointerMode::Blob.toggled().toggled(), PointerMode::Blob);
    }
}
