// The persistent drawing surface.
// Everything that changes the picture goes through a method here.

use crate::error::{Error, Result};
use crate::types::Point;
use chrono::NaiveDateTime;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};
use std::path::Path;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Clone, PartialEq)]
pub struct Canvas {
    img: RgbImage,
}

impl Canvas {
    /// All-white canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self { img: RgbImage::from_pixel(width, height, WHITE) }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    pub fn image(&self) -> &RgbImage {
        &self.img
    }

    pub fn clear(&mut self) {
        for p in self.img.pixels_mut() {
            *p = WHITE;
        }
    }

    /// Independent deep copy of the current contents.
    pub fn snapshot(&self) -> Canvas {
        self.clone()
    }

    /// Replace the contents with a snapshot taken from this canvas.
    pub fn restore(&mut self, snapshot: &Canvas) {
        if self.img.dimensions() == snapshot.img.dimensions() {
            self.img.copy_from_slice(snapshot.img.as_raw());
        } else {
            self.img = snapshot.img.clone();
        }
    }

    /// Stroke from `p0` to `p1`. Missing endpoints or zero thickness draw nothing.
    pub fn draw_line(&mut self, p0: Option<Point>, p1: Option<Point>, color: Rgb<u8>, thickness: u32) {
        let (Some(p0), Some(p1)) = (p0, p1) else { return };
        if thickness == 0 {
            return;
        }
        thick_line(&mut self.img, p0, p1, color, thickness);
    }

    /// Axis-aligned outline with `a` and `b` as opposite corners.
    pub fn draw_rectangle(&mut self, a: Point, b: Point, color: Rgb<u8>, thickness: u32) {
        if thickness == 0 {
            return;
        }
        let c1 = Point::new(b.x, a.y);
        let c2 = Point::new(a.x, b.y);
        thick_line(&mut self.img, a, c1, color, thickness);
        thick_line(&mut self.img, c1, b, color, thickness);
        thick_line(&mut self.img, b, c2, color, thickness);
        thick_line(&mut self.img, c2, a, color, thickness);
    }

    /// Circle outline; the ring is `thickness` pixels wide, centered on `radius`.
    pub fn draw_circle(&mut self, center: Point, radius: u32, color: Rgb<u8>, thickness: u32) {
        if thickness == 0 {
            return;
        }
        if thickness == 1 {
            draw_hollow_circle_mut(&mut self.img, (center.x, center.y), radius as i32, color);
            return;
        }
        // Half-open band [inner, inner + thickness) so the ring is exactly `thickness` wide.
        let inner = radius as f64 - thickness as f64 / 2.0;
        let outer = (inner + thickness as f64).ceil() as i32;
        let (w, h) = (self.img.width() as i32, self.img.height() as i32);
        for y in (center.y - outer).max(0)..=(center.y + outer).min(h - 1) {
            for x in (center.x - outer).max(0)..=(center.x + outer).min(w - 1) {
                let d = Point::new(x, y).distance(center);
                if d >= inner && d < inner + thickness as f64 {
                    self.img.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    /// Every non-white canvas pixel placed over `frame`.
    pub fn blend_over(&self, frame: &RgbImage) -> Result<RgbImage> {
        if frame.dimensions() != self.img.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: self.img.dimensions(),
                actual: frame.dimensions(),
            });
        }
        let mut out = frame.clone();
        for (dst, src) in out.pixels_mut().zip(self.img.pixels()) {
            if *src != WHITE {
                *dst = *src;
            }
        }
        Ok(out)
    }

    /// Write the canvas as an image; the format follows the file extension.
    pub fn export(&self, path: &Path) -> Result<()> {
        self.img.save(path)?;
        Ok(())
    }
}

/// `drawing_<weekday>_<month>_<day>_<HH-MM-SS>_<year>.png`, readable and safe on every filesystem.
pub fn drawing_file_name(at: NaiveDateTime) -> String {
    format!("drawing_{}.png", at.format("%a_%b_%d_%H-%M-%S_%Y"))
}

/// One-pixel lines go straight to imageproc; wider ones stamp a round
/// footprint along the Bresenham walk so ends come out round.
fn thick_line(img: &mut RgbImage, p0: Point, p1: Point, color: Rgb<u8>, thickness: u32) {
    if thickness == 1 {
        draw_line_segment_mut(img, (p0.x as f32, p0.y as f32), (p1.x as f32, p1.y as f32), color);
        return;
    }
    let footprint = pen_footprint(thickness);
    let (w, h) = (img.width() as i32, img.height() as i32);
    let (mut x0, mut y0, x1, y1) = (p0.x, p0.y, p1.x, p1.y);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        for &(ox, oy) in &footprint {
            let (x, y) = (x0 + ox, y0 + oy);
            if x >= 0 && y >= 0 && x < w && y < h {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Offsets of a disc exactly `thickness` pixels across. Offsets span
/// `-(t/2)..=(t-1)/2`, so even sizes sit half a pixel up-left of the point.
fn pen_footprint(thickness: u32) -> Vec<(i32, i32)> {
    let t = thickness as i32;
    let (lo, hi) = (-(t / 2), (t - 1) / 2);
    let c = (lo + hi) as f64 / 2.0;
    let r2 = (thickness as f64 / 2.0).powi(2);
    let mut offsets = Vec::with_capacity((t * t) as usize);
    for oy in lo..=hi {
        for ox in lo..=hi {
            if (ox as f64 - c).powi(2) + (oy as f64 - c).powi(2) <= r2 {
                offsets.push((ox, oy));
            }
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

    fn painted(c: &Canvas) -> usize {
        c.image().pixels().filter(|p| **p != WHITE).count()
    }

    #[test]
    fn new_canvas_is_white() {
        let c = Canvas::new(12, 9);
        assert_eq!(c.dimensions(), (12, 9));
        assert_eq!(painted(&c), 0);
    }

    #[test]
    fn zero_thickness_never_changes_canvas() {
        let mut c = Canvas::new(40, 40);
        c.draw_line(Some(Point::new(5, 5)), Some(Point::new(30, 20)), BLUE, 3);
        let before = c.snapshot();
        for (a, b) in [((0, 0), (39, 39)), ((10, 3), (10, 3)), ((-5, 7), (50, 7))] {
            c.draw_line(Some(Point::new(a.0, a.1)), Some(Point::new(b.0, b.1)), BLUE, 0);
        }
        c.draw_rectangle(Point::new(1, 1), Point::new(30, 30), BLUE, 0);
        c.draw_circle(Point::new(20, 20), 10, BLUE, 0);
        assert!(c == before);
    }

    #[test]
    fn missing_endpoint_draws_nothing() {
        let mut c = Canvas::new(20, 20);
        c.draw_line(None, Some(Point::new(3, 3)), BLUE, 4);
        c.draw_line(Some(Point::new(3, 3)), None, BLUE, 4);
        assert_eq!(painted(&c), 0);
    }

    #[test]
    fn line_covers_both_endpoints() {
        let mut c = Canvas::new(30, 30);
        c.draw_line(Some(Point::new(2, 2)), Some(Point::new(25, 10)), BLUE, 1);
        assert_eq!(*c.image().get_pixel(2, 2), BLUE);
        assert_eq!(*c.image().get_pixel(25, 10), BLUE);

        c.draw_line(Some(Point::new(5, 20)), Some(Point::new(20, 20)), BLUE, 6);
        assert_eq!(*c.image().get_pixel(12, 22), BLUE);
        assert_eq!(*c.image().get_pixel(12, 27), WHITE);
    }

    #[test]
    fn snapshot_restore_round_trip_is_bit_identical() {
        let mut c = Canvas::new(25, 25);
        c.draw_line(Some(Point::new(1, 1)), Some(Point::new(20, 22)), BLUE, 2);
        let before = c.image().clone();
        let snap = c.snapshot();
        c.restore(&snap);
        assert_eq!(*c.image(), before);
    }

    #[test]
    fn snapshot_is_independent_of_later_drawing() {
        let mut c = Canvas::new(25, 25);
        let snap = c.snapshot();
        c.draw_circle(Point::new(12, 12), 6, BLUE, 2);
        assert!(painted(&c) > 0);
        assert_eq!(painted(&snap), 0);
        c.restore(&snap);
        assert_eq!(painted(&c), 0);
    }

    #[test]
    fn clear_resets_to_white() {
        let mut c = Canvas::new(16, 16);
        c.draw_rectangle(Point::new(2, 2), Point::new(12, 12), BLUE, 2);
        c.clear();
        assert_eq!(painted(&c), 0);
        assert_eq!(c.dimensions(), (16, 16));
    }

    #[test]
    fn rectangle_outline_leaves_interior_untouched() {
        let mut c = Canvas::new(60, 60);
        c.draw_rectangle(Point::new(10, 10), Point::new(50, 50), BLUE, 1);
        assert_eq!(*c.image().get_pixel(10, 10), BLUE);
        assert_eq!(*c.image().get_pixel(50, 50), BLUE);
        assert_eq!(*c.image().get_pixel(30, 10), BLUE);
        assert_eq!(*c.image().get_pixel(10, 30), BLUE);
        assert_eq!(*c.image().get_pixel(30, 30), WHITE);
    }

    #[test]
    fn thick_circle_ring_is_centered_on_radius() {
        let mut c = Canvas::new(60, 60);
        c.draw_circle(Point::new(30, 30), 15, BLUE, 4);
        assert_eq!(*c.image().get_pixel(45, 30), BLUE);
        assert_eq!(*c.image().get_pixel(30, 30), WHITE);
        assert_eq!(*c.image().get_pixel(52, 30), WHITE);
    }

    #[test]
    fn pen_size_is_the_stroke_width_in_pixels() {
        for t in 1..=6u32 {
            let mut c = Canvas::new(60, 40);
            c.draw_line(Some(Point::new(10, 20)), Some(Point::new(50, 20)), BLUE, t);
            let column = (0..40).filter(|&y| *c.image().get_pixel(30, y) == BLUE).count();
            assert_eq!(column, t as usize, "pen {t}");
        }
    }

    #[test]
    fn thick_circle_ring_is_exactly_thickness_wide() {
        for t in 2..=6u32 {
            let mut c = Canvas::new(80, 80);
            c.draw_circle(Point::new(40, 40), 20, BLUE, t);
            let row = (40..80).filter(|&x| *c.image().get_pixel(x, 40) == BLUE).count();
            assert_eq!(row, t as usize, "ring {t}");
        }
    }

    #[test]
    fn blend_keeps_frame_where_canvas_is_white() {
        let mut c = Canvas::new(4, 1);
        c.draw_line(Some(Point::new(0, 0)), Some(Point::new(0, 0)), BLUE, 1);
        let frame = RgbImage::from_pixel(4, 1, Rgb([9, 9, 9]));
        let out = c.blend_over(&frame).expect("same size");
        assert_eq!(*out.get_pixel(0, 0), BLUE);
        assert_eq!(*out.get_pixel(3, 0), Rgb([9, 9, 9]));
        assert!(c.blend_over(&RgbImage::new(3, 1)).is_err());
    }

    #[test]
    fn drawing_name_embeds_readable_timestamp() {
        let at = chrono::NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|d| d.and_hms_opt(12, 5, 9))
            .expect("valid date");
        assert_eq!(drawing_file_name(at), "drawing_Fri_Oct_16_12-05-09_2026.png");
    }

    #[test]
    fn export_writes_png_and_reports_bad_path() {
        let c = Canvas::new(8, 8);
        let path = std::env::temp_dir().join(format!("ar_paint_export_{}.png", std::process::id()));
        c.export(&path).expect("export");
        let back = image::open(&path).expect("readable").to_rgb8();
        assert_eq!(back, *c.image());
        let _ = std::fs::remove_file(&path);

        let bad = std::env::temp_dir().join("ar_paint_missing_dir").join("nested").join("x.png");
        assert!(matches!(c.export(&bad), Err(Error::Export(_))));
    }
}
