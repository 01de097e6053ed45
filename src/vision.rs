// Color tracking: threshold a frame against the calibrated range, then keep
// only the largest 4-connected blob and report its centroid.
use crate::calibration::ColorRange;
use crate::types::Centroid;
use image::{GrayImage, Luma, RgbImage};
use imageproc::region_labelling::{connected_components, Connectivity};

pub const MASK_ON: Luma<u8> = Luma([255]);
pub const MASK_OFF: Luma<u8> = Luma([0]);

/// The largest blob found in a mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub label: u32,
    pub area: u32,
    pub centroid: Centroid,
}

/// Result of locating the dominant blob.
/// `mask` holds only the winning blob, or the input mask when nothing was found.
pub struct Tracking {
    pub mask: GrayImage,
    pub blob: Option<Blob>,
}

/// Mark every pixel whose R, G and B all sit inside the range (inclusive).
pub fn in_range(frame: &RgbImage, range: &ColorRange) -> GrayImage {
    let (w, h) = frame.dimensions();
    let mut mask = GrayImage::new(w, h);
    for (dst, src) in mask.pixels_mut().zip(frame.pixels()) {
        if range.contains(src.0) {
            *dst = MASK_ON;
        }
    }
    mask
}

/// Label 4-connected components and keep the one with the largest area.
/// Ties go to the lowest label, i.e. the blob met first in raster order.
pub fn dominant_blob(mask: GrayImage) -> Tracking {
    let labels = connected_components(&mask, Connectivity::Four, MASK_OFF);

    // Per-label accumulators; index 0 is background and never wins.
    let mut area: Vec<u64> = vec![0];
    let mut sum_x: Vec<u64> = vec![0];
    let mut sum_y: Vec<u64> = vec![0];
    for (x, y, l) in labels.enumerate_pixels() {
        let l = l[0] as usize;
        if l == 0 {
            continue;
        }
        if l >= area.len() {
            area.resize(l + 1, 0);
            sum_x.resize(l + 1, 0);
            sum_y.resize(l + 1, 0);
        }
        area[l] += 1;
        sum_x[l] += x as u64;
        sum_y[l] += y as u64;
    }

    let mut max_area = 0u64;
    let mut max_label = 0usize;
    for (label, &a) in area.iter().enumerate().skip(1) {
        if a > max_area {
            max_area = a;
            max_label = label;
        }
    }

    if max_label == 0 {
        return Tracking { mask, blob: None };
    }

    let winner = max_label as u32;
    let refined = GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        if labels.get_pixel(x, y)[0] == winner { MASK_ON } else { MASK_OFF }
    });
    let centroid = Centroid {
        x: sum_x[max_label] as f64 / max_area as f64,
        y: sum_y[max_label] as f64 / max_area as f64,
    };

    Tracking {
        mask: refined,
        blob: Some(Blob { label: winner, area: max_area as u32, centroid }),
    }
}

/// Threshold + dominant blob in one step. Also returns the raw mask for display.
pub fn track(frame: &RgbImage, range: &ColorRange) -> (GrayImage, Tracking) {
    let raw = in_range(frame, range);
    let tracking = dominant_blob(raw.clone());
    (raw, tracking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::ChannelRange;
    use image::Rgb;

    fn mask_from(rows: &[&str]) -> GrayImage {
        let h = rows.len() as u32;
        let w = rows[0].len() as u32;
        GrayImage::from_fn(w, h, |x, y| {
            if rows[y as usize].as_bytes()[x as usize] == b'#' { MASK_ON } else { MASK_OFF }
        })
    }

    fn count_on(mask: &GrayImage) -> usize {
        mask.pixels().filter(|p| p[0] > 0).count()
    }

    #[test]
    fn accept_all_range_marks_every_pixel() {
        let frame = RgbImage::from_fn(7, 5, |x, y| Rgb([x as u8 * 30, y as u8 * 50, 200]));
        let mask = in_range(&frame, &ColorRange::default());
        assert_eq!(count_on(&mask), 35);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = ColorRange {
            r: ChannelRange { min: 100, max: 150 },
            g: ChannelRange::FULL,
            b: ChannelRange { min: 0, max: 10 },
        };
        let mut frame = RgbImage::new(4, 1);
        frame.put_pixel(0, 0, Rgb([100, 0, 10]));
        frame.put_pixel(1, 0, Rgb([150, 255, 0]));
        frame.put_pixel(2, 0, Rgb([151, 0, 0]));
        frame.put_pixel(3, 0, Rgb([120, 0, 11]));
        let mask = in_range(&frame, &range);
        let got: Vec<u8> = mask.pixels().map(|p| p[0]).collect();
        assert_eq!(got, vec![255, 255, 0, 0]);
    }

    #[test]
    fn single_blob_keeps_area_and_true_centroid() {
        let mask = mask_from(&[
            "......",
            ".###..",
            ".###..",
            ".#....",
            "......",
        ]);
        let tracking = dominant_blob(mask);
        let blob = tracking.blob.expect("blob");
        assert_eq!(blob.area, 7);
        // x: 1,2,3,1,2,3,1 ; y: 1,1,1,2,2,2,3
        assert!((blob.centroid.x - 13.0 / 7.0).abs() < 1e-9);
        assert!((blob.centroid.y - 12.0 / 7.0).abs() < 1e-9);
        assert_eq!(count_on(&tracking.mask), 7);
    }

    #[test]
    fn empty_mask_has_no_centroid_and_is_unchanged() {
        let mask = GrayImage::new(8, 6);
        let tracking = dominant_blob(mask.clone());
        assert!(tracking.blob.is_none());
        assert_eq!(tracking.mask, mask);
    }

    #[test]
    fn keeps_only_the_largest_blob() {
        let mask = mask_from(&[
            "##......",
            "##...###",
            ".....###",
            "........",
        ]);
        let tracking = dominant_blob(mask);
        let blob = tracking.blob.expect("blob");
        assert_eq!(blob.area, 6);
        assert_eq!(blob.centroid.to_point(), crate::types::Point::new(6, 2));
        assert_eq!(count_on(&tracking.mask), 6);
        assert_eq!(tracking.mask.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn diagonal_pixels_are_separate_blobs() {
        let mask = mask_from(&[
            "#.",
            ".#",
        ]);
        let blob = dominant_blob(mask).blob.expect("blob");
        assert_eq!(blob.area, 1);
    }

    #[test]
    fn equal_areas_pick_first_blob_in_scan_order() {
        let mask = mask_from(&[
            "......##",
            "##....##",
            "##......",
        ]);
        let tracking = dominant_blob(mask);
        let blob = tracking.blob.expect("blob");
        assert_eq!(blob.label, 1);
        assert_eq!(blob.centroid.x, 6.5);
        assert_eq!(blob.centroid.y, 0.5);
    }
}
