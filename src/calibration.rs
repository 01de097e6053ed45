// Color range calibration: the JSON file shared by both tools and the
// keyboard-driven slider state used by `color-segmenter`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Inclusive bounds for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRange {
    pub min: u8,
    pub max: u8,
}

impl ChannelRange {
    pub const FULL: ChannelRange = ChannelRange { min: 0, max: 255 };

    #[inline]
    pub fn contains(&self, v: u8) -> bool {
        self.min <= v && v <= self.max
    }
}

/// Per-channel thresholds. On disk: `{"R": {"min":..,"max":..}, "G": .., "B": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    #[serde(rename = "R")]
    pub r: ChannelRange,
    #[serde(rename = "G")]
    pub g: ChannelRange,
    #[serde(rename = "B")]
    pub b: ChannelRange,
}

impl Default for ColorRange {
    fn default() -> Self {
        Self { r: ChannelRange::FULL, g: ChannelRange::FULL, b: ChannelRange::FULL }
    }
}

impl ColorRange {
    #[inline]
    pub fn contains(&self, rgb: [u8; 3]) -> bool {
        self.r.contains(rgb[0]) && self.g.contains(rgb[1]) && self.b.contains(rgb[2])
    }

    /// Every channel must satisfy `min <= max`.
    pub fn validate(&self) -> Result<()> {
        for (name, ch) in [("R", self.r), ("G", self.g), ("B", self.b)] {
            if ch.min > ch.max {
                return Err(Error::InvalidRange(format!(
                    "channel {name}: min {} is above max {}",
                    ch.min, ch.max
                )));
            }
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let range: ColorRange = serde_json::from_str(text)?;
        range.validate()?;
        Ok(range)
    }

    /// Read and validate a calibration file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::CalibrationIo {
            path: path.to_path_buf(),
            source,
        })?;
        let range: ColorRange = serde_json::from_reader(BufReader::new(file))?;
        range.validate()?;
        Ok(range)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::CalibrationIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn channel(&self, channel: Channel) -> ChannelRange {
        match channel {
            Channel::R => self.r,
            Channel::G => self.g,
            Channel::B => self.b,
        }
    }

    /// Current value of one slider.
    pub fn value(&self, bound: Bound) -> u8 {
        let ch = self.channel(bound.channel);
        if bound.is_max { ch.max } else { ch.min }
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut ChannelRange {
        match channel {
            Channel::R => &mut self.r,
            Channel::G => &mut self.g,
            Channel::B => &mut self.b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    R,
    G,
    B,
}

/// One of the six sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bound {
    pub channel: Channel,
    pub is_max: bool,
}

impl Bound {
    /// Sliders in display order: R min, R max, G min, G max, B min, B max.
    pub const ALL: [Bound; 6] = [
        Bound { channel: Channel::R, is_max: false },
        Bound { channel: Channel::R, is_max: true },
        Bound { channel: Channel::G, is_max: false },
        Bound { channel: Channel::G, is_max: true },
        Bound { channel: Channel::B, is_max: false },
        Bound { channel: Channel::B, is_max: true },
    ];

    pub fn label(self) -> &'static str {
        match (self.channel, self.is_max) {
            (Channel::R, false) => "R MIN",
            (Channel::R, true) => "R MAX",
            (Channel::G, false) => "G MIN",
            (Channel::G, true) => "G MAX",
            (Channel::B, false) => "B MIN",
            (Channel::B, true) => "B MAX",
        }
    }
}

/// Slider state of the calibration tool.
#[derive(Debug, Clone)]
pub struct Calibrator {
    range: ColorRange,
    selected: usize,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(ColorRange::default())
    }
}

impl Calibrator {
    pub fn new(range: ColorRange) -> Self {
        Self { range, selected: 0 }
    }

    pub fn range(&self) -> ColorRange {
        self.range
    }

    pub fn selected(&self) -> Bound {
        Bound::ALL[self.selected]
    }

    /// Select slider `index` (0..6); out of range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < Bound::ALL.len() {
            self.selected = index;
        }
    }

    /// Move the selected bound by `delta`, clamped to 0..=255 and to the
    /// opposite bound of the same channel so `min <= max` always holds.
    pub fn adjust(&mut self, delta: i32) {
        let bound = self.selected();
        let ch = self.range.channel_mut(bound.channel);
        if bound.is_max {
            let v = (ch.max as i32 + delta).clamp(ch.min as i32, 255);
            ch.max = v as u8;
        } else {
            let v = (ch.min as i32 + delta).clamp(0, ch.max as i32);
            ch.min = v as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_calibration_written_by_the_segmenter() {
        let text = r#"{"B": {"min": 0, "max": 80}, "G": {"min": 10, "max": 90}, "R": {"min": 120, "max": 255}}"#;
        let range = ColorRange::from_json(text).expect("valid range");
        assert_eq!(range.r, ChannelRange { min: 120, max: 255 });
        assert_eq!(range.g, ChannelRange { min: 10, max: 90 });
        assert_eq!(range.b, ChannelRange { min: 0, max: 80 });
    }

    #[test]
    fn rejects_inverted_channel() {
        let text = r#"{"B": {"min": 0, "max": 80}, "G": {"min": 100, "max": 90}, "R": {"min": 0, "max": 255}}"#;
        assert!(matches!(ColorRange::from_json(text), Err(Error::InvalidRange(_))));
    }

    #[test]
    fn rejects_out_of_byte_values_and_missing_channels() {
        let too_big = r#"{"B": {"min": 0, "max": 300}, "G": {"min": 0, "max": 1}, "R": {"min": 0, "max": 1}}"#;
        assert!(matches!(ColorRange::from_json(too_big), Err(Error::CalibrationJson(_))));
        let missing = r#"{"B": {"min": 0, "max": 3}}"#;
        assert!(matches!(ColorRange::from_json(missing), Err(Error::CalibrationJson(_))));
    }

    #[test]
    fn missing_file_is_a_calibration_io_error() {
        let path = std::env::temp_dir().join("ar_paint_no_such_limits.json");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(ColorRange::load(&path), Err(Error::CalibrationIo { .. })));
    }

    #[test]
    fn save_then_load_keeps_range() {
        let path = std::env::temp_dir().join(format!("ar_paint_limits_{}.json", std::process::id()));
        let range = ColorRange {
            r: ChannelRange { min: 1, max: 2 },
            g: ChannelRange { min: 3, max: 4 },
            b: ChannelRange { min: 5, max: 6 },
        };
        range.save(&path).expect("save");
        assert_eq!(ColorRange::load(&path).expect("load"), range);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn calibrator_keeps_min_below_max() {
        let mut cal = Calibrator::default();
        cal.select(0); // R min
        cal.adjust(300);
        assert_eq!(cal.range().r, ChannelRange { min: 255, max: 255 });

        cal.select(1); // R max
        cal.adjust(-10);
        assert_eq!(cal.range().r, ChannelRange { min: 255, max: 255 });

        cal.select(0);
        cal.adjust(-55);
        cal.select(1);
        cal.adjust(-10);
        assert_eq!(cal.range().r, ChannelRange { min: 200, max: 245 });
        assert_eq!(cal.range().value(cal.selected()), 245);
        assert!(cal.range().validate().is_ok());
    }

    #[test]
    fn select_ignores_unknown_slider() {
        let mut cal = Calibrator::default();
        cal.select(4);
        cal.select(9);
        assert_eq!(cal.selected().label(), "B MIN");
    }
}
