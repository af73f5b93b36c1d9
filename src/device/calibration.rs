//! Axis calibration and coordinate mapping
//!
//! Touch hardware reports coordinates in a device-native axis range that is
//! unrelated to display pixels. Calibration pairs the screen resolution
//! (from `wm size`) with the raw axis maxima (from `getevent -lp`); every
//! coordinate leaving the trace parser passes through [`Calibration::to_screen`]
//! or replay would land on the wrong pixels.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// First `<width>x<height>` pattern in a resolution report
static RESOLUTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)x(\d+)").expect("valid regex"));

/// A width/height pair: either screen pixels or raw axis maxima.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const ZERO: Resolution = Resolution {
        width: 0,
        height: 0,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Coordinate axis selector for conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// The resolution pair needed to convert raw axis samples to screen pixels.
///
/// Owned by the device client and recomputed whenever the bound serial
/// changes; a zero axis resolution means "uncalibrated" and is rejected
/// before any conversion rather than producing an infinite coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub screen: Resolution,
    pub axis: Resolution,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            screen: Resolution::ZERO,
            axis: Resolution::ZERO,
        }
    }
}

impl Calibration {
    pub fn new(screen: Resolution, axis: Resolution) -> Self {
        Self { screen, axis }
    }

    /// Whether both raw axis extents are known and non-zero.
    pub fn is_calibrated(&self) -> bool {
        self.axis.width > 0 && self.axis.height > 0
    }

    /// Convert one raw hexadecimal axis value to a screen coordinate.
    ///
    /// Tolerates embedded spaces in the hex text. Fails with
    /// [`Error::Conversion`] on non-hex input and with [`Error::Calibration`]
    /// when the axis extent is zero.
    pub fn to_screen(&self, raw_hex: &str, axis: Axis) -> Result<f64> {
        let (screen_extent, axis_extent) = match axis {
            Axis::X => (self.screen.width, self.axis.width),
            Axis::Y => (self.screen.height, self.axis.height),
        };
        if axis_extent == 0 {
            return Err(Error::Calibration(format!(
                "raw {:?} axis resolution is zero; device is uncalibrated",
                axis
            )));
        }

        let cleaned: String = raw_hex.chars().filter(|c| !c.is_whitespace()).collect();
        let raw = u64::from_str_radix(&cleaned, 16)
            .map_err(|_| Error::Conversion(raw_hex.to_string()))?;

        Ok(raw as f64 * screen_extent as f64 / axis_extent as f64)
    }

    /// Convert a raw hex X/Y pair to a screen point.
    pub fn to_point(&self, raw_x: &str, raw_y: &str) -> Result<crate::Point> {
        Ok(crate::Point::new(
            self.to_screen(raw_x, Axis::X)?,
            self.to_screen(raw_y, Axis::Y)?,
        ))
    }
}

/// Extract the screen resolution from free-form `wm size` output.
///
/// The first `<width>x<height>` match wins; anything else is a parse error.
pub fn parse_screen_resolution(report: &str) -> Result<Resolution> {
    let captures = RESOLUTION_PATTERN
        .captures(report)
        .ok_or_else(|| Error::Parse(format!("no resolution found in {:?}", report.trim())))?;

    // The pattern only admits digits, so these parses cannot fail; guard
    // against overflow of absurd reports anyway.
    let width = captures[1]
        .parse()
        .map_err(|_| Error::Parse(format!("width out of range in {:?}", &captures[0])))?;
    let height = captures[2]
        .parse()
        .map_err(|_| Error::Parse(format!("height out of range in {:?}", &captures[0])))?;
    Ok(Resolution::new(width, height))
}

/// Extract the raw touch-axis maxima from `getevent -lp` output.
///
/// Scans every line mentioning an `ABS_MT_POSITION_*` capability, reads the
/// integer between the literal `max` and the next comma, and folds the
/// running maximum per axis. Returns `{0,0}` when no capability line is
/// present; the caller must treat a zero resolution as uncalibrated.
pub fn parse_axis_resolution(report: &str) -> Resolution {
    let mut axis = Resolution::ZERO;
    for line in report.lines() {
        if line.contains("ABS_MT_POSITION_X") {
            if let Some(max) = axis_max(line) {
                axis.width = axis.width.max(max);
            }
        } else if line.contains("ABS_MT_POSITION_Y") {
            if let Some(max) = axis_max(line) {
                axis.height = axis.height.max(max);
            }
        }
    }
    axis
}

fn axis_max(line: &str) -> Option<u32> {
    let after = &line[line.find("max")? + "max".len()..];
    let value = &after[..after.find(',')?];
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            debug!(line, "unparseable axis maximum; skipping line");
            None
        }
    }
}
