//! Swipe path simplification
//!
//! Raw traces deliver tens of samples per second; replaying every consecutive
//! pair would produce as many jerky micro-swipes. The simplifier measures how
//! straight a path is with the Pearson correlation of its X and Y series and
//! either collapses it to its endpoints or keeps only the vertices where the
//! vertical direction changes.

use crate::capture::types::PointSample;

/// Correlation above which a path is treated as effectively straight
pub const DEFAULT_STRAIGHTNESS_THRESHOLD: f64 = 0.9;

/// Absolute Pearson correlation coefficient of the X and Y coordinate series.
///
/// 1.0 means the samples lie on a line. A series with zero variance on
/// either axis is exactly collinear along that axis, so it is defined as
/// 1.0 rather than leaving the quotient undefined.
pub fn rho(points: &[PointSample]) -> f64 {
    if points.len() < 2 {
        return 1.0;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.point.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.point.y).sum::<f64>() / n;

    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_y2 = 0.0;
    for p in points {
        let dx = p.point.x - mean_x;
        let dy = p.point.y - mean_y;
        sum_xy += dx * dy;
        sum_x2 += dx * dx;
        sum_y2 += dy * dy;
    }

    if sum_x2 == 0.0 || sum_y2 == 0.0 {
        return 1.0;
    }
    (sum_xy / (sum_x2 * sum_y2).sqrt()).abs()
}

/// Reduces a multi-sample swipe path to a representative set of points.
///
/// The threshold is a tunable constant, not a derived value.
#[derive(Debug, Clone, Copy)]
pub struct PathSimplifier {
    /// Correlation gate in `[0, 1]`
    pub straightness_threshold: f64,
}

impl PathSimplifier {
    pub fn new() -> Self {
        Self {
            straightness_threshold: DEFAULT_STRAIGHTNESS_THRESHOLD,
        }
    }

    /// Create a simplifier with a custom correlation gate, clamped to `[0, 1]`.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            straightness_threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Simplify an ordered swipe path.
    ///
    /// The first and last samples are always preserved and the result is
    /// never longer than the input. A path whose `|rho|` reaches the
    /// threshold collapses to its two endpoints; otherwise interior samples
    /// survive only where their Y coordinate is a local extremum relative to
    /// its immediate neighbors, preserving direction-change vertices.
    pub fn simplify(&self, points: &[PointSample]) -> Vec<PointSample> {
        if points.len() <= 2 {
            return points.to_vec();
        }

        if rho(points) >= self.straightness_threshold {
            return vec![points[0], points[points.len() - 1]];
        }

        let mut kept = Vec::with_capacity(points.len());
        kept.push(points[0]);
        for window in points.windows(3) {
            let (prev, mid, next) = (window[0].point.y, window[1].point.y, window[2].point.y);
            if (mid >= prev && mid >= next) || (mid <= prev && mid <= next) {
                kept.push(window[1]);
            }
        }
        kept.push(points[points.len() - 1]);
        kept
    }
}

impl Default for PathSimplifier {
    fn default() -> Self {
        Self::new()
    }
}
