//! Core types for gesture capture
//!
//! Defines the calibrated point and gesture structures produced by the
//! trace parser and consumed by the replay scheduler.

use serde::{Deserialize, Serialize};

/// A screen-space coordinate in pixels.
///
/// Equality is exact-value comparison; points that differ by any amount
/// are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One calibrated touch position with its capture timestamp.
///
/// `time` is in seconds, monotonic within a single trace. Serializes flat
/// as `{time, x, y}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointSample {
    pub time: f64,
    #[serde(flatten)]
    pub point: Point,
}

impl PointSample {
    pub fn new(time: f64, x: f64, y: f64) -> Self {
        Self {
            time,
            point: Point::new(x, y),
        }
    }
}

/// Gesture classification by raw sample count: one sample is a tap,
/// two or more are a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Tap,
    Swipe,
}

/// A classified, timed gesture reconstructed from one physical contact.
///
/// Invariants: a `Tap` has exactly one point; a `Swipe` has at least two
/// points and `end >= start`. `contact_id` is parse-time scratch used to
/// correlate raw samples within one pass; it is neither serialized nor
/// part of equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureEvent {
    #[serde(rename = "type")]
    pub kind: GestureKind,
    pub points: Vec<PointSample>,
    /// Trace timestamp at which the contact began (seconds)
    pub start: f64,
    /// Trace timestamp at which the contact ended (seconds)
    pub end: f64,
    #[serde(skip)]
    pub contact_id: String,
}

impl GestureEvent {
    /// Total contact duration in seconds.
    ///
    /// Zero for an instantaneous tap; a positive value on a tap replays
    /// as a long-press.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_tap(&self) -> bool {
        self.kind == GestureKind::Tap
    }

    pub fn is_swipe(&self) -> bool {
        self.kind == GestureKind::Swipe
    }
}

impl PartialEq for GestureEvent {
    fn eq(&self, other: &Self) -> bool {
        // contact_id is scratch state and excluded on purpose
        self.kind == other.kind
            && self.points == other.points
            && self.start == other.start
            && self.end == other.end
    }
}
