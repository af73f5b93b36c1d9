//! # Gesture Replay
//!
//! Records touch gestures from an Android device by parsing the raw
//! `getevent -t` trace over adb, reconstructs them as timed taps and swipes,
//! and replays them later against a (possibly different) device with
//! calibrated coordinate scaling.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::sync::atomic::AtomicBool;
//! use gesture_replay::device::shell::AdbRunner;
//! use gesture_replay::device::client::DeviceClient;
//! use gesture_replay::replay::scheduler::Replayer;
//!
//! # fn main() -> gesture_replay::Result<()> {
//! let runner = Arc::new(AdbRunner::new("adb"));
//! let client = DeviceClient::connect(runner, "emulator-5554")?;
//!
//! // Record until stopped
//! let mut session = client.session();
//! session.start()?;
//! std::thread::sleep(std::time::Duration::from_secs(5));
//! let gestures = session.stop()?;
//!
//! // Replay with faithful timing
//! let control = AtomicBool::new(true);
//! Replayer::new().replay(&client, &gestures, &control)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`device`]: adb command execution, axis calibration, input primitives
//! - [`capture`]: raw trace parsing state machine and recording sessions
//! - [`analysis`]: swipe path simplification (correlation gate + extrema filter)
//! - [`gestures`]: named gesture collections with JSON persistence
//! - [`replay`]: time-respecting playback with cooperative cancellation
//! - [`app`]: CLI and configuration management
//!
//! ## Capture Pipeline
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │ getevent -t │───▶│ TraceParser │───▶│ Calibration │───▶│  Simplifier │
//! │  (adb pipe) │    │ (2 states)  │    │ (raw→pixel) │    │ (ρ gate)    │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//!                                                                 │
//!                                                                 ▼
//! ┌─────────────┐    ┌─────────────┐                       ┌─────────────┐
//! │ input tap / │◀───│  Replayer   │◀──────────────────────│ GestureSet  │
//! │ input swipe │    │ (scheduler) │                       │ (save/load) │
//! └─────────────┘    └─────────────┘                       └─────────────┘
//! ```

pub mod analysis;
pub mod app;
pub mod capture;
pub mod device;
pub mod gestures;
pub mod replay;

// Re-export commonly used types
pub use capture::session::RecordingSession;
pub use capture::types::{GestureEvent, GestureKind, Point, PointSample};
pub use device::calibration::{Axis, Calibration, Resolution};
pub use device::client::DeviceClient;
pub use gestures::set::GestureSet;
pub use replay::scheduler::Replayer;

/// Result type alias for the gesture engine
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the gesture engine
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Device report text did not match the expected pattern
    #[error("Parse error: {0}")]
    Parse(String),

    /// A raw axis value was not valid hexadecimal
    #[error("Conversion error: {0:?} is not a valid hexadecimal value")]
    Conversion(String),

    /// Coordinate conversion attempted against a zero axis resolution
    #[error("Calibration error: {0}")]
    Calibration(String),

    /// `start` was called on a session that is already recording
    #[error("A recording is already in progress")]
    AlreadyRecording,

    /// `stop` was called on a session that was never started
    #[error("No recording is in progress")]
    NotRecording,

    /// The adb process could not be spawned or produced no output stream
    #[error("Shell error: {0}")]
    Shell(String),

    /// The capture worker terminated abnormally
    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
