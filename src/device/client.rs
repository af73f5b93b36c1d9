//! Device client
//!
//! Binds a command runner to one device serial, owns that device's
//! calibration, and exposes the input primitives replay is built on plus a
//! few thin conveniences (key events, text input, screenshots, file
//! transfer).

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::capture::session::RecordingSession;
use crate::capture::types::Point;
use crate::device::calibration::{
    parse_axis_resolution, parse_screen_resolution, Calibration,
};
use crate::device::shell::{shell_args, CommandRunner};
use crate::Result;

/// Android key event codes accepted by `input keyevent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum KeyCode {
    Home = 3,
    Back = 4,
    VolumeUp = 24,
    VolumeDown = 25,
    Power = 26,
    Camera = 27,
    Enter = 66,
    Del = 67,
    Menu = 82,
    Search = 84,
}

/// A device binding: runner + serial + calibration.
///
/// Calibration is computed at connect time and recomputed only when the
/// bound serial changes; replaying against a rebound client therefore never
/// uses another device's axis extents. Do not rebind while a recording
/// session created from this client is active.
pub struct DeviceClient {
    runner: Arc<dyn CommandRunner>,
    serial: String,
    calibration: Calibration,
}

impl DeviceClient {
    /// Bind to a device and calibrate it.
    pub fn connect(runner: Arc<dyn CommandRunner>, serial: impl Into<String>) -> Result<Self> {
        let mut client = Self {
            runner,
            serial: serial.into(),
            calibration: Calibration::default(),
        };
        client.recalibrate()?;
        Ok(client)
    }

    /// Rebind to a different serial, recomputing calibration.
    pub fn set_serial(&mut self, serial: impl Into<String>) -> Result<()> {
        self.serial = serial.into();
        self.recalibrate()
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    pub fn runner(&self) -> Arc<dyn CommandRunner> {
        self.runner.clone()
    }

    /// Create a recording session bound to this device.
    pub fn session(&self) -> RecordingSession {
        RecordingSession::new(self.runner.clone(), self.serial.clone(), self.calibration)
    }

    fn recalibrate(&mut self) -> Result<()> {
        let size_report = self.shell("wm size")?;
        let screen = parse_screen_resolution(&size_report)?;

        let capability_report = self.shell("getevent -lp")?;
        let axis = parse_axis_resolution(&capability_report);
        if axis.width == 0 || axis.height == 0 {
            warn!(
                serial = %self.serial,
                "device reports no touch axis capabilities; recording is unavailable"
            );
        }

        self.calibration = Calibration::new(screen, axis);
        info!(serial = %self.serial, screen = %screen, axis = %axis, "device calibrated");
        Ok(())
    }

    /// Run a shell command on the bound device and return its output.
    pub fn shell(&self, command: &str) -> Result<String> {
        debug!(serial = %self.serial, %command, "adb shell");
        self.runner.run(&shell_args(&self.serial, command))
    }

    /// Tap at a point. A zero duration is a true tap; a positive duration
    /// degenerates to a zero-length swipe held that long (long-press).
    pub fn tap(&self, p: Point, duration: f64) -> Result<String> {
        if duration > 0.0 {
            return self.swipe(p, p, duration);
        }
        self.shell(&format!("input tap {} {}", p.x, p.y))
    }

    /// Swipe between two points over a duration in seconds (issued to the
    /// device in rounded milliseconds).
    pub fn swipe(&self, from: Point, to: Point, duration: f64) -> Result<String> {
        let duration_ms = (duration * 1000.0).round() as i64;
        self.shell(&format!(
            "input swipe {} {} {} {} {}",
            from.x, from.y, to.x, to.y, duration_ms
        ))
    }

    /// Send a key event.
    pub fn key_event(&self, key: KeyCode) -> Result<String> {
        self.shell(&format!("input keyevent {}", key as u16))
    }

    /// Type ASCII text through the shell input service.
    pub fn input_text(&self, text: &str) -> Result<String> {
        self.shell(&format!("input text {}", text))
    }

    /// Copy a local file to the device.
    pub fn push(&self, source: &Path, destination: &str) -> Result<String> {
        self.runner.run(&[
            "-s".to_string(),
            self.serial.clone(),
            "push".to_string(),
            source.display().to_string(),
            destination.to_string(),
        ])
    }

    /// Copy a device file to the local filesystem.
    pub fn pull(&self, source: &str, destination: &Path) -> Result<String> {
        self.runner.run(&[
            "-s".to_string(),
            self.serial.clone(),
            "pull".to_string(),
            source.to_string(),
            destination.display().to_string(),
        ])
    }

    /// Capture a screenshot to a local path.
    pub fn screenshot(&self, destination: &Path) -> Result<String> {
        self.shell("screencap -p /sdcard/screenshot.png")?;
        self.pull("/sdcard/screenshot.png", destination)
    }
}
