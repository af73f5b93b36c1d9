//! Recording session lifecycle
//!
//! One session owns one background capture worker for one device binding.
//! The worker exclusively owns the trace parser and publishes the
//! accumulated gesture list only through `join`, so capture needs no
//! locking. The gesture list returned by [`RecordingSession::stop`] is the
//! authoritative result of the session.

use std::io::BufRead;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use crate::analysis::simplify::PathSimplifier;
use crate::capture::trace::TraceParser;
use crate::capture::types::GestureEvent;
use crate::device::calibration::Calibration;
use crate::device::shell::{shell_args, CommandRunner};
use crate::{Error, Result};

/// Device-side command whose stdout is the raw trace
const TRACE_COMMAND: &str = "getevent -t";
/// Device-side command that terminates trace production
const KILL_TRACE_COMMAND: &str = "pkill getevent";

/// Start/stop lifecycle around a background trace-capture worker.
///
/// At most one recording may be active per session; the state machine
/// enforces this, not external locking. A device-identity change while a
/// session is recording is undefined and must be rejected by the caller.
pub struct RecordingSession {
    runner: Arc<dyn CommandRunner>,
    serial: String,
    calibration: Calibration,
    simplifier: PathSimplifier,
    worker: Option<JoinHandle<Vec<GestureEvent>>>,
}

impl RecordingSession {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        serial: impl Into<String>,
        calibration: Calibration,
    ) -> Self {
        Self {
            runner,
            serial: serial.into(),
            calibration,
            simplifier: PathSimplifier::new(),
            worker: None,
        }
    }

    /// Replace the default path simplifier (builder style).
    pub fn with_simplifier(mut self, simplifier: PathSimplifier) -> Self {
        self.simplifier = simplifier;
        self
    }

    pub fn is_recording(&self) -> bool {
        self.worker.is_some()
    }

    /// Begin capturing the live trace on a background worker.
    ///
    /// Fails with [`Error::AlreadyRecording`] if a worker is live, and with
    /// [`Error::Calibration`] if the device reports no usable axis extents;
    /// the latter is checked here so no conversion can divide by zero later.
    pub fn start(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Err(Error::AlreadyRecording);
        }
        if !self.calibration.is_calibrated() {
            return Err(Error::Calibration(format!(
                "device {} has no touch axis resolution; cannot record",
                self.serial
            )));
        }

        let reader = self
            .runner
            .stream(&shell_args(&self.serial, TRACE_COMMAND))?;
        let mut parser = TraceParser::new(self.calibration, self.simplifier);

        info!(serial = %self.serial, "recording started");
        let worker = thread::Builder::new()
            .name("gesture-capture".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    match line {
                        Ok(line) => parser.push_line(&line),
                        Err(e) => {
                            debug!(error = %e, "trace stream closed");
                            break;
                        }
                    }
                }
                parser.finish()
            })?;
        self.worker = Some(worker);
        Ok(())
    }

    /// Stop capturing and return the accumulated gesture list.
    ///
    /// Terminates trace production on the device, then blocks until the
    /// worker has drained the stream. Fails with [`Error::NotRecording`]
    /// if no recording is in progress.
    pub fn stop(&mut self) -> Result<Vec<GestureEvent>> {
        let worker = self.worker.take().ok_or(Error::NotRecording)?;

        // Killing the device-side getevent closes our end of the pipe,
        // which lets the worker drain and return.
        self.runner
            .run(&shell_args(&self.serial, KILL_TRACE_COMMAND))?;

        let events = worker
            .join()
            .map_err(|_| Error::Capture("capture worker panicked".to_string()))?;
        info!(serial = %self.serial, gestures = events.len(), "recording stopped");
        Ok(events)
    }
}
