//! Command execution against adb
//!
//! The engine never talks to a device directly; everything goes through the
//! [`CommandRunner`] trait so that capture and replay can be exercised with
//! canned output in tests. [`AdbRunner`] is the production implementation.

use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};

use tracing::{debug, warn};

use crate::{Error, Result};

/// Executes adb invocations, either captured to completion or as a live
/// line stream.
pub trait CommandRunner: Send + Sync {
    /// Run `adb <args>` to completion and return its captured stdout.
    fn run(&self, args: &[String]) -> Result<String>;

    /// Spawn `adb <args>` and return a reader over its stdout. The stream
    /// ends when the device-side process terminates.
    fn stream(&self, args: &[String]) -> Result<Box<dyn BufRead + Send>>;
}

/// Production runner invoking the adb executable.
pub struct AdbRunner {
    adb_path: PathBuf,
}

impl AdbRunner {
    pub fn new(adb_path: impl Into<PathBuf>) -> Self {
        Self {
            adb_path: adb_path.into(),
        }
    }
}

impl CommandRunner for AdbRunner {
    fn run(&self, args: &[String]) -> Result<String> {
        debug!(adb = %self.adb_path.display(), ?args, "running adb command");
        let output = Command::new(&self.adb_path)
            .args(args)
            .output()
            .map_err(|e| Error::Shell(format!("failed to run {:?}: {}", self.adb_path, e)))?;

        if !output.status.success() {
            warn!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "adb command exited with failure"
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn stream(&self, args: &[String]) -> Result<Box<dyn BufRead + Send>> {
        debug!(adb = %self.adb_path.display(), ?args, "streaming adb command");
        let mut child = Command::new(&self.adb_path)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Shell(format!("failed to spawn {:?}: {}", self.adb_path, e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Shell("adb child has no stdout pipe".to_string()))?;

        Ok(Box::new(ChildLineReader {
            child,
            reader: BufReader::new(stdout),
        }))
    }
}

/// Line reader that owns its child process and reaps it when dropped.
struct ChildLineReader {
    child: Child,
    reader: BufReader<ChildStdout>,
}

impl Read for ChildLineReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for ChildLineReader {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl Drop for ChildLineReader {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Build the argument list for `adb -s <serial> shell <command>`.
pub fn shell_args(serial: &str, command: &str) -> Vec<String> {
    vec![
        "-s".to_string(),
        serial.to_string(),
        "shell".to_string(),
        command.to_string(),
    ]
}

/// List serials of attached, authorized devices via `adb devices`.
///
/// The header line and unauthorized entries are skipped; each remaining
/// line yields the serial before the first tab.
pub fn list_devices(runner: &dyn CommandRunner) -> Result<Vec<String>> {
    let output = runner.run(&["devices".to_string()])?;
    let mut serials = Vec::new();
    for line in output.lines() {
        if line.contains("device") && !line.contains("unauthorized") && !line.contains("devices") {
            if let Some(serial) = line.split('\t').next() {
                let serial = serial.trim();
                if !serial.is_empty() {
                    serials.push(serial.to_string());
                }
            }
        }
    }
    Ok(serials)
}
