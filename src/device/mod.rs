//! Device access: adb execution, calibration and input primitives

pub mod calibration;
pub mod client;
pub mod shell;

pub use calibration::{Axis, Calibration, Resolution};
pub use client::{DeviceClient, KeyCode};
pub use shell::{AdbRunner, CommandRunner};
