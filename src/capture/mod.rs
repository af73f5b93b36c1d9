//! Gesture capture: trace parsing and recording sessions

pub mod session;
pub mod trace;
pub mod types;

pub use session::RecordingSession;
pub use trace::TraceParser;
pub use types::{GestureEvent, GestureKind, Point, PointSample};
