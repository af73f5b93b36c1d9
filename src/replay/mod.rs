//! Gesture playback

pub mod scheduler;

pub use scheduler::Replayer;
