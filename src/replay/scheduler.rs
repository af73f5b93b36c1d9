//! Replay scheduler
//!
//! Drives a gesture list back into a device with the original pacing: one
//! swipe primitive per consecutive point pair, inter-gesture sleeps equal to
//! the recorded start-time gaps, and a cooperative cancellation flag sampled
//! before each gesture.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::capture::types::{GestureEvent, GestureKind};
use crate::device::client::DeviceClient;
use crate::gestures::set::GestureSet;
use crate::Result;

/// Floor for reconstructed swipe segment durations (seconds), preventing
/// zero or negative durations from duplicate or out-of-order timestamps.
pub const MIN_SWIPE_DURATION: f64 = 0.05;

/// Time-respecting gesture playback.
///
/// Runs synchronously on the caller's thread. Callers must serialize
/// replay invocations per device binding; two schedulers issuing
/// primitives concurrently against one device would race its input state.
#[derive(Debug, Clone, Copy)]
pub struct Replayer {
    /// Duration floor for each reconstructed swipe segment (seconds)
    pub min_swipe_duration: f64,
}

impl Replayer {
    pub fn new() -> Self {
        Self {
            min_swipe_duration: MIN_SWIPE_DURATION,
        }
    }

    /// Create a replayer with a custom duration floor (negative values are
    /// clamped to zero).
    pub fn with_min_swipe_duration(min_swipe_duration: f64) -> Self {
        Self {
            min_swipe_duration: min_swipe_duration.max(0.0),
        }
    }

    /// Replay a gesture list in order.
    ///
    /// The control flag is sampled before each gesture; once false, replay
    /// halts before issuing the next device primitive. Cancellation is
    /// cooperative: a primitive already issued is not interrupted, so
    /// cancellation latency is bounded by the current gesture's duration.
    pub fn replay(
        &self,
        client: &DeviceClient,
        events: &[GestureEvent],
        control: &AtomicBool,
    ) -> Result<()> {
        for (index, event) in events.iter().enumerate() {
            if !control.load(Ordering::SeqCst) {
                info!(issued = index, remaining = events.len() - index, "replay cancelled");
                return Ok(());
            }

            match event.kind {
                GestureKind::Swipe => {
                    for pair in event.points.windows(2) {
                        let duration =
                            (pair[1].time - pair[0].time).max(self.min_swipe_duration);
                        client.swipe(pair[0].point, pair[1].point, duration)?;
                    }
                }
                GestureKind::Tap => match event.points.first() {
                    Some(sample) => {
                        client.tap(sample.point, event.duration())?;
                    }
                    None => warn!(index, "tap gesture has no point; skipped"),
                },
            }

            // Preserve the recorded inter-gesture pacing
            if let Some(next) = events.get(index + 1) {
                let delay = next.start - event.start;
                if delay > 0.0 {
                    debug!(delay, "sleeping between gestures");
                    thread::sleep(Duration::from_secs_f64(delay));
                }
            }
        }
        Ok(())
    }

    /// Replay the gesture list stored under a label.
    ///
    /// An unknown label replays nothing (the lookup logs and yields an
    /// empty list).
    pub fn replay_named(
        &self,
        client: &DeviceClient,
        set: &GestureSet,
        label: &str,
        control: &AtomicBool,
    ) -> Result<()> {
        self.replay(client, &set.get(label), control)
    }
}

impl Default for Replayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_floor() {
        assert_eq!(Replayer::new().min_swipe_duration, MIN_SWIPE_DURATION);
    }

    #[test]
    fn test_negative_floor_clamped() {
        assert_eq!(Replayer::with_min_swipe_duration(-1.0).min_swipe_duration, 0.0);
    }
}
