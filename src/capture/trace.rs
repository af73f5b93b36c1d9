//! Raw trace parsing state machine
//!
//! Consumes the line-oriented output of `getevent -t` and reconstructs
//! discrete gestures. The kernel trace has no explicit record framing, so
//! the parser keeps an explicit two-state machine: `Idle` until a tracking
//! id opens a contact, `InContact` while samples accumulate for that id.
//!
//! The protocol is forgiving by design: lines matching no marker are
//! ignored, and a malformed timestamp or hex value is logged and treated as
//! "no update for this field" rather than aborting the pass.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::analysis::simplify::PathSimplifier;
use crate::capture::types::{GestureEvent, GestureKind, PointSample};
use crate::device::calibration::Calibration;

/// ABS_MT_TRACKING_ID: a contact begins or ends on this line
const CONTACT_MARKER: &str = "0003 0039";
/// ABS_MT_POSITION_X: raw hex X sample
const X_MARKER: &str = "0003 0035";
/// ABS_MT_POSITION_Y: raw hex Y sample
const Y_MARKER: &str = "0003 0036";
/// Tracking id reported when no contact is active
const NO_CONTACT: &str = "ffffffff";

/// Bracketed floating-point timestamp anywhere on the line
static TIMESTAMP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\s*(\d+\.\d+)\s*\]").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    InContact,
}

/// Single-pass state machine over raw trace lines.
///
/// Feed lines with [`push_line`](TraceParser::push_line); collect the
/// ordered gesture list with [`finish`](TraceParser::finish). An unclosed
/// contact at end of trace is dropped, matching a capture cut off mid-touch.
pub struct TraceParser {
    calibration: Calibration,
    simplifier: PathSimplifier,
    state: State,
    /// Id of the contact currently being accumulated (scratch)
    contact_id: String,
    /// Timestamp of the line that opened the current contact
    start: f64,
    /// Most recent successfully parsed timestamp
    last_time: f64,
    /// Calibrated samples for the contact in progress
    samples: Vec<PointSample>,
    /// Raw hex values carried forward across incomplete pairs
    last_x: String,
    last_y: String,
    /// Set after an X sample: the next line is consumed as its Y check
    awaiting_y: bool,
    /// Timestamp captured on the X line of the pending pair
    pending_time: f64,
    events: Vec<GestureEvent>,
}

impl TraceParser {
    pub fn new(calibration: Calibration, simplifier: PathSimplifier) -> Self {
        Self {
            calibration,
            simplifier,
            state: State::Idle,
            contact_id: String::new(),
            start: 0.0,
            last_time: 0.0,
            samples: Vec::new(),
            last_x: String::new(),
            last_y: String::new(),
            awaiting_y: false,
            pending_time: 0.0,
            events: Vec::new(),
        }
    }

    /// Number of gestures emitted so far.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consume one trace line and advance the state machine.
    pub fn push_line(&mut self, line: &str) {
        // The line after an X sample is consumed solely as its Y check.
        // If the Y marker is absent the last-seen Y carries forward.
        if self.awaiting_y {
            self.awaiting_y = false;
            if let Some(raw_y) = value_after(line, Y_MARKER) {
                self.last_y = raw_y.to_string();
            }
            self.complete_sample();
            return;
        }

        match self.state {
            State::Idle => {
                if let Some(id) = value_after(line, CONTACT_MARKER) {
                    if id != NO_CONTACT {
                        self.open(id.to_string(), line);
                    }
                }
            }
            State::InContact => {
                if let Some(id) = value_after(line, CONTACT_MARKER) {
                    self.close(id.to_string(), line);
                } else if let Some(raw_x) = value_after(line, X_MARKER) {
                    self.touch_timestamp(line);
                    self.pending_time = self.last_time;
                    self.last_x = raw_x.to_string();
                    self.awaiting_y = true;
                }
                // anything else: not a marker for this state, ignore
            }
        }
    }

    /// Return the ordered gesture list, dropping any contact still open.
    pub fn finish(self) -> Vec<GestureEvent> {
        if self.state == State::InContact && !self.samples.is_empty() {
            debug!(
                contact = %self.contact_id,
                samples = self.samples.len(),
                "trace ended mid-contact; dropping unterminated gesture"
            );
        }
        self.events
    }

    fn open(&mut self, id: String, line: &str) {
        self.touch_timestamp(line);
        self.state = State::InContact;
        self.contact_id = id;
        self.start = self.last_time;
        self.samples.clear();
        debug!(contact = %self.contact_id, start = self.start, "contact opened");
    }

    fn close(&mut self, id: String, line: &str) {
        self.touch_timestamp(line);
        let end = self.last_time;
        let samples = std::mem::take(&mut self.samples);

        match samples.len() {
            0 => debug!(contact = %self.contact_id, "contact produced no samples; discarded"),
            1 => self.events.push(GestureEvent {
                kind: GestureKind::Tap,
                points: samples,
                start: self.start,
                end,
                contact_id: self.contact_id.clone(),
            }),
            _ => self.events.push(GestureEvent {
                kind: GestureKind::Swipe,
                points: self.simplifier.simplify(&samples),
                start: self.start,
                end,
                contact_id: self.contact_id.clone(),
            }),
        }

        if id != NO_CONTACT && id != self.contact_id {
            // Rapid contact handoff: a new contact begins on the closing
            // line without an intervening idle tick
            debug!(from = %self.contact_id, to = %id, "contact handoff");
            self.contact_id = id;
            self.start = end;
        } else {
            self.state = State::Idle;
        }
    }

    fn complete_sample(&mut self) {
        match self.calibration.to_point(&self.last_x, &self.last_y) {
            Ok(point) => self.samples.push(PointSample {
                time: self.pending_time,
                point,
            }),
            Err(e) => warn!(error = %e, "dropping unconvertible sample"),
        }
    }

    /// Update `last_time` from the line's bracketed timestamp, if any.
    /// A missing or malformed timestamp leaves the previous value in place.
    fn touch_timestamp(&mut self, line: &str) {
        if let Some(captures) = TIMESTAMP_PATTERN.captures(line) {
            match captures[1].parse() {
                Ok(t) => self.last_time = t,
                Err(_) => debug!(line, "unparseable timestamp; keeping previous"),
            }
        }
    }
}

/// The token after a marker substring, trimmed; `None` when the marker is
/// absent or nothing follows it.
fn value_after<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let value = line[line.find(marker)? + marker.len()..].trim();
    (!value.is_empty()).then_some(value)
}
