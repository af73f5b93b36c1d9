//! Integration tests for replay
//!
//! A mock runner records every issued command with a timestamp, letting the
//! tests check pacing, swipe durations, the duration floor, and cooperative
//! cancellation without a device attached.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use gesture_replay::capture::types::{GestureEvent, GestureKind, PointSample};
use gesture_replay::device::client::DeviceClient;
use gesture_replay::device::shell::CommandRunner;
use gesture_replay::replay::scheduler::Replayer;
use gesture_replay::{GestureSet, Result};

/// Records issued shell commands and when they arrived.
struct TimingRunner {
    commands: Mutex<Vec<(Instant, String)>>,
}

impl TimingRunner {
    fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
        }
    }

    fn input_commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, c)| c.starts_with("input "))
            .map(|(_, c)| c.clone())
            .collect()
    }

    fn input_instants(&self) -> Vec<Instant> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, c)| c.starts_with("input "))
            .map(|(t, _)| *t)
            .collect()
    }
}

impl CommandRunner for TimingRunner {
    fn run(&self, args: &[String]) -> Result<String> {
        let command = args.last().cloned().unwrap_or_default();
        self.commands.lock().unwrap().push((Instant::now(), command.clone()));
        if command.contains("wm size") {
            return Ok("Physical size: 1080x1920\n".to_string());
        }
        if command.contains("getevent -lp") {
            return Ok("\
ABS_MT_POSITION_X    : value 0, min 0, max 1080, fuzz 0, flat 0, resolution 0
ABS_MT_POSITION_Y    : value 0, min 0, max 1920, fuzz 0, flat 0, resolution 0
"
            .to_string());
        }
        Ok(String::new())
    }

    fn stream(&self, _args: &[String]) -> Result<Box<dyn BufRead + Send>> {
        Ok(Box::new(std::io::Cursor::new(Vec::new())))
    }
}

fn connect(runner: Arc<TimingRunner>) -> DeviceClient {
    DeviceClient::connect(runner, "emulator-5554").unwrap()
}

fn tap_at(time: f64, x: f64, y: f64) -> GestureEvent {
    GestureEvent {
        kind: GestureKind::Tap,
        points: vec![PointSample::new(time, x, y)],
        start: time,
        end: time,
        contact_id: String::new(),
    }
}

fn swipe_between(samples: Vec<PointSample>) -> GestureEvent {
    let start = samples.first().map(|s| s.time).unwrap_or(0.0);
    let end = samples.last().map(|s| s.time).unwrap_or(0.0);
    GestureEvent {
        kind: GestureKind::Swipe,
        points: samples,
        start,
        end,
        contact_id: String::new(),
    }
}

#[test]
fn test_swipe_duration_matches_recorded_timing() {
    let runner = Arc::new(TimingRunner::new());
    let client = connect(runner.clone());
    let events = vec![swipe_between(vec![
        PointSample::new(0.0, 100.0, 500.0),
        PointSample::new(0.3, 400.0, 500.0),
    ])];

    Replayer::new()
        .replay(&client, &events, &AtomicBool::new(true))
        .unwrap();

    assert_eq!(
        runner.input_commands(),
        vec!["input swipe 100 500 400 500 300".to_string()]
    );
}

#[test]
fn test_duplicate_timestamps_use_duration_floor() {
    let runner = Arc::new(TimingRunner::new());
    let client = connect(runner.clone());
    // Two samples sharing one timestamp would otherwise produce a zero-length
    // swipe the device refuses
    let events = vec![swipe_between(vec![
        PointSample::new(1.0, 100.0, 500.0),
        PointSample::new(1.0, 400.0, 500.0),
    ])];

    Replayer::new()
        .replay(&client, &events, &AtomicBool::new(true))
        .unwrap();

    assert_eq!(
        runner.input_commands(),
        vec!["input swipe 100 500 400 500 50".to_string()]
    );
}

#[test]
fn test_simplified_swipe_issues_one_segment_per_window() {
    let runner = Arc::new(TimingRunner::new());
    let client = connect(runner.clone());
    let events = vec![swipe_between(vec![
        PointSample::new(0.0, 100.0, 100.0),
        PointSample::new(0.1, 200.0, 400.0),
        PointSample::new(0.2, 300.0, 100.0),
    ])];

    Replayer::new()
        .replay(&client, &events, &AtomicBool::new(true))
        .unwrap();

    assert_eq!(
        runner.input_commands(),
        vec![
            "input swipe 100 100 200 400 100".to_string(),
            "input swipe 200 400 300 100 100".to_string(),
        ]
    );
}

#[test]
fn test_long_press_tap_replays_as_held_swipe() {
    let runner = Arc::new(TimingRunner::new());
    let client = connect(runner.clone());
    let events = vec![GestureEvent {
        kind: GestureKind::Tap,
        points: vec![PointSample::new(0.0, 240.0, 80.0)],
        start: 0.0,
        end: 0.6,
        contact_id: String::new(),
    }];

    Replayer::new()
        .replay(&client, &events, &AtomicBool::new(true))
        .unwrap();

    assert_eq!(
        runner.input_commands(),
        vec!["input swipe 240 80 240 80 600".to_string()]
    );
}

#[test]
fn test_inter_event_gap_is_honoured() {
    let runner = Arc::new(TimingRunner::new());
    let client = connect(runner.clone());
    let events = vec![tap_at(0.0, 100.0, 100.0), tap_at(0.2, 300.0, 300.0)];

    Replayer::new()
        .replay(&client, &events, &AtomicBool::new(true))
        .unwrap();

    let instants = runner.input_instants();
    assert_eq!(instants.len(), 2);
    let gap = instants[1] - instants[0];
    assert!(gap >= Duration::from_millis(200), "gap was {gap:?}");
    assert!(gap < Duration::from_millis(600), "gap was {gap:?}");
}

#[test]
fn test_cancellation_between_events() {
    let runner = Arc::new(TimingRunner::new());
    let client = connect(runner.clone());
    let events = vec![
        tap_at(0.0, 100.0, 100.0),
        tap_at(0.5, 200.0, 200.0),
        tap_at(1.0, 300.0, 300.0),
    ];

    let control = Arc::new(AtomicBool::new(true));
    let canceller = {
        let control = control.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            control.store(false, Ordering::SeqCst);
        })
    };

    Replayer::new().replay(&client, &events, &control).unwrap();
    canceller.join().unwrap();

    // The flag dropped during the first inter-event gap, so exactly one
    // primitive reached the device
    assert_eq!(runner.input_commands().len(), 1);
}

#[test]
fn test_cancelled_before_start_issues_nothing() {
    let runner = Arc::new(TimingRunner::new());
    let client = connect(runner.clone());
    let events = vec![tap_at(0.0, 100.0, 100.0)];

    Replayer::new()
        .replay(&client, &events, &AtomicBool::new(false))
        .unwrap();

    assert!(runner.input_commands().is_empty());
}

#[test]
fn test_replay_named_resolves_label() {
    let runner = Arc::new(TimingRunner::new());
    let client = connect(runner.clone());

    let mut set = GestureSet::new(Some("emulator-5554".to_string()));
    set.insert("tap_home", vec![tap_at(0.0, 540.0, 960.0)]);

    Replayer::new()
        .replay_named(&client, &set, "tap_home", &AtomicBool::new(true))
        .unwrap();

    assert_eq!(
        runner.input_commands(),
        vec!["input tap 540 960".to_string()]
    );
}

#[test]
fn test_replay_named_unknown_label_is_a_no_op() {
    let runner = Arc::new(TimingRunner::new());
    let client = connect(runner.clone());
    let set = GestureSet::new(None);

    Replayer::new()
        .replay_named(&client, &set, "missing", &AtomicBool::new(true))
        .unwrap();

    assert!(runner.input_commands().is_empty());
}
