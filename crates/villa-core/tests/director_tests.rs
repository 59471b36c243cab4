// Host-side tests for the director: sequencing, handoff and degradation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use villa_core::presets;
use villa_core::*;

const FRAME: Duration = Duration::from_millis(16);

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Lock(bool),
    ScrollTo(String),
}

#[derive(Clone)]
struct RecordingHost {
    calls: Rc<RefCell<Vec<Call>>>,
    settled: Rc<Cell<bool>>,
}

impl RecordingHost {
    fn new() -> Self {
        Self {
            calls: Rc::default(),
            settled: Rc::new(Cell::new(true)),
        }
    }

    fn scroll_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::ScrollTo(_)))
            .count()
    }

    fn last_lock(&self) -> Option<bool> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            Call::Lock(v) => Some(*v),
            _ => None,
        })
    }
}

impl ScrollHost for RecordingHost {
    fn is_available(&self) -> bool {
        true
    }

    fn set_page_scroll_locked(&mut self, locked: bool) {
        self.calls.borrow_mut().push(Call::Lock(locked));
    }

    fn scroll_to_anchor(&mut self, anchor: &str) {
        self.calls.borrow_mut().push(Call::ScrollTo(anchor.to_string()));
    }

    fn scroll_settled(&self) -> bool {
        self.settled.get()
    }
}

fn director() -> (Director, RecordingHost) {
    let host = RecordingHost::new();
    (Director::new(Box::new(host.clone())), host)
}

fn wheel(delta_y: f32) -> InputEvent {
    InputEvent::Wheel {
        delta_y,
        mode: DeltaMode::Pixel,
    }
}

fn run(director: &mut Director, ticks: usize) -> Vec<SequenceEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        director.tick(FRAME, &mut events);
    }
    events
}

/// Three bands, a cue on the middle one, no camera motion.
fn cue_config() -> SequenceConfig {
    SequenceConfig {
        name: "cue",
        sensitivity: 0.01,
        threshold_px: 100.0,
        reverse_damping: 1.0,
        phase_bands: vec![
            PhaseBand::new("a", 0.0, 0.5),
            PhaseBand::new("b", 0.5, 0.9).with(PhaseAction::Signal("b")),
            PhaseBand::new("c", 0.9, 1.0),
        ],
        ..Default::default()
    }
}

#[test]
fn hero_locks_page_on_mount_and_consumes_wheel() {
    let (mut d, host) = director();
    let hero = d.mount(presets::hero()).unwrap();
    assert_eq!(host.last_lock(), Some(true));
    assert_eq!(d.lock_owner(), Some(hero));
    assert_eq!(d.dispatch(hero, &wheel(100.0)), InputDisposition::Consumed);

    let events = run(&mut d, 1);
    assert_eq!(events[0], SequenceEvent::Activated { id: hero });
    let snap = d.snapshot(hero).unwrap();
    assert_eq!(snap.status, SequenceStatus::Capturing);
    assert!((snap.progress - 0.16).abs() < 1e-5);
}

#[test]
fn hero_reaches_full_progress_on_625px() {
    let (mut d, _host) = director();
    let hero = d.mount(presets::hero()).unwrap();
    for _ in 0..6 {
        d.dispatch(hero, &wheel(100.0));
    }
    d.dispatch(hero, &wheel(25.0));
    run(&mut d, 1);
    assert_eq!(d.snapshot(hero).unwrap().progress, 1.0);
}

#[test]
fn entry_actions_fire_once_per_entry_despite_dwell_and_rewind() {
    let (mut d, _host) = director();
    let id = d.mount(cue_config()).unwrap();
    let mut events = Vec::new();

    d.dispatch(id, &wheel(60.0));
    for _ in 0..100 {
        d.tick(FRAME, &mut events);
    }
    assert_eq!(d.snapshot(id).unwrap().phase_name, "b");

    d.dispatch(id, &wheel(-40.0));
    for _ in 0..100 {
        d.tick(FRAME, &mut events);
    }
    assert_eq!(d.snapshot(id).unwrap().phase_name, "a");

    d.dispatch(id, &wheel(40.0));
    for _ in 0..100 {
        d.tick(FRAME, &mut events);
    }
    assert_eq!(d.snapshot(id).unwrap().phase, PhaseId(1));

    let cues = events
        .iter()
        .filter(|e| matches!(e, SequenceEvent::Signal { name: "b", .. }))
        .count();
    assert_eq!(cues, 1);
    let changes: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            SequenceEvent::PhaseChanged { from, to, .. } => Some((from.0, to.0)),
            _ => None,
        })
        .collect();
    assert_eq!(changes, [(0, 1), (1, 0), (0, 1)]);
}

#[test]
fn terminal_phase_scrolls_to_anchor_exactly_once() {
    let (mut d, host) = director();
    let hero = d.mount(presets::hero()).unwrap();
    let mut events = Vec::new();
    for _ in 0..200 {
        // keep hammering the wheel so several ticks sit in the terminal band
        d.dispatch(hero, &wheel(500.0));
        d.tick(FRAME, &mut events);
        d.tick(Duration::ZERO, &mut events);
    }
    assert_eq!(host.scroll_calls(), 1);
    assert_eq!(
        host.calls.borrow().iter().find(|c| matches!(c, Call::ScrollTo(_))),
        Some(&Call::ScrollTo("#villa-journey".into()))
    );
    let completed = events
        .iter()
        .filter(|e| matches!(e, SequenceEvent::Completed { .. }))
        .count();
    assert_eq!(completed, 1);
    assert_eq!(host.last_lock(), Some(false));
    assert_eq!(d.snapshot(hero).unwrap().status, SequenceStatus::Released);
    // inert after the handoff
    assert_eq!(d.dispatch(hero, &wheel(100.0)), InputDisposition::PassThrough);
}

#[test]
fn handoff_grants_the_next_sequence() {
    let (mut d, _host) = director();
    let hero = d.mount(presets::hero()).unwrap();
    let journey = d.mount(presets::villa_journey()).unwrap();
    assert_eq!(d.snapshot(journey).unwrap().status, SequenceStatus::Waiting);
    // page scroll is locked, so feeds are stored but the phase stays put
    d.feed_progress(journey, 0.5);
    run(&mut d, 5);
    assert_eq!(d.snapshot(journey).unwrap().phase, PhaseId(0));

    d.dispatch(hero, &wheel(1000.0));
    let events = run(&mut d, 120);
    assert!(events.contains(&SequenceEvent::Released { id: hero, forced: false }));
    assert!(events.contains(&SequenceEvent::Activated { id: journey }));
    assert_eq!(d.lock_owner(), Some(journey));
    assert_eq!(d.snapshot(journey).unwrap().status, SequenceStatus::Capturing);
    // scroll-linked sequences leave native scrolling alone
    assert_eq!(d.dispatch(journey, &wheel(100.0)), InputDisposition::PassThrough);

    d.feed_progress(journey, 1.0);
    let events = run(&mut d, 60);
    assert!(events.contains(&SequenceEvent::Signal {
        id: journey,
        name: "pool-dive"
    }));
    assert!(events.contains(&SequenceEvent::Completed {
        id: journey,
        scroll_to: None
    }));
    assert!(events.contains(&SequenceEvent::Released {
        id: journey,
        forced: false
    }));
}

#[test]
fn stuck_scroll_is_force_released_and_page_unlocked() {
    let (mut d, host) = director();
    host.settled.set(false);
    let hero = d.mount(presets::hero()).unwrap();
    d.dispatch(hero, &wheel(1000.0));
    let mut events = run(&mut d, 30);
    assert_eq!(d.lock_state(), LockState::Completing);
    let unlocks_before = host
        .calls
        .borrow()
        .iter()
        .filter(|c| **c == Call::Lock(false))
        .count();

    for _ in 0..250 {
        d.tick(FRAME, &mut events);
    }
    assert!(events.contains(&SequenceEvent::Released { id: hero, forced: true }));
    let unlocks_after = host
        .calls
        .borrow()
        .iter()
        .filter(|c| **c == Call::Lock(false))
        .count();
    assert_eq!(unlocks_after, unlocks_before + 1);
}

#[test]
fn unmount_mid_capture_releases_and_ignores_late_events() {
    let (mut d, host) = director();
    let hero = d.mount(presets::hero()).unwrap();
    let next = d.mount(cue_config()).unwrap();
    d.dispatch(hero, &wheel(100.0));
    run(&mut d, 2);

    assert!(d.unmount(hero));
    assert_eq!(host.last_lock(), Some(false));
    assert!(d.snapshot(hero).is_none());
    assert_eq!(d.dispatch(hero, &wheel(300.0)), InputDisposition::PassThrough);
    assert!(!d.unmount(hero));

    let events = run(&mut d, 2);
    assert!(events.contains(&SequenceEvent::Activated { id: next }));
    assert_eq!(d.lock_owner(), Some(next));
    assert_eq!(host.scroll_calls(), 0);
}

#[test]
fn missing_host_degrades_to_render_only() {
    let mut d = Director::new(Box::new(NullHost));
    assert!(d.is_render_only());
    let hero = d.mount(presets::hero()).unwrap();
    let events = run(&mut d, 3);
    assert_eq!(events, [SequenceEvent::RenderOnly { id: hero }]);

    let snap = *d.snapshot(hero).unwrap();
    assert_eq!(snap.status, SequenceStatus::RenderOnly);
    assert_eq!(snap.progress, 1.0);
    assert_eq!(snap.smoothed_progress, 1.0);
    assert_eq!(snap.phase_name, "done");
    assert_eq!(snap.camera, presets::hero().camera.final_pose());
    assert_eq!(d.lock_state(), LockState::Idle);
    assert_eq!(d.dispatch(hero, &wheel(100.0)), InputDisposition::PassThrough);
}

#[test]
fn invalid_config_is_not_mounted() {
    let (mut d, _host) = director();
    let bad = SequenceConfig {
        ease: 2.0,
        ..Default::default()
    };
    assert!(d.mount(bad).is_err());
    assert!(d.ids().is_empty());
    assert_eq!(d.lock_state(), LockState::Idle);
}

#[test]
fn reset_rearms_entry_actions() {
    let (mut d, _host) = director();
    let id = d.mount(cue_config()).unwrap();
    d.dispatch(id, &wheel(60.0));
    let mut events = run(&mut d, 80);
    assert!(d.reset(id));
    assert_eq!(d.snapshot(id).unwrap().progress, 0.0);
    d.dispatch(id, &wheel(60.0));
    for _ in 0..80 {
        d.tick(FRAME, &mut events);
    }
    let cues = events
        .iter()
        .filter(|e| matches!(e, SequenceEvent::Signal { .. }))
        .count();
    assert_eq!(cues, 2);
}

#[test]
fn snapshots_follow_mount_order() {
    let (mut d, _host) = director();
    let ids: Vec<_> = presets::tour()
        .into_iter()
        .map(|cfg| d.mount(cfg).unwrap())
        .collect();
    run(&mut d, 1);
    let seen: Vec<_> = d.snapshots().map(|s| s.id).collect();
    assert_eq!(seen, ids);
    let statuses: Vec<_> = d.snapshots().map(|s| s.status).collect();
    assert_eq!(statuses[0], SequenceStatus::Capturing);
    assert!(statuses[1..].iter().all(|s| *s == SequenceStatus::Waiting));
}

#[test]
fn focus_follows_the_lock_owner_then_the_last_run() {
    let (mut d, _host) = director();
    let hero = d.mount(presets::hero()).unwrap();
    let journey = d.mount(presets::villa_journey()).unwrap();
    assert_eq!(d.focus().map(|(i, s)| (i, s.id)), Some((0, hero)));

    d.dispatch(hero, &wheel(1000.0));
    run(&mut d, 120);
    assert_eq!(d.focus().map(|(i, s)| (i, s.id)), Some((1, journey)));

    d.feed_progress(journey, 1.0);
    run(&mut d, 60);
    // nobody owns the lock any more: the journey ran last
    assert_eq!(d.lock_owner(), None);
    assert_eq!(d.focus().map(|(i, s)| (i, s.id)), Some((1, journey)));
}

#[test]
fn mixed_direction_wheel_in_one_frame_is_damped_per_event() {
    let (mut d, _host) = director();
    let hero = d.mount(presets::hero()).unwrap();
    d.dispatch(hero, &wheel(100.0));
    d.dispatch(hero, &wheel(-100.0));
    run(&mut d, 1);
    // forward 0.16, then back 0.16 damped to 0.048
    let progress = d.snapshot(hero).unwrap().progress;
    assert!((progress - 0.112).abs() < 1e-5, "progress {progress}");
}

#[test]
fn overshoot_then_reverse_in_one_frame_clamps_first() {
    let (mut d, _host) = director();
    let hero = d.mount(presets::hero()).unwrap();
    d.dispatch(hero, &wheel(2000.0));
    d.dispatch(hero, &wheel(-100.0));
    run(&mut d, 1);
    let progress = d.snapshot(hero).unwrap().progress;
    assert!((progress - 0.952).abs() < 1e-5, "progress {progress}");
}

#[test]
fn services_camera_rewinds_with_the_page() {
    let (mut d, _host) = director();
    let services = d.mount(presets::services()).unwrap();
    assert!(d.feed_progress(services, 0.5));
    run(&mut d, 300);
    let snap = d.snapshot(services).unwrap();
    assert_eq!(snap.phase_name, "room-3");
    assert!(snap.camera.position.z < presets::SERVICES_BAY_SPACING + 3.0);

    assert!(d.feed_progress(services, 0.05));
    run(&mut d, 300);
    let snap = d.snapshot(services).unwrap();
    assert_eq!(snap.phase_name, "room-1");
    let z = snap.camera.position.z;
    assert!(z > 5.2 && z < 8.0, "z {z}");
}
