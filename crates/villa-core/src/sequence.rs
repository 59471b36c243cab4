//! One configured scene: input → progress → anim → phase → camera.

use std::time::Duration;

use crate::camera::{CameraPose, CameraRig};
use crate::config::{PhaseAction, SequenceConfig};
use crate::error::ConfigError;
use crate::input::{InputCapture, InputEvent};
use crate::phase::{PhaseId, PhaseMachine};
use crate::progress::{ProgressAccumulator, Smoother};

/// Opaque handle issued by the [`Director`](crate::Director) at mount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceId(pub u32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SequenceStatus {
    /// Mounted, has not asked for the scroll lock.
    #[default]
    Idle,
    /// Queued behind another lock owner.
    Waiting,
    Capturing,
    Completing,
    /// Handed off; input passes through and entry actions no longer fire.
    Released,
    /// Host environment missing: pinned at the final frame.
    RenderOnly,
}

/// What the host should do with the native event it just dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputDisposition {
    /// The sequence took the event; suppress native scrolling.
    Consumed,
    PassThrough,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SequenceEvent {
    Activated {
        id: SequenceId,
    },
    Queued {
        id: SequenceId,
        position: usize,
    },
    PhaseChanged {
        id: SequenceId,
        from: PhaseId,
        to: PhaseId,
    },
    Signal {
        id: SequenceId,
        name: &'static str,
    },
    /// The handoff has started: page unlocked and (optionally) scrolling to `scroll_to`.
    Completed {
        id: SequenceId,
        scroll_to: Option<&'static str>,
    },
    Released {
        id: SequenceId,
        forced: bool,
    },
    RenderOnly {
        id: SequenceId,
    },
}

/// Immutable per-tick view handed to the render layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    pub id: SequenceId,
    pub phase: PhaseId,
    pub phase_name: &'static str,
    pub progress: f32,
    pub smoothed_progress: f32,
    pub camera: CameraPose,
    pub status: SequenceStatus,
}

#[derive(Debug)]
pub struct Sequence {
    id: SequenceId,
    config: SequenceConfig,
    input: InputCapture,
    accumulator: ProgressAccumulator,
    smoother: Smoother,
    phases: PhaseMachine,
    rig: CameraRig,
    status: SequenceStatus,
    // set the first time the terminal phase is reached while capturing
    completion_latched: bool,
    snapshot: Snapshot,
}

impl Sequence {
    pub fn new(id: SequenceId, config: SequenceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let phases = PhaseMachine::new(&config.phase_bands);
        let rig = CameraRig::new(config.camera.clone(), config.camera_ease);
        let snapshot = Snapshot {
            id,
            phase: PhaseId(0),
            phase_name: phases.name(PhaseId(0)),
            progress: 0.0,
            smoothed_progress: 0.0,
            camera: rig.current(),
            status: SequenceStatus::Idle,
        };
        Ok(Self {
            id,
            input: InputCapture::new(config.sensitivity, config.tolerance_px),
            accumulator: ProgressAccumulator::new(config.threshold(), config.reverse_damping),
            smoother: Smoother::new(config.ease),
            phases,
            rig,
            status: SequenceStatus::Idle,
            completion_latched: false,
            snapshot,
            config,
        })
    }

    pub fn id(&self) -> SequenceId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.config.name
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    pub fn status(&self) -> SequenceStatus {
        self.status
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn set_status(&mut self, status: SequenceStatus) {
        if self.status == status {
            return;
        }
        log::debug!("[seq] {} {:?} -> {:?}", self.config.name, self.status, status);
        self.status = status;
        self.snapshot.status = status;
        if status == SequenceStatus::Capturing && self.config.is_captured() {
            self.input.activate();
        } else {
            self.input.deactivate();
        }
    }

    pub fn set_page_height(&mut self, px: f32) {
        self.input.set_page_height(px);
    }

    /// Route one native event. Only a capturing, input-driven sequence consumes events.
    pub fn capture(&mut self, event: &InputEvent) -> InputDisposition {
        if !self.input.is_active() {
            return InputDisposition::PassThrough;
        }
        self.input.capture_delta(event);
        InputDisposition::Consumed
    }

    /// Set progress from native page scroll. Ignored for captured sequences.
    pub fn feed_progress(&mut self, progress: f32) -> bool {
        if self.config.is_captured() || self.status == SequenceStatus::RenderOnly {
            return false;
        }
        self.accumulator.set_progress(progress);
        true
    }

    /// Advance one frame. Returns `true` exactly once: on the tick the
    /// terminal phase (or a `Complete` action) is first reached while capturing.
    pub fn tick(&mut self, dt: Duration, events: &mut Vec<SequenceEvent>) -> bool {
        if self.status == SequenceStatus::RenderOnly {
            return false;
        }
        let pending = self.input.take_pending();
        if self.status == SequenceStatus::Capturing {
            for delta in pending {
                self.accumulator.push(delta);
            }
        }
        let anim = self.smoother.tick(self.accumulator.progress());

        let mut complete = false;
        // the phase only starts moving once the sequence has been granted the lock
        let update = match self.status {
            SequenceStatus::Idle | SequenceStatus::Waiting => None,
            _ => self.phases.update(anim),
        };
        if let Some(update) = update {
            if update.changed() {
                log::info!(
                    "[seq] {} phase {} -> {}",
                    self.config.name,
                    self.phases.name(update.from),
                    self.phases.name(update.to)
                );
                events.push(SequenceEvent::PhaseChanged {
                    id: self.id,
                    from: update.from,
                    to: update.to,
                });
            }
            if self.status == SequenceStatus::Capturing && !self.completion_latched {
                for phase in &update.entered {
                    for action in &self.config.phase_bands[phase.0].on_enter {
                        match *action {
                            PhaseAction::CameraKeyframe(index) => {
                                self.rig.start_keyframe(index);
                            }
                            PhaseAction::Signal(name) => {
                                events.push(SequenceEvent::Signal { id: self.id, name });
                            }
                            PhaseAction::Complete => complete = true,
                        }
                    }
                    if *phase == self.phases.terminal() {
                        complete = true;
                    }
                }
            }
        }
        if complete {
            self.completion_latched = true;
        }

        let camera = self.rig.tick(dt, anim);
        self.snapshot = Snapshot {
            id: self.id,
            phase: self.phases.current(),
            phase_name: self.phases.name(self.phases.current()),
            progress: self.accumulator.progress(),
            smoothed_progress: anim,
            camera,
            status: self.status,
        };
        complete
    }

    /// Pin the sequence at its final frame with no lock and no handoff.
    pub fn degrade_render_only(&mut self) {
        self.set_status(SequenceStatus::RenderOnly);
        self.completion_latched = true;
        self.accumulator.set_progress(1.0);
        self.smoother.snap(1.0);
        self.phases.force(self.phases.terminal());
        self.rig.snap_to_end();
        self.snapshot = Snapshot {
            id: self.id,
            phase: self.phases.current(),
            phase_name: self.phases.name(self.phases.current()),
            progress: 1.0,
            smoothed_progress: 1.0,
            camera: self.rig.current(),
            status: SequenceStatus::RenderOnly,
        };
    }

    /// Back to the initial state: Idle, progress 0, all entry actions re-armed.
    pub fn reset(&mut self) {
        self.set_status(SequenceStatus::Idle);
        self.completion_latched = false;
        self.accumulator.reset();
        self.smoother.snap(0.0);
        self.phases.reset();
        self.rig.reset();
        self.snapshot = Snapshot {
            id: self.id,
            phase: PhaseId(0),
            phase_name: self.phases.name(PhaseId(0)),
            progress: 0.0,
            smoothed_progress: 0.0,
            camera: self.rig.current(),
            status: SequenceStatus::Idle,
        };
    }

    /// Stop listening and cancel in-flight tweens before the sequence is dropped.
    pub fn shutdown(&mut self) {
        self.input.deactivate();
        self.rig.cancel_tween();
    }
}
