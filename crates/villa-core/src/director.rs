//! Owns every mounted sequence, the scroll lock and the host adapter.
//!
//! Hosts feed events in between frames (`dispatch`, `feed_progress`) and call
//! [`Director::tick`] once per animation frame. Within a tick sequences run in
//! mount order, handoffs are started for sequences that reached their
//! terminal phase, then the lock service settles completions and grants the
//! next waiter.

use std::time::Duration;

use fnv::FnvHashMap;
use smallvec::SmallVec;

use crate::config::SequenceConfig;
use crate::error::ConfigError;
use crate::host::ScrollHost;
use crate::input::InputEvent;
use crate::lock::{Acquire, LockState, LockTransition, ScrollLockService};
use crate::sequence::{
    InputDisposition, Sequence, SequenceEvent, SequenceId, SequenceStatus, Snapshot,
};

pub struct Director {
    sequences: FnvHashMap<SequenceId, Sequence>,
    order: Vec<SequenceId>,
    lock: ScrollLockService,
    host: Box<dyn ScrollHost>,
    render_only: bool,
    body_lock_applied: bool,
    page_height_px: f32,
    next_id: u32,
    // events raised outside of `tick` (mount, activate), flushed by the next tick
    deferred: Vec<SequenceEvent>,
}

impl Director {
    pub fn new(host: Box<dyn ScrollHost>) -> Self {
        let render_only = !host.is_available();
        if render_only {
            log::warn!("[seq] no scroll host available, sequences will be render-only");
        }
        Self {
            sequences: FnvHashMap::default(),
            order: Vec::new(),
            lock: ScrollLockService::new(),
            host,
            render_only,
            body_lock_applied: false,
            page_height_px: 800.0,
            next_id: 1,
            deferred: Vec::new(),
        }
    }

    pub fn is_render_only(&self) -> bool {
        self.render_only
    }

    pub fn mount(&mut self, config: SequenceConfig) -> Result<SequenceId, ConfigError> {
        let id = SequenceId(self.next_id);
        let mut seq = Sequence::new(id, config)?;
        self.next_id += 1;
        seq.set_page_height(self.page_height_px);
        let auto_activate = seq.config().auto_activate;
        log::info!("[seq] mounted {} as {:?}", seq.name(), id);
        if self.render_only {
            seq.degrade_render_only();
            self.deferred.push(SequenceEvent::RenderOnly { id });
        }
        self.sequences.insert(id, seq);
        self.order.push(id);
        if auto_activate {
            self.activate(id);
        }
        Ok(id)
    }

    /// Ask for the scroll lock on behalf of an idle sequence.
    pub fn activate(&mut self, id: SequenceId) -> bool {
        let Some(seq) = self.sequences.get_mut(&id) else {
            return false;
        };
        if seq.status() != SequenceStatus::Idle {
            return false;
        }
        match self.lock.acquire(id, seq.config().lock_body) {
            Acquire::Granted => {
                seq.set_status(SequenceStatus::Capturing);
                self.deferred.push(SequenceEvent::Activated { id });
            }
            Acquire::Queued(position) => {
                seq.set_status(SequenceStatus::Waiting);
                self.deferred.push(SequenceEvent::Queued { id, position });
            }
        }
        self.sync_body_lock();
        true
    }

    /// Drop a sequence: input stops, tweens are cancelled and its lock (or queue slot) is released.
    pub fn unmount(&mut self, id: SequenceId) -> bool {
        let Some(mut seq) = self.sequences.remove(&id) else {
            return false;
        };
        self.order.retain(|&other| other != id);
        seq.shutdown();
        if self.lock.owner() == Some(id) || self.lock.is_waiting(id) {
            _ = self.lock.force_release(id);
        }
        self.sync_body_lock();
        log::info!("[seq] unmounted {}", seq.name());
        true
    }

    /// Return a sequence to its initial state and, if it auto-activates, re-queue it.
    pub fn reset(&mut self, id: SequenceId) -> bool {
        let Some(seq) = self.sequences.get_mut(&id) else {
            return false;
        };
        if seq.status() == SequenceStatus::RenderOnly {
            return false;
        }
        seq.reset();
        let auto_activate = seq.config().auto_activate;
        if self.lock.owner() == Some(id) || self.lock.is_waiting(id) {
            _ = self.lock.force_release(id);
        }
        self.sync_body_lock();
        if auto_activate {
            self.activate(id);
        }
        true
    }

    pub fn dispatch(&mut self, id: SequenceId, event: &InputEvent) -> InputDisposition {
        match self.sequences.get_mut(&id) {
            Some(seq) => seq.capture(event),
            None => InputDisposition::PassThrough,
        }
    }

    /// Route an event to the current lock owner (hosts with a single input surface).
    pub fn dispatch_to_owner(&mut self, event: &InputEvent) -> InputDisposition {
        match self.lock.owner() {
            Some(id) => self.dispatch(id, event),
            None => InputDisposition::PassThrough,
        }
    }

    /// Progress for a scroll-linked sequence, computed by the host from page scroll.
    pub fn feed_progress(&mut self, id: SequenceId, progress: f32) -> bool {
        self.sequences
            .get_mut(&id)
            .is_some_and(|seq| seq.feed_progress(progress))
    }

    pub fn set_page_height(&mut self, px: f32) {
        if !(px.is_finite() && px > 0.0) {
            return;
        }
        self.page_height_px = px;
        for seq in self.sequences.values_mut() {
            seq.set_page_height(px);
        }
    }

    pub fn tick(&mut self, dt: Duration, out: &mut Vec<SequenceEvent>) {
        out.append(&mut self.deferred);

        let mut completed: SmallVec<[SequenceId; 2]> = SmallVec::new();
        for id in &self.order {
            if let Some(seq) = self.sequences.get_mut(id) {
                if seq.tick(dt, out) {
                    completed.push(*id);
                }
            }
        }
        for id in completed {
            self.begin_handoff(id, out);
        }

        let settled = self.host.scroll_settled();
        for transition in self.lock.tick(dt, settled) {
            self.apply(transition, out);
        }
        self.sync_body_lock();
    }

    fn begin_handoff(&mut self, id: SequenceId, out: &mut Vec<SequenceEvent>) {
        let Some(seq) = self.sequences.get_mut(&id) else {
            return;
        };
        let handoff = seq.config().handoff;
        match self.lock.begin_completion(id, handoff.settle) {
            Ok(_) => {
                seq.set_status(SequenceStatus::Completing);
                log::info!("[seq] {} complete, handing off", seq.name());
            }
            Err(err) => {
                log::warn!("[seq] {} cannot complete: {}", seq.name(), err);
                return;
            }
        }
        self.sync_body_lock();
        if let Some(anchor) = handoff.scroll_to {
            self.host.scroll_to_anchor(anchor);
        }
        out.push(SequenceEvent::Completed {
            id,
            scroll_to: handoff.scroll_to,
        });
    }

    fn apply(&mut self, transition: LockTransition, out: &mut Vec<SequenceEvent>) {
        match transition {
            LockTransition::Released { id, forced } => {
                if let Some(seq) = self.sequences.get_mut(&id) {
                    seq.set_status(SequenceStatus::Released);
                }
                if forced {
                    self.host.set_page_scroll_locked(false);
                    self.body_lock_applied = false;
                }
                out.push(SequenceEvent::Released { id, forced });
            }
            LockTransition::Granted { id, .. } => {
                if let Some(seq) = self.sequences.get_mut(&id) {
                    seq.set_status(SequenceStatus::Capturing);
                }
                out.push(SequenceEvent::Activated { id });
            }
        }
    }

    fn sync_body_lock(&mut self) {
        let wanted = self.lock.body_locked();
        if wanted != self.body_lock_applied {
            self.host.set_page_scroll_locked(wanted);
            self.body_lock_applied = wanted;
        }
    }

    pub fn snapshot(&self, id: SequenceId) -> Option<&Snapshot> {
        self.sequences.get(&id).map(Sequence::snapshot)
    }

    /// Snapshots of every mounted sequence, in mount order.
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.sequences.get(id).map(Sequence::snapshot))
    }

    /// Sequence the render layer should frame, with its mount-order index:
    /// the lock owner, else the last sequence that has run, else the first.
    pub fn focus(&self) -> Option<(usize, &Snapshot)> {
        let owner = self.lock.owner();
        let mut fallback = None;
        for (i, snap) in self.snapshots().enumerate() {
            if Some(snap.id) == owner {
                return Some((i, snap));
            }
            let ran = !matches!(snap.status, SequenceStatus::Idle | SequenceStatus::Waiting);
            if ran || fallback.is_none() {
                fallback = Some((i, snap));
            }
        }
        fallback
    }

    pub fn sequence(&self, id: SequenceId) -> Option<&Sequence> {
        self.sequences.get(&id)
    }

    pub fn ids(&self) -> &[SequenceId] {
        &self.order
    }

    pub fn lock_state(&self) -> LockState {
        self.lock.state()
    }

    pub fn lock_owner(&self) -> Option<SequenceId> {
        self.lock.owner()
    }
}
