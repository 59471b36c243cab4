//! Page-global scroll lock: one owner at a time, FIFO queue behind it.
//!
//! The service only tracks ownership and the desired body-lock state; the
//! [`Director`](crate::Director) applies that state to the host.

use std::collections::VecDeque;
use std::time::Duration;

use smallvec::SmallVec;

use crate::constants::LOCK_WATCHDOG;
use crate::error::LockError;
use crate::SequenceId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LockState {
    #[default]
    Idle,
    Capturing,
    Completing,
    Released,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquire {
    Granted,
    /// Zero-based position in the wait queue.
    Queued(usize),
}

/// Ownership changes produced by [`ScrollLockService::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockTransition {
    Released { id: SequenceId, forced: bool },
    Granted { id: SequenceId, lock_body: bool },
}

#[derive(Clone, Copy, Debug)]
struct Waiter {
    id: SequenceId,
    lock_body: bool,
}

#[derive(Clone, Copy, Debug)]
struct Completion {
    elapsed: Duration,
    settle: Duration,
}

#[derive(Debug, Default)]
pub struct ScrollLockService {
    owner: Option<SequenceId>,
    state: LockState,
    waiting: VecDeque<Waiter>,
    completion: Option<Completion>,
    body_locked: bool,
}

impl ScrollLockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn owner(&self) -> Option<SequenceId> {
        self.owner
    }

    /// Whether page overflow should currently be locked.
    pub fn body_locked(&self) -> bool {
        self.body_locked
    }

    pub fn is_waiting(&self, id: SequenceId) -> bool {
        self.waiting.iter().any(|w| w.id == id)
    }

    pub fn acquire(&mut self, id: SequenceId, lock_body: bool) -> Acquire {
        if self.owner == Some(id) {
            return Acquire::Granted;
        }
        if let Some(pos) = self.waiting.iter().position(|w| w.id == id) {
            return Acquire::Queued(pos);
        }
        // waiters left over from a release are granted by `tick`, never skipped
        if self.owner.is_none() && self.waiting.is_empty() {
            self.grant(id, lock_body);
            return Acquire::Granted;
        }
        self.waiting.push_back(Waiter { id, lock_body });
        log::info!("[lock] {:?} queued behind {:?}", id, self.owner);
        Acquire::Queued(self.waiting.len() - 1)
    }

    /// Capturing -> Completing. Returns whether the body was locked before.
    pub fn begin_completion(&mut self, id: SequenceId, settle: Duration) -> Result<bool, LockError> {
        self.check_owner(id)?;
        match self.state {
            LockState::Capturing => {}
            LockState::Completing => return Err(LockError::AlreadyCompleting(id)),
            _ => return Err(LockError::NotOwner { caller: id, owner: self.owner }),
        }
        self.state = LockState::Completing;
        self.completion = Some(Completion {
            elapsed: Duration::ZERO,
            settle,
        });
        Ok(std::mem::take(&mut self.body_locked))
    }

    /// Completing -> Released.
    pub fn finish(&mut self, id: SequenceId) -> Result<(), LockError> {
        self.check_owner(id)?;
        if self.state != LockState::Completing {
            return Err(LockError::NotCompleting(id));
        }
        self.release();
        log::info!("[lock] released by {:?}", id);
        Ok(())
    }

    /// Drop `id`'s ownership or queue slot from any state (unmount, reset).
    pub fn force_release(&mut self, id: SequenceId) -> Result<(), LockError> {
        if let Some(pos) = self.waiting.iter().position(|w| w.id == id) {
            self.waiting.remove(pos);
            return Ok(());
        }
        self.check_owner(id)?;
        self.release();
        log::info!("[lock] force-released {:?}", id);
        Ok(())
    }

    /// Advance the settle timer and watchdog, then grant the next waiter if the lock is free.
    pub fn tick(&mut self, dt: Duration, host_settled: bool) -> SmallVec<[LockTransition; 2]> {
        let mut out = SmallVec::new();
        if let (Some(id), Some(c)) = (self.owner, self.completion.as_mut()) {
            c.elapsed += dt;
            let Completion { elapsed, settle } = *c;
            if elapsed >= settle && host_settled {
                self.release();
                out.push(LockTransition::Released { id, forced: false });
            } else if elapsed >= LOCK_WATCHDOG {
                log::warn!(
                    "[lock] {:?} stuck completing for {:?}, forcing release",
                    id,
                    elapsed
                );
                self.release();
                out.push(LockTransition::Released { id, forced: true });
            }
        }
        if self.owner.is_none() {
            if let Some(next) = self.waiting.pop_front() {
                self.grant(next.id, next.lock_body);
                out.push(LockTransition::Granted {
                    id: next.id,
                    lock_body: next.lock_body,
                });
            }
        }
        out
    }

    fn grant(&mut self, id: SequenceId, lock_body: bool) {
        self.owner = Some(id);
        self.state = LockState::Capturing;
        self.body_locked = lock_body;
        self.completion = None;
        log::info!("[lock] granted to {:?} (lock_body={})", id, lock_body);
    }

    fn release(&mut self) {
        self.owner = None;
        self.state = LockState::Released;
        self.completion = None;
        self.body_locked = false;
    }

    fn check_owner(&self, caller: SequenceId) -> Result<(), LockError> {
        if self.owner == Some(caller) {
            Ok(())
        } else {
            log::warn!("[lock] rejected call from non-owner {:?}", caller);
            Err(LockError::NotOwner {
                caller,
                owner: self.owner,
            })
        }
    }
}
