//! Threshold-band phase machine.

use smallvec::SmallVec;

use crate::config::PhaseBand;

/// Index of a phase inside its sequence's band list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhaseId(pub usize);

/// Result of feeding one smoothed-progress sample into the machine.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseUpdate {
    pub from: PhaseId,
    pub to: PhaseId,
    /// Phases entered for the first time since the last reset, in traversal order.
    pub entered: SmallVec<[PhaseId; 4]>,
}

impl PhaseUpdate {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Clone, Debug)]
pub struct PhaseMachine {
    lows: SmallVec<[f32; 8]>,
    names: SmallVec<[&'static str; 8]>,
    fired: SmallVec<[bool; 8]>,
    current: PhaseId,
}

impl PhaseMachine {
    /// Bands must already be validated (contiguous, covering [0, 1]).
    pub fn new(bands: &[PhaseBand]) -> Self {
        Self {
            lows: bands.iter().map(|b| b.low).collect(),
            names: bands.iter().map(|b| b.name).collect(),
            fired: bands.iter().map(|_| false).collect(),
            current: PhaseId(0),
        }
    }

    /// Band containing `anim`; the last band is closed at 1.0.
    pub fn resolve(&self, anim: f32) -> PhaseId {
        if !anim.is_finite() {
            return self.current;
        }
        let above = self.lows.partition_point(|&low| low <= anim);
        PhaseId(above.saturating_sub(1))
    }

    pub fn update(&mut self, anim: f32) -> Option<PhaseUpdate> {
        let from = self.current;
        let to = self.resolve(anim);
        // Forward jumps enter every band they cross; a reverse move only lands on its target.
        let first = if to >= from { from.0 } else { to.0 };
        let mut entered = SmallVec::new();
        for i in first..=to.0 {
            if !self.fired[i] {
                self.fired[i] = true;
                entered.push(PhaseId(i));
            }
        }
        self.current = to;
        if from == to && entered.is_empty() {
            return None;
        }
        Some(PhaseUpdate { from, to, entered })
    }

    /// Jump to a phase without firing anything (render-only mode).
    pub fn force(&mut self, phase: PhaseId) {
        let idx = phase.0.min(self.lows.len() - 1);
        for f in &mut self.fired[..=idx] {
            *f = true;
        }
        self.current = PhaseId(idx);
    }

    pub fn reset(&mut self) {
        self.fired.iter_mut().for_each(|f| *f = false);
        self.current = PhaseId(0);
    }

    pub fn current(&self) -> PhaseId {
        self.current
    }

    pub fn terminal(&self) -> PhaseId {
        PhaseId(self.lows.len() - 1)
    }

    pub fn is_terminal(&self) -> bool {
        self.current == self.terminal()
    }

    pub fn name(&self, phase: PhaseId) -> &'static str {
        self.names.get(phase.0).copied().unwrap_or("?")
    }

    pub fn len(&self) -> usize {
        self.lows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> PhaseMachine {
        PhaseMachine::new(&[
            PhaseBand::new("a", 0.0, 0.1),
            PhaseBand::new("b", 0.1, 0.3),
            PhaseBand::new("c", 0.3, 0.55),
            PhaseBand::new("d", 0.55, 1.0),
        ])
    }

    #[test]
    fn resolve_uses_half_open_bands() {
        let m = machine();
        assert_eq!(m.resolve(0.0), PhaseId(0));
        assert_eq!(m.resolve(0.0999), PhaseId(0));
        assert_eq!(m.resolve(0.1), PhaseId(1));
        assert_eq!(m.resolve(0.55), PhaseId(3));
        assert_eq!(m.resolve(1.0), PhaseId(3));
        assert_eq!(m.resolve(-0.2), PhaseId(0));
        assert_eq!(m.resolve(7.0), PhaseId(3));
    }

    #[test]
    fn forward_jump_enters_crossed_bands_in_order() {
        let mut m = machine();
        let first = m.update(0.0).unwrap();
        assert_eq!(first.entered.as_slice(), &[PhaseId(0)]);
        let jump = m.update(0.6).unwrap();
        assert_eq!(jump.entered.as_slice(), &[PhaseId(1), PhaseId(2), PhaseId(3)]);
        assert!(m.is_terminal());
    }

    #[test]
    fn reverse_then_forward_does_not_refire() {
        let mut m = machine();
        m.update(0.2);
        let back = m.update(0.05).unwrap();
        assert_eq!(back.to, PhaseId(0));
        assert!(back.entered.is_empty());
        let again = m.update(0.2).unwrap();
        assert!(again.changed());
        assert!(again.entered.is_empty());
    }
}
