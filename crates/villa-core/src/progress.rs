//! Progress accumulation and smoothing.

use crate::constants::{PROGRESS_SNAP_EPSILON, SMOOTHER_SETTLE_EPSILON};

/// Integrates captured deltas into a bounded progress value.
///
/// Forward deltas count in full, backward deltas are scaled by
/// `reverse_damping` so reversing feels sticky. The running total is held in
/// `[0, threshold]`: forward input past the threshold is accepted but has no
/// further effect, and reversing rewinds immediately.
#[derive(Clone, Debug)]
pub struct ProgressAccumulator {
    acc: f32,
    threshold: f32,
    reverse_damping: f32,
}

impl ProgressAccumulator {
    /// `threshold` is in captured (sensitivity-scaled) units.
    pub fn new(threshold: f32, reverse_damping: f32) -> Self {
        Self {
            acc: 0.0,
            threshold,
            reverse_damping,
        }
    }

    pub fn push(&mut self, delta: f32) {
        if !delta.is_finite() || delta == 0.0 {
            return;
        }
        let weighted = if delta > 0.0 {
            delta
        } else {
            delta * self.reverse_damping
        };
        let mut next = (self.acc + weighted).clamp(0.0, self.threshold);
        if self.threshold - next <= PROGRESS_SNAP_EPSILON * self.threshold {
            next = self.threshold;
        }
        self.acc = next;
    }

    /// Overwrite progress from an external source (scroll-linked timelines).
    pub fn set_progress(&mut self, progress: f32) {
        if progress.is_finite() {
            self.acc = progress.clamp(0.0, 1.0) * self.threshold;
        }
    }

    pub fn progress(&self) -> f32 {
        (self.acc / self.threshold).min(1.0)
    }

    pub fn is_saturated(&self) -> bool {
        self.acc >= self.threshold
    }

    pub fn reset(&mut self) {
        self.acc = 0.0;
    }
}

/// One-pole low-pass filter, stepped once per tick (not time-scaled).
#[derive(Clone, Debug)]
pub struct Smoother {
    value: f32,
    ease: f32,
}

impl Smoother {
    pub fn new(ease: f32) -> Self {
        Self { value: 0.0, ease }
    }

    pub fn tick(&mut self, target: f32) -> f32 {
        let gap = target - self.value;
        if gap.abs() < SMOOTHER_SETTLE_EPSILON {
            self.value = target;
        } else {
            self.value += gap * self.ease;
        }
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Jump straight to `value` (render-only degradation, resets).
    pub fn snap(&mut self, value: f32) {
        self.value = value;
    }
}

/// Progress of a pinned section driven by native page scroll.
///
/// `section_top_px` is the section's bounding-rect top relative to the
/// viewport; the pin starts when it reaches 0 and lasts for
/// `pin_distance_vh` viewport heights.
#[inline]
pub fn scroll_linked_progress(section_top_px: f32, viewport_h_px: f32, pin_distance_vh: f32) -> f32 {
    let distance = viewport_h_px * pin_distance_vh;
    if !(distance > 0.0) || !section_top_px.is_finite() {
        return 0.0;
    }
    (-section_top_px / distance).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backward_motion_is_damped() {
        let mut acc = ProgressAccumulator::new(1.0, 0.3);
        acc.push(0.5);
        acc.push(-0.5);
        assert!((acc.progress() - 0.35).abs() < 1e-6);
    }

    #[test]
    fn accumulator_never_goes_negative() {
        let mut acc = ProgressAccumulator::new(1.0, 1.0);
        acc.push(-3.0);
        assert_eq!(acc.progress(), 0.0);
    }

    #[test]
    fn non_finite_deltas_are_ignored() {
        let mut acc = ProgressAccumulator::new(1.0, 1.0);
        acc.push(0.25);
        acc.push(f32::NAN);
        acc.push(f32::INFINITY);
        assert!((acc.progress() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn smoother_settles_onto_target() {
        let mut s = Smoother::new(0.5);
        for _ in 0..32 {
            s.tick(1.0);
        }
        assert_eq!(s.value(), 1.0);
    }

    #[test]
    fn scroll_linked_progress_clamps() {
        assert_eq!(scroll_linked_progress(100.0, 800.0, 1.2), 0.0);
        assert!((scroll_linked_progress(-480.0, 800.0, 1.2) - 0.5).abs() < 1e-6);
        assert_eq!(scroll_linked_progress(-5000.0, 800.0, 1.2), 1.0);
        assert_eq!(scroll_linked_progress(-10.0, 0.0, 1.2), 0.0);
    }
}
