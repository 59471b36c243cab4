//! Per-sequence configuration and its validation.

use std::time::Duration;

use smallvec::SmallVec;

use crate::camera::CameraTrack;
use crate::constants::{
    DEFAULT_CAMERA_EASE, DEFAULT_EASE, DEFAULT_HANDOFF_SETTLE, DEFAULT_REVERSE_DAMPING,
    DEFAULT_SENSITIVITY, DEFAULT_TOLERANCE_PX,
};
use crate::error::ConfigError;

// Band edges closer than this are treated as touching.
const BAND_EPSILON: f32 = 1e-6;

/// One-shot side effect run the first time a phase is entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseAction {
    /// Tween the camera target to keyframe `n` of a [`CameraTrack::Keyframes`] track.
    CameraKeyframe(usize),
    /// Named cue for the render layer.
    Signal(&'static str),
    /// Request the handoff. Implied for the last band.
    Complete,
}

/// Half-open progress interval `[low, high)` mapped to a named phase.
/// The last band of a sequence also contains `high`.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseBand {
    pub name: &'static str,
    pub low: f32,
    pub high: f32,
    pub on_enter: SmallVec<[PhaseAction; 2]>,
}

impl PhaseBand {
    pub fn new(name: &'static str, low: f32, high: f32) -> Self {
        Self {
            name,
            low,
            high,
            on_enter: SmallVec::new(),
        }
    }

    pub fn with(mut self, action: PhaseAction) -> Self {
        self.on_enter.push(action);
        self
    }
}

/// Where a sequence's progress comes from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProgressSource {
    /// Wheel/touch/pointer input is intercepted and integrated.
    Captured,
    /// Progress follows native page scroll across a pinned section
    /// `pin_distance_vh` viewport heights long; the host feeds it in.
    ScrollLinked { pin_distance_vh: f32 },
}

/// What happens once the terminal phase is reached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Handoff {
    /// Anchor selector to scroll to, e.g. `"#villa-journey"`.
    pub scroll_to: Option<&'static str>,
    /// Minimum time spent Completing before the lock is released.
    pub settle: Duration,
}

impl Default for Handoff {
    fn default() -> Self {
        Self {
            scroll_to: None,
            settle: DEFAULT_HANDOFF_SETTLE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SequenceConfig {
    pub name: &'static str,
    /// Captured units per input pixel.
    pub sensitivity: f32,
    /// Per-tick smoothing factor of progress, in (0, 1).
    pub ease: f32,
    /// Input distance, in pixels, that maps to progress 1.
    pub threshold_px: f32,
    pub reverse_damping: f32,
    pub phase_bands: Vec<PhaseBand>,
    /// Lock page overflow while this sequence captures input.
    pub lock_body: bool,
    pub source: ProgressSource,
    pub camera_ease: f32,
    pub camera: CameraTrack,
    pub tolerance_px: f32,
    pub handoff: Handoff,
    /// Request the scroll lock as soon as the sequence is mounted.
    pub auto_activate: bool,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            name: "sequence",
            sensitivity: DEFAULT_SENSITIVITY,
            ease: DEFAULT_EASE,
            threshold_px: 1.0 / DEFAULT_SENSITIVITY,
            reverse_damping: DEFAULT_REVERSE_DAMPING,
            phase_bands: vec![PhaseBand::new("main", 0.0, 1.0)],
            lock_body: false,
            source: ProgressSource::Captured,
            camera_ease: DEFAULT_CAMERA_EASE,
            camera: CameraTrack::Static(Default::default()),
            tolerance_px: DEFAULT_TOLERANCE_PX,
            handoff: Handoff::default(),
            auto_activate: true,
        }
    }
}

impl SequenceConfig {
    /// Accumulated (sensitivity-scaled) amount that maps to progress 1.
    #[inline]
    pub fn threshold(&self) -> f32 {
        self.threshold_px * self.sensitivity
    }

    pub fn is_captured(&self) -> bool {
        matches!(self.source, ProgressSource::Captured)
    }

    /// Same sequence with a different progress source (hosts without page scroll).
    pub fn with_source(mut self, source: ProgressSource) -> Self {
        self.source = source;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.name;
        if !(self.ease > 0.0 && self.ease < 1.0) {
            return Err(ConfigError::Ease {
                name,
                value: self.ease,
            });
        }
        if !(self.camera_ease > 0.0 && self.camera_ease < 1.0) {
            return Err(ConfigError::CameraEase {
                name,
                value: self.camera_ease,
            });
        }
        if !(self.sensitivity.is_finite() && self.sensitivity > 0.0) {
            return Err(ConfigError::Sensitivity {
                name,
                value: self.sensitivity,
            });
        }
        if !(self.threshold_px.is_finite() && self.threshold_px > 0.0) {
            return Err(ConfigError::Threshold {
                name,
                value: self.threshold_px,
            });
        }
        // both factors can be sane while the product over- or underflows
        let threshold = self.threshold();
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ConfigError::ScaledThreshold {
                name,
                value: threshold,
            });
        }
        if !(0.0..=1.0).contains(&self.reverse_damping) {
            return Err(ConfigError::ReverseDamping {
                name,
                value: self.reverse_damping,
            });
        }
        if !(self.tolerance_px.is_finite() && self.tolerance_px >= 0.0) {
            return Err(ConfigError::Tolerance {
                name,
                value: self.tolerance_px,
            });
        }
        if let ProgressSource::ScrollLinked { pin_distance_vh } = self.source {
            if !(pin_distance_vh.is_finite() && pin_distance_vh > 0.0) {
                return Err(ConfigError::PinDistance {
                    name,
                    value: pin_distance_vh,
                });
            }
        }
        self.validate_bands()?;
        self.validate_camera()
    }

    fn validate_bands(&self) -> Result<(), ConfigError> {
        let name = self.name;
        let (Some(first), Some(last)) = (self.phase_bands.first(), self.phase_bands.last()) else {
            return Err(ConfigError::NoBands { name });
        };
        for band in &self.phase_bands {
            if !(band.low < band.high) {
                return Err(ConfigError::InvertedBand {
                    name,
                    band: band.name,
                    low: band.low,
                    high: band.high,
                });
            }
        }
        if first.low.abs() > BAND_EPSILON || (last.high - 1.0).abs() > BAND_EPSILON {
            return Err(ConfigError::Coverage {
                name,
                low: first.low,
                high: last.high,
            });
        }
        for pair in self.phase_bands.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if (prev.high - next.low).abs() > BAND_EPSILON {
                return Err(ConfigError::Discontinuity {
                    name,
                    prev: prev.name,
                    prev_high: prev.high,
                    next: next.name,
                    next_low: next.low,
                });
            }
        }
        Ok(())
    }

    fn validate_camera(&self) -> Result<(), ConfigError> {
        let name = self.name;
        if let CameraTrack::Scrub(path) = &self.camera {
            if !(path.total_duration() > 0.0) {
                return Err(ConfigError::EmptyPath { name });
            }
        }
        let len = self.camera.keyframe_count();
        for band in &self.phase_bands {
            for action in &band.on_enter {
                if let PhaseAction::CameraKeyframe(index) = *action {
                    if index >= len {
                        return Err(ConfigError::KeyframeOutOfRange {
                            name,
                            band: band.name,
                            index,
                            len,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
