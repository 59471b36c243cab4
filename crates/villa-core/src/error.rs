use thiserror::Error;

use crate::SequenceId;

/// Programmer errors in a [`SequenceConfig`](crate::SequenceConfig), reported at mount.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name}: ease must be inside (0, 1), got {value}")]
    Ease { name: &'static str, value: f32 },

    #[error("{name}: camera_ease must be inside (0, 1), got {value}")]
    CameraEase { name: &'static str, value: f32 },

    #[error("{name}: threshold_px must be positive, got {value}")]
    Threshold { name: &'static str, value: f32 },

    #[error("{name}: sensitivity must be finite and positive, got {value}")]
    Sensitivity { name: &'static str, value: f32 },

    #[error("{name}: threshold_px * sensitivity must be finite and positive, got {value}")]
    ScaledThreshold { name: &'static str, value: f32 },

    #[error("{name}: reverse_damping must be inside [0, 1], got {value}")]
    ReverseDamping { name: &'static str, value: f32 },

    #[error("{name}: tolerance_px must be finite and non-negative, got {value}")]
    Tolerance { name: &'static str, value: f32 },

    #[error("{name}: scroll-linked pin distance must be positive, got {value}")]
    PinDistance { name: &'static str, value: f32 },

    #[error("{name}: at least one phase band is required")]
    NoBands { name: &'static str },

    #[error("{name}: band '{band}' is empty or inverted ({low}..{high})")]
    InvertedBand {
        name: &'static str,
        band: &'static str,
        low: f32,
        high: f32,
    },

    #[error("{name}: bands must start at 0 and end at 1, got {low}..{high}")]
    Coverage { name: &'static str, low: f32, high: f32 },

    #[error("{name}: gap or overlap between '{prev}' (ends {prev_high}) and '{next}' (starts {next_low})")]
    Discontinuity {
        name: &'static str,
        prev: &'static str,
        prev_high: f32,
        next: &'static str,
        next_low: f32,
    },

    #[error("{name}: band '{band}' refers to camera keyframe {index} but only {len} exist")]
    KeyframeOutOfRange {
        name: &'static str,
        band: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{name}: camera path needs at least one segment with positive duration")]
    EmptyPath { name: &'static str },
}

/// Rejected [`ScrollLockService`](crate::ScrollLockService) transitions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockError {
    #[error("{caller:?} does not own the scroll lock (owner: {owner:?})")]
    NotOwner {
        caller: SequenceId,
        owner: Option<SequenceId>,
    },

    #[error("{0:?} has already begun completing")]
    AlreadyCompleting(SequenceId),

    #[error("{0:?} is not completing")]
    NotCompleting(SequenceId),
}
