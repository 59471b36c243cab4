//! The tour's four scenes, tuned like the live site.

use std::time::Duration;

use glam::Vec3;

use crate::camera::{CameraPath, CameraPose, CameraTrack, Ease};
use crate::config::{Handoff, PhaseAction, PhaseBand, ProgressSource, SequenceConfig};
use crate::constants::DEFAULT_HANDOFF_SETTLE;

pub const HERO_ANCHOR: &str = "#villa-journey";
pub const SERVICES_BAY_SPACING: f32 = -6.5; // z distance between service rooms
pub const SERVICES_ROOMS: usize = 5;

fn pose(x: f32, y: f32, z: f32, rot: [f32; 3]) -> CameraPose {
    CameraPose::from_euler(Vec3::new(x, y, z), rot)
}

/// Intro: wheel/touch captured while the page is locked, then hand off to the journey.
pub fn hero() -> SequenceConfig {
    SequenceConfig {
        name: "hero",
        sensitivity: 0.0016,
        ease: 0.10,
        threshold_px: 625.0,
        phase_bands: vec![
            PhaseBand::new("intro", 0.0, 0.10),
            PhaseBand::new("exploding", 0.10, 0.30).with(PhaseAction::Signal("explode")),
            PhaseBand::new("revealing", 0.30, 0.55).with(PhaseAction::Signal("reveal")),
            PhaseBand::new("done", 0.55, 1.0).with(PhaseAction::Complete),
        ],
        lock_body: true,
        source: ProgressSource::Captured,
        camera: CameraTrack::Static(pose(0.0, 0.0, 6.0, [0.0; 3])),
        handoff: Handoff {
            scroll_to: Some(HERO_ANCHOR),
            settle: DEFAULT_HANDOFF_SETTLE,
        },
        ..Default::default()
    }
}

/// Courtyard walk scrubbed by page scroll; the dive band hands the camera to [`pool_dive`].
pub fn villa_journey() -> SequenceConfig {
    let path = CameraPath::new(pose(0.0, 3.5, 20.0, [-0.1, 0.0, 0.0]))
        .then(pose(-5.0, 4.0, 10.0, [-0.15, 0.4, 0.0]), 0.2, Ease::Power1InOut)
        .then(pose(-2.0, 3.2, 4.0, [-0.18, 0.5, 0.0]), 0.2, Ease::Power1InOut)
        .then(pose(3.0, 3.5, 8.0, [-0.12, -0.35, 0.0]), 0.2, Ease::Power1InOut)
        .then(pose(0.0, 4.0, 10.0, [-0.08, 0.0, 0.0]), 0.15, Ease::Power1InOut)
        .then(pose(0.0, 3.0, 5.0, [-0.3, 0.0, 0.0]), 0.15, Ease::Power1InOut)
        .then(pose(0.0, 2.0, 3.0, [-0.5, 0.0, 0.0]), 0.15, Ease::Power2In);
    SequenceConfig {
        name: "villa-journey",
        ease: 0.08,
        phase_bands: vec![
            PhaseBand::new("walk", 0.0, 0.85),
            PhaseBand::new("dive", 0.85, 1.0).with(PhaseAction::Signal("pool-dive")),
        ],
        source: ProgressSource::ScrollLinked {
            pin_distance_vh: 1.2,
        },
        camera: CameraTrack::Scrub(path),
        handoff: Handoff {
            scroll_to: None,
            settle: Duration::ZERO,
        },
        ..Default::default()
    }
}

pub fn pool_dive() -> SequenceConfig {
    let path = CameraPath::new(pose(0.0, 0.2, 5.0, [-0.1, 0.0, 0.0]))
        .then(pose(0.0, -0.3, 3.0, [-0.05, 0.0, 0.0]), 0.25, Ease::Power1Out)
        .then(pose(2.0, -1.2, 0.0, [0.0, 0.4, 0.0]), 0.25, Ease::Power1Out)
        .then(pose(-3.0, -1.8, -4.0, [0.05, -0.5, 0.0]), 0.25, Ease::Power1Out)
        .then(pose(0.0, -2.8, 0.0, [0.2, 0.0, 0.0]), 0.25, Ease::Power1Out);
    SequenceConfig {
        name: "pool-dive",
        phase_bands: vec![
            PhaseBand::new("entry", 0.0, 0.25),
            PhaseBand::new("glide", 0.25, 0.50).with(PhaseAction::Signal("caustics")),
            PhaseBand::new("turn", 0.50, 0.75),
            PhaseBand::new("descent", 0.75, 0.98),
            PhaseBand::new("exit", 0.98, 1.0),
        ],
        source: ProgressSource::ScrollLinked {
            pin_distance_vh: 2.0,
        },
        camera: CameraTrack::Scrub(path),
        handoff: Handoff {
            scroll_to: None,
            settle: Duration::ZERO,
        },
        ..Default::default()
    }
}

/// Services walkthrough: one room per fifth of progress, the camera scrubbed
/// room to room so rewinding the page walks back through the bays.
pub fn services() -> SequenceConfig {
    let path = CameraPath::new(pose(0.0, 1.5, 8.0, [0.0; 3]))
        .then(pose(-0.5, 1.5, 5.2, [0.0, -0.12, 0.0]), 0.2, Ease::Power1Out)
        .then(
            pose(0.25, 1.5, SERVICES_BAY_SPACING + 3.0, [0.0, 0.06, 0.0]),
            0.2,
            Ease::Power1Out,
        )
        .then(
            pose(0.6, 1.6, 2.0 * SERVICES_BAY_SPACING + 3.8, [0.0, 0.18, 0.0]),
            0.2,
            Ease::Power1Out,
        )
        .then(
            pose(0.2, 1.7, 3.0 * SERVICES_BAY_SPACING + 4.4, [0.0, 0.10, 0.0]),
            0.2,
            Ease::Power1Out,
        )
        .then(
            pose(0.0, 1.5, 4.0 * SERVICES_BAY_SPACING + 3.6, [0.0; 3]),
            0.2,
            Ease::Power1Out,
        );
    const NAMES: [&str; SERVICES_ROOMS] = ["room-1", "room-2", "room-3", "room-4", "room-5"];
    let step = 1.0 / SERVICES_ROOMS as f32;
    let phase_bands = NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let high = if i + 1 == SERVICES_ROOMS {
                1.0
            } else {
                (i + 1) as f32 * step
            };
            PhaseBand::new(name, i as f32 * step, high)
        })
        .collect();
    SequenceConfig {
        name: "services",
        ease: 0.12,
        camera_ease: 0.12,
        phase_bands,
        source: ProgressSource::ScrollLinked {
            pin_distance_vh: 3.5,
        },
        camera: CameraTrack::Scrub(path),
        handoff: Handoff {
            scroll_to: None,
            settle: Duration::ZERO,
        },
        ..Default::default()
    }
}

/// Every scene in page order.
pub fn tour() -> Vec<SequenceConfig> {
    vec![hero(), villa_journey(), pool_dive(), services()]
}
