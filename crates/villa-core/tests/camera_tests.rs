// Host-side tests for the camera rig and the preset camera tracks.

use std::time::Duration;

use glam::Vec3;
use villa_core::presets;
use villa_core::*;

const FRAME: Duration = Duration::from_millis(16);

fn track(config: &SequenceConfig) -> CameraTrack {
    config.camera.clone()
}

#[test]
fn step_never_exceeds_ease_fraction_of_gap() {
    let cfg = presets::villa_journey();
    let k = cfg.camera_ease;
    let mut rig = CameraRig::new(track(&cfg), k);
    let mut anim = 0.0f32;
    for i in 0..400 {
        // scrub forward, then back
        anim = if i < 250 { (anim + 0.004).min(1.0) } else { (anim - 0.006).max(0.0) };
        let before = rig.current();
        let after = rig.tick(FRAME, anim);
        let target = rig.target();
        let step = (after.position - before.position).length();
        let gap = (target.position - before.position).length();
        assert!(step <= k * gap + 1e-5, "tick {i}: step {step} gap {gap}");
    }
}

#[test]
fn rig_converges_without_teleporting() {
    let cfg = presets::pool_dive();
    let mut rig = CameraRig::new(track(&cfg), cfg.camera_ease);
    let first = rig.tick(FRAME, 1.0);
    let end = cfg.camera.final_pose();
    assert!((first.position - end.position).length() > 0.1);
    for _ in 0..400 {
        rig.tick(FRAME, 1.0);
    }
    assert!((rig.current().position - end.position).length() < 1e-3);
    assert!(rig.current().rotation.angle_between(end.rotation) < 1e-3);
}

#[test]
fn villa_path_starts_and_ends_where_the_walk_does() {
    let CameraTrack::Scrub(path) = presets::villa_journey().camera else {
        panic!("villa journey should scrub its camera");
    };
    assert_eq!(path.sample(0.0).position, Vec3::new(0.0, 3.5, 20.0));
    assert!((path.sample(1.0).position - Vec3::new(0.0, 2.0, 3.0)).length() < 1e-5);
    assert!((path.total_duration() - 1.05).abs() < 1e-5);
}

/// Three reveal keyframes, one per band after the first.
fn reveal_track() -> CameraTrack {
    CameraTrack::Keyframes {
        initial: CameraPose::from_euler(Vec3::new(0.0, 1.5, 8.0), [0.0; 3]),
        keyframes: (0..3)
            .map(|i| {
                let position = Vec3::new(0.0, 1.5, 4.0 - 3.0 * i as f32);
                Keyframe::new(CameraPose::from_euler(position, [0.0; 3]))
            })
            .collect(),
    }
}

#[test]
fn services_path_steps_down_the_bays() {
    let CameraTrack::Scrub(path) = presets::services().camera else {
        panic!("services should scrub its camera");
    };
    assert_eq!(path.segments.len(), presets::SERVICES_ROOMS);
    assert!((path.total_duration() - 1.0).abs() < 1e-5);
    for pair in path.segments.windows(2) {
        assert!(pair[1].to.position.z < pair[0].to.position.z);
    }
    let end = path.sample(1.0).position.z;
    assert!((end - (4.0 * presets::SERVICES_BAY_SPACING + 3.6)).abs() < 1e-5);
}

#[test]
fn services_camera_follows_progress_back_up_the_bays() {
    let cfg = presets::services();
    let mut rig = CameraRig::new(track(&cfg), cfg.camera_ease);
    for _ in 0..300 {
        rig.tick(FRAME, 0.7);
    }
    let deep = rig.current().position.z;
    assert!(deep < 2.0 * presets::SERVICES_BAY_SPACING);
    // scrolled back into the second room: the camera has to leave room four
    for _ in 0..300 {
        rig.tick(FRAME, 0.3);
    }
    let z = rig.current().position.z;
    assert!(z > presets::SERVICES_BAY_SPACING + 3.0 && z < 5.2, "z {z}");
}

#[test]
fn keyframe_tween_keeps_running_without_progress() {
    let track = reveal_track();
    let mut rig = CameraRig::new(track.clone(), 0.12);
    assert!(rig.start_keyframe(2));
    // 60 frames at a fixed anim: the tween is time-linked, not scroll-linked
    for _ in 0..60 {
        rig.tick(FRAME, 0.0);
    }
    let CameraTrack::Keyframes { keyframes, .. } = &track else {
        unreachable!()
    };
    assert_eq!(rig.target().position, keyframes[2].pose.position);
    rig.reset();
    assert_eq!(rig.current(), track.initial());
    assert!(!rig.is_tweening());
}

#[test]
fn from_euler_matches_yaw_convention() {
    let pose = CameraPose::from_euler(Vec3::ZERO, [0.0, std::f32::consts::FRAC_PI_2, 0.0]);
    // a quarter turn about +Y points the camera down -X
    assert!((pose.forward() - Vec3::NEG_X).length() < 1e-5);
}
