//! Camera rig: a target pose the rendered camera exponentially chases.
//!
//! The target comes from a [`CameraTrack`]: fixed, scrubbed along a path by
//! smoothed progress, or tweened to keyframes over wall-clock time when a
//! phase is entered. The chase itself does not care which one set it.

use std::time::Duration;

use glam::{EulerRot, Quat, Vec3};

use crate::constants::DEFAULT_KEYFRAME_DURATION;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl CameraPose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose from XYZ Euler angles in radians.
    pub fn from_euler(position: Vec3, [x, y, z]: [f32; 3]) -> Self {
        Self {
            position,
            rotation: Quat::from_euler(EulerRot::XYZ, x, y, z),
        }
    }

    #[inline]
    pub fn interpolate(&self, to: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: self.position.lerp(to.position, t),
            rotation: self.rotation.slerp(to.rotation, t),
        }
    }

    /// Unit forward vector (-Z rotated by the pose).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

/// Easing curves used by the tour's timelines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    #[default]
    Linear,
    Power1Out,
    Power1InOut,
    Power2In,
    Power2Out,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Ease::Power2In => t * t * t,
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSegment {
    pub to: CameraPose,
    /// Relative weight; a path's weights are normalized to span progress 0..1.
    pub duration: f32,
    pub ease: Ease,
}

/// Scroll-scrubbed camera path.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraPath {
    pub start: CameraPose,
    pub segments: Vec<PathSegment>,
}

impl CameraPath {
    pub fn new(start: CameraPose) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    pub fn then(mut self, to: CameraPose, duration: f32, ease: Ease) -> Self {
        self.segments.push(PathSegment { to, duration, ease });
        self
    }

    pub fn total_duration(&self) -> f32 {
        self.segments.iter().map(|s| s.duration.max(0.0)).sum()
    }

    pub fn end(&self) -> CameraPose {
        self.segments.last().map(|s| s.to).unwrap_or(self.start)
    }

    /// Pose at normalized position `t` along the path.
    pub fn sample(&self, t: f32) -> CameraPose {
        let total = self.total_duration();
        if !(total > 0.0) || t >= 1.0 {
            return self.end();
        }
        let mut cursor = t.clamp(0.0, 1.0) * total;
        let mut from = self.start;
        for seg in &self.segments {
            let d = seg.duration.max(0.0);
            if cursor <= d && d > 0.0 {
                return from.interpolate(&seg.to, seg.ease.apply(cursor / d));
            }
            cursor -= d;
            from = seg.to;
        }
        from
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub pose: CameraPose,
    pub duration: Duration,
    pub ease: Ease,
}

impl Keyframe {
    /// A reveal tween with the default duration and a decelerating ease.
    pub fn new(pose: CameraPose) -> Self {
        Self {
            pose,
            duration: DEFAULT_KEYFRAME_DURATION,
            ease: Ease::Power2Out,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CameraTrack {
    Static(CameraPose),
    Scrub(CameraPath),
    Keyframes {
        initial: CameraPose,
        keyframes: Vec<Keyframe>,
    },
}

impl CameraTrack {
    pub fn initial(&self) -> CameraPose {
        match self {
            CameraTrack::Static(p) => *p,
            CameraTrack::Scrub(path) => path.start,
            CameraTrack::Keyframes { initial, .. } => *initial,
        }
    }

    pub fn final_pose(&self) -> CameraPose {
        match self {
            CameraTrack::Static(p) => *p,
            CameraTrack::Scrub(path) => path.end(),
            CameraTrack::Keyframes { initial, keyframes } => {
                keyframes.last().map(|k| k.pose).unwrap_or(*initial)
            }
        }
    }

    pub fn keyframe_count(&self) -> usize {
        match self {
            CameraTrack::Keyframes { keyframes, .. } => keyframes.len(),
            _ => 0,
        }
    }
}

/// Time-linked tween between two poses.
#[derive(Clone, Copy, Debug)]
struct Tween {
    from: CameraPose,
    to: CameraPose,
    elapsed: Duration,
    duration: Duration,
    ease: Ease,
}

impl Tween {
    fn advance(&mut self, dt: Duration) -> (CameraPose, bool) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let t = if self.duration.is_zero() {
            1.0
        } else {
            self.elapsed.as_secs_f32() / self.duration.as_secs_f32()
        };
        if self.elapsed >= self.duration {
            return (self.to, true);
        }
        (self.from.interpolate(&self.to, self.ease.apply(t)), false)
    }
}

#[derive(Clone, Debug)]
pub struct CameraRig {
    current: CameraPose,
    target: CameraPose,
    ease: f32,
    track: CameraTrack,
    tween: Option<Tween>,
}

impl CameraRig {
    pub fn new(track: CameraTrack, ease: f32) -> Self {
        let initial = track.initial();
        Self {
            current: initial,
            target: initial,
            ease,
            track,
            tween: None,
        }
    }

    /// Start tweening the target toward keyframe `index`. Returns false if there is no such keyframe.
    pub fn start_keyframe(&mut self, index: usize) -> bool {
        let CameraTrack::Keyframes { keyframes, .. } = &self.track else {
            return false;
        };
        let Some(kf) = keyframes.get(index) else {
            return false;
        };
        self.tween = Some(Tween {
            from: self.target,
            to: kf.pose,
            elapsed: Duration::ZERO,
            duration: kf.duration,
            ease: kf.ease,
        });
        true
    }

    pub fn cancel_tween(&mut self) {
        self.tween = None;
    }

    pub fn is_tweening(&self) -> bool {
        self.tween.is_some()
    }

    /// Refresh the target from the track, then move `current` a fixed fraction toward it.
    pub fn tick(&mut self, dt: Duration, anim: f32) -> CameraPose {
        match &self.track {
            CameraTrack::Static(pose) => self.target = *pose,
            CameraTrack::Scrub(path) => self.target = path.sample(anim),
            CameraTrack::Keyframes { .. } => {
                if let Some(tween) = &mut self.tween {
                    let (pose, done) = tween.advance(dt);
                    self.target = pose;
                    if done {
                        self.tween = None;
                    }
                }
            }
        }
        self.current = self.current.interpolate(&self.target, self.ease);
        self.current
    }

    /// Place the camera at the end of its track with no chase (render-only mode).
    pub fn snap_to_end(&mut self) {
        self.tween = None;
        self.target = self.track.final_pose();
        self.current = self.target;
    }

    pub fn reset(&mut self) {
        self.tween = None;
        self.target = self.track.initial();
        self.current = self.target;
    }

    pub fn current(&self) -> CameraPose {
        self.current
    }

    pub fn target(&self) -> CameraPose {
        self.target
    }

    pub fn track(&self) -> &CameraTrack {
        &self.track
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eases_hit_endpoints() {
        for ease in [
            Ease::Linear,
            Ease::Power1Out,
            Ease::Power1InOut,
            Ease::Power2In,
            Ease::Power2Out,
        ] {
            assert!(ease.apply(0.0).abs() < 1e-6, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6, "{ease:?} at 1");
        }
    }

    #[test]
    fn path_weights_are_normalized() {
        let a = CameraPose::new(Vec3::ZERO, Quat::IDENTITY);
        let b = CameraPose::new(Vec3::new(4.0, 0.0, 0.0), Quat::IDENTITY);
        let c = CameraPose::new(Vec3::new(4.0, 4.0, 0.0), Quat::IDENTITY);
        let path = CameraPath::new(a)
            .then(b, 0.2, Ease::Linear)
            .then(c, 0.2, Ease::Linear);
        assert!((path.sample(0.25).position - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
        assert!((path.sample(0.5).position - b.position).length() < 1e-5);
        assert!((path.sample(1.0).position - c.position).length() < 1e-5);
    }

    #[test]
    fn tween_runs_on_time_not_progress() {
        let start = CameraPose::default();
        let end = CameraPose::new(Vec3::new(0.0, 0.0, -10.0), Quat::IDENTITY);
        let mut rig = CameraRig::new(
            CameraTrack::Keyframes {
                initial: start,
                keyframes: vec![Keyframe {
                    pose: end,
                    duration: Duration::from_millis(500),
                    ease: Ease::Linear,
                }],
            },
            0.1,
        );
        assert!(rig.start_keyframe(0));
        rig.tick(Duration::from_millis(250), 0.0);
        assert!((rig.target().position.z + 5.0).abs() < 1e-4);
        rig.tick(Duration::from_millis(400), 0.0);
        assert_eq!(rig.target().position, end.position);
        assert!(!rig.is_tweening());
        assert!(!rig.start_keyframe(1));
    }
}
