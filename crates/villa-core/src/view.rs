//! Render-side helpers shared with the web and native frontends.
//!
//! These types avoid platform APIs. Frontends use them to turn a
//! [`Snapshot`] into camera matrices and the uniform block of the scene
//! shader.

use std::time::Duration;

use glam::{Mat4, Vec3};

use crate::camera::{CameraPose, Ease};
use crate::constants::{
    BACKDROP_FADE, BACKDROP_INTRO_RGB, BACKDROP_STAGE_RGB, CAMERA_FOVY_DEG, CAMERA_ZFAR,
    CAMERA_ZNEAR,
};
use crate::phase::PhaseId;
use crate::sequence::Snapshot;

/// Right-handed perspective camera placed at a [`CameraPose`].
#[derive(Clone, Debug)]
pub struct Camera {
    pub pose: CameraPose,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(pose: CameraPose, aspect: f32) -> Self {
        Self {
            pose,
            aspect: if aspect.is_finite() && aspect > 0.0 {
                aspect
            } else {
                1.0
            },
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// World to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.pose.rotation, self.pose.position).inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn eye(&self) -> Vec3 {
        self.pose.position
    }
}

/// Uniform block of `scene.wgsl`. Layout must match the shader's `Scene` struct.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub inv_view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub backdrop: [f32; 4],
    /// x: progress, y: smoothed progress, z: phase fraction, w: time in seconds
    pub progress: [f32; 4],
}

impl SceneUniforms {
    pub fn new(
        camera: &Camera,
        snapshot: &Snapshot,
        phase_count: usize,
        backdrop: [f32; 3],
        time: f32,
    ) -> Self {
        let phase_fraction = if phase_count > 1 {
            snapshot.phase.0 as f32 / (phase_count - 1) as f32
        } else {
            1.0
        };
        let eye = camera.eye();
        Self {
            inv_view_proj: camera.view_projection().inverse().to_cols_array_2d(),
            eye: [eye.x, eye.y, eye.z, 1.0],
            backdrop: [backdrop[0], backdrop[1], backdrop[2], 1.0],
            progress: [
                snapshot.progress,
                snapshot.smoothed_progress,
                phase_fraction,
                time,
            ],
        }
    }
}

/// Backdrop colour that fades from the intro black to the stage colour once
/// the first phase is left, and back again on rewind.
#[derive(Clone, Debug)]
pub struct BackdropFade {
    from: [f32; 3],
    to: [f32; 3],
    elapsed: Duration,
    staged: bool,
}

impl Default for BackdropFade {
    fn default() -> Self {
        Self {
            from: BACKDROP_INTRO_RGB,
            to: BACKDROP_INTRO_RGB,
            elapsed: BACKDROP_FADE,
            staged: false,
        }
    }
}

impl BackdropFade {
    pub fn tick(&mut self, dt: Duration, phase: PhaseId) -> [f32; 3] {
        let staged = phase.0 > 0;
        if staged != self.staged {
            self.from = self.color();
            self.to = if staged {
                BACKDROP_STAGE_RGB
            } else {
                BACKDROP_INTRO_RGB
            };
            self.elapsed = Duration::ZERO;
            self.staged = staged;
        }
        self.elapsed = (self.elapsed + dt).min(BACKDROP_FADE);
        self.color()
    }

    pub fn color(&self) -> [f32; 3] {
        let t = Ease::Power2Out.apply(self.elapsed.as_secs_f32() / BACKDROP_FADE.as_secs_f32());
        std::array::from_fn(|i| self.from[i] + (self.to[i] - self.from[i]) * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_pose_looks_down_negative_z() {
        let cam = Camera::new(CameraPose::default(), 1.0);
        let p = cam.view_matrix().transform_point3(Vec3::new(0.0, 0.0, -5.0));
        assert!((p - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-5);
    }

    #[test]
    fn backdrop_reaches_stage_color_after_fade() {
        let mut fade = BackdropFade::default();
        assert_eq!(fade.tick(Duration::from_millis(16), PhaseId(0)), BACKDROP_INTRO_RGB);
        fade.tick(Duration::from_millis(16), PhaseId(1));
        let c = fade.tick(BACKDROP_FADE, PhaseId(1));
        for i in 0..3 {
            assert!((c[i] - BACKDROP_STAGE_RGB[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn uniforms_match_the_scene_shader() {
        // mat4 + three vec4s, 16-byte aligned for a uniform binding
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 112);
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
        let wgsl = crate::SCENE_WGSL;
        assert!(wgsl.contains("@group(0) @binding(0) var<uniform> scene: Scene;"));
        for entry in [crate::SCENE_VERTEX_ENTRY, crate::SCENE_FRAGMENT_ENTRY] {
            assert!(wgsl.contains(&format!("fn {entry}(")), "{entry}");
        }
    }
}
