use std::time::Duration;

// Shared sequencing and camera tuning constants used by both web and native frontends.

// Input
pub const DEFAULT_SENSITIVITY: f32 = 0.0016; // progress units per wheel pixel
pub const DEFAULT_TOLERANCE_PX: f32 = 4.0; // drag travel ignored before a gesture counts
pub const WHEEL_LINE_HEIGHT_PX: f32 = 16.0; // deltaMode == DOM_DELTA_LINE

// Progress
pub const DEFAULT_EASE: f32 = 0.10; // per-tick smoothing of progress -> anim
pub const DEFAULT_REVERSE_DAMPING: f32 = 0.3; // backward input weight, 0 = ignore, 1 = symmetric
pub const PROGRESS_SNAP_EPSILON: f32 = 1e-5; // accumulated sums this close to the threshold saturate
pub const SMOOTHER_SETTLE_EPSILON: f32 = 1e-4; // anim snaps onto progress below this gap

// Camera
pub const DEFAULT_CAMERA_EASE: f32 = 0.08; // per-tick lerp/slerp factor of the rig
pub const DEFAULT_KEYFRAME_DURATION: Duration = Duration::from_millis(900);

// Handoff / lock
pub const DEFAULT_HANDOFF_SETTLE: Duration = Duration::from_millis(800); // matches the scroll-to tween
pub const LOCK_WATCHDOG: Duration = Duration::from_secs(3); // max time a lock may stay Completing

// Render layer
pub const BACKDROP_FADE: Duration = Duration::from_millis(800);
pub const BACKDROP_INTRO_RGB: [f32; 3] = [0.0, 0.0, 0.0];
pub const BACKDROP_STAGE_RGB: [f32; 3] = [0.961, 0.941, 0.902]; // #F5F0E6
pub const CAMERA_FOVY_DEG: f32 = 60.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;
