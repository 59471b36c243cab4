pub mod camera;
pub mod config;
pub mod constants;
pub mod director;
pub mod error;
pub mod host;
pub mod input;
pub mod lock;
pub mod phase;
pub mod presets;
pub mod progress;
#[cfg(feature = "gpu")]
pub mod render;
pub mod sequence;
pub mod view;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub const SCENE_VERTEX_ENTRY: &str = "vs_fullscreen";
pub const SCENE_FRAGMENT_ENTRY: &str = "fs_scene";

pub use camera::*;
pub use config::*;
pub use constants::*;
pub use director::Director;
pub use error::{ConfigError, LockError};
pub use host::{NullHost, ScrollHost};
pub use input::*;
pub use lock::*;
pub use phase::{PhaseId, PhaseMachine, PhaseUpdate};
pub use progress::*;
pub use sequence::*;
pub use view::*;
