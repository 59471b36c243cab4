/// Page wiring and frame-loop tuning for the browser front-end.
///
/// Sequencing constants live in `villa_core::constants`; this file only holds
/// what is specific to binding the sequencer to a DOM page.
use std::time::Duration;

use villa_core::{presets, SequenceConfig};

// DOM hooks
pub const CANVAS_ID: &str = "villa-canvas"; // optional WebGPU backdrop
pub const NO_SCROLL_CLASS: &str = "no-scroll"; // toggled on <body> while a sequence holds the page
pub const PHASE_ATTR: &str = "data-phase";
pub const STATUS_ATTR: &str = "data-sequence";
pub const CUE_CLASS_PREFIX: &str = "cue-"; // signal "explode" -> class "cue-explode"

// Sections in page order, each driven by one preset
pub const SECTIONS: [(&str, fn() -> SequenceConfig); 4] = [
    ("hero", presets::hero),
    ("villa-journey", presets::villa_journey),
    ("pool-dive", presets::pool_dive),
    ("services", presets::services),
];

// Frame loop
pub const MAX_FRAME_DT: Duration = Duration::from_millis(100); // background tabs resume with a huge dt
pub const SCROLL_SETTLE_FRAMES: u32 = 3; // polled scrollY must hold this long without `scrollend`
