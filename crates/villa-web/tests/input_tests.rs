// Host-side tests for DOM value conversions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
#[path = "../src/constants.rs"]
mod constants;
#[path = "../src/input.rs"]
mod input;

use std::time::Duration;

use input::*;
use villa_core::{DeltaMode, InputEvent, SequenceStatus};

#[test]
fn wheel_keeps_dom_sign_and_mode() {
    assert_eq!(
        wheel_event(-120.0, 0),
        InputEvent::Wheel {
            delta_y: -120.0,
            mode: DeltaMode::Pixel
        }
    );
    assert_eq!(
        wheel_event(3.0, 1),
        InputEvent::Wheel {
            delta_y: 3.0,
            mode: DeltaMode::Line
        }
    );
    assert!(matches!(
        wheel_event(1.0, 2),
        InputEvent::Wheel {
            mode: DeltaMode::Page,
            ..
        }
    ));
}

#[test]
fn touch_contacts_map_to_touch_events() {
    assert_eq!(
        touch_event(Contact::Start, 7, 300),
        InputEvent::TouchStart { id: 7, client_y: 300.0 }
    );
    assert_eq!(
        touch_event(Contact::Move, 7, 280),
        InputEvent::TouchMove { id: 7, client_y: 280.0 }
    );
    assert_eq!(touch_event(Contact::End, 7, 0), InputEvent::TouchEnd { id: 7 });
}

#[test]
fn touch_pointers_are_left_to_touch_listeners() {
    assert_eq!(pointer_event(Contact::Start, "touch", true, 1, 10), None);
    assert_eq!(pointer_event(Contact::Move, "mouse", false, 2, 10), None);
    assert_eq!(
        pointer_event(Contact::Start, "mouse", true, 1, 10),
        Some(InputEvent::PointerDown { id: 1, client_y: 10.0 })
    );
    assert_eq!(
        pointer_event(Contact::End, "pen", true, 4, 0),
        Some(InputEvent::PointerUp { id: 4 })
    );
}

#[test]
fn cue_classes_and_status_attributes() {
    assert_eq!(cue_class("explode"), "cue-explode");
    assert_eq!(status_attr(SequenceStatus::RenderOnly), "render-only");
    assert_eq!(status_attr(SequenceStatus::Capturing), "capturing");
}

#[test]
fn frame_dt_is_clamped() {
    let max = Duration::from_millis(100);
    assert_eq!(clamp_frame_dt(Duration::from_secs(5), max), max);
    assert_eq!(
        clamp_frame_dt(Duration::from_millis(16), max),
        Duration::from_millis(16)
    );
}
