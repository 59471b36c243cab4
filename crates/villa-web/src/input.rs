//! DOM event values to core input events.
//!
//! Pure functions over plain numbers so they can be tested off the browser;
//! `events.rs` pulls the values out of the `web_sys` event objects.

use villa_core::{DeltaMode, InputEvent, SequenceStatus};

use crate::constants::CUE_CLASS_PREFIX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    Start,
    Move,
    End,
}

#[inline]
pub fn wheel_event(delta_y: f64, delta_mode: u32) -> InputEvent {
    InputEvent::Wheel {
        delta_y: delta_y as f32,
        mode: DeltaMode::from_dom(delta_mode),
    }
}

#[inline]
pub fn touch_event(contact: Contact, id: i32, client_y: i32) -> InputEvent {
    let client_y = client_y as f32;
    match contact {
        Contact::Start => InputEvent::TouchStart { id, client_y },
        Contact::Move => InputEvent::TouchMove { id, client_y },
        Contact::End => InputEvent::TouchEnd { id },
    }
}

/// Pointer drags from mouse and pen only. Touch pointers are left to the
/// touch listeners so one finger does not count twice.
#[inline]
pub fn pointer_event(
    contact: Contact,
    pointer_type: &str,
    is_primary: bool,
    id: i32,
    client_y: i32,
) -> Option<InputEvent> {
    if pointer_type == "touch" || !is_primary {
        return None;
    }
    let client_y = client_y as f32;
    Some(match contact {
        Contact::Start => InputEvent::PointerDown { id, client_y },
        Contact::Move => InputEvent::PointerMove { id, client_y },
        Contact::End => InputEvent::PointerUp { id },
    })
}

/// Class added to a section when one of its bands signals `name`.
#[inline]
pub fn cue_class(name: &str) -> String {
    format!("{CUE_CLASS_PREFIX}{name}")
}

/// Value of the section's status attribute, for CSS hooks.
pub fn status_attr(status: SequenceStatus) -> &'static str {
    match status {
        SequenceStatus::Idle => "idle",
        SequenceStatus::Waiting => "waiting",
        SequenceStatus::Capturing => "capturing",
        SequenceStatus::Completing => "completing",
        SequenceStatus::Released => "released",
        SequenceStatus::RenderOnly => "render-only",
    }
}

/// Clamp a raw frame delta so a throttled tab does not jump whole phases.
#[inline]
pub fn clamp_frame_dt(dt: std::time::Duration, max: std::time::Duration) -> std::time::Duration {
    dt.min(max)
}
