//! Page listeners that feed captured sequences.
//!
//! Listeners go on the window with `passive: false` so a consumed wheel or
//! touch move can cancel native scrolling. They are held per sequence and
//! removed when the `SequenceListeners` value is dropped.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use villa_core::{InputDisposition, InputEvent, SequenceId};
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::input::{self, Contact};
use crate::SharedDirector;

pub struct SequenceListeners {
    _listeners: Vec<EventListener>,
}

fn non_passive(
    target: &web::EventTarget,
    kind: &'static str,
    callback: impl FnMut(&web::Event) + 'static,
) -> EventListener {
    EventListener::new_with_options(
        target,
        kind,
        EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: false,
        },
        callback,
    )
}

// Listener callbacks never run inside the frame tick, but a re-entrant
// dispatch (e.g. from a synchronous scroll) must not panic either.
fn dispatch(director: &SharedDirector, id: SequenceId, event: &InputEvent) -> InputDisposition {
    match director.try_borrow_mut() {
        Ok(mut d) => d.dispatch(id, event),
        Err(_) => InputDisposition::PassThrough,
    }
}

fn cancel(event: &web::Event) {
    if event.cancelable() {
        event.prevent_default();
    }
}

pub fn wire_sequence_input(
    window: &web::Window,
    director: &SharedDirector,
    id: SequenceId,
) -> SequenceListeners {
    let target: &web::EventTarget = window.as_ref();
    let mut listeners = Vec::with_capacity(8);

    let d = director.clone();
    listeners.push(non_passive(target, "wheel", move |event| {
        let Some(event) = event.dyn_ref::<web::WheelEvent>() else {
            return;
        };
        let ev = input::wheel_event(event.delta_y(), event.delta_mode());
        if dispatch(&d, id, &ev) == InputDisposition::Consumed {
            cancel(event);
        }
    }));

    for (kind, contact) in [
        ("touchstart", Contact::Start),
        ("touchmove", Contact::Move),
        ("touchend", Contact::End),
        ("touchcancel", Contact::End),
    ] {
        let d = director.clone();
        listeners.push(non_passive(target, kind, move |event| {
            let Some(event) = event.dyn_ref::<web::TouchEvent>() else {
                return;
            };
            let touches = event.changed_touches();
            let mut consumed = false;
            for i in 0..touches.length() {
                let Some(touch) = touches.item(i) else {
                    continue;
                };
                let ev = input::touch_event(contact, touch.identifier(), touch.client_y());
                consumed |= dispatch(&d, id, &ev) == InputDisposition::Consumed;
            }
            // only moves scroll the page; cancelling starts would also kill taps
            if consumed && contact == Contact::Move {
                cancel(event);
            }
        }));
    }

    for (kind, contact) in [
        ("pointerdown", Contact::Start),
        ("pointermove", Contact::Move),
        ("pointerup", Contact::End),
        ("pointercancel", Contact::End),
    ] {
        let d = director.clone();
        listeners.push(EventListener::new(target, kind, move |event| {
            let Some(event) = event.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            if let Some(ev) = input::pointer_event(
                contact,
                &event.pointer_type(),
                event.is_primary(),
                event.pointer_id(),
                event.client_y(),
            ) {
                dispatch(&d, id, &ev);
            }
        }));
    }

    log::info!("[input] listening for {:?}", id);
    SequenceListeners {
        _listeners: listeners,
    }
}

/// Unmount every sequence when the page is hidden for good, releasing the
/// lock and unlocking the body before the page is frozen or cached.
pub fn wire_pagehide(
    window: &web::Window,
    director: SharedDirector,
    listeners: Rc<RefCell<Vec<SequenceListeners>>>,
) {
    EventListener::new(window, "pagehide", move |_| {
        listeners.borrow_mut().clear();
        let Ok(mut d) = director.try_borrow_mut() else {
            return;
        };
        for id in d.ids().to_vec() {
            d.unmount(id);
        }
        log::info!("[seq] page hidden, all sequences unmounted");
    })
    .forget();
}
