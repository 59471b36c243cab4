#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use villa_core::{Director, NullHost, ProgressSource, ScrollHost};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod host;
mod input;
mod render;

use constants::{CANVAS_ID, SECTIONS};

/// The director is shared by the frame loop and the page listeners.
pub(crate) type SharedDirector = Rc<RefCell<Director>>;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn scroll_host(window: &web::Window) -> Box<dyn ScrollHost> {
    match host::WebScrollHost::new(window) {
        Some(h) => Box::new(h),
        None => Box::new(NullHost),
    }
}

/// Mount a sequence for every known section present on the page.
fn mount_sections(
    window: &web::Window,
    document: &web::Document,
    director: &SharedDirector,
) -> (Vec<frame::SectionBinding>, Vec<events::SequenceListeners>) {
    let mut sections = Vec::new();
    let mut listeners = Vec::new();
    for (section_id, preset) in SECTIONS {
        let Some(element) = document.get_element_by_id(section_id) else {
            log::info!("[seq] no #{} on this page, skipping", section_id);
            continue;
        };
        let config = preset();
        let pin_distance_vh = match config.source {
            ProgressSource::ScrollLinked { pin_distance_vh } => Some(pin_distance_vh),
            ProgressSource::Captured => None,
        };
        let captured = config.is_captured();
        let id = match director.borrow_mut().mount(config) {
            Ok(id) => id,
            Err(e) => {
                log::error!("[seq] #{} rejected: {}", section_id, e);
                continue;
            }
        };
        if captured {
            listeners.push(events::wire_sequence_input(window, director, id));
        }
        sections.push(frame::SectionBinding {
            id,
            element,
            pin_distance_vh,
        });
    }
    (sections, listeners)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("villa-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let director: SharedDirector = Rc::new(RefCell::new(Director::new(scroll_host(&window))));
    let (sections, listeners) = mount_sections(&window, &document, &director);
    if sections.is_empty() {
        log::warn!("[seq] no sequenced sections found");
        return Ok(());
    }
    events::wire_pagehide(&window, director.clone(), Rc::new(RefCell::new(listeners)));

    let mut frame_ctx = frame::FrameContext::new(window.clone(), director, sections);

    // The backdrop is optional; sequencing runs without it.
    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok());
    if let Some(canvas) = canvas {
        // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
        wire_canvas_resize(&canvas);
        frame_ctx.gpu = frame::init_gpu(&canvas).await;
        frame_ctx.canvas = Some(canvas);
    } else {
        log::info!("[gpu] no #{} canvas, rendering disabled", CANVAS_ID);
    }

    frame::start_loop(Rc::new(RefCell::new(frame_ctx)));
    Ok(())
}
