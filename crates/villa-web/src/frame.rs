use std::cell::RefCell;
use std::rc::Rc;

use instant::Instant;
use villa_core::{
    scroll_linked_progress, BackdropFade, Camera, PhaseId, SceneUniforms, SequenceEvent,
    SequenceId,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::{MAX_FRAME_DT, PHASE_ATTR, STATUS_ATTR};
use crate::{dom, input, render, SharedDirector};

/// A mounted sequence and the page section it animates.
pub struct SectionBinding {
    pub id: SequenceId,
    pub element: web::Element,
    /// `Some` for sections whose progress follows page scroll.
    pub pin_distance_vh: Option<f32>,
}

pub struct FrameContext<'a> {
    pub window: web::Window,
    pub director: SharedDirector,
    pub sections: Vec<SectionBinding>,
    pub canvas: Option<web::HtmlCanvasElement>,
    pub gpu: Option<render::GpuState<'a>>,
    pub backdrop: BackdropFade,
    pub last_instant: Instant,
    pub elapsed: f32,
    pub events: Vec<SequenceEvent>,
}

impl<'a> FrameContext<'a> {
    pub fn new(window: web::Window, director: SharedDirector, sections: Vec<SectionBinding>) -> Self {
        Self {
            window,
            director,
            sections,
            canvas: None,
            gpu: None,
            backdrop: BackdropFade::default(),
            last_instant: Instant::now(),
            elapsed: 0.0,
            events: Vec::new(),
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = input::clamp_frame_dt(now - self.last_instant, MAX_FRAME_DT);
        self.last_instant = now;
        self.elapsed += dt.as_secs_f32();

        let viewport_h = dom::viewport_height(&self.window);
        self.events.clear();
        {
            let Ok(mut director) = self.director.try_borrow_mut() else {
                return;
            };
            if viewport_h > 0.0 {
                director.set_page_height(viewport_h);
                for section in &self.sections {
                    if let Some(pin) = section.pin_distance_vh {
                        let top = section.element.get_bounding_client_rect().top() as f32;
                        director.feed_progress(
                            section.id,
                            scroll_linked_progress(top, viewport_h, pin),
                        );
                    }
                }
            }
            director.tick(dt, &mut self.events);
        }

        self.reflect_events();
        self.render(dt);
    }

    fn section(&self, id: SequenceId) -> Option<&SectionBinding> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Mirror sequence state onto the DOM so CSS and page scripts can react.
    fn reflect_events(&self) {
        let director = self.director.borrow();
        for event in &self.events {
            match *event {
                SequenceEvent::PhaseChanged { id, to, .. } => {
                    if let (Some(section), Some(seq)) = (self.section(id), director.sequence(id)) {
                        let name = seq.config().phase_bands.get(to.0).map_or("", |b| b.name);
                        dom::set_attr(&section.element, PHASE_ATTR, name);
                    }
                }
                SequenceEvent::Signal { id, name } => {
                    log::info!("[seq] {:?} signal {}", id, name);
                    if let Some(section) = self.section(id) {
                        _ = section.element.class_list().add_1(&input::cue_class(name));
                    }
                }
                SequenceEvent::Completed { id, scroll_to } => {
                    log::info!("[seq] {:?} complete, handing off to {:?}", id, scroll_to);
                }
                _ => {}
            }
            if let Some(id) = status_event_id(event) {
                if let (Some(section), Some(snap)) = (self.section(id), director.snapshot(id)) {
                    dom::set_attr(&section.element, STATUS_ATTR, input::status_attr(snap.status));
                }
            }
        }
    }

    fn render(&mut self, dt: std::time::Duration) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let director = self.director.borrow();
        let Some((index, snap)) = director.focus() else {
            return;
        };
        // the intro colour belongs to the first section only
        let backdrop_phase = if index == 0 { snap.phase } else { PhaseId(1) };
        let backdrop = self.backdrop.tick(dt, backdrop_phase);
        let phase_count = director
            .sequence(snap.id)
            .map_or(1, |s| s.config().phase_bands.len());

        if let Some(canvas) = &self.canvas {
            gpu.resize_if_needed(canvas.width(), canvas.height());
        }
        let camera = Camera::new(snap.camera, gpu.aspect());
        let uniforms = SceneUniforms::new(&camera, snap, phase_count, backdrop, self.elapsed);
        match gpu.render(&uniforms) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(e) => log::error!("[gpu] render error: {:?}", e),
        }
    }
}

fn status_event_id(event: &SequenceEvent) -> Option<SequenceId> {
    match *event {
        SequenceEvent::Activated { id }
        | SequenceEvent::Queued { id, .. }
        | SequenceEvent::Completed { id, .. }
        | SequenceEvent::Released { id, .. }
        | SequenceEvent::RenderOnly { id } => Some(id),
        _ => None,
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("[gpu] WebGPU init error: {:?}", e);
            None
        }
    }
}

type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn request_frame(window: &web::Window, tick: &FrameClosure) {
    if let Some(closure) = tick.borrow().as_ref() {
        _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: FrameClosure = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            request_frame(&w, &tick_clone);
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        request_frame(&w, &tick);
    }
}
