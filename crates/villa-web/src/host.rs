//! `ScrollHost` backed by the real page: body scroll lock, smooth
//! scroll-to-anchor and scroll-settle detection.

use std::cell::Cell;
use std::rc::Rc;

use gloo::events::EventListener;
use villa_core::ScrollHost;
use wasm_bindgen::JsValue;
use web_sys as web;

use crate::constants::{NO_SCROLL_CLASS, SCROLL_SETTLE_FRAMES};
use crate::dom;

#[derive(Default)]
struct ScrollWatch {
    settled: Cell<bool>,
    last_y: Cell<f64>,
    stable_frames: Cell<u32>,
}

pub struct WebScrollHost {
    window: web::Window,
    document: web::Document,
    body: web::HtmlElement,
    watch: Rc<ScrollWatch>,
    // `None` when the browser has no `scrollend`
    _scrollend: Option<EventListener>,
}

impl WebScrollHost {
    /// `None` when the page has no body to lock.
    pub fn new(window: &web::Window) -> Option<Self> {
        let document = window.document()?;
        let body = document.body()?;
        let watch = Rc::new(ScrollWatch::default());
        watch.settled.set(true);

        let has_scrollend =
            js_sys::Reflect::has(window, &JsValue::from_str("onscrollend")).unwrap_or(false);
        let scrollend = has_scrollend.then(|| {
            let watch = watch.clone();
            EventListener::new(window, "scrollend", move |_| watch.settled.set(true))
        });
        log::info!("[host] page scroll host ready (scrollend={})", has_scrollend);

        Some(Self {
            window: window.clone(),
            document,
            body,
            watch,
            _scrollend: scrollend,
        })
    }

    fn poll_settled(&self) -> bool {
        let y = dom::scroll_y(&self.window);
        if (y - self.watch.last_y.get()).abs() < 0.5 {
            let frames = self.watch.stable_frames.get().saturating_add(1);
            self.watch.stable_frames.set(frames);
            if frames >= SCROLL_SETTLE_FRAMES {
                self.watch.settled.set(true);
            }
        } else {
            self.watch.stable_frames.set(0);
        }
        self.watch.last_y.set(y);
        self.watch.settled.get()
    }
}

impl ScrollHost for WebScrollHost {
    fn is_available(&self) -> bool {
        true
    }

    fn set_page_scroll_locked(&mut self, locked: bool) {
        _ = self
            .body
            .class_list()
            .toggle_with_force(NO_SCROLL_CLASS, locked);
        let style = self.body.style();
        if locked {
            _ = style.set_property("overflow", "hidden");
        } else {
            _ = style.remove_property("overflow");
        }
    }

    fn scroll_to_anchor(&mut self, anchor: &str) {
        let target = match self.document.query_selector(anchor) {
            Ok(Some(el)) => el,
            Ok(None) => {
                log::warn!("[host] scroll target {} not found", anchor);
                return;
            }
            Err(e) => {
                log::warn!("[host] bad scroll target {}: {:?}", anchor, e);
                return;
            }
        };
        let opts = web::ScrollIntoViewOptions::new();
        opts.set_behavior(web::ScrollBehavior::Smooth);
        opts.set_block(web::ScrollLogicalPosition::Start);
        target.scroll_into_view_with_scroll_into_view_options(&opts);
        self.watch.settled.set(false);
        self.watch.stable_frames.set(0);
        self.watch.last_y.set(dom::scroll_y(&self.window));
    }

    fn scroll_settled(&self) -> bool {
        // a target already in view never fires `scrollend`, so polling backs it up
        self.watch.settled.get() || self.poll_settled()
    }
}
