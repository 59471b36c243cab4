//! Input capture: device events in, signed sensitivity-scaled deltas out.
//!
//! Wheel deltas keep the DOM sign convention (positive `deltaY` moves the
//! sequence forward). Touch and pointer drags are converted to the same
//! convention from successive Y positions of the primary contact: moving
//! the finger up the screen advances, like native scrolling does.

use smallvec::SmallVec;

use crate::constants::{DEFAULT_TOLERANCE_PX, WHEEL_LINE_HEIGHT_PX};

/// Deltas captured since the last tick, in arrival order.
pub type PendingDeltas = SmallVec<[f32; 4]>;

/// Unit of a wheel event's `deltaY`, mirroring `WheelEvent.deltaMode`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl DeltaMode {
    #[inline]
    pub fn from_dom(mode: u32) -> Self {
        match mode {
            1 => DeltaMode::Line,
            2 => DeltaMode::Page,
            _ => DeltaMode::Pixel,
        }
    }
}

/// Host-neutral input event. Hosts translate their native events into these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Wheel { delta_y: f32, mode: DeltaMode },
    TouchStart { id: i32, client_y: f32 },
    TouchMove { id: i32, client_y: f32 },
    TouchEnd { id: i32 },
    PointerDown { id: i32, client_y: f32 },
    PointerMove { id: i32, client_y: f32 },
    PointerUp { id: i32 },
}

/// Convert a wheel delta to pixels.
#[inline]
pub fn wheel_delta_px(delta_y: f32, mode: DeltaMode, page_height_px: f32) -> f32 {
    match mode {
        DeltaMode::Pixel => delta_y,
        DeltaMode::Line => delta_y * WHEEL_LINE_HEIGHT_PX,
        DeltaMode::Page => delta_y * page_height_px,
    }
}

#[derive(Clone, Copy, Debug)]
struct Drag {
    id: i32,
    last_y: f32,
    // travel buffered while the drag is still inside the tolerance window
    buffered: f32,
    engaged: bool,
}

impl Drag {
    fn begin(id: i32, client_y: f32) -> Self {
        Self {
            id,
            last_y: client_y,
            buffered: 0.0,
            engaged: false,
        }
    }

    fn advance(&mut self, client_y: f32, tolerance_px: f32) -> f32 {
        let step = self.last_y - client_y;
        self.last_y = client_y;
        if self.engaged {
            return step;
        }
        self.buffered += step;
        if self.buffered.abs() >= tolerance_px {
            self.engaged = true;
            std::mem::take(&mut self.buffered)
        } else {
            0.0
        }
    }
}

/// Per-sequence input front: inert unless the sequence owns input.
#[derive(Clone, Debug)]
pub struct InputCapture {
    sensitivity: f32,
    tolerance_px: f32,
    page_height_px: f32,
    active: bool,
    touch: Option<Drag>,
    pointer: Option<Drag>,
    // consecutive same-sign deltas share one slot
    pending: PendingDeltas,
}

impl Default for InputCapture {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_SENSITIVITY, DEFAULT_TOLERANCE_PX)
    }
}

impl InputCapture {
    pub fn new(sensitivity: f32, tolerance_px: f32) -> Self {
        Self {
            sensitivity,
            tolerance_px,
            page_height_px: 800.0,
            active: false,
            touch: None,
            pointer: None,
            pending: PendingDeltas::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Stop intercepting; in-flight drags and undrained deltas are discarded.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.touch = None;
        self.pointer = None;
        self.pending.clear();
    }

    /// Viewport height used to scale page-mode wheel deltas.
    pub fn set_page_height(&mut self, px: f32) {
        if px.is_finite() && px > 0.0 {
            self.page_height_px = px;
        }
    }

    /// Signed, sensitivity-scaled delta for one event, also queued for the next tick.
    ///
    /// Returns 0 while inactive and for malformed (non-finite) events.
    pub fn capture_delta(&mut self, event: &InputEvent) -> f32 {
        if !self.active {
            return 0.0;
        }
        let raw = self.raw_delta_px(event);
        if !raw.is_finite() {
            return 0.0;
        }
        let delta = raw * self.sensitivity;
        self.queue(delta);
        delta
    }

    /// Drain everything captured since the last tick, oldest first.
    ///
    /// Direction changes stay separate entries so the accumulator can clamp
    /// and damp each one in order; same-direction runs are pre-summed.
    pub fn take_pending(&mut self) -> PendingDeltas {
        std::mem::take(&mut self.pending)
    }

    fn queue(&mut self, delta: f32) {
        if delta == 0.0 {
            return;
        }
        match self.pending.last_mut() {
            Some(last) if (*last < 0.0) == (delta < 0.0) => *last += delta,
            _ => self.pending.push(delta),
        }
    }

    fn raw_delta_px(&mut self, event: &InputEvent) -> f32 {
        let tolerance = self.tolerance_px;
        match *event {
            InputEvent::Wheel { delta_y, mode } => {
                wheel_delta_px(delta_y, mode, self.page_height_px)
            }
            InputEvent::TouchStart { id, client_y } => {
                begin_drag(&mut self.touch, id, client_y);
                0.0
            }
            InputEvent::TouchMove { id, client_y } => {
                advance_drag(&mut self.touch, id, client_y, tolerance)
            }
            InputEvent::TouchEnd { id } => {
                end_drag(&mut self.touch, id);
                0.0
            }
            InputEvent::PointerDown { id, client_y } => {
                begin_drag(&mut self.pointer, id, client_y);
                0.0
            }
            InputEvent::PointerMove { id, client_y } => {
                advance_drag(&mut self.pointer, id, client_y, tolerance)
            }
            InputEvent::PointerUp { id } => {
                end_drag(&mut self.pointer, id);
                0.0
            }
        }
    }
}

// Only the first contact is tracked; secondary touches never replace it.
fn begin_drag(slot: &mut Option<Drag>, id: i32, client_y: f32) {
    if slot.is_none() && client_y.is_finite() {
        *slot = Some(Drag::begin(id, client_y));
    }
}

fn advance_drag(slot: &mut Option<Drag>, id: i32, client_y: f32, tolerance_px: f32) -> f32 {
    match slot {
        Some(drag) if drag.id == id && client_y.is_finite() => drag.advance(client_y, tolerance_px),
        _ => 0.0,
    }
}

fn end_drag(slot: &mut Option<Drag>, id: i32) {
    if slot.is_some_and(|d| d.id == id) {
        *slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(sensitivity: f32, tolerance_px: f32) -> InputCapture {
        let mut c = InputCapture::new(sensitivity, tolerance_px);
        c.activate();
        c
    }

    #[test]
    fn inactive_capture_is_a_no_op() {
        let mut c = InputCapture::new(1.0, 0.0);
        let d = c.capture_delta(&InputEvent::Wheel {
            delta_y: 120.0,
            mode: DeltaMode::Pixel,
        });
        assert_eq!(d, 0.0);
        assert!(c.take_pending().is_empty());
    }

    #[test]
    fn touch_tolerance_buffers_then_releases_travel() {
        let mut c = active(1.0, 4.0);
        c.capture_delta(&InputEvent::TouchStart { id: 1, client_y: 100.0 });
        assert_eq!(c.capture_delta(&InputEvent::TouchMove { id: 1, client_y: 98.0 }), 0.0);
        // crosses the 4px window: the buffered 2px plus this 3px step
        assert_eq!(c.capture_delta(&InputEvent::TouchMove { id: 1, client_y: 95.0 }), 5.0);
        assert_eq!(c.capture_delta(&InputEvent::TouchMove { id: 1, client_y: 94.0 }), 1.0);
        assert_eq!(c.take_pending().as_slice(), &[6.0]);
    }

    #[test]
    fn deactivate_drops_pending_and_drags() {
        let mut c = active(1.0, 0.0);
        c.capture_delta(&InputEvent::Wheel {
            delta_y: 10.0,
            mode: DeltaMode::Pixel,
        });
        c.capture_delta(&InputEvent::PointerDown { id: 3, client_y: 50.0 });
        c.deactivate();
        assert!(c.take_pending().is_empty());
        c.activate();
        // the old pointer drag is gone, so a move without a down does nothing
        assert_eq!(c.capture_delta(&InputEvent::PointerMove { id: 3, client_y: 10.0 }), 0.0);
    }

    #[test]
    fn direction_changes_stay_ordered() {
        let mut c = active(1.0, 0.0);
        for dy in [40.0, 60.0, -30.0, -10.0, 5.0] {
            c.capture_delta(&InputEvent::Wheel {
                delta_y: dy,
                mode: DeltaMode::Pixel,
            });
        }
        assert_eq!(c.take_pending().as_slice(), &[100.0, -40.0, 5.0]);
        assert!(c.take_pending().is_empty());
    }
}
