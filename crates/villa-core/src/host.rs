//! Seam between the sequencer and the page it scrolls.

/// Page-scroll environment the [`Director`](crate::Director) drives.
///
/// Implementations must tolerate repeated calls with the same value.
pub trait ScrollHost {
    /// `false` when the environment is missing (no window or document); the
    /// director then degrades every sequence to render-only mode.
    fn is_available(&self) -> bool;

    fn set_page_scroll_locked(&mut self, locked: bool);

    /// Begin a smooth scroll to `anchor` (a CSS selector such as `#villa-journey`).
    fn scroll_to_anchor(&mut self, anchor: &str);

    /// Whether the last requested scroll has finished.
    fn scroll_settled(&self) -> bool {
        true
    }
}

/// Host for contexts with no page at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullHost;

impl ScrollHost for NullHost {
    fn is_available(&self) -> bool {
        false
    }

    fn set_page_scroll_locked(&mut self, _locked: bool) {}

    fn scroll_to_anchor(&mut self, _anchor: &str) {}
}
