//! Text selection: a pair of pins plus a rectangular/block-mode flag.

use vtgrid::PinId;

/// An active selection, anchored at `start` and following the live cursor
/// at `end`. Both ends are [`PinId`]s so the selection tracks correctly
/// across scrollback eviction and column reflow; a `garbage` pin (see
/// [`vtgrid::Pin`]) means the selection should be cleared by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: PinId,
    pub end: PinId,
    /// Block/rectangular selection (column range applies to every row
    /// between `start.y` and `end.y`) rather than stream selection.
    pub rectangular: bool,
}
