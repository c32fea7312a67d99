//! Cursor position, pen state (SGR-derived), and DECSC/DECRC save slot.

use vtgrid::{HyperlinkRef, StyleRef};

use crate::charset::CharsetState;
use crate::mode::Modes;

/// Cursor shape selected via DECSCUSR (`CSI Ps SP q`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CursorShape {
    #[default]
    BlinkBlock,
    SteadyBlock,
    BlinkUnderline,
    SteadyUnderline,
    BlinkBar,
    SteadyBar,
}

impl CursorShape {
    pub fn from_decscusr(param: u16) -> Option<Self> {
        match param {
            0 | 1 => Some(CursorShape::BlinkBlock),
            2 => Some(CursorShape::SteadyBlock),
            3 => Some(CursorShape::BlinkUnderline),
            4 => Some(CursorShape::SteadyUnderline),
            5 => Some(CursorShape::BlinkBar),
            6 => Some(CursorShape::SteadyBar),
            _ => None,
        }
    }
}

/// The live cursor: position plus the "pen" (style/hyperlink/protected)
/// stamped onto newly printed cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub x: u16,
    pub y: u16,
    pub style: Option<StyleRef>,
    pub hyperlink: Option<HyperlinkRef>,
    pub protected: bool,
    pub shape: CursorShape,
    /// "Last column flag" (LCF): set instead of wrapping immediately when
    /// a glyph lands exactly on the right margin, per VT100 semantics.
    /// Consumed (and cleared) the next time a glyph is printed.
    pub pending_wrap: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            style: None,
            hyperlink: None,
            protected: false,
            shape: CursorShape::default(),
            pending_wrap: false,
        }
    }
}

/// Snapshot saved by DECSC (`ESC 7`) / `CSI s`, restored by DECRC
/// (`ESC 8`) / `CSI u`. Captures everything the terminfo-level contract
/// requires surviving a save/restore round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCursor {
    pub cursor: Cursor,
    pub charset: CharsetState,
    pub modes: Modes,
}
