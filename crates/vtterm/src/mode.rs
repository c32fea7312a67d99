//! Packed ANSI + DEC-private mode set and the scrolling region.

use bitflags::bitflags;

bitflags! {
    /// Terminal modes, set/reset via `SM`/`RM` (ANSI) and `CSI ? Pn h/l`
    /// (DEC-private). Both families share one bitset since no mode number
    /// collides once the private-marker bit is folded into the flag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Modes: u64 {
        /// ANSI mode 4: IRM insert/replace.
        const INSERT                = 1 << 0;
        /// ANSI mode 20: LNM, line feed/new line.
        const NEW_LINE              = 1 << 1;
        /// DEC ?1: cursor keys send application sequences.
        const APP_CURSOR_KEYS       = 1 << 2;
        /// DEC ?3: 132-column mode (DECCOLM).
        const COLUMN_132            = 1 << 3;
        /// DEC ?5: DECSCNM reverse video.
        const REVERSE_VIDEO         = 1 << 4;
        /// DEC ?6: DECOM origin mode.
        const ORIGIN                = 1 << 5;
        /// DEC ?7: DECAWM autowrap.
        const AUTOWRAP              = 1 << 6;
        /// DEC ?8: autorepeat.
        const AUTO_REPEAT           = 1 << 7;
        /// DEC ?12: cursor blink.
        const CURSOR_BLINK          = 1 << 8;
        /// DEC ?25: DECTCEM cursor visible.
        const CURSOR_VISIBLE        = 1 << 9;
        /// DEC ?45: reverse-wraparound.
        const REVERSE_WRAP          = 1 << 10;
        /// DEC ?47: alternate screen (legacy, no cursor save).
        const ALT_SCREEN_LEGACY     = 1 << 11;
        /// DEC ?66: application keypad (DECKPAM / DECNKM companion).
        const APP_KEYPAD            = 1 << 12;
        /// DEC ?69: DECSLRM left/right margin mode enabled.
        const LEFT_RIGHT_MARGIN     = 1 << 13;
        /// DEC ?1000: X10/VT200 mouse button-press reporting.
        const MOUSE_X10             = 1 << 14;
        /// DEC ?1002: button-event (drag) mouse reporting.
        const MOUSE_BUTTON_EVENT    = 1 << 15;
        /// DEC ?1003: any-event mouse reporting.
        const MOUSE_ANY_EVENT       = 1 << 16;
        /// DEC ?1005: UTF-8 mouse coordinate encoding.
        const MOUSE_UTF8            = 1 << 17;
        /// DEC ?1006: SGR mouse coordinate encoding.
        const MOUSE_SGR             = 1 << 18;
        /// DEC ?1015: urxvt mouse coordinate encoding.
        const MOUSE_URXVT           = 1 << 19;
        /// DEC ?1047: alternate screen (legacy, clears on leave).
        const ALT_SCREEN_1047       = 1 << 20;
        /// DEC ?1048: save/restore cursor alone.
        const SAVE_CURSOR           = 1 << 21;
        /// DEC ?1049: alternate screen + cursor save + clear-on-enter.
        const ALT_SCREEN_1049       = 1 << 22;
        /// DEC ?2004: bracketed paste.
        const BRACKETED_PASTE       = 1 << 23;
        /// DEC ?2026: synchronized output (begin/end atomic update).
        const SYNCHRONIZED_OUTPUT   = 1 << 24;
    }
}

impl Default for Modes {
    fn default() -> Self {
        Modes::AUTOWRAP | Modes::CURSOR_VISIBLE | Modes::AUTO_REPEAT
    }
}

impl Modes {
    /// Does any of the three alternate-screen modes select the alt screen?
    pub fn alt_screen_active(self) -> bool {
        self.intersects(Modes::ALT_SCREEN_LEGACY | Modes::ALT_SCREEN_1047 | Modes::ALT_SCREEN_1049)
    }
}

/// Mouse event-reporting protocol, derived from whichever `MOUSE_*`
/// tracking mode is enabled (last one set wins, per xterm behavior).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseEvent {
    #[default]
    Off,
    X10,
    ButtonEvent,
    AnyEvent,
}

/// Mouse coordinate encoding, derived from whichever `MOUSE_*` format mode
/// is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseFormat {
    #[default]
    Legacy,
    Utf8,
    Sgr,
    Urxvt,
}

impl Modes {
    pub fn mouse_event(self) -> MouseEvent {
        if self.contains(Modes::MOUSE_ANY_EVENT) {
            MouseEvent::AnyEvent
        } else if self.contains(Modes::MOUSE_BUTTON_EVENT) {
            MouseEvent::ButtonEvent
        } else if self.contains(Modes::MOUSE_X10) {
            MouseEvent::X10
        } else {
            MouseEvent::Off
        }
    }

    pub fn mouse_format(self) -> MouseFormat {
        if self.contains(Modes::MOUSE_SGR) {
            MouseFormat::Sgr
        } else if self.contains(Modes::MOUSE_URXVT) {
            MouseFormat::Urxvt
        } else if self.contains(Modes::MOUSE_UTF8) {
            MouseFormat::Utf8
        } else {
            MouseFormat::Legacy
        }
    }
}

/// DECSTBM/DECSLRM scrolling region, inclusive origin-0 bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollingRegion {
    pub top: u16,
    pub bottom: u16,
    pub left: u16,
    pub right: u16,
}

impl ScrollingRegion {
    pub fn full(cols: u16, rows: u16) -> Self {
        Self {
            top: 0,
            bottom: rows.saturating_sub(1),
            left: 0,
            right: cols.saturating_sub(1),
        }
    }

    pub fn is_full_width(&self, cols: u16) -> bool {
        self.left == 0 && self.right + 1 >= cols
    }

    pub fn is_full(&self, cols: u16, rows: u16) -> bool {
        self.top == 0 && self.bottom + 1 >= rows && self.is_full_width(cols)
    }
}
