//! Construction-time configuration for a [`crate::Terminal`].

use vtcolor::Rgb8;

/// Initial sizing, palette and feature-gate options for a new terminal.
///
/// Mirrors the configuration surface described for the core: everything
/// here is read once at construction and has a sensible default, so most
/// callers only override the fields they care about.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerminalOptions {
    /// Active area width in columns. Must be at least 1.
    pub cols: u16,
    /// Active area height in rows. Must be at least 1.
    pub rows: u16,
    /// Scrollback byte budget across both screens. `0` disables history.
    pub max_scrollback: usize,
    /// Base 16 colors the 256-color palette is generated from.
    pub default_palette: [Rgb8; 16],
    pub default_fg: Rgb8,
    pub default_bg: Rgb8,
    pub default_cursor_color: Rgb8,
    /// Gate kitty graphics APC bookkeeping.
    pub enable_kitty_graphics: bool,
    /// Gate the kitty keyboard protocol's `CSI u` forms.
    pub enable_kitty_keyboard: bool,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 24,
            max_scrollback: 4 * 1024 * 1024,
            default_palette: vtcolor::DEFAULT_BASE16,
            default_fg: vtcolor::DEFAULT_FG,
            default_bg: vtcolor::DEFAULT_BG,
            default_cursor_color: vtcolor::DEFAULT_CURSOR,
            enable_kitty_graphics: false,
            enable_kitty_keyboard: false,
        }
    }
}
