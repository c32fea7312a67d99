//! The `Terminal` executor: owns both screens, modes, color state and the
//! byte [`Stream`] dispatcher, and implements every CSI/ESC/OSC/DCS/APC
//! operation by mutating that state.
//!
//! Response bytes (DSR/DA/OSC color-query echoes, DECRQSS) accumulate in
//! `response` and are drained by the caller after each [`Terminal::write`].

use tracing::{debug, trace, warn};
use vtansi::EncodeError;
use vtcolor::dynamic::{DynamicColorSlot, DynamicPalette};
use vtcolor::DynamicColors;
use vtgrid::{Cell, Color, Hyperlink, LineAttr, Style, UnderlineStyle};
use vtosc::Command;
use vtparser::{CsiParams, Intermediates};
use xparsecolor::XColor;

use crate::charset::{Charset, GSlot};
use crate::cursor::{CursorShape, SavedCursor};
use crate::error::ResourceError;
use crate::kitty::{GraphicsImage, GraphicsMedium, KittyKeyFlags};
use crate::mode::{Modes, ScrollingRegion};
use crate::options::TerminalOptions;
use crate::screen::Screen;
use crate::stream::Stream;

/// Which of the two screens is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKey {
    Primary,
    Alternate,
}

/// Primary and alternate screens, switched between by the `ALT_SCREEN_*`
/// modes.
pub struct ScreenSet {
    pub primary: Screen,
    pub alternate: Screen,
}

/// The terminal-wide emulation state: grid(s), cursor pen defaults are
/// carried per-screen (see [`crate::cursor::Cursor`]); this struct owns
/// everything that is shared across both screens or is process-global
/// (modes, palettes, the response buffer).
pub struct Terminal {
    screens: ScreenSet,
    active: ScreenKey,
    pub(crate) modes: Modes,
    focused: bool,
    /// `CSI > Pm m` modifyOtherKeys level (0, 1 or 2); input-encoding is
    /// out of scope, but the level is still tracked so DECRQSS-style
    /// queries and `CSI ? 1 u`-family kitty negotiation remain consistent.
    modify_other_keys: u8,
    palette: DynamicPalette,
    dynamic_colors: DynamicColors,
    pwd: Option<String>,
    /// Last printed codepoint, for `REP` (`CSI Pn b`).
    last_printed: Option<char>,
    response: Vec<u8>,
    options: TerminalOptions,
    stream: Stream,
}

/// OSC/DCS/APC payloads are bounded well below any reasonable terminal
/// response to cap per-sequence memory (§7).
pub(crate) const MAX_OSC_PAYLOAD: usize = 1024 * 1024;
pub(crate) const MAX_DCS_PAYLOAD: usize = 64 * 1024;
pub(crate) const MAX_APC_PAYLOAD: usize = 4 * 1024 * 1024;

impl Terminal {
    pub fn new(options: TerminalOptions) -> Self {
        let cols = options.cols.max(1);
        let rows = options.rows.max(1);
        let max_size = options.max_scrollback.max(1);
        let palette = DynamicPalette::new(options.default_palette, options.default_fg, options.default_bg);
        let dynamic_colors =
            DynamicColors::new(options.default_fg, options.default_bg, options.default_cursor_color);
        Self {
            screens: ScreenSet {
                primary: Screen::new(cols, rows, max_size),
                alternate: Screen::new(cols, rows, max_size),
            },
            active: ScreenKey::Primary,
            modes: Modes::default(),
            focused: true,
            modify_other_keys: 0,
            palette,
            dynamic_colors,
            pwd: None,
            last_printed: None,
            response: Vec::new(),
            options,
            stream: Stream::default(),
        }
    }

    pub fn options(&self) -> &TerminalOptions {
        &self.options
    }

    pub fn active_screen(&self) -> &Screen {
        match self.active {
            ScreenKey::Primary => &self.screens.primary,
            ScreenKey::Alternate => &self.screens.alternate,
        }
    }

    pub fn active_screen_mut(&mut self) -> &mut Screen {
        match self.active {
            ScreenKey::Primary => &mut self.screens.primary,
            ScreenKey::Alternate => &mut self.screens.alternate,
        }
    }

    pub fn screen(&self, key: ScreenKey) -> &Screen {
        match key {
            ScreenKey::Primary => &self.screens.primary,
            ScreenKey::Alternate => &self.screens.alternate,
        }
    }

    pub fn active_screen_key(&self) -> ScreenKey {
        self.active
    }

    pub fn modes(&self) -> Modes {
        self.modes
    }

    pub fn palette(&self) -> &DynamicPalette {
        &self.palette
    }

    pub fn dynamic_colors(&self) -> &DynamicColors {
        &self.dynamic_colors
    }

    pub fn working_directory(&self) -> Option<&str> {
        self.pwd.as_deref()
    }

    /// Bytes the host side should flush back to the pty (DSR/DA reports,
    /// OSC color-query echoes, DECRQSS). Draining resets the buffer.
    pub fn take_response(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.response)
    }

    /// Feed raw bytes (of a pty read, a test fixture, …) through the parser
    /// and apply every resulting action to this terminal's state.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), ResourceError> {
        let mut stream = std::mem::take(&mut self.stream);
        let result = stream.feed(bytes, self);
        self.stream = stream;
        result
    }

    fn respond(&mut self, f: impl FnOnce(&mut Vec<u8>) -> Result<usize, EncodeError>) {
        if let Err(err) = f(&mut self.response) {
            warn!(?err, "failed to encode terminal response");
        }
    }

    // ----- region bounds, used by print.rs too -----------------------------

    pub(crate) fn region_left(&self) -> u16 {
        self.active_screen().scrolling_region.left.min(self.active_screen().cols().saturating_sub(1))
    }

    pub(crate) fn region_right(&self) -> u16 {
        self.active_screen().scrolling_region.right.min(self.active_screen().cols().saturating_sub(1))
    }

    pub(crate) fn region_top(&self) -> u16 {
        self.active_screen().scrolling_region.top.min(self.active_screen().rows().saturating_sub(1))
    }

    pub(crate) fn region_bottom(&self) -> u16 {
        self.active_screen().scrolling_region.bottom.min(self.active_screen().rows().saturating_sub(1))
    }

    /// Advance the cursor one line, scrolling the region (or growing
    /// scrollback, for a full-screen region) if it's already at the
    /// bottom margin.
    pub(crate) fn line_feed_within_region(&mut self) {
        let top = self.region_top();
        let bottom = self.region_bottom();
        let cursor_y = self.active_screen().cursor.y;
        if cursor_y < bottom {
            self.active_screen_mut().cursor.y = cursor_y + 1;
            return;
        }
        self.scroll_up(1);
    }

    /// Scroll the active scrolling region up by `n` lines. A genuinely
    /// full-screen region grows scrollback; a DECSTBM/DECSLRM-restricted
    /// region shifts rows in place without touching history.
    pub(crate) fn scroll_up(&mut self, n: u16) {
        let cols = self.active_screen().cols();
        let rows = self.active_screen().rows();
        let region = self.active_screen().scrolling_region;
        if region.is_full(cols, rows) {
            for _ in 0..n {
                self.active_screen_mut().push_history_row();
            }
            return;
        }
        let (top, bottom, left, right) = (region.top, region.bottom, region.left, region.right);
        for _ in 0..n {
            self.active_screen_mut().scroll_up_region(top, bottom, left, right);
        }
    }

    pub(crate) fn scroll_down(&mut self, n: u16) {
        let region = self.active_screen().scrolling_region;
        let (top, bottom, left, right) = (region.top, region.bottom, region.left, region.right);
        for _ in 0..n {
            self.active_screen_mut().scroll_down_region(top, bottom, left, right);
        }
    }

    /// Cursor motion bounds: the scrolling region when DECOM (origin mode)
    /// is set, otherwise the full active area.
    fn bounds_y(&self) -> (u16, u16) {
        if self.modes.contains(Modes::ORIGIN) {
            (self.region_top(), self.region_bottom())
        } else {
            (0, self.active_screen().rows().saturating_sub(1))
        }
    }

    fn bounds_x(&self) -> (u16, u16) {
        if self.modes.contains(Modes::ORIGIN) {
            (self.region_left(), self.region_right())
        } else {
            (0, self.active_screen().cols().saturating_sub(1))
        }
    }

    fn clamp_cursor(&mut self) {
        let (min_y, max_y) = self.bounds_y();
        let (min_x, max_x) = self.bounds_x();
        let screen = self.active_screen_mut();
        screen.cursor.x = screen.cursor.x.clamp(min_x, max_x);
        screen.cursor.y = screen.cursor.y.clamp(min_y, max_y);
        screen.cursor.pending_wrap = false;
    }

    fn move_cursor_to(&mut self, y: u16, x: u16) {
        let origin = self.modes.contains(Modes::ORIGIN);
        let (base_y, base_x) = if origin { (self.region_top(), self.region_left()) } else { (0, 0) };
        let screen = self.active_screen_mut();
        screen.cursor.y = base_y.saturating_add(y);
        screen.cursor.x = base_x.saturating_add(x);
        screen.cursor.pending_wrap = false;
        self.clamp_cursor();
    }

    // ----- CSI dispatch -----------------------------------------------------

    pub(crate) fn handle_csi(
        &mut self,
        intermediates: &Intermediates,
        params: &CsiParams,
        final_byte: u8,
        private_marker: Option<u8>,
    ) {
        let p = |n: usize, default: u16| params.get_or(n, default);
        match (private_marker, intermediates.as_slice(), final_byte) {
            // --- Cursor motion ---
            (None, [], b'A') => self.cursor_up(p(0, 1).max(1)),
            (None, [], b'B') => self.cursor_down(p(0, 1).max(1)),
            (None, [], b'C') => self.cursor_forward(p(0, 1).max(1)),
            (None, [], b'D') => self.cursor_back(p(0, 1).max(1)),
            (None, [], b'E') => {
                self.cursor_down(p(0, 1).max(1));
                self.active_screen_mut().cursor.x = 0;
            }
            (None, [], b'F') => {
                self.cursor_up(p(0, 1).max(1));
                self.active_screen_mut().cursor.x = 0;
            }
            (None, [], b'G') | (None, [], b'`') => {
                let x = p(0, 1).saturating_sub(1);
                self.active_screen_mut().cursor.x = x;
                self.clamp_cursor();
            }
            (None, [], b'd') => {
                let y = p(0, 1).saturating_sub(1);
                self.move_cursor_to(y, self.active_screen().cursor.x.saturating_sub(if self.modes.contains(Modes::ORIGIN) { self.region_left() } else { 0 }));
            }
            (None, [], b'H') | (None, [], b'f') => {
                let y = p(0, 1).saturating_sub(1);
                let x = p(1, 1).saturating_sub(1);
                self.move_cursor_to(y, x);
            }
            // --- Erase ---
            (None, [], b'J') => self.erase_display(p(0, 0)),
            (None, [], b'K') => self.erase_line(p(0, 0)),
            // --- DECSED / DECSEL: selective erase, skips protected cells ---
            (Some(b'?'), [], b'J') => self.erase_display_selective(p(0, 0), true),
            (Some(b'?'), [], b'K') => self.erase_line_selective(p(0, 0), true),
            // --- Insert/delete ---
            (None, [], b'@') => self.insert_chars(p(0, 1).max(1)),
            (None, [], b'P') => self.delete_chars(p(0, 1).max(1)),
            (None, [], b'L') => self.insert_lines(p(0, 1).max(1)),
            (None, [], b'M') => self.delete_lines(p(0, 1).max(1)),
            (None, [], b'X') => self.erase_chars(p(0, 1).max(1)),
            // --- DECIC / DECDC: insert/delete column ---
            (None, [b'\''], b'}') => self.insert_columns(p(0, 1).max(1)),
            (None, [b'\''], b'~') => self.delete_columns(p(0, 1).max(1)),
            // --- Scroll ---
            (None, [], b'S') => self.scroll_up(p(0, 1).max(1)),
            (None, [], b'T') => self.scroll_down(p(0, 1).max(1)),
            // --- XTWINOPS ---
            (None, [], b't') => self.xtwinops(params),
            // --- Tabs ---
            (None, [], b'I') => self.cursor_tab_forward(p(0, 1).max(1)),
            (None, [], b'Z') => self.cursor_tab_backward(p(0, 1).max(1)),
            (None, [], b'g') => self.clear_tabstops(p(0, 0)),
            // --- SGR ---
            (None, [], b'm') => self.apply_sgr(params),
            // --- DECSTBM / DECSLRM / save-restore cursor ---
            (None, [], b'r') => self.decstbm(params),
            (None, [], b's') => {
                if self.modes.contains(Modes::LEFT_RIGHT_MARGIN) {
                    self.decslrm(params);
                } else {
                    self.save_cursor();
                }
            }
            (None, [], b'u') => self.restore_cursor(),
            // --- DECSCUSR ---
            (None, [b' '], b'q') => {
                if let Some(shape) = CursorShape::from_decscusr(p(0, 0)) {
                    self.active_screen_mut().cursor.shape = shape;
                }
            }
            // --- DECSCA ---
            (None, [b'"'], b'q') => {
                self.active_screen_mut().cursor.protected = p(0, 0) == 1 || p(0, 0) == 2;
            }
            // --- REP ---
            (None, [], b'b') => self.repeat_last_printed(p(0, 1).max(1)),
            // --- DSR / DA ---
            (None, [], b'n') => self.device_status_report(p(0, 0)),
            (Some(b'?'), [], b'n') => self.dec_device_status_report(p(0, 0)),
            (None, [], b'c') => self.primary_device_attributes(),
            (Some(b'>'), [], b'c') => self.secondary_device_attributes(),
            (Some(b'='), [], b'c') => self.tertiary_device_attributes(),
            // --- SM/RM (ANSI) ---
            (None, [], b'h') => self.set_ansi_mode(params, true),
            (None, [], b'l') => self.set_ansi_mode(params, false),
            // --- SM/RM (DEC private) ---
            (Some(b'?'), [], b'h') => self.set_dec_mode(params, true),
            (Some(b'?'), [], b'l') => self.set_dec_mode(params, false),
            // --- DECRQM ---
            (None, [b'$'], b'p') => self.report_ansi_mode(p(0, 0)),
            (Some(b'?'), [b'$'], b'p') => self.report_dec_mode(p(0, 0)),
            // --- Kitty keyboard protocol ---
            (Some(b'?'), [], b'u') => self.report_kitty_keyboard(),
            (Some(b'>'), [], b'u') => self.push_kitty_keyboard(params),
            (Some(b'<'), [], b'u') => self.pop_kitty_keyboard(p(0, 1)),
            (Some(b'='), [], b'u') => self.assign_kitty_keyboard(params),
            _ => {
                trace!(
                    ?private_marker,
                    ?intermediates,
                    final_byte = final_byte as char,
                    params = ?params.as_slice(),
                    "unhandled CSI sequence"
                );
            }
        }
    }

    fn cursor_up(&mut self, n: u16) {
        let (min_y, _) = self.bounds_y();
        let screen = self.active_screen_mut();
        screen.cursor.y = screen.cursor.y.saturating_sub(n).max(min_y);
        screen.cursor.pending_wrap = false;
    }

    fn cursor_down(&mut self, n: u16) {
        let (_, max_y) = self.bounds_y();
        let screen = self.active_screen_mut();
        screen.cursor.y = (screen.cursor.y + n).min(max_y);
        screen.cursor.pending_wrap = false;
    }

    fn cursor_forward(&mut self, n: u16) {
        let (_, max_x) = self.bounds_x();
        let screen = self.active_screen_mut();
        screen.cursor.x = (screen.cursor.x + n).min(max_x);
        screen.cursor.pending_wrap = false;
    }

    fn cursor_back(&mut self, n: u16) {
        let (min_x, _) = self.bounds_x();
        let screen = self.active_screen_mut();
        screen.cursor.x = screen.cursor.x.saturating_sub(n).max(min_x);
        screen.cursor.pending_wrap = false;
    }

    fn erase_display(&mut self, mode: u16) {
        self.erase_display_selective(mode, false);
    }

    /// `ED`/`DECSED`. `selective` is `DECSED`'s flavor: protected cells
    /// (`DECSCA`) are left untouched instead of cleared. `mode == 3`
    /// additionally prunes scrollback, matching `ED`'s xterm extension;
    /// `DECSED` never takes a `3` argument but clamping it here is
    /// harmless.
    fn erase_display_selective(&mut self, mode: u16, selective: bool) {
        let cols = self.active_screen().cols();
        let rows = self.active_screen().rows();
        let (y0, y1) = match mode {
            0 => (self.active_screen().cursor.y, rows.saturating_sub(1)),
            1 => (0, self.active_screen().cursor.y),
            _ => (0, rows.saturating_sub(1)),
        };
        for y in y0..=y1 {
            if mode == 0 && y == y0 {
                self.clear_row_range_selective(y, self.active_screen().cursor.x, cols.saturating_sub(1), selective);
            } else if mode == 1 && y == y1 {
                self.clear_row_range_selective(y, 0, self.active_screen().cursor.x, selective);
            } else {
                self.clear_row_range_selective(y, 0, cols.saturating_sub(1), selective);
            }
        }
        if mode >= 3 {
            // `CSI 3 J` additionally clears scrollback.
            let cols = self.active_screen().cols();
            let rows = self.active_screen().rows();
            let max_size = self.active_screen().pages().max_size();
            *self.active_screen_mut() = Screen::new(cols, rows, max_size);
        }
    }

    fn erase_line(&mut self, mode: u16) {
        self.erase_line_selective(mode, false);
    }

    /// `EL`/`DECSEL`, see [`Terminal::erase_display_selective`].
    fn erase_line_selective(&mut self, mode: u16, selective: bool) {
        let cols = self.active_screen().cols();
        let y = self.active_screen().cursor.y;
        let x = self.active_screen().cursor.x;
        match mode {
            0 => self.clear_row_range_selective(y, x, cols.saturating_sub(1), selective),
            1 => self.clear_row_range_selective(y, 0, x, selective),
            _ => self.clear_row_range_selective(y, 0, cols.saturating_sub(1), selective),
        }
    }

    fn clear_row_range(&mut self, y: u16, left: u16, right: u16) {
        self.clear_row_range_selective(y, left, right, false);
    }

    fn clear_row_range_selective(&mut self, y: u16, left: u16, right: u16, selective: bool) {
        if left > right {
            return;
        }
        let screen = self.active_screen_mut();
        let (node, local) = screen.pages().node_for_active_row(y);
        let page = screen.pages_mut().page_mut(node).expect("live");
        for x in left..=right {
            if selective && page.row(local).cell(x).protected {
                continue;
            }
            page.clear_cell(local, x);
        }
    }

    fn insert_chars(&mut self, n: u16) {
        let y = self.active_screen().cursor.y;
        let x = self.active_screen().cursor.x;
        let right = self.region_right();
        self.active_screen_mut().insert_chars(y, x, right, n);
    }

    fn delete_chars(&mut self, n: u16) {
        let y = self.active_screen().cursor.y;
        let x = self.active_screen().cursor.x;
        let right = self.region_right();
        self.active_screen_mut().delete_chars(y, x, right, n);
    }

    fn erase_chars(&mut self, n: u16) {
        let y = self.active_screen().cursor.y;
        let x = self.active_screen().cursor.x;
        let cols = self.active_screen().cols();
        let end = (x + n.max(1)).saturating_sub(1).min(cols.saturating_sub(1));
        self.clear_row_range(y, x, end);
    }

    fn insert_lines(&mut self, n: u16) {
        let y = self.active_screen().cursor.y;
        let bottom = self.region_bottom();
        if y < self.region_top() || y > bottom {
            return;
        }
        let (left, right) = (self.region_left(), self.region_right());
        for _ in 0..n {
            self.active_screen_mut().scroll_down_region(y, bottom, left, right);
        }
    }

    fn delete_lines(&mut self, n: u16) {
        let y = self.active_screen().cursor.y;
        let bottom = self.region_bottom();
        if y < self.region_top() || y > bottom {
            return;
        }
        let (left, right) = (self.region_left(), self.region_right());
        for _ in 0..n {
            self.active_screen_mut().scroll_up_region(y, bottom, left, right);
        }
    }

    fn cursor_tab_forward(&mut self, n: u16) {
        for _ in 0..n {
            let (node, _) = self.active_screen().pages().node_for_active_row(self.active_screen().cursor.y);
            let cols = self.active_screen().cols();
            let page = self.active_screen().pages().page(node).expect("live");
            let mut x = self.active_screen().cursor.x + 1;
            while x < cols && !page.is_tabstop(x) {
                x += 1;
            }
            self.active_screen_mut().cursor.x = x.min(cols.saturating_sub(1));
        }
    }

    fn cursor_tab_backward(&mut self, n: u16) {
        for _ in 0..n {
            let (node, _) = self.active_screen().pages().node_for_active_row(self.active_screen().cursor.y);
            let page = self.active_screen().pages().page(node).expect("live");
            let mut x = self.active_screen().cursor.x;
            while x > 0 && !page.is_tabstop(x - 1) {
                x -= 1;
            }
            self.active_screen_mut().cursor.x = x.saturating_sub(1);
        }
    }

    fn clear_tabstops(&mut self, mode: u16) {
        let y = self.active_screen().cursor.y;
        let (node, _) = self.active_screen().pages().node_for_active_row(y);
        let x = self.active_screen().cursor.x;
        let cols = self.active_screen().cols();
        let page = self.active_screen_mut().pages_mut().page_mut(node).expect("live");
        match mode {
            0 => page.set_tabstop(x, false),
            3 => {
                for col in 0..cols {
                    page.set_tabstop(col, false);
                }
            }
            _ => {}
        }
    }

    fn apply_sgr(&mut self, params: &CsiParams) {
        let screen = self.active_screen_mut();
        let (node, _) = screen.pages().node_for_active_row(screen.cursor.y);
        let mut style = match screen.cursor.style {
            Some(style_ref) => screen.pages().page(node).map(|page| *page.style(style_ref)).unwrap_or(Style::DEFAULT),
            None => Style::DEFAULT,
        };
        crate::sgr::apply_sgr(&mut style, params);
        let new_ref = screen.pages_mut().page_mut(node).expect("live").intern_style(style);
        screen.cursor.style = new_ref;
    }

    fn decstbm(&mut self, params: &CsiParams) {
        let rows = self.active_screen().rows();
        let top = params.get_or(0, 1).saturating_sub(1);
        let bottom = if params.get_or(1, 0) == 0 { rows.saturating_sub(1) } else { params.get_or(1, 0).saturating_sub(1) };
        if top >= bottom || bottom >= rows {
            return;
        }
        let screen = self.active_screen_mut();
        screen.scrolling_region.top = top;
        screen.scrolling_region.bottom = bottom;
        self.move_cursor_to(0, 0);
    }

    fn decslrm(&mut self, params: &CsiParams) {
        let cols = self.active_screen().cols();
        let left = params.get_or(0, 1).saturating_sub(1);
        let right = if params.get_or(1, 0) == 0 { cols.saturating_sub(1) } else { params.get_or(1, 0).saturating_sub(1) };
        if left >= right || right >= cols {
            return;
        }
        let screen = self.active_screen_mut();
        screen.scrolling_region.left = left;
        screen.scrolling_region.right = right;
        self.move_cursor_to(0, 0);
    }

    fn save_cursor(&mut self) {
        let screen = self.active_screen();
        let saved = SavedCursor {
            cursor: screen.cursor,
            charset: screen.charset,
            modes: self.modes,
        };
        self.active_screen_mut().saved_cursor = Some(saved);
    }

    fn restore_cursor(&mut self) {
        if let Some(saved) = self.active_screen().saved_cursor.clone() {
            let screen = self.active_screen_mut();
            screen.cursor = saved.cursor;
            screen.charset = saved.charset;
        }
    }

    fn repeat_last_printed(&mut self, n: u16) {
        let Some(cp) = self.last_printed else { return };
        for _ in 0..n {
            self.print_char(cp);
        }
    }

    fn device_status_report(&mut self, code: u16) {
        match code {
            5 => self.respond(|buf| vtansi::write_csi!(buf; "0n")),
            6 => {
                let origin = self.modes.contains(Modes::ORIGIN);
                let base = if origin { self.region_top() } else { 0 };
                let base_x = if origin { self.region_left() } else { 0 };
                let y = self.active_screen().cursor.y - base + 1;
                let x = self.active_screen().cursor.x - base_x + 1;
                self.respond(|buf| vtansi::write_csi!(buf; y, ";", x, "R"));
            }
            _ => {}
        }
    }

    fn dec_device_status_report(&mut self, code: u16) {
        match code {
            // Printer status: not ready.
            15 => self.respond(|buf| vtansi::write_csi!(buf; "?13n")),
            // UDK: locked.
            25 => self.respond(|buf| vtansi::write_csi!(buf; "?21n")),
            // Keyboard: ready, no dialect.
            26 => self.respond(|buf| vtansi::write_csi!(buf; "?27;1n")),
            _ => {}
        }
    }

    fn primary_device_attributes(&mut self) {
        // VT420 + ANSI color + rectangular editing extensions.
        self.respond(|buf| vtansi::write_csi!(buf; "?64;1;9;15;22c"));
    }

    fn secondary_device_attributes(&mut self) {
        self.respond(|buf| vtansi::write_csi!(buf; ">1;10;0c"));
    }

    fn tertiary_device_attributes(&mut self) {
        self.respond(|buf| vtansi::write_dcs!(buf; "!|00000000"));
    }

    fn report_kitty_keyboard(&mut self) {
        let flags = self.active_screen().kitty_keyboard.current().bits();
        self.respond(|buf| vtansi::write_csi!(buf; "?", flags, "u"));
    }

    fn push_kitty_keyboard(&mut self, params: &CsiParams) {
        let flags = KittyKeyFlags::from_bits_truncate(params.get_or(0, 0) as u8);
        self.active_screen_mut().kitty_keyboard.push(flags);
    }

    fn pop_kitty_keyboard(&mut self, count: u16) {
        self.active_screen_mut().kitty_keyboard.pop(count);
    }

    fn assign_kitty_keyboard(&mut self, params: &CsiParams) {
        let flags = KittyKeyFlags::from_bits_truncate(params.get_or(0, 0) as u8);
        let mode = params.get_or(1, 1);
        self.active_screen_mut().kitty_keyboard.assign(flags, mode);
    }

    /// `DECRQM`'s reply encoding: 0 unrecognized, 1 set, 2 reset
    /// (permanently set/reset, 3/4, are never reported — every mode this
    /// terminal tracks is user-settable).
    fn decrqm_value(state: Option<bool>) -> u16 {
        match state {
            None => 0,
            Some(true) => 1,
            Some(false) => 2,
        }
    }

    fn ansi_mode_state(&self, code: u16) -> Option<bool> {
        match code {
            4 => Some(self.modes.contains(Modes::INSERT)),
            20 => Some(self.modes.contains(Modes::NEW_LINE)),
            _ => None,
        }
    }

    fn dec_mode_state(&self, code: u16) -> Option<bool> {
        match code {
            1 => Some(self.modes.contains(Modes::APP_CURSOR_KEYS)),
            3 => Some(self.modes.contains(Modes::COLUMN_132)),
            5 => Some(self.modes.contains(Modes::REVERSE_VIDEO)),
            6 => Some(self.modes.contains(Modes::ORIGIN)),
            7 => Some(self.modes.contains(Modes::AUTOWRAP)),
            8 => Some(self.modes.contains(Modes::AUTO_REPEAT)),
            12 => Some(self.modes.contains(Modes::CURSOR_BLINK)),
            25 => Some(self.modes.contains(Modes::CURSOR_VISIBLE)),
            45 => Some(self.modes.contains(Modes::REVERSE_WRAP)),
            47 => Some(self.modes.contains(Modes::ALT_SCREEN_LEGACY)),
            66 => Some(self.modes.contains(Modes::APP_KEYPAD)),
            69 => Some(self.modes.contains(Modes::LEFT_RIGHT_MARGIN)),
            1000 => Some(self.modes.contains(Modes::MOUSE_X10)),
            1002 => Some(self.modes.contains(Modes::MOUSE_BUTTON_EVENT)),
            1003 => Some(self.modes.contains(Modes::MOUSE_ANY_EVENT)),
            1005 => Some(self.modes.contains(Modes::MOUSE_UTF8)),
            1006 => Some(self.modes.contains(Modes::MOUSE_SGR)),
            1015 => Some(self.modes.contains(Modes::MOUSE_URXVT)),
            1047 => Some(self.modes.contains(Modes::ALT_SCREEN_1047)),
            1048 => Some(self.modes.contains(Modes::SAVE_CURSOR)),
            1049 => Some(self.modes.contains(Modes::ALT_SCREEN_1049)),
            2004 => Some(self.modes.contains(Modes::BRACKETED_PASTE)),
            2026 => Some(self.modes.contains(Modes::SYNCHRONIZED_OUTPUT)),
            _ => None,
        }
    }

    fn report_ansi_mode(&mut self, code: u16) {
        let value = Self::decrqm_value(self.ansi_mode_state(code));
        self.respond(|buf| vtansi::write_csi!(buf; code, ";", value, "$y"));
    }

    fn report_dec_mode(&mut self, code: u16) {
        let value = Self::decrqm_value(self.dec_mode_state(code));
        self.respond(|buf| vtansi::write_csi!(buf; "?", code, ";", value, "$y"));
    }

    fn set_ansi_mode(&mut self, params: &CsiParams, enable: bool) {
        for &code in params.as_slice() {
            match code {
                4 => self.modes.set(Modes::INSERT, enable),
                20 => self.modes.set(Modes::NEW_LINE, enable),
                _ => {}
            }
        }
    }

    fn set_dec_mode(&mut self, params: &CsiParams, enable: bool) {
        for &code in params.as_slice() {
            match code {
                1 => self.modes.set(Modes::APP_CURSOR_KEYS, enable),
                3 => self.switch_column_mode(enable),
                5 => self.modes.set(Modes::REVERSE_VIDEO, enable),
                6 => self.modes.set(Modes::ORIGIN, enable),
                7 => self.modes.set(Modes::AUTOWRAP, enable),
                8 => self.modes.set(Modes::AUTO_REPEAT, enable),
                12 => self.modes.set(Modes::CURSOR_BLINK, enable),
                25 => self.modes.set(Modes::CURSOR_VISIBLE, enable),
                45 => self.modes.set(Modes::REVERSE_WRAP, enable),
                47 => self.switch_alt_screen(Modes::ALT_SCREEN_LEGACY, enable, false),
                66 => self.modes.set(Modes::APP_KEYPAD, enable),
                69 => self.modes.set(Modes::LEFT_RIGHT_MARGIN, enable),
                1000 => self.modes.set(Modes::MOUSE_X10, enable),
                1002 => self.modes.set(Modes::MOUSE_BUTTON_EVENT, enable),
                1003 => self.modes.set(Modes::MOUSE_ANY_EVENT, enable),
                1005 => self.modes.set(Modes::MOUSE_UTF8, enable),
                1006 => self.modes.set(Modes::MOUSE_SGR, enable),
                1015 => self.modes.set(Modes::MOUSE_URXVT, enable),
                1047 => self.switch_alt_screen(Modes::ALT_SCREEN_1047, enable, false),
                1048 => {
                    if enable {
                        self.save_cursor();
                    } else {
                        self.restore_cursor();
                    }
                    self.modes.set(Modes::SAVE_CURSOR, enable);
                }
                1049 => self.switch_alt_screen(Modes::ALT_SCREEN_1049, enable, true),
                2004 => self.modes.set(Modes::BRACKETED_PASTE, enable),
                2026 => self.modes.set(Modes::SYNCHRONIZED_OUTPUT, enable),
                _ => {}
            }
        }
    }

    fn switch_column_mode(&mut self, wide: bool) {
        self.modes.set(Modes::COLUMN_132, wide);
        let rows = self.active_screen().rows();
        let cols = if wide { 132 } else { 80 };
        self.resize(cols, rows);
        self.erase_display(2);
        self.move_cursor_to(0, 0);
    }

    /// `?1047`/`?1049`: switch to the alternate screen on set, primary on
    /// reset. `?1049` additionally saves/restores the cursor and clears the
    /// alternate screen on entry so it never shows stale content.
    fn switch_alt_screen(&mut self, flag: Modes, enable: bool, save_cursor: bool) {
        let already_alt = self.active == ScreenKey::Alternate;
        if enable && !already_alt {
            if save_cursor {
                self.save_cursor();
            }
            self.active = ScreenKey::Alternate;
            self.erase_display(2);
            self.move_cursor_to(0, 0);
        } else if !enable && already_alt {
            self.active = ScreenKey::Primary;
            if save_cursor {
                self.restore_cursor();
            }
        }
        self.modes.set(flag, enable);
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        for screen in [&mut self.screens.primary, &mut self.screens.alternate] {
            screen.pages_mut().resize_cols(cols);
            screen.pages_mut().set_active_rows(rows);
            screen.scrolling_region = ScrollingRegion::full(cols, rows);
        }
    }

    /// Resize both screens' active area (host window resize), reflowing
    /// history and clamping both cursors into the new bounds.
    pub fn resize_window(&mut self, cols: u16, rows: u16) {
        self.resize(cols.max(1), rows.max(1));
        self.clamp_cursor();
    }

    // ----- C0/C1 control dispatch --------------------------------------------

    /// A C0 (`0x00..=0x1f`, `0x7f`) or C1 (`0x80..=0x9f`) control byte
    /// reached in `ground` (i.e. not absorbed as part of a CSI/OSC/DCS/APC
    /// sequence). C1 codes are the single-byte equivalents of the 7-bit
    /// `ESC` forms handled in [`Terminal::handle_esc`].
    pub(crate) fn handle_execute(&mut self, byte: u8) {
        match byte {
            0x07 => trace!("bell"),
            0x08 => self.cursor_back(1),
            0x09 => self.cursor_tab_forward(1),
            // LF/VT/FF are all treated as line feed; LNM additionally
            // folds in a carriage return.
            0x0A | 0x0B | 0x0C => {
                self.line_feed_within_region();
                if self.modes.contains(Modes::NEW_LINE) {
                    self.active_screen_mut().cursor.x = self.region_left();
                }
            }
            0x0D => self.active_screen_mut().cursor.x = self.region_left(),
            0x0E => self.active_screen_mut().charset.gl = GSlot::G1,
            0x0F => self.active_screen_mut().charset.gl = GSlot::G0,
            0x84 => self.line_feed_within_region(), // IND
            0x85 => {
                // NEL
                self.line_feed_within_region();
                self.active_screen_mut().cursor.x = self.region_left();
            }
            0x88 => {
                // HTS
                let y = self.active_screen().cursor.y;
                let (node, _) = self.active_screen().pages().node_for_active_row(y);
                let x = self.active_screen().cursor.x;
                self.active_screen_mut().pages_mut().page_mut(node).expect("live").set_tabstop(x, true);
            }
            0x8D => self.reverse_index(), // RI
            _ => trace!(byte, "unhandled control byte"),
        }
    }

    // ----- ESC dispatch ------------------------------------------------------

    pub(crate) fn handle_esc(&mut self, intermediates: &Intermediates, final_byte: u8) {
        match (intermediates.as_slice(), final_byte) {
            ([b'('], final) => self.designate_charset(GSlot::G0, final),
            ([b')'], final) => self.designate_charset(GSlot::G1, final),
            ([b'*'], final) => self.designate_charset(GSlot::G2, final),
            ([b'+'], final) => self.designate_charset(GSlot::G3, final),
            ([b'#'], b'8') => self.decaln(),
            ([b'#'], b'3') => self.set_line_attr(LineAttr::DoubleHeightTop),
            ([b'#'], b'4') => self.set_line_attr(LineAttr::DoubleHeightBottom),
            ([b'#'], b'5') => self.set_line_attr(LineAttr::Single),
            ([b'#'], b'6') => self.set_line_attr(LineAttr::DoubleWidth),
            ([], b'D') => self.line_feed_within_region(),
            ([], b'M') => self.reverse_index(),
            ([], b'E') => {
                self.line_feed_within_region();
                self.active_screen_mut().cursor.x = self.region_left();
            }
            ([], b'c') => self.reset_to_initial_state(),
            ([], b'7') => self.save_cursor(),
            ([], b'8') => self.restore_cursor(),
            ([], b'=') => self.modes.insert(Modes::APP_KEYPAD),
            ([], b'>') => self.modes.remove(Modes::APP_KEYPAD),
            ([], b'N') => self.active_screen_mut().charset.single_shift = Some(GSlot::G2),
            ([], b'O') => self.active_screen_mut().charset.single_shift = Some(GSlot::G3),
            ([], b'H') => {
                let y = self.active_screen().cursor.y;
                let (node, _) = self.active_screen().pages().node_for_active_row(y);
                let x = self.active_screen().cursor.x;
                self.active_screen_mut().pages_mut().page_mut(node).expect("live").set_tabstop(x, true);
            }
            _ => {
                trace!(?intermediates, final_byte = final_byte as char, "unhandled ESC sequence");
            }
        }
    }

    /// `DECALN` (`ESC # 8`): fills the active area with `E` for screen
    /// alignment testing. Moves the cursor home and clears any scrolling
    /// region/margin selection, matching the VT100 behavior.
    fn decaln(&mut self) {
        let cols = self.active_screen().cols();
        let rows = self.active_screen().rows();
        for y in 0..rows {
            let (node, local) = self.active_screen().pages().node_for_active_row(y);
            let page = self.active_screen_mut().pages_mut().page_mut(node).expect("live");
            for x in 0..cols {
                page.set_cell(local, x, Cell { codepoint: 'E' as u32, ..Cell::default() });
            }
        }
        self.move_cursor_to(0, 0);
    }

    /// `DECDHL`/`DECSWL`/`DECDWL`: sets the cursor's row width/height hint.
    /// Purely a rendering flag for the frontend; it does not reflow cells or
    /// change column addressing.
    fn set_line_attr(&mut self, attr: LineAttr) {
        let y = self.active_screen().cursor.y;
        let (node, local) = self.active_screen().pages().node_for_active_row(y);
        self.active_screen_mut().pages_mut().page_mut(node).expect("live").row_mut(local).line_attr = attr;
    }

    /// `DECIC` (`CSI Pn ' }`): inserts `n` blank columns at the cursor,
    /// shifting the scrolling region's rows right within the left/right
    /// margins. Implemented as [`Screen::insert_chars`] applied to every row
    /// of the scrolling region rather than just the cursor's row (DCH's
    /// scope).
    fn insert_columns(&mut self, n: u16) {
        let x = self.active_screen().cursor.x;
        let (top, bottom) = (self.region_top(), self.region_bottom());
        let right = self.region_right();
        for y in top..=bottom {
            self.active_screen_mut().insert_chars(y, x, right, n);
        }
    }

    /// `DECDC` (`CSI Pn ' ~`), the column-scoped inverse of
    /// [`Terminal::insert_columns`].
    fn delete_columns(&mut self, n: u16) {
        let x = self.active_screen().cursor.x;
        let (top, bottom) = (self.region_top(), self.region_bottom());
        let right = self.region_right();
        for y in top..=bottom {
            self.active_screen_mut().delete_chars(y, x, right, n);
        }
    }

    /// `XTWINOPS` (`CSI Ps ; Ps ; Ps t`): only the size-report queries make
    /// sense for a terminal model with no physical window of its own; the
    /// window-manager ops (`de-iconify`, `move`, `raise`, full `resize-to`)
    /// are a host/frontend concern and are silently ignored here.
    fn xtwinops(&mut self, params: &CsiParams) {
        let p = |n: usize, default: u16| params.get_or(n, default);
        match p(0, 0) {
            // Report text area size in characters: `CSI 8 ; rows ; cols t`.
            18 => {
                let rows = self.active_screen().rows();
                let cols = self.active_screen().cols();
                self.respond(|buf| vtansi::write_csi!(buf; 8, ";", rows, ";", cols, "t"));
            }
            // Report screen size in characters: identical to the text area
            // here since this model has no chrome of its own.
            19 => {
                let rows = self.active_screen().rows();
                let cols = self.active_screen().cols();
                self.respond(|buf| vtansi::write_csi!(buf; 9, ";", rows, ";", cols, "t"));
            }
            _ => {}
        }
    }

    fn designate_charset(&mut self, slot: GSlot, final_byte: u8) {
        if let Some(charset) = Charset::from_scs_final(final_byte) {
            self.active_screen_mut().charset.designate(slot, charset);
        }
    }

    fn reverse_index(&mut self) {
        let top = self.region_top();
        if self.active_screen().cursor.y == top {
            self.scroll_down(1);
        } else {
            let screen = self.active_screen_mut();
            screen.cursor.y = screen.cursor.y.saturating_sub(1).max(top);
        }
    }

    fn reset_to_initial_state(&mut self) {
        let options = self.options.clone();
        *self = Terminal::new(options);
    }

    // ----- OSC dispatch ------------------------------------------------------

    pub(crate) fn handle_osc(&mut self, command: Command, terminator: vtparser::Terminator) {
        match command {
            Command::SetTitle { target, text } => {
                debug!(?target, %text, "window title set (no-op: no window backing this core)");
            }
            Command::PaletteColor(entries) => {
                for (index, request) in entries {
                    self.apply_palette_color(index, request, terminator);
                }
            }
            Command::SpecialColor(entries) => {
                // Special colors (bold/underline/blink/reverse/italic) have
                // no dedicated storage slot in this core; acknowledged but
                // not rendered distinctly.
                for (slot, request) in entries {
                    trace!(?slot, ?request, "special color set (not separately modeled)");
                }
            }
            Command::WorkingDirectory(path) => self.pwd = Some(path),
            Command::Hyperlink(cmd) => self.apply_hyperlink(cmd),
            Command::DesktopNotification(text) => debug!(%text, "desktop notification"),
            Command::ConEmu(cmd) => self.apply_conemu(cmd),
            Command::DynamicColor(code, request) => self.apply_dynamic_color(code, request, terminator),
            Command::ClipboardLegacy(cmd) => debug!(?cmd, "legacy clipboard request"),
            Command::ResetPaletteColor(index) => match index {
                Some(i) => self.palette.reset(i),
                None => self.palette.reset_all(),
            },
            Command::ResetDynamicColor(code) => {
                if let Some(slot) = DynamicColorSlot::from_osc_code(code) {
                    self.dynamic_colors.reset(slot);
                }
            }
            Command::SemanticPrompt(cmd) => self.apply_semantic_prompt(cmd),
            Command::ClipboardV2(cmd) => debug!(op = ?cmd.op, "kitty clipboard v2 request"),
            Command::Iterm2(cmd) => self.apply_iterm2(cmd),
            Command::Unknown { code, payload } => {
                trace!(?code, len = payload.len(), "unrecognized OSC command");
            }
        }
    }

    fn apply_palette_color(&mut self, index: u8, request: vtosc::ColorRequest, terminator: vtparser::Terminator) {
        match request {
            vtosc::ColorRequest::Set(color) => {
                let (r, g, b) = color.to_rgb8();
                self.palette.set(index, vtcolor::Rgb8::new(r, g, b));
            }
            vtosc::ColorRequest::Query => {
                let rgb = self.palette.get(index);
                self.respond_color_query(terminator, |buf| {
                    vtansi::write_str_into(buf, "4;")?;
                    vtansi::encode::AnsiEncode::encode_ansi_into(&index, buf)?;
                    vtansi::write_str_into(buf, ";")?;
                    let xcolor = XColor::Rgb {
                        red: rgb.r as u16 * 257,
                        green: rgb.g as u16 * 257,
                        blue: rgb.b as u16 * 257,
                    };
                    let encoded = xcolor.encode().map_err(|_| EncodeError::BufferTooSmall)?;
                    buf.extend_from_slice(&encoded);
                    Ok(0)
                });
            }
        }
    }

    fn apply_dynamic_color(&mut self, code: u16, request: vtosc::ColorRequest, terminator: vtparser::Terminator) {
        let Some(slot) = DynamicColorSlot::from_osc_code(code) else { return };
        match request {
            vtosc::ColorRequest::Set(color) => {
                let (r, g, b) = color.to_rgb8();
                self.dynamic_colors.set(slot, vtcolor::Rgb8::new(r, g, b));
            }
            vtosc::ColorRequest::Query => {
                let rgb = self.dynamic_colors.get(slot);
                self.respond_color_query(terminator, |buf| {
                    vtansi::encode::AnsiEncode::encode_ansi_into(&code, buf)?;
                    vtansi::write_str_into(buf, ";")?;
                    let xcolor = XColor::Rgb {
                        red: rgb.r as u16 * 257,
                        green: rgb.g as u16 * 257,
                        blue: rgb.b as u16 * 257,
                    };
                    let encoded = xcolor.encode().map_err(|_| EncodeError::BufferTooSmall)?;
                    buf.extend_from_slice(&encoded);
                    Ok(0)
                });
            }
        }
    }

    /// OSC color-query responses echo the same OSC family and terminator
    /// the request used (BEL-terminated requests get BEL-terminated
    /// responses).
    fn respond_color_query(
        &mut self,
        terminator: vtparser::Terminator,
        f: impl FnOnce(&mut Vec<u8>) -> Result<usize, EncodeError>,
    ) {
        if matches!(terminator, vtparser::Terminator::Cancelled) {
            return;
        }
        let mut body = Vec::new();
        if f(&mut body).is_err() {
            return;
        }
        self.response.extend_from_slice(b"\x1b]");
        self.response.extend_from_slice(&body);
        match terminator {
            vtparser::Terminator::Bel => self.response.push(0x07),
            _ => self.response.extend_from_slice(b"\x1b\\"),
        }
    }

    fn apply_hyperlink(&mut self, cmd: vtosc::HyperlinkCommand) {
        let screen = self.active_screen_mut();
        match cmd.uri {
            Some(uri) => {
                let y = screen.cursor.y;
                let (node, _) = screen.pages().node_for_active_row(y);
                let link_ref = screen
                    .pages_mut()
                    .page_mut(node)
                    .expect("live")
                    .intern_hyperlink(Hyperlink { uri, id: cmd.id });
                screen.cursor.hyperlink = Some(link_ref);
            }
            None => screen.cursor.hyperlink = None,
        }
    }

    fn apply_semantic_prompt(&mut self, cmd: vtosc::SemanticPromptCommand) {
        use vtosc::SemanticPromptAction as A;
        use vtgrid::SemanticPromptKind as K;
        let kind = match cmd.action {
            A::FreshLine => K::FreshLine,
            A::PromptStart => K::PromptStart,
            A::PromptContinuation => K::PromptContinuation,
            A::Input => K::Input,
            A::InputContinuation => K::InputContinuation,
            A::Command => K::Command,
            A::CommandEnd => K::CommandEnd,
            A::Notice => K::Notice,
            A::Unknown(_) => K::Unknown,
        };
        let options = vtgrid::SemanticPromptOptions {
            aid: cmd.options.aid,
            cl: cmd.options.cl,
            k: cmd.options.k,
            err: cmd.options.err,
            redraw: cmd.options.redraw,
            special_key: cmd.options.special_key,
            click_events: cmd.options.click_events,
            exit_code: cmd.options.exit_code,
        };
        let y = self.active_screen().cursor.y;
        let row = self.active_screen_mut().active_row_mut(y);
        row.semantic_prompt = kind;
        row.semantic_options = Some(Box::new(options));
    }

    fn apply_conemu(&mut self, cmd: vtosc::ConEmuCommand) {
        if let vtosc::ConEmuCommand::Pwd(path) = cmd {
            self.pwd = Some(path);
        } else {
            trace!(?cmd, "conemu extension command (no window/taskbar backing)");
        }
    }

    fn apply_iterm2(&mut self, cmd: vtosc::Iterm2Command) {
        match cmd {
            vtosc::Iterm2Command::CurrentDir(path) => self.pwd = Some(path),
            vtosc::Iterm2Command::ClearScrollback => {
                let cols = self.active_screen().cols();
                let rows = self.active_screen().rows();
                *self.active_screen_mut() = Screen::new(cols, rows, self.options.max_scrollback.max(1));
            }
            other => trace!(?other, "iterm2 command (no window backing)"),
        }
    }

    // ----- DCS dispatch ------------------------------------------------------

    /// `DCS $ q ...` (DECRQSS) is the only DCS request this core answers:
    /// it echoes back the currently active SGR attributes or scroll
    /// region, matching what the request asked to query. Everything else
    /// (Sixel, ReGIS, …) is out of scope and silently absorbed.
    pub(crate) fn handle_dcs(&mut self, intermediates: &Intermediates, _params: &CsiParams, final_byte: u8, payload: &[u8]) {
        if intermediates.as_slice() == [b'$'] && final_byte == b'q' {
            self.handle_decrqss(payload);
        } else {
            trace!(?intermediates, final_byte = final_byte as char, len = payload.len(), "unhandled DCS sequence");
        }
    }

    fn handle_decrqss(&mut self, payload: &[u8]) {
        match payload {
            b"m" => {
                let sgr = self.current_sgr_params();
                self.respond(|buf| vtansi::write_dcs!(buf; "1$r", sgr.as_str(), "m"));
            }
            b"r" => {
                let top = self.region_top() + 1;
                let bottom = self.region_bottom() + 1;
                self.respond(|buf| vtansi::write_dcs!(buf; "1$r", top, ";", bottom, "r"));
            }
            _ => self.respond(|buf| vtansi::write_dcs!(buf; "0$r")),
        }
    }

    fn current_sgr_params(&self) -> String {
        let screen = self.active_screen();
        let style = screen
            .cursor
            .style
            .map(|r| {
                let (node, _) = screen.pages().node_for_active_row(screen.cursor.y);
                screen.pages().page(node).map(|page| *page.style(r)).unwrap_or(Style::DEFAULT)
            })
            .unwrap_or(Style::DEFAULT);
        let mut parts = vec!["0".to_string()];
        if style.bold {
            parts.push("1".to_string());
        }
        if style.faint {
            parts.push("2".to_string());
        }
        if style.italic {
            parts.push("3".to_string());
        }
        if style.underline != UnderlineStyle::None {
            parts.push("4".to_string());
        }
        if style.blink {
            parts.push("5".to_string());
        }
        if style.reverse {
            parts.push("7".to_string());
        }
        if style.invisible {
            parts.push("8".to_string());
        }
        if style.strikethrough {
            parts.push("9".to_string());
        }
        match style.fg {
            Color::Indexed(n) => parts.push(format!("38;5;{n}")),
            Color::Rgb(r, g, b) => parts.push(format!("38;2;{r};{g};{b}")),
            Color::Default => {}
        }
        match style.bg {
            Color::Indexed(n) => parts.push(format!("48;5;{n}")),
            Color::Rgb(r, g, b) => parts.push(format!("48;2;{r};{g};{b}")),
            Color::Default => {}
        }
        parts.join(";")
    }

    // ----- APC dispatch (kitty graphics) -------------------------------------

    /// Kitty graphics control data only: `a=`/`i=`/`p=`/`q=`/`f=`/`s=`/`v=`
    /// key-value pairs preceding the first `;`, which introduces the
    /// (entirely unparsed, base64) pixel payload.
    pub(crate) fn handle_apc(&mut self, payload: &[u8]) {
        if !self.options.enable_kitty_graphics {
            return;
        }
        let Some(rest) = payload.strip_prefix(b"G") else { return };
        let (control, _data) = match rest.iter().position(|&b| b == b';') {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => (rest, &rest[0..0]),
        };
        let Ok(control) = std::str::from_utf8(control) else { return };

        let mut id = 0u32;
        let mut format = 32u16;
        let mut width = 0u32;
        let mut height = 0u32;
        let mut declared_size = 0u64;
        let mut medium = GraphicsMedium::Direct;
        let mut action = 't';
        for kv in control.split(',') {
            let Some((k, v)) = kv.split_once('=') else { continue };
            match k {
                "i" => id = v.parse().unwrap_or(0),
                "f" => format = v.parse().unwrap_or(32),
                "s" => width = v.parse().unwrap_or(0),
                "v" => height = v.parse().unwrap_or(0),
                "S" => declared_size = v.parse().unwrap_or(0),
                "a" => action = v.chars().next().unwrap_or('t'),
                "t" => {
                    medium = match v {
                        "f" => GraphicsMedium::File,
                        "t" => GraphicsMedium::TempFile,
                        "s" => GraphicsMedium::SharedMemory,
                        _ => GraphicsMedium::Direct,
                    }
                }
                _ => {}
            }
        }

        match action {
            'd' => {
                if id != 0 {
                    self.active_screen_mut().kitty_graphics.delete(id);
                } else {
                    self.active_screen_mut().kitty_graphics.delete_all();
                }
            }
            _ => {
                self.active_screen_mut().kitty_graphics.begin_or_update(GraphicsImage {
                    id,
                    medium,
                    format,
                    width,
                    height,
                    declared_size,
                    complete: true,
                });
            }
        }
    }
}

impl Terminal {
    pub(crate) fn set_last_printed(&mut self, cp: char) {
        self.last_printed = Some(cp);
    }

    pub(crate) fn focused(&self) -> bool {
        self.focused
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub(crate) fn modify_other_keys(&self) -> u8 {
        self.modify_other_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_advances_cursor() {
        let mut term = Terminal::new(TerminalOptions::default());
        term.write(b"hi").unwrap();
        assert_eq!(term.active_screen().cursor.x, 2);
    }

    #[test]
    fn csi_cup_moves_cursor() {
        let mut term = Terminal::new(TerminalOptions::default());
        term.write(b"\x1b[5;10H").unwrap();
        assert_eq!(term.active_screen().cursor.y, 4);
        assert_eq!(term.active_screen().cursor.x, 9);
    }

    #[test]
    fn sgr_bold_is_retained_on_style() {
        let mut term = Terminal::new(TerminalOptions::default());
        term.write(b"\x1b[1mX").unwrap();
        let screen = term.active_screen();
        let (node, _) = screen.pages().node_for_active_row(0);
        let cell = *screen.pages().page(node).unwrap().row(0).cell(0);
        let style = cell.style.map(|r| *screen.pages().page(node).unwrap().style(r)).unwrap();
        assert!(style.bold);
    }

    #[test]
    fn alt_screen_switch_and_restore() {
        let mut term = Terminal::new(TerminalOptions::default());
        term.write(b"hello").unwrap();
        term.write(b"\x1b[?1049h").unwrap();
        assert_eq!(term.active_screen_key(), ScreenKey::Alternate);
        assert_eq!(term.active_screen().cursor.x, 0);
        term.write(b"\x1b[?1049l").unwrap();
        assert_eq!(term.active_screen_key(), ScreenKey::Primary);
        assert_eq!(term.active_screen().cursor.x, 5);
    }

    #[test]
    fn decstbm_restricts_scroll_region() {
        let mut term = Terminal::new(TerminalOptions::default());
        term.write(b"\x1b[5;10r").unwrap();
        assert_eq!(term.active_screen().scrolling_region.top, 4);
        assert_eq!(term.active_screen().scrolling_region.bottom, 9);
        assert_eq!(term.active_screen().cursor.y, 0);
    }

    #[test]
    fn semantic_prompt_marks_row() {
        let mut term = Terminal::new(TerminalOptions::default());
        term.write(b"\x1b]133;A\x07").unwrap();
        let row = term.active_screen().active_row(0);
        assert_eq!(row.semantic_prompt, vtgrid::SemanticPromptKind::PromptStart);
    }

    #[test]
    fn osc_palette_query_responds_with_same_terminator() {
        let mut term = Terminal::new(TerminalOptions::default());
        term.write(b"\x1b]4;1;?\x07").unwrap();
        let response = term.take_response();
        assert!(response.ends_with(&[0x07]));
        assert!(response.starts_with(b"\x1b]4;1;rgb:"));
    }

    #[test]
    fn wrap_sets_pending_then_consumes_on_next_print() {
        let mut term = Terminal::new(TerminalOptions {
            cols: 4,
            ..TerminalOptions::default()
        });
        term.write(b"abcd").unwrap();
        assert!(term.active_screen().cursor.pending_wrap);
        term.write(b"e").unwrap();
        assert!(!term.active_screen().cursor.pending_wrap);
        assert_eq!(term.active_screen().cursor.y, 1);
    }

    #[test]
    fn soft_wrap_marks_row_pair_per_wrap_duality_invariant() {
        // §8 "Wrap at right margin": 6x2, "Hello, World!" wraps after
        // "Hello,"; row 0 must carry `wrap` and row 1 `wrap_continuation`.
        let mut term = Terminal::new(TerminalOptions {
            cols: 6,
            rows: 2,
            ..TerminalOptions::default()
        });
        term.write(b"Hello, World!").unwrap();
        let screen = term.active_screen();
        assert!(screen.active_row(0).wrap);
        assert!(screen.active_row(1).wrap_continuation);
    }

    #[test]
    fn decrqm_reports_set_dec_private_mode() {
        let mut term = Terminal::new(TerminalOptions::default());
        term.write(b"\x1b[?2004h").unwrap(); // bracketed paste on
        term.write(b"\x1b[?2004$p").unwrap();
        assert_eq!(term.take_response(), b"\x1b[?2004;1$y");
    }

    #[test]
    fn decrqm_reports_reset_ansi_mode() {
        let mut term = Terminal::new(TerminalOptions::default());
        term.write(b"\x1b[4$p").unwrap(); // insert mode never set
        assert_eq!(term.take_response(), b"\x1b[4;2$y");
    }

    #[test]
    fn decrqm_reports_unrecognized_mode_as_zero() {
        let mut term = Terminal::new(TerminalOptions::default());
        term.write(b"\x1b[?9999$p").unwrap();
        assert_eq!(term.take_response(), b"\x1b[?9999;0$y");
    }

    #[test]
    fn decsed_preserves_protected_cells() {
        let mut term = Terminal::new(TerminalOptions::default());
        term.write(b"\x1b[1\"q").unwrap(); // DECSCA: protect subsequent prints
        term.write(b"X").unwrap();
        term.write(b"\x1b[0\"q").unwrap(); // unprotect
        term.write(b"Y").unwrap();
        term.write(b"\x1b[?2J").unwrap(); // DECSED: erase all, skip protected
        let row = term.active_screen().active_row(0);
        assert_eq!(row.cell(0).codepoint, 'X' as u32);
        assert_eq!(row.cell(1).codepoint, 0);
    }

    #[test]
    fn ed_ignores_protection_unlike_decsed() {
        let mut term = Terminal::new(TerminalOptions::default());
        term.write(b"\x1b[1\"q").unwrap();
        term.write(b"X").unwrap();
        term.write(b"\x1b[2J").unwrap(); // plain ED clears everything
        let row = term.active_screen().active_row(0);
        assert_eq!(row.cell(0).codepoint, 0);
    }

    #[test]
    fn decaln_fills_screen_with_e_and_homes_cursor() {
        let mut term = Terminal::new(TerminalOptions {
            cols: 4,
            rows: 2,
            ..TerminalOptions::default()
        });
        term.write(b"\x1b[5;3H").unwrap();
        term.write(b"\x1b#8").unwrap();
        assert_eq!(term.active_screen().cursor.x, 0);
        assert_eq!(term.active_screen().cursor.y, 0);
        for y in 0..2 {
            let row = term.active_screen().active_row(y);
            for x in 0..4 {
                assert_eq!(row.cell(x).codepoint, 'E' as u32);
            }
        }
    }

    #[test]
    fn dch_deleting_the_entire_row_does_not_panic() {
        // CSI 10 P on a 10-col row at column 0: n == right - left + 1,
        // the shift amount that used to underflow `right - n`.
        let mut term = Terminal::new(TerminalOptions {
            cols: 10,
            ..TerminalOptions::default()
        });
        term.write(b"abcdefghij").unwrap();
        term.write(b"\x1b[H\x1b[10P").unwrap();
        let screen = term.active_screen();
        let (node, _) = screen.pages().node_for_active_row(0);
        let page = screen.pages().page(node).unwrap();
        for x in 0..10 {
            assert_eq!(page.row(0).cell(x).codepoint, 0);
        }
    }

    #[test]
    fn decic_shifts_columns_right_within_region() {
        let mut term = Terminal::new(TerminalOptions {
            cols: 4,
            ..TerminalOptions::default()
        });
        term.write(b"abcd").unwrap(); // fills row 0, wraps cursor to row 1
        term.write(b"\x1b[1;1H").unwrap(); // cursor back to row 0 col 0
        term.write(b"\x1b[1;2H").unwrap(); // move to col 2 (1-indexed)
        term.write(b"\x1b[1'}").unwrap(); // DECIC: insert one column
        let row = term.active_screen().active_row(0);
        assert_eq!(row.cell(0).codepoint, 'a' as u32);
        assert_eq!(row.cell(1).codepoint, 0);
        assert_eq!(row.cell(2).codepoint, 'b' as u32);
        assert_eq!(row.cell(3).codepoint, 'c' as u32);
    }

    #[test]
    fn decdc_shifts_columns_left_within_region() {
        let mut term = Terminal::new(TerminalOptions {
            cols: 4,
            ..TerminalOptions::default()
        });
        term.write(b"abcd").unwrap();
        term.write(b"\x1b[1;2H").unwrap();
        term.write(b"\x1b[1'~").unwrap(); // DECDC: delete one column
        let row = term.active_screen().active_row(0);
        assert_eq!(row.cell(0).codepoint, 'a' as u32);
        assert_eq!(row.cell(1).codepoint, 'c' as u32);
        assert_eq!(row.cell(2).codepoint, 'd' as u32);
        assert_eq!(row.cell(3).codepoint, 0);
    }

    #[test]
    fn decdhl_and_decswl_set_cursor_row_line_attr() {
        let mut term = Terminal::new(TerminalOptions::default());
        term.write(b"\x1b#3").unwrap(); // DECDHL top half
        assert_eq!(term.active_screen().active_row(0).line_attr, vtgrid::LineAttr::DoubleHeightTop);
        term.write(b"\x1b#5").unwrap(); // DECSWL resets to single width
        assert_eq!(term.active_screen().active_row(0).line_attr, vtgrid::LineAttr::Single);
        term.write(b"\x1b#6").unwrap(); // DECDWL
        assert_eq!(term.active_screen().active_row(0).line_attr, vtgrid::LineAttr::DoubleWidth);
    }

    #[test]
    fn xtwinops_reports_text_area_size_in_chars() {
        let mut term = Terminal::new(TerminalOptions {
            cols: 80,
            rows: 24,
            ..TerminalOptions::default()
        });
        term.write(b"\x1b[18t").unwrap();
        assert_eq!(term.take_response(), b"\x1b[8;24;80t");
    }
}
