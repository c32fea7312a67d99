//! Cell-width computation and the print algorithm (§4.4).

use unicode_width::UnicodeWidthChar;
use vtgrid::{Cell, WideState};

use crate::mode::Modes;
use crate::terminal::Terminal;

/// Classifies how a printed codepoint occupies grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintWidth {
    /// Zero-width combining mark: appends to the previous cell's grapheme.
    Combining,
    /// A control or otherwise non-printable codepoint: ignored.
    Ignore,
    Narrow,
    Wide,
}

pub fn classify_width(cp: char) -> PrintWidth {
    if (cp as u32) < 0x20 || (0x7F..0xA0).contains(&(cp as u32)) {
        return PrintWidth::Ignore;
    }
    match UnicodeWidthChar::width(cp) {
        None | Some(0) => PrintWidth::Combining,
        Some(1) => PrintWidth::Narrow,
        _ => PrintWidth::Wide,
    }
}

impl Terminal {
    /// Print one already charset-translated codepoint at the cursor,
    /// implementing the six-step algorithm from the component design:
    /// translate width, consume pending-wrap, handle wide-glyph margin
    /// straddling, write the cell(s), then advance/re-arm pending-wrap.
    pub(crate) fn print_char(&mut self, cp: char) {
        match classify_width(cp) {
            PrintWidth::Ignore => {}
            PrintWidth::Combining => self.append_combining(cp),
            PrintWidth::Narrow => self.print_sized(cp, 1),
            PrintWidth::Wide => self.print_sized(cp, 2),
        }
    }

    fn append_combining(&mut self, cp: char) {
        let screen = self.active_screen_mut();
        let (x, y) = if screen.cursor.x == 0 {
            (0, screen.cursor.y)
        } else {
            (screen.cursor.x - 1, screen.cursor.y)
        };
        let (node, local) = screen.pages().node_for_active_row(y);
        let page = screen.pages_mut().page_mut(node).expect("live");
        let existing = *page.row(local).cell(x);
        let Some(grapheme_ref) = existing.grapheme else {
            let cluster = vtgrid::GraphemeCluster(smallvec::smallvec![cp]);
            let new_ref = page.intern_grapheme(cluster);
            let mut cell = existing;
            cell.grapheme = Some(new_ref);
            page.set_cell(local, x, cell);
            return;
        };
        let new_ref = page.append_grapheme(grapheme_ref, cp);
        let mut cell = existing;
        cell.grapheme = Some(new_ref);
        page.set_cell(local, x, cell);
    }

    fn print_sized(&mut self, cp: char, width: u16) {
        let cols = self.active_screen().cols();
        let autowrap = self.modes.contains(Modes::AUTOWRAP);

        if self.active_screen().cursor.pending_wrap && autowrap {
            self.soft_wrap_to_next_line();
            self.active_screen_mut().cursor.x = self.region_left();
            self.active_screen_mut().cursor.pending_wrap = false;
        }

        let right_margin = self.region_right();
        if width == 2 {
            let x = self.active_screen().cursor.x;
            if x == right_margin {
                if autowrap {
                    self.soft_wrap_to_next_line();
                    self.active_screen_mut().cursor.x = self.region_left();
                } else {
                    // No room and no wrap: degrade to a narrow spacer cell
                    // rather than straddle the margin.
                    self.write_cell(cp, 1, WideState::Narrow);
                    self.advance_cursor_after_print(1, cols);
                    return;
                }
            }
        }

        self.write_cell(cp, width, WideState::Narrow);
        self.advance_cursor_after_print(width, cols);
    }

    /// Leave the current row via a soft wrap: mark it `wrap` and the row
    /// the cursor lands on `wrap_continuation`, maintaining the §3
    /// invariant `row[i].wrap ⇔ row[i + 1].wrap_continuation`.
    fn soft_wrap_to_next_line(&mut self) {
        let y = self.active_screen().cursor.y;
        self.active_screen_mut().active_row_mut(y).wrap = true;
        self.line_feed_within_region();
        let new_y = self.active_screen().cursor.y;
        self.active_screen_mut().active_row_mut(new_y).wrap_continuation = true;
    }

    fn write_cell(&mut self, cp: char, width: u16, _base_wide: WideState) {
        let screen = self.active_screen();
        let (x, y) = (screen.cursor.x, screen.cursor.y);
        let cell = Cell {
            codepoint: cp as u32,
            wide: if width == 2 { WideState::Wide } else { WideState::Narrow },
            style: screen.cursor.style,
            grapheme: None,
            hyperlink: screen.cursor.hyperlink,
            protected: screen.cursor.protected,
        };
        self.active_screen_mut().set_cell_at(y, x, cell);
        if width == 2 {
            let spacer = Cell {
                codepoint: 0,
                wide: WideState::SpacerTail,
                style: cell.style,
                grapheme: None,
                hyperlink: cell.hyperlink,
                protected: cell.protected,
            };
            self.active_screen_mut().set_cell_at(y, x + 1, spacer);
        }
    }

    fn advance_cursor_after_print(&mut self, width: u16, _cols: u16) {
        let right_margin = self.region_right();
        let screen = self.active_screen_mut();
        let new_x = screen.cursor.x + width;
        if new_x > right_margin {
            screen.cursor.x = right_margin;
            screen.cursor.pending_wrap = true;
        } else {
            screen.cursor.x = new_x;
        }
    }
}
