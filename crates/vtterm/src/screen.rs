//! A single screen buffer: page chain, cursor, charset state and scroll
//! region. [`crate::Terminal`] owns one of these per screen key (primary,
//! alternate).

use vtgrid::{Cell, NodeId, PageList, Pin, PinId, Row};

use crate::charset::CharsetState;
use crate::cursor::{Cursor, SavedCursor};
use crate::kitty::{GraphicsStore, KittyKeyboardStack};
use crate::mode::ScrollingRegion;
use crate::selection::Selection;

/// A viewport over one [`PageList`]: cursor, saved-cursor stack, charset
/// slots, kitty keyboard/graphics state and selection. [`crate::Terminal`]
/// owns two of these (primary/alternate) in a [`crate::ScreenSet`].
pub struct Screen {
    pages: PageList,
    pub cursor: Cursor,
    pub saved_cursor: Option<SavedCursor>,
    pub charset: CharsetState,
    pub scrolling_region: ScrollingRegion,
    pub selection: Option<Selection>,
    pub kitty_keyboard: KittyKeyboardStack,
    pub kitty_graphics: GraphicsStore,
}

impl Screen {
    pub fn new(cols: u16, rows: u16, max_size: usize) -> Self {
        Self {
            pages: PageList::new(cols, rows, max_size),
            cursor: Cursor::default(),
            saved_cursor: None,
            charset: CharsetState::default(),
            scrolling_region: ScrollingRegion::full(cols, rows),
            selection: None,
            kitty_keyboard: KittyKeyboardStack::default(),
            kitty_graphics: GraphicsStore::default(),
        }
    }

    pub fn pages(&self) -> &PageList {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut PageList {
        &mut self.pages
    }

    pub fn cols(&self) -> u16 {
        self.pages.cols()
    }

    pub fn rows(&self) -> u16 {
        self.pages.active_rows()
    }

    pub fn active_row(&self, y: u16) -> &Row {
        self.pages.active_row(y)
    }

    pub fn active_row_mut(&mut self, y: u16) -> &mut Row {
        self.pages.active_row_mut(y)
    }

    pub fn set_cell_at(&mut self, y: u16, x: u16, cell: Cell) {
        let (node, local) = self.pages.node_for_active_row(y);
        self.set_cell_in_node(node, local, x, cell);
    }

    /// Write a cell into an already-resolved (node, local row) pair,
    /// re-interning pool references if the target page differs from
    /// whichever page currently owns the pool references on `cell`.
    ///
    /// Pool refs (style/grapheme/hyperlink) are only meaningful within the
    /// `Page` that produced them, so a cell carrying refs from one page can
    /// never be blindly copied into another: see `copy_cell` below for the
    /// cross-page-safe path used by scrolling.
    fn set_cell_in_node(&mut self, node: NodeId, local: u16, x: u16, cell: Cell) {
        let page = self.pages.page_mut(node).expect("resolved node must be live");
        page.set_cell(local, x, cell);
    }

    /// Copy the cell at `(src_node, src_local, x)` to `(dst_node,
    /// dst_local, x)`, re-interning style/hyperlink/grapheme pool values
    /// into the destination page's pools when the two nodes differ.
    pub fn copy_cell(
        &mut self,
        src_node: NodeId,
        src_local: u16,
        dst_node: NodeId,
        dst_local: u16,
        x: u16,
    ) {
        if src_node == dst_node {
            let page = self.pages.page_mut(src_node).expect("live");
            let cell = *page.row(src_local).cell(x);
            page.set_cell(dst_local, x, cell);
            return;
        }

        let src_page = self.pages.page(src_node).expect("live");
        let cell = *src_page.row(src_local).cell(x);
        let style = cell.style.map(|r| *src_page.style(r));
        let hyperlink = cell.hyperlink.and_then(|r| src_page.hyperlink(r).cloned());
        let grapheme = cell.grapheme.and_then(|r| src_page.grapheme(r).cloned());

        let dst_page = self.pages.page_mut(dst_node).expect("live");
        let new_style = style.and_then(|s| dst_page.intern_style(s));
        let new_hyperlink = hyperlink.map(|h| dst_page.intern_hyperlink(h));
        let new_grapheme = grapheme.map(|g| dst_page.intern_grapheme(g));
        dst_page.set_cell(
            dst_local,
            x,
            Cell {
                codepoint: cell.codepoint,
                wide: cell.wide,
                style: new_style,
                grapheme: new_grapheme,
                hyperlink: new_hyperlink,
                protected: cell.protected,
            },
        );
    }

    /// Move active row `src_y` to active row `dst_y`, cell by cell,
    /// handling the case where the two rows live in different page nodes.
    pub fn move_active_row(&mut self, src_y: u16, dst_y: u16) {
        let (src_node, src_local) = self.pages.node_for_active_row(src_y);
        let (dst_node, dst_local) = self.pages.node_for_active_row(dst_y);
        let cols = self.cols();
        for x in 0..cols {
            self.copy_cell(src_node, src_local, dst_node, dst_local, x);
        }
        let wrap = self.pages.page(src_node).expect("live").row(src_local).wrap;
        let wrap_continuation = self
            .pages
            .page(src_node)
            .expect("live")
            .row(src_local)
            .wrap_continuation;
        let dst_row = self.pages.page_mut(dst_node).expect("live").row_mut(dst_local);
        dst_row.wrap = wrap;
        dst_row.wrap_continuation = wrap_continuation;
    }

    pub fn clear_active_row(&mut self, y: u16) {
        let (node, local) = self.pages.node_for_active_row(y);
        self.pages.page_mut(node).expect("live").clear_row(local);
    }

    /// Push a fresh blank row into scrollback and return the cursor's
    /// effective row count growth (used by scroll-up at the top margin).
    pub fn push_history_row(&mut self) {
        self.pages.push_row();
    }

    pub fn create_pin_at(&mut self, y: u16, x: u16) -> PinId {
        let (node, local) = self.pages.node_for_active_row(y);
        self.pages.create_pin(node, local, x)
    }

    pub fn resolve_pin(&self, id: PinId) -> Option<Pin> {
        self.pages.pin(id)
    }

    /// Shift rows `[top, bottom]` up by one within columns `[left, right]`,
    /// clearing the vacated bottom row. Used for DECSTBM/DECSLRM-bounded
    /// scroll-up; full-screen scroll-up instead grows scrollback via
    /// [`Screen::push_history_row`] so history is only ever built from a
    /// genuine full-screen scroll.
    pub fn scroll_up_region(&mut self, top: u16, bottom: u16, left: u16, right: u16) {
        if top >= bottom {
            self.clear_region_row(bottom, left, right);
            return;
        }
        for y in top..bottom {
            let (src_node, src_local) = self.pages.node_for_active_row(y + 1);
            let (dst_node, dst_local) = self.pages.node_for_active_row(y);
            for x in left..=right {
                self.copy_cell(src_node, src_local, dst_node, dst_local, x);
            }
        }
        self.clear_region_row(bottom, left, right);
    }

    /// Shift rows `[top, bottom]` down by one within columns `[left,
    /// right]`, clearing the vacated top row.
    pub fn scroll_down_region(&mut self, top: u16, bottom: u16, left: u16, right: u16) {
        if top >= bottom {
            self.clear_region_row(top, left, right);
            return;
        }
        let mut y = bottom;
        while y > top {
            let (src_node, src_local) = self.pages.node_for_active_row(y - 1);
            let (dst_node, dst_local) = self.pages.node_for_active_row(y);
            for x in left..=right {
                self.copy_cell(src_node, src_local, dst_node, dst_local, x);
            }
            y -= 1;
        }
        self.clear_region_row(top, left, right);
    }

    fn clear_region_row(&mut self, y: u16, left: u16, right: u16) {
        let (node, local) = self.pages.node_for_active_row(y);
        let page = self.pages.page_mut(node).expect("live");
        for x in left..=right {
            page.clear_cell(local, x);
        }
    }

    /// Shift cells `[left, right]` of row `y` left by `n`, filling the
    /// vacated right side with blanks (ICH's inverse, DCH).
    pub fn delete_chars(&mut self, y: u16, left: u16, right: u16, n: u16) {
        let (node, local) = self.pages.node_for_active_row(y);
        let page = self.pages.page_mut(node).expect("live");
        let span = right - left + 1;
        let n = n.min(span);
        // Cells surviving the leftward shift; when `n` covers the whole
        // span there's nothing to shift in, only to clear.
        let kept = span - n;
        for x in left..left + kept {
            let moved = *page.row(local).cell(x + n);
            page.set_cell(local, x, moved);
        }
        for x in (left + kept)..=right {
            page.clear_cell(local, x);
        }
    }

    /// Shift cells `[left, right]` of row `y` right by `n`, filling the
    /// vacated left side with blanks (ICH).
    pub fn insert_chars(&mut self, y: u16, left: u16, right: u16, n: u16) {
        let (node, local) = self.pages.node_for_active_row(y);
        let page = self.pages.page_mut(node).expect("live");
        let n = n.min(right - left + 1);
        let mut x = right;
        while x >= left + n {
            let moved = *page.row(local).cell(x - n);
            page.set_cell(local, x, moved);
            x -= 1;
        }
        for x in left..(left + n) {
            page.clear_cell(local, x);
        }
    }
}
