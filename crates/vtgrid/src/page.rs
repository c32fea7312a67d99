//! Fixed-capacity container of rows plus the pools its cells reference.

use crate::cell::{Cell, GraphemeRef, HyperlinkRef, StyleRef};
use crate::hyperlink::{GraphemeCluster, Hyperlink};
use crate::pool::Pool;
use crate::row::Row;
use crate::style::Style;

/// Default target byte budget per page (§4.5: "~64 KiB").
pub const DEFAULT_PAGE_BYTE_BUDGET: usize = 64 * 1024;

/// A rectangular slab of rows with its own style/grapheme/hyperlink pools.
///
/// `rows` and `cols` are fixed at construction; [`PageList`](crate::pagelist::PageList)
/// grows the buffer by chaining additional pages, not by resizing an
/// existing one (except on an explicit column resize, which reflows
/// in place).
pub struct Page {
    cols: u16,
    rows: Vec<Row>,
    styles: Pool<Style>,
    graphemes: Pool<GraphemeCluster>,
    hyperlinks: Pool<Hyperlink>,
    tabstops: Vec<bool>,
    byte_budget: usize,
}

impl Page {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self::with_budget(cols, rows, DEFAULT_PAGE_BYTE_BUDGET)
    }

    pub fn with_budget(cols: u16, rows: u16, byte_budget: usize) -> Self {
        let mut tabstops = vec![false; cols as usize];
        let mut x = 0usize;
        while x < tabstops.len() {
            tabstops[x] = true;
            x += 8;
        }
        Self {
            cols,
            rows: (0..rows).map(|_| Row::new(cols)).collect(),
            styles: Pool::new(true),
            graphemes: Pool::new(false),
            hyperlinks: Pool::new(true),
            tabstops,
            byte_budget,
        }
    }

    #[inline]
    pub fn cols(&self) -> u16 {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> u16 {
        self.rows.len() as u16
    }

    #[inline]
    pub fn row(&self, y: u16) -> &Row {
        &self.rows[y as usize]
    }

    #[inline]
    pub fn row_mut(&mut self, y: u16) -> &mut Row {
        &mut self.rows[y as usize]
    }

    pub fn all_rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn style(&self, r: StyleRef) -> &Style {
        self.styles.get(r.index()).unwrap_or(&Style::DEFAULT)
    }

    pub fn hyperlink(&self, r: HyperlinkRef) -> Option<&Hyperlink> {
        self.hyperlinks.get(r.index())
    }

    pub fn grapheme(&self, r: GraphemeRef) -> Option<&GraphemeCluster> {
        self.graphemes.get(r.index())
    }

    /// Intern a style, returning `None` for the default style (index 0 is
    /// never handed out — callers store `Option<StyleRef>` on the cell).
    pub fn intern_style(&mut self, style: Style) -> Option<StyleRef> {
        if style.is_default() {
            return None;
        }
        Some(StyleRef::from_index(self.styles.intern(style)))
    }

    pub fn intern_hyperlink(&mut self, link: Hyperlink) -> HyperlinkRef {
        HyperlinkRef::from_index(self.hyperlinks.intern(link))
    }

    pub fn intern_grapheme(&mut self, cluster: GraphemeCluster) -> GraphemeRef {
        GraphemeRef::from_index(self.graphemes.intern(cluster))
    }

    pub fn append_grapheme(&mut self, existing: GraphemeRef, c: char) -> GraphemeRef {
        let mut cluster = self
            .graphemes
            .get(existing.index())
            .cloned()
            .unwrap_or_default();
        cluster.push(c);
        self.graphemes.release(existing.index());
        self.intern_grapheme(cluster)
    }

    /// Overwrite a cell, releasing any pool references the old value held
    /// and retaining/interning the new ones. This is the only path by
    /// which pool refcounts change, keeping accounting centralized.
    pub fn set_cell(&mut self, y: u16, x: u16, new: Cell) {
        let old = *self.rows[y as usize].cell(x);
        if let Some(s) = old.style {
            self.styles.release(s.index());
        }
        if let Some(g) = old.grapheme {
            self.graphemes.release(g.index());
        }
        if let Some(h) = old.hyperlink {
            self.hyperlinks.release(h.index());
        }
        if let Some(s) = new.style {
            self.styles.retain(s.index());
        }
        if let Some(g) = new.grapheme {
            self.graphemes.retain(g.index());
        }
        if let Some(h) = new.hyperlink {
            self.hyperlinks.retain(h.index());
        }
        *self.rows[y as usize].cell_mut(x) = new;
    }

    pub fn clear_cell(&mut self, y: u16, x: u16) {
        self.set_cell(y, x, Cell::default());
    }

    pub fn clear_row(&mut self, y: u16) {
        for x in 0..self.cols {
            self.clear_cell(y, x);
        }
        let row = &mut self.rows[y as usize];
        row.wrap = false;
        row.wrap_continuation = false;
    }

    pub fn is_tabstop(&self, x: u16) -> bool {
        self.tabstops.get(x as usize).copied().unwrap_or(false)
    }

    pub fn set_tabstop(&mut self, x: u16, value: bool) {
        if let Some(slot) = self.tabstops.get_mut(x as usize) {
            *slot = value;
        }
    }

    pub fn reset_tabstops_default(&mut self) {
        for (x, slot) in self.tabstops.iter_mut().enumerate() {
            *slot = x % 8 == 0;
        }
    }

    /// Reflow to a new column count: unwraps soft-wrapped row runs into
    /// logical lines, then re-wraps at the new width. Returns the old
    /// row index → new row index mapping so callers (PageList) can remap
    /// pins.
    pub fn resize_cols(&mut self, new_cols: u16) -> Vec<u16> {
        if new_cols == self.cols {
            return (0..self.rows.len() as u16).collect();
        }

        // Group original rows into logical lines (a non-continuation row
        // followed by its wrap continuations), keeping each group's
        // original row indices alongside its flattened cells.
        let mut groups: Vec<(Vec<u16>, Vec<Cell>)> = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            if !row.wrap_continuation || groups.is_empty() {
                groups.push((Vec::new(), Vec::new()));
            }
            let group = groups.last_mut().expect("just pushed if empty");
            group.0.push(i as u16);
            group.1.extend_from_slice(row.cells());
        }

        let mut new_rows = Vec::new();
        let mut mapping = vec![0u16; self.rows.len()];
        for (old_indices, line) in groups {
            let first_new_index = new_rows.len() as u16;
            for origin in &old_indices {
                mapping[*origin as usize] = first_new_index;
            }

            let mut chunks = line.chunks(new_cols.max(1) as usize).peekable();
            if chunks.peek().is_none() {
                new_rows.push(Row::new(new_cols));
                continue;
            }
            let mut first = true;
            while let Some(chunk) = chunks.next() {
                let mut row = Row::new(new_cols);
                row.wrap_continuation = !first;
                row.wrap = chunks.peek().is_some();
                for (x, cell) in chunk.iter().enumerate() {
                    *row.cell_mut(x as u16) = *cell;
                }
                new_rows.push(row);
                first = false;
            }
        }

        self.cols = new_cols;
        self.rows = new_rows;
        self.reset_tabstops_default();
        mapping
    }

    /// Grow or shrink the row count in place (used when the active area is
    /// resized vertically without reflow).
    pub fn resize_rows(&mut self, new_rows: u16) {
        let cols = self.cols;
        self.rows.resize_with(new_rows as usize, || Row::new(cols));
    }

    pub fn estimated_bytes(&self) -> usize {
        let row_bytes = self.rows.len() * self.cols as usize * std::mem::size_of::<Cell>();
        row_bytes + self.styles.approx_bytes() + self.graphemes.approx_bytes() + self.hyperlinks.approx_bytes()
    }

    pub fn byte_budget(&self) -> usize {
        self.byte_budget
    }
}
