//! Searchers that walk a [`PageList`] page by page, feeding each page into
//! a [`SlidingWindow`] (§4.7).

use std::collections::VecDeque;

use vtgrid::{NodeId, PageList};

use crate::sliding_window::{Selection, SlidingWindow};

/// Searches the active screen plus a small overlap into scrollback,
/// forward (oldest-to-newest). Built fresh whenever the active window
/// needs reloading (the viewport scrolled, or content changed).
pub struct ActiveSearch {
    window: SlidingWindow,
    /// Node chain still to be fed, oldest first; `feed_one` pops from the
    /// front as each page is appended.
    pending: VecDeque<NodeId>,
    /// The oldest node this window covers — the boundary `PageListSearch`
    /// starts just behind (see [`ActiveSearch::start_node`]).
    start_node: NodeId,
}

impl ActiveSearch {
    /// Build a window covering the active rows plus `needle.len() - 1`
    /// bytes of overlap into scrollback, per §4.7's "active window must
    /// include enough trailing history to catch a match straddling the
    /// active/history boundary".
    pub fn new(pages: &PageList, needle: &[u8]) -> Self {
        let start_node = Self::start_node_for(pages, needle);

        let mut pending = VecDeque::from([start_node]);
        let mut cursor = start_node;
        while cursor != pages.tail() {
            let Some(next) = pages.next(cursor) else { break };
            pending.push_back(next);
            cursor = next;
        }

        Self {
            window: SlidingWindow::new(needle, false),
            pending,
            start_node,
        }
    }

    /// The absolute row `needle.len() - 1` bytes of overlap behind the
    /// active area begins at, resolved to its owning node. Exposed so
    /// `ScreenSearch` can detect when a later rebuild moves this
    /// boundary forward (pages evicted, or scrolled content) and knows
    /// where `PageListSearch` should resume from.
    pub fn start_node_for(pages: &PageList, needle: &[u8]) -> NodeId {
        let overlap_rows = needle.len().saturating_sub(1);
        let total = pages.total_rows();
        let active = pages.active_rows() as usize;
        let start_row = total.saturating_sub(active + overlap_rows);
        pages.node_for_absolute_row(start_row).0
    }

    pub fn start_node(&self) -> NodeId {
        self.start_node
    }

    /// Feed the next not-yet-appended page into the window, if any.
    /// Returns `true` while there is more to feed.
    pub fn feed_one(&mut self, pages: &PageList) -> bool {
        let Some(node) = self.pending.pop_front() else {
            return false;
        };
        if let Some(page) = pages.page(node) {
            self.window.append(node, page);
        }
        !self.pending.is_empty()
    }

    pub fn is_fully_fed(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next(&mut self) -> Option<Selection> {
        self.window.next()
    }
}

/// Searches scrollback history, walking from a starting node back toward
/// [`PageList::head`] (the oldest retained page), one page per `feed_one`
/// call so the caller can interleave this with lock-scoped access.
pub struct PageListSearch {
    window: SlidingWindow,
    next_node: Option<NodeId>,
}

impl PageListSearch {
    /// Start walking backward from `from` (exclusive — `from` itself is
    /// assumed already covered by the caller's active window).
    pub fn new(pages: &PageList, from: NodeId, needle: &[u8]) -> Self {
        Self {
            window: SlidingWindow::new(needle, true),
            next_node: pages.prev(from),
        }
    }

    /// Feed the next (older) page into the window. Returns `false` once
    /// there are no more pages toward `head`.
    pub fn feed_one(&mut self, pages: &PageList) -> bool {
        let Some(node) = self.next_node else { return false };
        if let Some(page) = pages.page(node) {
            self.window.append(node, page);
        }
        self.next_node = pages.prev(node);
        true
    }

    pub fn has_more_pages(&self) -> bool {
        self.next_node.is_some()
    }

    /// The node the next `feed_one` call would append, without consuming
    /// it. Used by `ScreenSearch` to stop a back-fill sweep once it has
    /// just fed the page that bounds the region it needs to cover.
    pub fn peek_next(&self) -> Option<NodeId> {
        self.next_node
    }

    pub fn next(&mut self) -> Option<Selection> {
        self.window.next()
    }
}

#[cfg(test)]
mod tests {
    use vtgrid::{Cell, PageList};

    use super::*;

    fn filled(pages: &mut PageList, text: &str) {
        let y = pages.active_rows() - 1;
        let (node, local) = pages.node_for_active_row(y);
        let page = pages.page_mut(node).expect("live");
        for (x, ch) in text.chars().enumerate() {
            page.set_cell(
                local,
                x as u16,
                Cell {
                    codepoint: ch as u32,
                    ..Cell::default()
                },
            );
        }
        pages.push_row();
    }

    #[test]
    fn active_search_finds_match_in_active_rows() {
        let mut pages = PageList::new(16, 4, 1 << 20);
        filled(&mut pages, "hello world");
        let mut search = ActiveSearch::new(&pages, b"world");
        while search.feed_one(&pages) {}
        assert!(search.next().is_some());
    }

    #[test]
    fn page_list_search_walks_toward_head() {
        let mut pages = PageList::new(16, 4, 1 << 20);
        for _ in 0..8 {
            filled(&mut pages, "filler line");
        }
        filled(&mut pages, "needle-bearing row");
        let tail = pages.tail();
        let mut search = PageListSearch::new(&pages, tail, b"needle");
        let mut found = None;
        while found.is_none() && search.feed_one(&pages) {
            found = search.next();
        }
        assert!(found.is_some());
    }
}
