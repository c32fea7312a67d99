//! Whole-screen search orchestration (§4.7): coordinates an
//! [`ActiveSearch`] over the live screen with a [`PageListSearch`] walking
//! scrollback, so a caller can make progress without holding the terminal
//! lock except for the brief, bounded moments that actually touch page
//! content.

use vtgrid::{NodeId, PageList, PinId};

use crate::page_list_search::{ActiveSearch, PageListSearch};
use crate::sliding_window::Selection;

/// Where the scrollback sweep currently stands. The active window itself
/// has no feed/search split here: it is small (active rows plus a sliver
/// of overlap) and is recomputed wholesale under one lock hold in
/// [`ScreenSearch::new`]/[`ScreenSearch::reload_active`]. Scrollback can
/// be arbitrarily large, so it is fed one page at a time instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for `feed()` to hand the history searcher its next page.
    HistoryFeed,
    /// Draining buffered matches out of the history searcher.
    History,
    /// Scrollback exhausted (or there was none) — nothing left to find.
    Complete,
}

/// Incremental substring search across an entire screen: active rows plus
/// all retained scrollback. One instance searches for one needle; a
/// needle change means building a new one.
pub struct ScreenSearch {
    needle: Vec<u8>,
    phase: Phase,
    active: ActiveSearch,
    /// Pin at the active window's oldest covered row. Its `garbage` flag,
    /// checked on every `reload_active`, is how eviction of the page it
    /// was registered against is detected (§5's "invariants across lock
    /// drops").
    start_pin: PinId,
    history: PageListSearch,
    /// Recomputed wholesale on each `reload_active`.
    active_results: Vec<Selection>,
    /// Most-recent-page-first; extended at the front by `feed`-driven
    /// `tick`s and by back-fill on `reload_active`.
    history_results: Vec<Selection>,
}

impl ScreenSearch {
    pub fn new(pages: &mut PageList, needle: &[u8]) -> Self {
        let mut active = ActiveSearch::new(pages, needle);
        while active.feed_one(pages) {}
        let active_results = drain_all(&mut active);

        let start_node = active.start_node();
        let start_pin = pages.create_pin(start_node, 0, 0);
        let history = PageListSearch::new(pages, start_node, needle);
        let phase = if history.has_more_pages() {
            Phase::HistoryFeed
        } else {
            Phase::Complete
        };

        Self {
            needle: needle.to_vec(),
            phase,
            active,
            start_pin,
            history,
            active_results,
            history_results: Vec::new(),
        }
    }

    pub fn needle(&self) -> &[u8] {
        &self.needle
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Make progress without the screen lock: drain the next buffered
    /// match out of the history searcher, or notice it is dry and move to
    /// `HistoryFeed`/`Complete`. A no-op once `Complete`, or while waiting
    /// on the next `feed()`.
    pub fn tick(&mut self) {
        if self.phase != Phase::History {
            return;
        }
        match self.history.next() {
            Some(m) => self.history_results.push(m),
            None => {
                self.phase = if self.history.has_more_pages() {
                    Phase::HistoryFeed
                } else {
                    Phase::Complete
                };
            }
        }
    }

    /// Lock-scoped: append the next history page to the sliding window.
    /// A no-op outside `HistoryFeed`.
    pub fn feed(&mut self, pages: &PageList) {
        if self.phase != Phase::HistoryFeed {
            return;
        }
        self.history.feed_one(pages);
        self.phase = Phase::History;
    }

    /// Lock-scoped: refresh the active window. If the registered
    /// start-of-window pin has gone `garbage` (its page was evicted),
    /// discard all state and start over. Otherwise, if the active
    /// window's starting node moved forward (new content pushed older
    /// rows out of the active area), back-fill `history_results` with any
    /// matches in the pages that just became scrollback.
    pub fn reload_active(&mut self, pages: &mut PageList) {
        let garbage = pages.pin(self.start_pin).map_or(true, |p| p.garbage);
        if garbage {
            *self = ScreenSearch::new(pages, &self.needle);
            return;
        }

        let old_start = self.active.start_node();
        self.active = ActiveSearch::new(pages, &self.needle);
        while self.active.feed_one(pages) {}
        self.active_results = drain_all(&mut self.active);

        let new_start = self.active.start_node();
        if new_start != old_start {
            self.backfill_vacated_pages(pages, old_start, new_start);
            pages.remove_pin(self.start_pin);
            self.start_pin = pages.create_pin(new_start, 0, 0);
        }
    }

    /// Search the pages between the old and new active-window boundary
    /// (now vacated into scrollback) and splice any matches into
    /// `history_results` ahead of the existing ones, since they are more
    /// recent than anything `self.history` has already found.
    fn backfill_vacated_pages(&mut self, pages: &PageList, old_start: NodeId, new_start: NodeId) {
        let mut gap = PageListSearch::new(pages, new_start, &self.needle);
        let mut found = Vec::new();
        loop {
            let Some(node) = gap.peek_next() else { break };
            let reached_old_boundary = node == old_start;
            gap.feed_one(pages);
            while let Some(m) = gap.next() {
                found.push(m);
            }
            if reached_old_boundary {
                break;
            }
        }
        found.extend(std::mem::take(&mut self.history_results));
        self.history_results = found;
    }

    /// All matches found so far, bottom-to-top: the active window's
    /// matches newest-first, followed by scrollback's.
    pub fn matches(&self) -> Vec<Selection> {
        let mut out: Vec<Selection> = self.active_results.iter().rev().copied().collect();
        out.extend(self.history_results.iter().copied());
        out
    }
}

fn drain_all(active: &mut ActiveSearch) -> Vec<Selection> {
    let mut out = Vec::new();
    while let Some(m) = active.next() {
        out.push(m);
    }
    out
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
    fn finds_match_in_active_rows_immediately() {
        let mut pages = PageList::new(16, 4, 1 << 20);
        filled(&mut pages, "hello world");
        let search = ScreenSearch::new(&mut pages, b"world");
        assert_eq!(search.matches().len(), 1);
    }

    #[test]
    fn drives_history_search_to_completion_via_tick_and_feed() {
        let mut pages = PageList::new(16, 4, 1 << 20);
        for _ in 0..20 {
            filled(&mut pages, "filler row with needle word");
        }
        let mut search = ScreenSearch::new(&mut pages, b"needle");
        let mut guard = 0;
        while !search.is_complete() && guard < 10_000 {
            search.tick();
            search.feed(&pages);
            guard += 1;
        }
        assert!(search.is_complete());
        assert!(!search.matches().is_empty());
    }

    #[test]
    fn reload_active_recovers_after_eviction_marks_pin_garbage() {
        let mut pages = PageList::new(8, 2, 256);
        for i in 0..64 {
            filled(&mut pages, &format!("row {i} needle"));
        }
        let mut search = ScreenSearch::new(&mut pages, b"needle");
        for i in 64..128 {
            filled(&mut pages, &format!("row {i} needle"));
        }
        // Must not panic even though the page backing `start_pin` may have
        // been evicted by the writes above.
        search.reload_active(&mut pages);
        assert!(!search.matches().is_empty());
    }
}
