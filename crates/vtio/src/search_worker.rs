//! Cooperative search worker (§4.7, §5): owns a [`ScreenSearch`] and drives
//! it against a shared [`TerminalHandle`] without holding the terminal
//! lock except for the brief `feed`/`reload_active` steps. The mailbox
//! drain loop (block on `recv`, then `try_recv` in a non-blocking inner
//! loop, reacting to `Empty`/`Disconnected` distinctly) follows the same
//! reader-thread-over-`mpsc` shape `ftui-pty` uses for PTY output.

use std::sync::mpsc;

use vtsearch::{ScreenSearch, Selection};

use crate::terminal_handle::TerminalHandle;

/// A message sent to a running [`SearchWorker`].
#[derive(Debug, Clone)]
pub enum SearchCommand {
    /// Replace the current search (if any) with one for `needle`. No
    /// partial results from the old search survive — §5's "no partial
    /// search results leak across needles".
    ChangeNeedle(Vec<u8>),
    /// Tear down the current search and stop the worker loop.
    Stop,
}

/// The sending half of a search worker's mailbox.
#[derive(Clone)]
pub struct SearchMailbox {
    tx: mpsc::Sender<SearchCommand>,
}

impl SearchMailbox {
    pub fn change_needle(&self, needle: impl Into<Vec<u8>>) {
        let _ = self.tx.send(SearchCommand::ChangeNeedle(needle.into()));
    }

    pub fn stop(&self) {
        let _ = self.tx.send(SearchCommand::Stop);
    }
}

/// Drives a [`ScreenSearch`] against a [`TerminalHandle`]. Construct one
/// per terminal; run its loop on a dedicated thread and control it
/// through the paired [`SearchMailbox`].
pub struct SearchWorker {
    handle: TerminalHandle,
    mailbox: mpsc::Receiver<SearchCommand>,
    search: Option<ScreenSearch>,
}

impl SearchWorker {
    pub fn new(handle: TerminalHandle) -> (Self, SearchMailbox) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                handle,
                mailbox: rx,
                search: None,
            },
            SearchMailbox { tx },
        )
    }

    /// Run the worker's event loop until the mailbox is closed or a
    /// `Stop` arrives. Intended to be the body of a dedicated thread.
    pub fn run(&mut self) {
        while self.run_one() {}
    }

    /// Block for the next mailbox message, start or stop accordingly,
    /// then drive any resulting search lock-free until it completes or a
    /// newer message supersedes it. Returns `false` once the caller
    /// should stop calling it again.
    pub fn run_one(&mut self) -> bool {
        match self.mailbox.recv() {
            Ok(SearchCommand::ChangeNeedle(needle)) => {
                self.start_search(&needle);
                self.drive_until_idle();
                true
            }
            Ok(SearchCommand::Stop) | Err(_) => {
                self.search = None;
                false
            }
        }
    }

    fn start_search(&mut self, needle: &[u8]) {
        let mut terminal = self.handle.inner.lock();
        let pages = terminal.active_screen_mut().pages_mut();
        self.search = Some(ScreenSearch::new(pages, needle));
    }

    /// Alternate lock-free `tick()`s with brief-lock `feed()`s until the
    /// search is complete, checking for a superseding mailbox message
    /// after each step rather than blocking mid-search.
    fn drive_until_idle(&mut self) {
        loop {
            let Some(search) = self.search.as_mut() else {
                return;
            };
            if search.is_complete() {
                return;
            }
            search.tick();
            if !search.is_complete() {
                let terminal = self.handle.inner.lock();
                search.feed(terminal.active_screen().pages());
            }

            match self.mailbox.try_recv() {
                Ok(SearchCommand::ChangeNeedle(needle)) => self.start_search(&needle),
                Ok(SearchCommand::Stop) | Err(mpsc::TryRecvError::Disconnected) => {
                    self.search = None;
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => {}
            }
        }
    }

    /// Refresh the active window against the terminal's current state.
    /// The writer and search threads only share the mutex, not a change
    /// notification, so the caller (typically whoever just finished a
    /// `TerminalHandle::write`) is responsible for calling this when the
    /// screen may have changed.
    pub fn reload_active(&mut self) {
        let Some(search) = self.search.as_mut() else {
            return;
        };
        let mut terminal = self.handle.inner.lock();
        search.reload_active(terminal.active_screen_mut().pages_mut());
    }

    pub fn matches(&self) -> Vec<Selection> {
        self.search
            .as_ref()
            .map(ScreenSearch::matches)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use vtterm::TerminalOptions;

    use super::*;

    #[test]
    fn finds_a_match_after_change_needle_then_stops_on_stop() {
        let handle = TerminalHandle::new(TerminalOptions::default());
        handle.write(b"hello world\r\n").unwrap();
        let (mut worker, mailbox) = SearchWorker::new(handle);
        mailbox.change_needle(&b"world"[..]);
        mailbox.stop();

        assert!(worker.run_one());
        assert!(!worker.matches().is_empty());
        assert!(!worker.run_one());
    }

    #[test]
    fn reload_active_is_a_no_op_before_any_search_started() {
        let handle = TerminalHandle::new(TerminalOptions::default());
        let (mut worker, _mailbox) = SearchWorker::new(handle);
        worker.reload_active();
        assert!(worker.matches().is_empty());
    }
}
