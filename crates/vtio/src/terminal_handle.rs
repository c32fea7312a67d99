//! A terminal shared between a writer and a search worker behind one
//! mutex, per §5's scheduling model: the writer holds the lock for the
//! duration of a single `write()` call; the search worker only takes it
//! for the brief, bounded `feed`/`reload_active` steps (see
//! [`crate::search_worker::SearchWorker`]).

use std::sync::Arc;

use parking_lot::Mutex;
use vtterm::{ResourceError, Terminal, TerminalOptions};

/// A cheaply cloneable, thread-shareable handle to one [`Terminal`].
#[derive(Clone)]
pub struct TerminalHandle {
    pub(crate) inner: Arc<Mutex<Terminal>>,
}

impl TerminalHandle {
    pub fn new(options: TerminalOptions) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Terminal::new(options))),
        }
    }

    /// Parse and apply `bytes`. Holds the lock for the call's duration —
    /// the only long-held lock in the model, matching the writer's role
    /// in §5.
    pub fn write(&self, bytes: &[u8]) -> Result<(), ResourceError> {
        self.inner.lock().write(bytes)
    }

    /// Drain accumulated response bytes (DSR/DA replies, OSC answers) for
    /// the caller to send back to the pty/peer.
    pub fn take_response(&self) -> Vec<u8> {
        self.inner.lock().take_response()
    }

    /// Run `f` against a locked snapshot of the terminal, e.g. for a
    /// renderer reading `Screen` state. Keep `f` short: it runs with the
    /// lock held.
    pub fn with_terminal<R>(&self, f: impl FnOnce(&Terminal) -> R) -> R {
        f(&self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_response_round_trips_under_the_lock() {
        let handle = TerminalHandle::new(TerminalOptions::default());
        handle.write(b"\x1b[6n").unwrap();
        assert!(!handle.take_response().is_empty());
    }
}
