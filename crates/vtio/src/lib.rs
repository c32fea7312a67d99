#![warn(clippy::pedantic)]

mod search_worker;
mod terminal_handle;

pub use crate::search_worker::{SearchCommand, SearchMailbox, SearchWorker};
pub use crate::terminal_handle::TerminalHandle;
pub use vtgrid::{NodeId, Pin};
pub use vtsearch::Selection;
pub use vtterm::{ResourceError, Terminal, TerminalOptions};
