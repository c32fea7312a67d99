//! The VT-compatible terminal executor (§4.4): the [`Stream`] dispatcher,
//! [`Screen`], and [`Terminal`] itself, built on top of `vtgrid`'s
//! page-list grid, `vtosc`'s OSC command classifier and `vtparser`'s byte
//! DFA.
//!
//! `Terminal` is the crate's single entry point: construct one with
//! [`TerminalOptions`], feed it bytes with [`Terminal::write`], and read
//! back any response bytes with [`Terminal::take_response`]. Everything
//! else here is the machinery `Terminal` uses internally, exposed for
//! callers that need to inspect screen state directly (a renderer, an
//! inspector) rather than just drive the write path.

pub mod charset;
pub mod cursor;
pub mod error;
pub mod kitty;
pub mod mode;
pub mod options;
pub mod print;
pub mod screen;
pub mod selection;
pub mod sgr;
mod stream;
pub mod terminal;

pub use error::{ColorParseError, ResourceError};
pub use options::TerminalOptions;
pub use screen::Screen;
pub use terminal::{ScreenKey, ScreenSet, Terminal};
