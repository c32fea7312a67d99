//! OSC payload classification: turns the raw bytes between `OSC` and its
//! terminator into a typed [`Command`].
//!
//! This crate knows nothing about escape-sequence framing — that's
//! `vtparser`'s job, which hands this crate complete OSC bodies via its
//! `Action::OscPut`/`Action::OscEnd` events. It also knows nothing about
//! grid state, palettes, or terminal modes — it only classifies bytes.

mod clipboard;
mod color;
mod command;
mod conemu;
mod hyperlink;
mod iterm2;
mod parser;
mod semantic_prompt;

pub use clipboard::{ClipboardCommand, ClipboardPayload, ClipboardV2Command, ClipboardV2Op, ClipboardV2Status};
pub use color::ColorRequest;
pub use command::{Command, SpecialColorSlot, TitleTarget};
pub use conemu::{ConEmuCommand, ProgressState, XtermEmulation};
pub use hyperlink::HyperlinkCommand;
pub use iterm2::{CursorShapeValue, Iterm2Command};
pub use parser::parse;
pub use semantic_prompt::{SemanticPromptAction, SemanticPromptCommand, SemanticPromptOptions};
