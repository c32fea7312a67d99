//! The `Command` tagged union: the classified result of parsing one OSC
//! payload.

use crate::clipboard::{ClipboardCommand, ClipboardV2Command};
use crate::color::ColorRequest;
use crate::conemu::ConEmuCommand;
use crate::hyperlink::HyperlinkCommand;
use crate::iterm2::Iterm2Command;
use crate::semantic_prompt::SemanticPromptCommand;

/// Which of `OSC 0/1/2` was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleTarget {
    IconAndWindow,
    IconOnly,
    WindowOnly,
}

/// One of the five `OSC 5` special colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialColorSlot {
    Bold,
    Underline,
    Blink,
    Reverse,
    Italic,
}

impl SpecialColorSlot {
    pub(crate) fn from_index(i: u16) -> Option<Self> {
        Some(match i {
            0 => Self::Bold,
            1 => Self::Underline,
            2 => Self::Blink,
            3 => Self::Reverse,
            4 => Self::Italic,
            _ => return None,
        })
    }
}

/// The classified result of parsing an OSC payload's numeric code and
/// body. Unrecognized/malformed payloads become [`Command::Unknown`]
/// rather than failing the parse.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetTitle {
        target: TitleTarget,
        text: String,
    },
    /// `OSC 4` — one entry per `index;spec` pair accepted before the
    /// first malformed one (§4.2: "accumulate accepted values up to the
    /// first malformed one").
    PaletteColor(Vec<(u8, ColorRequest)>),
    /// `OSC 5` — special colors (bold/underline/blink/reverse/italic).
    SpecialColor(Vec<(SpecialColorSlot, ColorRequest)>),
    /// `OSC 7` — report/set the current working directory, usually a
    /// `file://host/path` URI.
    WorkingDirectory(String),
    Hyperlink(HyperlinkCommand),
    /// `OSC 9` with a plain-text body (no `N;` subcode prefix) — an
    /// iTerm2-style desktop notification.
    DesktopNotification(String),
    /// `OSC 9 ; N ; ...` — a ConEmu extension subcode.
    ConEmu(ConEmuCommand),
    /// `OSC 10..19` — one of the ten dynamic colors, keyed by its OSC
    /// code (`10..=19`) so this crate doesn't need to depend on
    /// `vtcolor`'s `DynamicColorSlot` just to name it.
    DynamicColor(u16, ColorRequest),
    /// `OSC 52` legacy clipboard.
    ClipboardLegacy(ClipboardCommand),
    /// `OSC 104` reset one palette index, or every index if `None`.
    ResetPaletteColor(Option<u8>),
    /// `OSC 110..119` reset one dynamic color, keyed by its base `10..19`
    /// code (i.e. `code - 100`).
    ResetDynamicColor(u16),
    SemanticPrompt(SemanticPromptCommand),
    /// `OSC 5522` kitty clipboard protocol v2.
    ClipboardV2(ClipboardV2Command),
    /// `OSC 1337` iTerm2 proprietary command family.
    Iterm2(Iterm2Command),
    /// A recognized numeric code whose body didn't parse, or an entirely
    /// unrecognized code. The raw payload is preserved so a caller that
    /// cares can still inspect it.
    Unknown { code: Option<u16>, payload: Vec<u8> },
}
