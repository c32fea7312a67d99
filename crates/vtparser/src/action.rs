//! The tagged-union output of the parser.

use smallvec::SmallVec;

use crate::params::CsiParams;

/// How an OSC/DCS/APC string was terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// `BEL` (`0x07`) — the legacy xterm terminator, OSC only.
    Bel,
    /// `ST` (`ESC \`).
    St,
    /// The string was abandoned (a `CAN`/`SUB` control byte, or an
    /// unrelated escape sequence starting before `ST` arrived) rather
    /// than properly terminated.
    Cancelled,
}

/// Intermediates collected before a CSI/ESC final byte (bytes in
/// `0x20..=0x2f`). Capped at 2 per spec §4.1; further intermediates push
/// the sequence into an ignore state.
pub type Intermediates = SmallVec<[u8; 2]>;

/// One parser action. Emitted synchronously from [`crate::Parser::advance`]
/// via callback rather than a trait object — the match arms in a consumer
/// are the "dispatch", not a vtable.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A fully-decoded printable codepoint.
    Print(char),
    /// A C0 (`0x00..=0x1f`, `0x7f`) or C1 (`0x80..=0x9f`) control byte.
    Execute(u8),
    /// `CSI ... final`.
    CsiDispatch {
        intermediates: Intermediates,
        params: CsiParams,
        final_byte: u8,
        /// Whether a `?`, `<`, `=`, or `>` private-marker byte led the
        /// parameter string.
        private_marker: Option<u8>,
    },
    /// `ESC intermediates final` (anything that isn't routed to one of
    /// the other introducers).
    EscDispatch {
        intermediates: Intermediates,
        final_byte: u8,
    },
    OscStart,
    OscPut(u8),
    OscEnd(Terminator),
    DcsHook {
        intermediates: Intermediates,
        params: CsiParams,
        final_byte: u8,
        private_marker: Option<u8>,
    },
    DcsPut(u8),
    DcsUnhook,
    ApcStart,
    ApcPut(u8),
    ApcEnd,
}
