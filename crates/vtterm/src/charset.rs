//! G0-G3 charset designation (SCS) and GL/GR shift state.

/// A designatable character set. Only the sets xterm and its descendants
/// actually switch to in practice are modeled; anything else designated
/// via SCS falls back to `Ascii` (a no-op translation table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Charset {
    #[default]
    Ascii,
    /// DEC Special Graphics (line-drawing), designated via `ESC ( 0`.
    DecSpecialGraphics,
    /// UK national, `ESC ( A`: identical to ASCII except `#` → `£`.
    Uk,
}

impl Charset {
    /// Maps an SCS final byte to the charset it designates, if recognized.
    pub fn from_scs_final(final_byte: u8) -> Option<Self> {
        match final_byte {
            b'B' => Some(Charset::Ascii),
            b'0' => Some(Charset::DecSpecialGraphics),
            b'A' => Some(Charset::Uk),
            _ => None,
        }
    }

    /// Translate a printed codepoint through this charset's table.
    pub fn translate(self, cp: char) -> char {
        match self {
            Charset::Ascii => cp,
            Charset::Uk => {
                if cp == '#' {
                    '\u{00A3}'
                } else {
                    cp
                }
            }
            Charset::DecSpecialGraphics => dec_special_graphics(cp),
        }
    }
}

/// DEC Special Graphics maps the printable ASCII range `0x60..=0x7E` to
/// line-drawing glyphs; everything outside that range passes through.
fn dec_special_graphics(cp: char) -> char {
    let Ok(b) = u8::try_from(cp as u32) else {
        return cp;
    };
    match b {
        0x60 => '\u{25C6}', // ♦
        0x61 => '\u{2592}', // ▒
        0x62 => '\u{2409}', // HT symbol
        0x63 => '\u{240C}', // FF symbol
        0x64 => '\u{240D}', // CR symbol
        0x65 => '\u{240A}', // LF symbol
        0x66 => '\u{00B0}', // °
        0x67 => '\u{00B1}', // ±
        0x68 => '\u{2424}', // NL symbol
        0x69 => '\u{240B}', // VT symbol
        0x6A => '\u{2518}', // ┘
        0x6B => '\u{2510}', // ┐
        0x6C => '\u{250C}', // ┌
        0x6D => '\u{2514}', // └
        0x6E => '\u{253C}', // ┼
        0x6F => '\u{23BA}', // scan line 1
        0x70 => '\u{23BB}', // scan line 3
        0x71 => '\u{2500}', // ─
        0x72 => '\u{23BC}', // scan line 7
        0x73 => '\u{23BD}', // scan line 9
        0x74 => '\u{251C}', // ├
        0x75 => '\u{2524}', // ┤
        0x76 => '\u{2534}', // ┴
        0x77 => '\u{252C}', // ┬
        0x78 => '\u{2502}', // │
        0x79 => '\u{2264}', // ≤
        0x7A => '\u{2265}', // ≥
        0x7B => '\u{03C0}', // π
        0x7C => '\u{2260}', // ≠
        0x7D => '\u{00A3}', // £
        0x7E => '\u{00B7}', // ·
        _ => cp,
    }
}

/// Which of G0..G3 is designated into GL, and which into GR (GR is rarely
/// used by xterm-family emulators but tracked for completeness).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GSlot {
    #[default]
    G0,
    G1,
    G2,
    G3,
}

/// The full charset-shift state: four designated slots plus which slot is
/// currently shifted into GL/GR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharsetState {
    pub slots: [Charset; 4],
    pub gl: GSlot,
    pub gr: GSlot,
    /// Single-shift: the next printed character only uses this slot, then
    /// reverts. Set by SS2/SS3 (`ESC N` / `ESC O`).
    pub single_shift: Option<GSlot>,
}

impl Default for CharsetState {
    fn default() -> Self {
        Self {
            slots: [Charset::Ascii; 4],
            gl: GSlot::G0,
            gr: GSlot::G1,
            single_shift: None,
        }
    }
}

impl CharsetState {
    pub fn designate(&mut self, slot: GSlot, charset: Charset) {
        self.slots[slot as usize] = charset;
    }

    /// Resolve and consume the charset that should translate the next
    /// printed codepoint.
    pub fn active_and_consume_single_shift(&mut self) -> Charset {
        if let Some(slot) = self.single_shift.take() {
            self.slots[slot as usize]
        } else {
            self.slots[self.gl as usize]
        }
    }
}
