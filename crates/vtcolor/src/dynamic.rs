//! Runtime-overridable color state: the 256-entry indexed palette plus the
//! ten "dynamic colors" (`OSC 10-19`).

use crate::palette_gen::{PaletteAnchors, generate_256};
use crate::rgb8::Rgb8;

/// The generated/overridden 256-color indexed palette.
///
/// `current` is what rendering reads; `original` is what `OSC 104`
/// (reset one or all palette colors) restores to. Overridden indices are
/// tracked so [`DynamicPalette::change_default`] can regenerate the base
/// palette without clobbering indices the user explicitly set.
#[derive(Debug, Clone)]
pub struct DynamicPalette {
    current: [Rgb8; 256],
    original: [Rgb8; 256],
    overridden: [bool; 256],
    base16: [Rgb8; 16],
    anchors: PaletteAnchors,
}

impl DynamicPalette {
    pub fn new(base16: [Rgb8; 16], fg: Rgb8, bg: Rgb8) -> Self {
        let anchors = PaletteAnchors::from_base16(&base16, fg, bg);
        let skip = [false; 256];
        let generated = generate_256(&anchors, &base16, &[Rgb8::default(); 256], &skip);
        Self {
            current: generated,
            original: generated,
            overridden: [false; 256],
            base16,
            anchors,
        }
    }

    #[inline]
    pub fn get(&self, index: u8) -> Rgb8 {
        self.current[index as usize]
    }

    #[inline]
    pub fn is_overridden(&self, index: u8) -> bool {
        self.overridden[index as usize]
    }

    /// `OSC 4` — set a palette index at runtime.
    pub fn set(&mut self, index: u8, color: Rgb8) {
        self.current[index as usize] = color;
        self.overridden[index as usize] = true;
    }

    /// `OSC 104` with an explicit index — reset one entry to its generated
    /// default.
    pub fn reset(&mut self, index: u8) {
        self.current[index as usize] = self.original[index as usize];
        self.overridden[index as usize] = false;
    }

    /// `OSC 104` with no arguments — reset every entry.
    pub fn reset_all(&mut self) {
        self.current = self.original;
        self.overridden = [false; 256];
    }

    /// Regenerate the base palette from new fg/bg/base16 anchors (e.g. a
    /// theme change), preserving any indices the user has overridden.
    pub fn change_default(&mut self, base16: [Rgb8; 16], fg: Rgb8, bg: Rgb8) {
        self.anchors = PaletteAnchors::from_base16(&base16, fg, bg);
        self.base16 = base16;
        self.original = generate_256(&self.anchors, &base16, &self.original, &[false; 256]);
        for i in 0..256 {
            if !self.overridden[i] {
                self.current[i] = self.original[i];
            }
        }
    }

    pub fn anchors(&self) -> &PaletteAnchors {
        &self.anchors
    }

    pub fn base16(&self) -> &[Rgb8; 16] {
        &self.base16
    }
}

/// The ten `OSC 10-19` dynamic color slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DynamicColorSlot {
    Foreground,
    Background,
    Cursor,
    PointerForeground,
    PointerBackground,
    TekForeground,
    TekBackground,
    HighlightBackground,
    TekCursor,
    HighlightForeground,
}

impl DynamicColorSlot {
    /// Maps to the `OSC` numeric code used for set/query (10-19) and the
    /// corresponding reset code is this plus 100.
    pub fn osc_code(self) -> u16 {
        match self {
            Self::Foreground => 10,
            Self::Background => 11,
            Self::Cursor => 12,
            Self::PointerForeground => 13,
            Self::PointerBackground => 14,
            Self::TekForeground => 15,
            Self::TekBackground => 16,
            Self::HighlightBackground => 17,
            Self::TekCursor => 18,
            Self::HighlightForeground => 19,
        }
    }

    pub fn from_osc_code(code: u16) -> Option<Self> {
        Some(match code {
            10 => Self::Foreground,
            11 => Self::Background,
            12 => Self::Cursor,
            13 => Self::PointerForeground,
            14 => Self::PointerBackground,
            15 => Self::TekForeground,
            16 => Self::TekBackground,
            17 => Self::HighlightBackground,
            18 => Self::TekCursor,
            19 => Self::HighlightForeground,
            _ => return None,
        })
    }

    const ALL: [DynamicColorSlot; 10] = [
        Self::Foreground,
        Self::Background,
        Self::Cursor,
        Self::PointerForeground,
        Self::PointerBackground,
        Self::TekForeground,
        Self::TekBackground,
        Self::HighlightBackground,
        Self::TekCursor,
        Self::HighlightForeground,
    ];

    fn slot_index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).expect("exhaustive")
    }
}

/// Tracks the ten dynamic colors against their configured defaults.
#[derive(Debug, Clone)]
pub struct DynamicColors {
    defaults: [Rgb8; 10],
    current: [Rgb8; 10],
    overridden: [bool; 10],
}

impl DynamicColors {
    pub fn new(default_fg: Rgb8, default_bg: Rgb8, default_cursor: Rgb8) -> Self {
        let mut defaults = [Rgb8::default(); 10];
        defaults[DynamicColorSlot::Foreground.slot_index()] = default_fg;
        defaults[DynamicColorSlot::Background.slot_index()] = default_bg;
        defaults[DynamicColorSlot::Cursor.slot_index()] = default_cursor;
        Self {
            defaults,
            current: defaults,
            overridden: [false; 10],
        }
    }

    pub fn get(&self, slot: DynamicColorSlot) -> Rgb8 {
        self.current[slot.slot_index()]
    }

    pub fn set(&mut self, slot: DynamicColorSlot, color: Rgb8) {
        self.current[slot.slot_index()] = color;
        self.overridden[slot.slot_index()] = true;
    }

    pub fn reset(&mut self, slot: DynamicColorSlot) {
        self.current[slot.slot_index()] = self.defaults[slot.slot_index()];
        self.overridden[slot.slot_index()] = false;
    }

    pub fn is_overridden(&self, slot: DynamicColorSlot) -> bool {
        self.overridden[slot.slot_index()]
    }
}
