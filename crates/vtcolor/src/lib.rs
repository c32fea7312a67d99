//! 256-color palette generation and dynamic color state.

pub mod dynamic;
pub mod palette_gen;
pub mod rgb8;

pub use dynamic::{DynamicColorSlot, DynamicColors, DynamicPalette};
pub use palette_gen::{PaletteAnchors, generate_256};
pub use rgb8::Rgb8;

/// A conventional xterm-like base-16 ANSI palette, used as the default
/// anchors when a caller doesn't supply their own theme.
pub const DEFAULT_BASE16: [Rgb8; 16] = [
    Rgb8::new(0x00, 0x00, 0x00),
    Rgb8::new(0xcd, 0x00, 0x00),
    Rgb8::new(0x00, 0xcd, 0x00),
    Rgb8::new(0xcd, 0xcd, 0x00),
    Rgb8::new(0x00, 0x00, 0xee),
    Rgb8::new(0xcd, 0x00, 0xcd),
    Rgb8::new(0x00, 0xcd, 0xcd),
    Rgb8::new(0xe5, 0xe5, 0xe5),
    Rgb8::new(0x7f, 0x7f, 0x7f),
    Rgb8::new(0xff, 0x00, 0x00),
    Rgb8::new(0x00, 0xff, 0x00),
    Rgb8::new(0xff, 0xff, 0x00),
    Rgb8::new(0x5c, 0x5c, 0xff),
    Rgb8::new(0xff, 0x00, 0xff),
    Rgb8::new(0x00, 0xff, 0xff),
    Rgb8::new(0xff, 0xff, 0xff),
];

pub const DEFAULT_FG: Rgb8 = Rgb8::new(0xe5, 0xe5, 0xe5);
pub const DEFAULT_BG: Rgb8 = Rgb8::new(0x00, 0x00, 0x00);
pub const DEFAULT_CURSOR: Rgb8 = Rgb8::new(0xe5, 0xe5, 0xe5);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_roundtrip_within_rounding_tolerance() {
        let c = Rgb8::new(120, 60, 200);
        let back = Rgb8::from_lab(c.to_lab());
        assert!((c.r as i16 - back.r as i16).abs() <= 1);
        assert!((c.g as i16 - back.g as i16).abs() <= 1);
        assert!((c.b as i16 - back.b as i16).abs() <= 1);
    }

    #[test]
    fn generated_palette_preserves_base16_and_corners() {
        let palette = DynamicPalette::new(DEFAULT_BASE16, DEFAULT_FG, DEFAULT_BG);
        for i in 0..16 {
            assert_eq!(palette.get(i as u8), DEFAULT_BASE16[i]);
        }
        // Cube corner 16 is (0,0,0) -> should match bg closely.
        let corner_bg = palette.get(16);
        assert!(corner_bg.contrast_ratio(DEFAULT_BG) < 1.2);
        // Cube corner 231 is (5,5,5) -> should match fg closely.
        let corner_fg = palette.get(231);
        assert!(corner_fg.contrast_ratio(DEFAULT_FG) < 1.2);
    }

    #[test]
    fn override_survives_change_default() {
        let mut palette = DynamicPalette::new(DEFAULT_BASE16, DEFAULT_FG, DEFAULT_BG);
        palette.set(1, Rgb8::new(10, 20, 30));
        assert!(palette.is_overridden(1));
        palette.change_default(DEFAULT_BASE16, DEFAULT_BG, DEFAULT_FG);
        assert_eq!(palette.get(1), Rgb8::new(10, 20, 30));
    }

    #[test]
    fn dynamic_color_reset_restores_default() {
        let mut colors = DynamicColors::new(DEFAULT_FG, DEFAULT_BG, DEFAULT_CURSOR);
        colors.set(DynamicColorSlot::Foreground, Rgb8::new(1, 2, 3));
        assert!(colors.is_overridden(DynamicColorSlot::Foreground));
        colors.reset(DynamicColorSlot::Foreground);
        assert_eq!(colors.get(DynamicColorSlot::Foreground), DEFAULT_FG);
        assert!(!colors.is_overridden(DynamicColorSlot::Foreground));
    }
}
