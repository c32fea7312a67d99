//! 8-bit-per-channel RGB, the unit the palette is stored in.

use palette::{Lab, Srgb, white_point::D65};
use xparsecolor::XColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_lab(self) -> Lab<D65, f64> {
        XColor::Rgb {
            red: self.r as u16 * 257,
            green: self.g as u16 * 257,
            blue: self.b as u16 * 257,
        }
        .to_lab()
    }

    pub fn from_lab(lab: Lab<D65, f64>) -> Self {
        let (r, g, b) = XColor::from_lab(lab).to_rgb8();
        Self { r, g, b }
    }

    pub fn to_srgb(self) -> Srgb<f64> {
        Srgb::new(
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }

    /// Relative luminance per WCAG, used for contrast calculations.
    pub fn relative_luminance(self) -> f64 {
        let srgb = self.to_srgb();
        let lin = |c: f64| {
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * lin(srgb.red) + 0.7152 * lin(srgb.green) + 0.0722 * lin(srgb.blue)
    }

    /// WCAG contrast ratio between two colors, in `[1.0, 21.0]`.
    pub fn contrast_ratio(self, other: Rgb8) -> f64 {
        let l1 = self.relative_luminance();
        let l2 = other.relative_luminance();
        let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }
}

impl From<(u8, u8, u8)> for Rgb8 {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb8> for (u8, u8, u8) {
    fn from(c: Rgb8) -> Self {
        (c.r, c.g, c.b)
    }
}
