//! Extended 256-color palette generation via CIELAB trilinear interpolation.

use palette::{Lab, white_point::D65};

use crate::rgb8::Rgb8;

/// The eight named anchors a 256-color palette cube is interpolated
/// between. `base1`..`base6` correspond to ANSI indices 1..6
/// (red, green, yellow, blue, magenta, cyan); `bg`/`fg` are the `000`/`555`
/// cube corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteAnchors {
    pub bg: Rgb8,
    pub fg: Rgb8,
    pub base1_red: Rgb8,
    pub base2_green: Rgb8,
    pub base3_yellow: Rgb8,
    pub base4_blue: Rgb8,
    pub base5_magenta: Rgb8,
    pub base6_cyan: Rgb8,
}

impl PaletteAnchors {
    /// Build anchors from a conventional 16-entry ANSI base palette
    /// (indices 0-15: black, red, green, yellow, blue, magenta, cyan,
    /// white, then their bright counterparts) plus explicit fg/bg.
    pub fn from_base16(base16: &[Rgb8; 16], fg: Rgb8, bg: Rgb8) -> Self {
        Self {
            bg,
            fg,
            base1_red: base16[1],
            base2_green: base16[2],
            base3_yellow: base16[3],
            base4_blue: base16[4],
            base5_magenta: base16[5],
            base6_cyan: base16[6],
        }
    }
}

fn lab_add(a: Lab<D65, f64>, b: Lab<D65, f64>) -> Lab<D65, f64> {
    Lab::new(a.l + b.l, a.a + b.a, a.b + b.b)
}

fn lab_scale(a: Lab<D65, f64>, k: f64) -> Lab<D65, f64> {
    Lab::new(a.l * k, a.a * k, a.b * k)
}

fn lab_lerp(a: Lab<D65, f64>, b: Lab<D65, f64>, t: f64) -> Lab<D65, f64> {
    lab_add(lab_scale(a, 1.0 - t), lab_scale(b, t))
}

/// Trilinear-interpolate the 8 cube corners at normalized coordinates
/// `(tr, tg, tb) ∈ [0, 1]^3`.
fn trilinear(anchors: &PaletteAnchors, tr: f64, tg: f64, tb: f64) -> Lab<D65, f64> {
    let c000 = anchors.bg.to_lab();
    let c100 = anchors.base1_red.to_lab();
    let c010 = anchors.base2_green.to_lab();
    let c001 = anchors.base4_blue.to_lab();
    let c110 = anchors.base3_yellow.to_lab();
    let c101 = anchors.base5_magenta.to_lab();
    let c011 = anchors.base6_cyan.to_lab();
    let c111 = anchors.fg.to_lab();

    let w000 = (1.0 - tr) * (1.0 - tg) * (1.0 - tb);
    let w100 = tr * (1.0 - tg) * (1.0 - tb);
    let w010 = (1.0 - tr) * tg * (1.0 - tb);
    let w001 = (1.0 - tr) * (1.0 - tg) * tb;
    let w110 = tr * tg * (1.0 - tb);
    let w101 = tr * (1.0 - tg) * tb;
    let w011 = (1.0 - tr) * tg * tb;
    let w111 = tr * tg * tb;

    let mut acc = lab_scale(c000, w000);
    acc = lab_add(acc, lab_scale(c100, w100));
    acc = lab_add(acc, lab_scale(c010, w010));
    acc = lab_add(acc, lab_scale(c001, w001));
    acc = lab_add(acc, lab_scale(c110, w110));
    acc = lab_add(acc, lab_scale(c101, w101));
    acc = lab_add(acc, lab_scale(c011, w011));
    acc = lab_add(acc, lab_scale(c111, w111));
    acc
}

/// Generate the 256-entry palette: indices 0-15 come from `base16`
/// unchanged, 16-231 are the 6x6x6 color cube, 232-255 are a 24-step
/// grayscale ramp from `anchors.bg` to `anchors.fg`.
///
/// Any index set in `skip_mask` is left untouched (copied from `existing`
/// rather than regenerated) — used to preserve palette entries the user
/// has explicitly overridden via `OSC 4`.
pub fn generate_256(
    anchors: &PaletteAnchors,
    base16: &[Rgb8; 16],
    existing: &[Rgb8; 256],
    skip_mask: &[bool; 256],
) -> [Rgb8; 256] {
    let mut out = *existing;

    for (i, color) in base16.iter().enumerate() {
        if !skip_mask[i] {
            out[i] = *color;
        }
    }

    for r in 0..6u16 {
        for g in 0..6u16 {
            for b in 0..6u16 {
                let idx = 16 + 36 * r + 6 * g + b;
                if skip_mask[idx as usize] {
                    continue;
                }
                let tr = r as f64 / 5.0;
                let tg = g as f64 / 5.0;
                let tb = b as f64 / 5.0;
                out[idx as usize] = Rgb8::from_lab(trilinear(anchors, tr, tg, tb));
            }
        }
    }

    let bg_lab = anchors.bg.to_lab();
    let fg_lab = anchors.fg.to_lab();
    for i in 0..24usize {
        let idx = 232 + i;
        if skip_mask[idx] {
            continue;
        }
        let t = (i + 1) as f64 / 25.0;
        out[idx] = Rgb8::from_lab(lab_lerp(bg_lab, fg_lab, t));
    }

    out
}
