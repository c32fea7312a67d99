//! SGR (`CSI ... m`) parameter parsing into [`Style`] updates.

use vtgrid::{Color, Style, UnderlineStyle};
use vtparser::CsiParams;

/// Apply every SGR parameter group in `params` to `style` in order.
/// Malformed or out-of-range extended-color groups are ignored per group
/// rather than aborting the whole sequence.
pub fn apply_sgr(style: &mut Style, params: &CsiParams) {
    if params.is_empty() {
        *style = Style::DEFAULT;
        return;
    }

    let mut groups = params.groups().peekable();
    while let Some(group) = groups.next() {
        let code = group.first().copied().unwrap_or(0);
        match code {
            0 => *style = Style::DEFAULT,
            1 => style.bold = true,
            2 => style.faint = true,
            3 => style.italic = true,
            4 => style.underline = decode_underline(group),
            5 => style.blink = true,
            6 => style.rapid_blink = true,
            7 => style.reverse = true,
            8 => style.invisible = true,
            9 => style.strikethrough = true,
            21 => style.underline = UnderlineStyle::Double,
            22 => {
                style.bold = false;
                style.faint = false;
            }
            23 => style.italic = false,
            24 => style.underline = UnderlineStyle::None,
            25 => {
                style.blink = false;
                style.rapid_blink = false;
            }
            27 => style.reverse = false,
            28 => style.invisible = false,
            29 => style.strikethrough = false,
            30..=37 => style.fg = Color::Indexed((code - 30) as u8),
            38 => {
                if let Some(color) = decode_extended_color(group) {
                    style.fg = color;
                }
            }
            39 => style.fg = Color::Default,
            40..=47 => style.bg = Color::Indexed((code - 40) as u8),
            48 => {
                if let Some(color) = decode_extended_color(group) {
                    style.bg = color;
                }
            }
            49 => style.bg = Color::Default,
            53 => style.overline = true,
            55 => style.overline = false,
            58 => {
                if let Some(color) = decode_extended_color(group) {
                    style.underline_color = color;
                }
            }
            59 => style.underline_color = Color::Default,
            90..=97 => style.fg = Color::Indexed((code - 90 + 8) as u8),
            100..=107 => style.bg = Color::Indexed((code - 100 + 8) as u8),
            _ => {}
        }
    }
}

fn decode_underline(group: &[u16]) -> UnderlineStyle {
    // `4` alone is single underline; `4:n` (colon subparameter) selects a
    // style per the Kitty/iTerm underline-styles extension.
    match group.get(1).copied() {
        None | Some(0) => UnderlineStyle::None,
        Some(1) => UnderlineStyle::Single,
        Some(2) => UnderlineStyle::Double,
        Some(3) => UnderlineStyle::Curly,
        Some(4) => UnderlineStyle::Dotted,
        Some(5) => UnderlineStyle::Dashed,
        Some(_) => UnderlineStyle::Single,
    }
}

/// Decode a `38;5;n` / `38;2;r;g;b` extended color group (and the `48`/`58`
/// equivalents), accepting both the `;`-separated and `:`-subparameter
/// forms (`38:5:n`, `38:2::r:g:b` with an empty colorspace-id field).
fn decode_extended_color(group: &[u16]) -> Option<Color> {
    match group.get(1).copied() {
        Some(5) => group.get(2).map(|&n| Color::Indexed(n as u8)),
        Some(2) => {
            // Colon form may carry an optional colorspace id as group[2],
            // shifting r/g/b to [3..6]; semicolon form has no colorspace
            // id so r/g/b are at [2..5]. Disambiguate by count: if there
            // are at least 6 entries total, assume a colorspace id is
            // present.
            let (r, g, b) = if group.len() >= 6 {
                (group[3], group[4], group[5])
            } else {
                (*group.get(2)?, *group.get(3)?, *group.get(4)?)
            };
            Some(Color::Rgb(r as u8, g as u8, b as u8))
        }
        _ => None,
    }
}
