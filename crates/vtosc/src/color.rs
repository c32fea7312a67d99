//! Color-spec parsing shared by every OSC family that carries a color
//! (palette set `4`, special colors `5`, dynamic colors `10..19`).
//!
//! The grammar itself (`#rgb`, `rgb:H/H/H`, `rgbi:f/f/f`, X11 names) lives
//! in `xparsecolor`; this module only adds the "the argument is `?`,
//! meaning query rather than set" convention `OSC` color commands share.

use xparsecolor::XColor;

/// A parsed `index ; spec` field, which is either a set (spec was a real
/// color) or a query (spec was the literal `?`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorRequest {
    Set(XColor),
    Query,
}

impl ColorRequest {
    pub fn parse(spec: &[u8]) -> Option<Self> {
        if spec == b"?" {
            return Some(Self::Query);
        }
        XColor::try_from_bytes(spec).ok().map(Self::Set)
    }
}
