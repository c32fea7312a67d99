//! The smallest addressable unit of the grid.

/// Reference-counted pool index. `0` always means "the default/no value",
/// so pool storage is 1-indexed internally.
macro_rules! pool_ref {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub(crate) std::num::NonZeroU32);

        impl $name {
            #[inline]
            pub(crate) fn from_index(idx: u32) -> Self {
                Self(std::num::NonZeroU32::new(idx).expect("pool index must be non-zero"))
            }

            #[inline]
            pub(crate) fn index(self) -> u32 {
                self.0.get()
            }
        }
    };
}

pool_ref!(StyleRef);
pool_ref!(GraphemeRef);
pool_ref!(HyperlinkRef);

/// How a cell participates in a wide (East Asian Wide/Fullwidth) glyph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WideState {
    #[default]
    Narrow,
    Wide,
    SpacerHead,
    SpacerTail,
}

/// A single grid cell.
///
/// `codepoint == 0` means the cell is empty. A non-default `style` is an
/// index into the owning page's style pool; likewise for `grapheme` and
/// `hyperlink`. Overwriting a cell must release its old pool references
/// before installing new ones — see `Page::set_cell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub codepoint: u32,
    pub wide: WideState,
    pub style: Option<StyleRef>,
    pub grapheme: Option<GraphemeRef>,
    pub hyperlink: Option<HyperlinkRef>,
    pub protected: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            codepoint: 0,
            wide: WideState::Narrow,
            style: None,
            grapheme: None,
            hyperlink: None,
            protected: false,
        }
    }
}

impl Cell {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codepoint == 0 && self.style.is_none() && self.hyperlink.is_none()
    }

    #[inline]
    pub fn has_grapheme(&self) -> bool {
        self.grapheme.is_some()
    }

    #[inline]
    pub fn has_hyperlink(&self) -> bool {
        self.hyperlink.is_some()
    }
}
