//! A single line of cells plus the per-row bookkeeping flags.

use crate::cell::Cell;

/// OSC 133 semantic-prompt classification of a row. Unifies on the
/// option-union model: a row carries a kind plus optional free-form
/// key/value annotations rather than two divergent representations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SemanticPromptKind {
    #[default]
    None,
    /// `OSC 133;L` — blank-line reset with no prompt semantics attached.
    FreshLine,
    /// `OSC 133;A` — fresh line marking the start of a new prompt.
    PromptStart,
    /// `OSC 133;P` — continuation line of a multi-line prompt.
    PromptContinuation,
    /// `OSC 133;B` — end of prompt, start of user input.
    Input,
    /// `OSC 133;I` — continuation line of multi-line input.
    InputContinuation,
    /// `OSC 133;C` — end of input, start of command output.
    Command,
    /// `OSC 133;D` — end of command output.
    CommandEnd,
    /// `OSC 133;N` — a free-form shell-integration notice row.
    Notice,
    /// A recognized but not separately modeled `OSC 133` action.
    Unknown,
}

/// Free-form annotations carried by an `OSC 133` action, stored only when
/// present to avoid inflating the common case of plain rows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SemanticPromptOptions {
    pub aid: Option<String>,
    pub cl: Option<String>,
    pub k: Option<char>,
    pub err: Option<String>,
    pub redraw: Option<bool>,
    pub special_key: Option<String>,
    pub click_events: Option<bool>,
    pub exit_code: Option<i32>,
}

/// `DECDHL`/`DECSWL`/`DECDWL` per-line rendering width/height, set by an
/// `ESC #` sequence targeting the cursor's current row.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineAttr {
    #[default]
    Single,
    DoubleWidth,
    /// Top half of a double-height line (`DECDHL`). Paired with a
    /// [`LineAttr::DoubleHeightBottom`] row carrying the same text.
    DoubleHeightTop,
    DoubleHeightBottom,
}

/// A row of `cols` cells plus the flags needed to reconstruct logical lines
/// (wrap/wrap_continuation) and the shell-integration marks (semantic
/// prompt) exposed through the read API.
#[derive(Debug, Clone)]
pub struct Row {
    cells: Box<[Cell]>,
    /// This row soft-wraps into the next one.
    pub wrap: bool,
    /// This row is the continuation of a soft wrap from the previous row.
    ///
    /// Invariant: `row[i].wrap` iff `row[i + 1].wrap_continuation`.
    pub wrap_continuation: bool,
    pub semantic_prompt: SemanticPromptKind,
    pub semantic_options: Option<Box<SemanticPromptOptions>>,
    pub line_attr: LineAttr,
}

impl Row {
    pub fn new(cols: u16) -> Self {
        Self {
            cells: vec![Cell::default(); cols as usize].into_boxed_slice(),
            wrap: false,
            wrap_continuation: false,
            semantic_prompt: SemanticPromptKind::None,
            semantic_options: None,
            line_attr: LineAttr::Single,
        }
    }

    #[inline]
    pub fn cols(&self) -> u16 {
        self.cells.len() as u16
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, x: u16) -> &Cell {
        &self.cells[x as usize]
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, x: u16) -> &mut Cell {
        &mut self.cells[x as usize]
    }

    pub fn has_grapheme(&self) -> bool {
        self.cells.iter().any(Cell::has_grapheme)
    }

    pub fn has_hyperlink(&self) -> bool {
        self.cells.iter().any(Cell::has_hyperlink)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    pub(crate) fn resize(&mut self, cols: u16) {
        let mut cells = vec![Cell::default(); cols as usize].into_boxed_slice();
        let n = self.cells.len().min(cells.len());
        cells[..n].copy_from_slice(&self.cells[..n]);
        self.cells = cells;
    }
}
