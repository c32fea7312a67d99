//! Crate-local error taxonomy.
//!
//! Per the error-handling design: parse-level and semantic errors are
//! absorbed or logged (never surfaced as `Result`s); only resource
//! exhaustion propagates to the caller of [`crate::Terminal::write`].

use std::fmt;

/// Returned from [`crate::Terminal::write`] when an allocation or
/// configured byte budget is exhausted partway through applying a byte
/// slice. The terminal's state remains coherent up to the point of
/// failure; the caller may discard or retry the remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// A page's style/grapheme/hyperlink pool could not grow further.
    PoolExhausted,
    /// A new scrollback page could not be allocated.
    PageAllocation,
    /// A bounded OSC/DCS/APC payload buffer exceeded its cap.
    PayloadTooLarge { limit: usize },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::PoolExhausted => write!(f, "style/grapheme/hyperlink pool exhausted"),
            ResourceError::PageAllocation => write!(f, "failed to allocate a new scrollback page"),
            ResourceError::PayloadTooLarge { limit } => {
                write!(f, "OSC/DCS/APC payload exceeded the {limit} byte cap")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// `xparsecolor::ParseError` already models "a color specification failed
/// to parse"; this crate reuses it under a terminal-facing name rather
/// than duplicating the variant set.
pub type ColorParseError = xparsecolor::ParseError;
