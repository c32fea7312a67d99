//! OSC 8 hyperlink storage.

/// A hyperlink target, keyed by URI plus an optional explicit id
/// (`OSC 8 ; id=foo ; https://...`). Interned per-page with the same
/// deduplicate-by-value pool used for styles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hyperlink {
    pub uri: String,
    pub id: Option<String>,
}

/// A run of codepoints appended to a base cell via zero-width combining
/// marks. Not deduplicated by value — identical clusters at different
/// cells are independent allocations, since each is conceptually "owned"
/// by exactly one base cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphemeCluster(pub smallvec::SmallVec<[char; 4]>);

impl GraphemeCluster {
    pub fn push(&mut self, c: char) {
        self.0.push(c);
    }

    pub fn as_slice(&self) -> &[char] {
        &self.0
    }
}
