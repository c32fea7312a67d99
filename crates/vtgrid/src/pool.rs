//! Reference-counted, dedup-by-value interning pools.
//!
//! Styles and hyperlinks are deduplicated: interning an equal value twice
//! returns the same index and bumps a refcount. Graphemes are not
//! deduplicated by value (two identical combining-mark runs at different
//! cells are independent allocations) but live in the same slab shape for
//! uniform eviction bookkeeping.

use std::collections::HashMap;
use std::hash::Hash;

struct Entry<T> {
    value: T,
    refcount: u32,
}

/// A 1-indexed, refcounted arena. Index `0` is reserved to mean "no value"
/// at the call site (see [`crate::cell::StyleRef`] and friends), so slot 0
/// here is never handed out.
pub struct Pool<T> {
    entries: Vec<Option<Entry<T>>>,
    free: Vec<u32>,
    by_value: HashMap<T, u32>,
    dedup: bool,
}

impl<T: Clone + Eq + Hash> Pool<T> {
    pub fn new(dedup: bool) -> Self {
        Self {
            entries: vec![None],
            free: Vec::new(),
            by_value: HashMap::new(),
            dedup,
        }
    }

    /// Intern `value`, returning its 1-based index. Bumps the refcount if
    /// deduplicating and an equal value is already present.
    pub fn intern(&mut self, value: T) -> u32 {
        if self.dedup {
            if let Some(&idx) = self.by_value.get(&value) {
                self.entries[idx as usize]
                    .as_mut()
                    .expect("dedup index must be live")
                    .refcount += 1;
                return idx;
            }
        }

        let idx = if let Some(idx) = self.free.pop() {
            self.entries[idx as usize] = Some(Entry {
                value: value.clone(),
                refcount: 1,
            });
            idx
        } else {
            let idx = self.entries.len() as u32;
            self.entries.push(Some(Entry {
                value: value.clone(),
                refcount: 1,
            }));
            idx
        };

        if self.dedup {
            self.by_value.insert(value, idx);
        }
        idx
    }

    /// Add a reference to an already-interned index (used when copying a
    /// cell's pool reference into another cell without reinterning).
    pub fn retain(&mut self, idx: u32) {
        if let Some(entry) = self.entries[idx as usize].as_mut() {
            entry.refcount += 1;
        }
    }

    /// Drop a reference; reclaims the slot once the refcount hits zero.
    pub fn release(&mut self, idx: u32) {
        let reclaim = {
            let Some(entry) = self.entries[idx as usize].as_mut() else {
                return;
            };
            entry.refcount = entry.refcount.saturating_sub(1);
            entry.refcount == 0
        };
        if reclaim {
            if let Some(entry) = self.entries[idx as usize].take() {
                if self.dedup {
                    self.by_value.remove(&entry.value);
                }
            }
            self.free.push(idx);
        }
    }

    pub fn get(&self, idx: u32) -> Option<&T> {
        self.entries[idx as usize].as_ref().map(|e| &e.value)
    }

    pub fn len_live(&self) -> usize {
        self.entries.len() - self.free.len() - 1
    }

    /// Approximate heap footprint, used for the page byte budget.
    pub fn approx_bytes(&self) -> usize {
        self.entries.len() * (std::mem::size_of::<T>() + 8)
    }
}
