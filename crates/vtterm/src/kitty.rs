//! Kitty keyboard protocol flag stack and kitty graphics APC bookkeeping.
//!
//! Graphics support is bookkeeping-only: control data (image id, format,
//! placement, transmission medium) is tracked so queries and deletes behave
//! sensibly, but pixel payloads are never decoded or rendered — that is an
//! external collaborator's concern.

use std::collections::HashMap;

use bitflags::bitflags;

bitflags! {
    /// Progressive enhancement flags pushed/popped via `CSI > Pn u` /
    /// `CSI < Pn u` / `CSI = Pn ; Pm u`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct KittyKeyFlags: u8 {
        const DISAMBIGUATE_ESCAPE_CODES = 1 << 0;
        const REPORT_EVENT_TYPES        = 1 << 1;
        const REPORT_ALTERNATE_KEYS     = 1 << 2;
        const REPORT_ALL_KEYS_AS_ESCAPE = 1 << 3;
        const REPORT_ASSOCIATED_TEXT    = 1 << 4;
    }
}

/// Bounded push/pop stack of keyboard enhancement flags (`CSI > u` pushes,
/// `CSI < Pn u` pops `Pn` entries, `CSI = Pn ; Pm u` sets the top).
#[derive(Debug, Clone, Default)]
pub struct KittyKeyboardStack {
    stack: Vec<KittyKeyFlags>,
    enabled: bool,
}

const KITTY_KEY_STACK_LIMIT: usize = 256;

impl KittyKeyboardStack {
    pub fn current(&self) -> KittyKeyFlags {
        self.stack.last().copied().unwrap_or(KittyKeyFlags::empty())
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn push(&mut self, flags: KittyKeyFlags) {
        if self.stack.len() >= KITTY_KEY_STACK_LIMIT {
            self.stack.remove(0);
        }
        self.stack.push(flags);
    }

    pub fn pop(&mut self, count: u16) {
        let count = count.max(1) as usize;
        let new_len = self.stack.len().saturating_sub(count);
        self.stack.truncate(new_len);
    }

    /// `CSI = Pn ; Pm u`: set the current (top) entry, pushing one if the
    /// stack is empty. `mode` selects replace(1, default)/set-bits(2)/
    /// clear-bits(3) per the kitty protocol.
    pub fn assign(&mut self, flags: KittyKeyFlags, mode: u16) {
        let top = self.stack.last().copied().unwrap_or(KittyKeyFlags::empty());
        let next = match mode {
            2 => top | flags,
            3 => top & !flags,
            _ => flags,
        };
        if let Some(slot) = self.stack.last_mut() {
            *slot = next;
        } else {
            self.stack.push(next);
        }
    }
}

/// How a kitty graphics image's pixel data was (or will be) delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicsMedium {
    Direct,
    File,
    TempFile,
    SharedMemory,
}

/// Bookkeeping record for one transmitted (or in-progress) kitty graphics
/// image. No pixel bytes are retained.
#[derive(Debug, Clone)]
pub struct GraphicsImage {
    pub id: u32,
    pub medium: GraphicsMedium,
    pub format: u16,
    pub width: u32,
    pub height: u32,
    /// Total bytes declared across all chunks of a multi-part transmission.
    pub declared_size: u64,
    pub complete: bool,
}

/// Per-terminal kitty graphics registry: tracks declared images and their
/// placements without touching pixel data.
#[derive(Debug, Clone, Default)]
pub struct GraphicsStore {
    images: HashMap<u32, GraphicsImage>,
    next_anon_id: u32,
}

/// Upper bound on the number of distinct images tracked at once; beyond
/// this, the oldest untouched entry is evicted to bound memory.
const GRAPHICS_STORE_LIMIT: usize = 4096;

impl GraphicsStore {
    pub fn begin_or_update(&mut self, mut image: GraphicsImage) -> u32 {
        if image.id == 0 {
            self.next_anon_id += 1;
            image.id = u32::MAX - self.next_anon_id;
        }
        if self.images.len() >= GRAPHICS_STORE_LIMIT && !self.images.contains_key(&image.id) {
            if let Some(&oldest) = self.images.keys().next() {
                self.images.remove(&oldest);
            }
        }
        let id = image.id;
        self.images.insert(id, image);
        id
    }

    pub fn get(&self, id: u32) -> Option<&GraphicsImage> {
        self.images.get(&id)
    }

    pub fn delete(&mut self, id: u32) {
        self.images.remove(&id);
    }

    pub fn delete_all(&mut self) {
        self.images.clear();
    }
}
