//! Doubly-linked chain of [`Page`]s forming the full screen buffer.

use std::collections::HashMap;

use crate::page::{DEFAULT_PAGE_BYTE_BUDGET, Page};
use crate::pin::{Frame, Pin, PinId, Point};
use crate::row::Row;

/// A stable "pointer" to a page in the chain.
///
/// Carries a generation counter: once a page is evicted its slot is
/// reused, but any `NodeId` copies that predate the eviction will no
/// longer match the slot's current generation, so dereferencing a stale
/// `NodeId` fails closed instead of reading the wrong page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    slot: u32,
    generation: u32,
}

struct Slot {
    page: Option<Page>,
    generation: u32,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

struct PinRecord {
    node: NodeId,
    y: u16,
    x: u16,
    garbage: bool,
}

/// The total screen buffer: active area (last `active_rows` rows) plus
/// scrollback history, bounded by `max_size` bytes.
pub struct PageList {
    slots: Vec<Slot>,
    free_slots: Vec<u32>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    cols: u16,
    active_rows: u16,
    max_size: usize,
    /// Per-page byte budget that decides when a page is split rather than
    /// grown further. Kept at or below `max_size` so a small `max_size`
    /// (as used in tests) still exercises eviction instead of growing one
    /// page forever.
    page_byte_budget: usize,
    pins: HashMap<u64, PinRecord>,
    next_pin_id: u64,
}

impl PageList {
    pub fn new(cols: u16, active_rows: u16, max_size: usize) -> Self {
        let page_byte_budget = max_size.min(DEFAULT_PAGE_BYTE_BUDGET).max(1);
        let page = Page::with_budget(cols, active_rows, page_byte_budget);
        let mut this = Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
            head: None,
            tail: None,
            cols,
            active_rows,
            max_size,
            page_byte_budget,
            pins: HashMap::new(),
            next_pin_id: 0,
        };
        let id = this.alloc_node(page);
        this.head = Some(id);
        this.tail = Some(id);
        this
    }

    fn alloc_node(&mut self, page: Page) -> NodeId {
        if let Some(slot_idx) = self.free_slots.pop() {
            let slot = &mut self.slots[slot_idx as usize];
            slot.page = Some(page);
            slot.prev = None;
            slot.next = None;
            NodeId {
                slot: slot_idx,
                generation: slot.generation,
            }
        } else {
            let slot_idx = self.slots.len() as u32;
            self.slots.push(Slot {
                page: Some(page),
                generation: 0,
                prev: None,
                next: None,
            });
            NodeId {
                slot: slot_idx,
                generation: 0,
            }
        }
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        let slot = self.slots.get(id.slot as usize)?;
        if slot.generation == id.generation {
            Some(slot)
        } else {
            None
        }
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        let slot = self.slots.get_mut(id.slot as usize)?;
        if slot.generation == id.generation {
            Some(slot)
        } else {
            None
        }
    }

    pub fn page(&self, id: NodeId) -> Option<&Page> {
        self.slot(id)?.page.as_ref()
    }

    pub fn page_mut(&mut self, id: NodeId) -> Option<&mut Page> {
        self.slot_mut(id)?.page.as_mut()
    }

    pub fn head(&self) -> NodeId {
        self.head.expect("page list always has at least one page")
    }

    pub fn tail(&self) -> NodeId {
        self.tail.expect("page list always has at least one page")
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id)?.next
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id)?.prev
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn active_rows(&self) -> u16 {
        self.active_rows
    }

    /// Sum of row counts across every page in the chain.
    pub fn total_rows(&self) -> usize {
        let mut total = 0usize;
        let mut cur = self.head;
        while let Some(id) = cur {
            let slot = self.slot(id).expect("chain node must be live");
            total += slot.page.as_ref().expect("chain node must hold a page").rows() as usize;
            cur = slot.next;
        }
        total
    }

    pub fn history_rows(&self) -> usize {
        self.total_rows().saturating_sub(self.active_rows as usize)
    }

    fn total_bytes(&self) -> usize {
        let mut total = 0usize;
        let mut cur = self.head;
        while let Some(id) = cur {
            let slot = self.slot(id).expect("chain node must be live");
            total += slot.page.as_ref().expect("chain node must hold a page").estimated_bytes();
            cur = slot.next;
        }
        total
    }

    /// Append a fresh blank row to the tail page, allocating a new tail
    /// page first if the current one has grown past its byte budget.
    /// Returns the node/row of the new row.
    pub fn push_row(&mut self) -> (NodeId, u16) {
        let tail = self.tail();
        let over_budget = {
            let page = self.page(tail).expect("tail must be live");
            page.estimated_bytes() >= page.byte_budget()
        };
        let target = if over_budget {
            let cols = self.cols;
            let new_page = Page::with_budget(cols, 0, self.page_byte_budget);
            let new_id = self.alloc_node(new_page);
            {
                let slot = self.slot_mut(tail).expect("tail must be live");
                slot.next = Some(new_id);
            }
            {
                let slot = self.slot_mut(new_id).expect("just allocated");
                slot.prev = Some(tail);
            }
            self.tail = Some(new_id);
            new_id
        } else {
            tail
        };
        let page = self.page_mut(target).expect("target must be live");
        page.resize_rows(page.rows() + 1);
        self.evict_if_needed();
        (target, self.page(target).expect("target must be live").rows() - 1)
    }

    /// Evict the oldest page(s) while over the byte budget, never
    /// consuming rows from the active area.
    fn evict_if_needed(&mut self) {
        while self.total_bytes() > self.max_size {
            let Some(head) = self.head else { break };
            let Some(next) = self.next(head) else {
                // Only one page left; it holds the active area, never evict it.
                break;
            };
            // Don't evict if doing so would remove rows still inside the
            // active window: that only holds if head's rows are entirely
            // history, i.e. total_rows - head_rows >= active_rows.
            let head_rows = self.page(head).expect("live").rows() as usize;
            if self.total_rows().saturating_sub(head_rows) < self.active_rows as usize {
                break;
            }
            self.mark_node_garbage(head);
            {
                let next_slot = self.slot_mut(next).expect("live");
                next_slot.prev = None;
            }
            self.head = Some(next);
            let slot = &mut self.slots[head.slot as usize];
            slot.page = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free_slots.push(head.slot);
        }
    }

    fn mark_node_garbage(&mut self, node: NodeId) {
        for record in self.pins.values_mut() {
            if record.node == node {
                record.garbage = true;
            }
        }
    }

    pub fn create_pin(&mut self, node: NodeId, y: u16, x: u16) -> PinId {
        let id = self.next_pin_id;
        self.next_pin_id += 1;
        self.pins.insert(
            id,
            PinRecord {
                node,
                y,
                x,
                garbage: false,
            },
        );
        PinId(id)
    }

    pub fn remove_pin(&mut self, id: PinId) {
        self.pins.remove(&id.0);
    }

    pub fn pin(&self, id: PinId) -> Option<Pin> {
        let record = self.pins.get(&id.0)?;
        let garbage = record.garbage || self.slot(record.node).is_none();
        Some(Pin {
            node: record.node,
            y: record.y,
            x: record.x,
            garbage,
        })
    }

    pub fn update_pin(&mut self, id: PinId, node: NodeId, y: u16, x: u16) {
        if let Some(record) = self.pins.get_mut(&id.0) {
            record.node = node;
            record.y = y;
            record.x = x;
            record.garbage = false;
        }
    }

    /// Resolve a pin into a flat coordinate in the requested frame.
    /// `viewport_top` is the caller-maintained scrollback offset (rows of
    /// history above the current viewport's top row), only meaningful for
    /// `Frame::Viewport`.
    pub fn point_from_pin(&self, pin: Pin, frame: Frame, viewport_top: usize) -> Point {
        let mut absolute = 0usize;
        let mut cur = self.head;
        while let Some(id) = cur {
            if id == pin.node {
                absolute += pin.y as usize;
                break;
            }
            let slot = self.slot(id).expect("chain node must be live");
            absolute += slot.page.as_ref().expect("live").rows() as usize;
            cur = slot.next;
        }

        let y = match frame {
            Frame::Screen => absolute,
            Frame::Active => absolute.saturating_sub(self.history_rows()),
            Frame::Viewport => absolute.saturating_sub(viewport_top),
        };
        Point { y, x: pin.x }
    }

    /// Reflow every page to a new column count, remapping pins in place.
    pub fn resize_cols(&mut self, new_cols: u16) {
        if new_cols == self.cols {
            return;
        }
        let mut cur = self.head;
        while let Some(id) = cur {
            let next = self.next(id);
            let mapping = {
                let page = self.page_mut(id).expect("live");
                page.resize_cols(new_cols)
            };
            for record in self.pins.values_mut() {
                if record.node == id {
                    if let Some(&new_y) = mapping.get(record.y as usize) {
                        record.y = new_y;
                    }
                }
            }
            cur = next;
        }
        self.cols = new_cols;
    }

    pub fn set_active_rows(&mut self, rows: u16) {
        self.active_rows = rows;
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        self.evict_if_needed();
    }

    /// Resolve an absolute row index (0 = oldest retained row) to the page
    /// node that owns it and the row's local index within that page.
    pub fn node_for_absolute_row(&self, absolute_y: usize) -> (NodeId, u16) {
        let mut cur = self.head;
        let mut seen = 0usize;
        while let Some(id) = cur {
            let slot = self.slot(id).expect("chain node must be live");
            let rows = slot.page.as_ref().expect("live").rows() as usize;
            if absolute_y < seen + rows {
                return (id, (absolute_y - seen) as u16);
            }
            seen += rows;
            cur = slot.next;
        }
        let tail = self.tail();
        let rows = self.page(tail).expect("live").rows();
        (tail, rows.saturating_sub(1))
    }

    /// Resolve a row within the active area (0 = top of the visible grid)
    /// to its owning page node and local row index.
    pub fn node_for_active_row(&self, y: u16) -> (NodeId, u16) {
        self.node_for_absolute_row(self.history_rows() + y as usize)
    }

    pub fn absolute_row(&self, absolute_y: usize) -> &Row {
        let (node, local) = self.node_for_absolute_row(absolute_y);
        self.page(node).expect("live").row(local)
    }

    pub fn absolute_row_mut(&mut self, absolute_y: usize) -> &mut Row {
        let (node, local) = self.node_for_absolute_row(absolute_y);
        self.page_mut(node).expect("live").row_mut(local)
    }

    pub fn active_row(&self, y: u16) -> &Row {
        self.absolute_row(self.history_rows() + y as usize)
    }

    pub fn active_row_mut(&mut self, y: u16) -> &mut Row {
        let absolute = self.history_rows() + y as usize;
        self.absolute_row_mut(absolute)
    }
}
