//! LRU Tracker Module
//!
//! Recency order for cache eviction, kept as a doubly linked list whose nodes
//! live in a slab and are found through a key index:
//!
//! ```text
//!   index: HashMap<String, slot>      slots: Vec<Option<Slot>>
//!
//!   head (most recent) ──► [k3] ◄──► [k1] ◄──► [k2] ◄── tail (least recent)
//! ```
//!
//! Touch, remove and eviction are all O(1) amortized.

use std::collections::HashMap;

#[derive(Debug)]
struct Slot {
    key: String,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
#[derive(Debug, Default)]
pub struct LruTracker {
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            ..Self::default()
        }
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if absent.
    pub fn touch(&mut self, key: &str) {
        if let Some(&id) = self.index.get(key) {
            if self.head != Some(id) {
                self.detach(id);
                self.attach_front(id);
            }
            return;
        }

        let slot = Slot {
            key: key.to_string(),
            prev: None,
            next: None,
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(slot);
                id
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };
        self.index.insert(key.to_string(), id);
        self.attach_front(id);
    }

    // == Remove ==
    /// Removes a key from the tracker. Returns false if it was not tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.index.remove(key) {
            Some(id) => {
                self.detach(id);
                self.release(id);
                true
            }
            None => false,
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let id = self.tail?;
        self.detach(id);
        let key = self.release(id)?;
        self.index.remove(&key);
        Some(key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub(crate) fn peek_oldest(&self) -> Option<&str> {
        self.tail.and_then(|id| self.slot(id)).map(|s| s.key.as_str())
    }

    /// Returns the most recently used key.
    #[cfg(test)]
    pub(crate) fn peek_newest(&self) -> Option<&str> {
        self.head.and_then(|id| self.slot(id)).map(|s| s.key.as_str())
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let Some(slot) = self.slot(id) else { break };
            out.push(slot.key.clone());
            cursor = slot.next;
        }
        out
    }

    fn slot(&self, id: usize) -> Option<&Slot> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, id: usize) -> Option<&mut Slot> {
        self.slots.get_mut(id).and_then(Option::as_mut)
    }

    fn release(&mut self, id: usize) -> Option<String> {
        let slot = self.slots.get_mut(id)?.take()?;
        self.free.push(id);
        Some(slot.key)
    }

    fn detach(&mut self, id: usize) {
        let Some((prev, next)) = self.slot(id).map(|s| (s.prev, s.next)) else {
            return;
        };

        match prev.and_then(|p| self.slot_mut(p)) {
            Some(prev_slot) => prev_slot.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.slot_mut(n)) {
            Some(next_slot) => next_slot.prev = prev,
            None => self.tail = prev,
        }

        if let Some(slot) = self.slot_mut(id) {
            slot.prev = None;
            slot.next = None;
        }
    }

    fn attach_front(&mut self, id: usize) {
        let old_head = self.head;
        if let Some(slot) = self.slot_mut(id) {
            slot.prev = None;
            slot.next = old_head;
        }
        match old_head.and_then(|h| self.slot_mut(h)) {
            Some(head_slot) => head_slot.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }
}
