//! Intrusive doubly linked list backed by `SlotArena`.
//!
//! Nodes live in a `SlotArena` and point at each other by `SlotId`. The ids
//! the arena hands out double as the slot handles the ordered policies (FIFO,
//! LIFO, LRU, MRU) return from `add`, so a handle survives `move_to_back` and
//! is recycled only after its node is removed.
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬─────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }      │
//!   ├────────┼─────────────────────────────────┤
//!   │ #0     │ { A, prev: -,  next: #2 }       │
//!   │ #1     │ (vacant, on the free list)      │
//!   │ #2     │ { C, prev: #0, next: #3 }       │
//!   │ #3     │ { D, prev: #2, next: - }        │
//!   └────────┴─────────────────────────────────┘
//!
//!   head ─► #0 ◄──► #2 ◄──► #3 ◄── tail
//! ```
//!
//! Every operation except iteration and `check_invariants` is O(1).

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Doubly linked queue whose nodes are addressed by stable [`SlotId`]s.
#[derive(Debug, Clone)]
pub struct IntrusiveList<T> {
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> IntrusiveList<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    /// Oldest end of the queue.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|id| self.get(id))
    }

    /// Newest end of the queue.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    /// Values from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
            forward: true,
        }
    }

    /// Values from back to front.
    pub fn iter_rev(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.tail,
            forward: false,
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Appends `value` at the back and returns its handle.
    pub fn push_back(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: None,
            next: None,
        });
        self.link_back(id);
        id
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.head.and_then(|id| self.remove(id))
    }

    pub fn pop_back(&mut self) -> Option<T> {
        self.tail.and_then(|id| self.remove(id))
    }

    /// Unlinks `id` and frees its slot. `None` if `id` is not live.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.arena.contains(id) {
            return None;
        }
        self.unlink(id);
        self.arena.remove(id).map(|node| node.value)
    }

    /// Relinks `id` at the back. Returns `false` if `id` is not live.
    pub fn move_to_back(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if self.tail != Some(id) {
            self.unlink(id);
            self.link_back(id);
        }
        true
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    fn link_back(&mut self, id: SlotId) {
        let old_tail = self.tail.replace(id);
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail.and_then(|tail| self.arena.get_mut(tail)) {
            Some(tail) => tail.next = Some(id),
            None => self.head = Some(id),
        }
    }

    fn unlink(&mut self, id: SlotId) {
        let Some(node) = self.arena.get_mut(id) else {
            return;
        };
        let (prev, next) = (node.prev.take(), node.next.take());

        match prev.and_then(|p| self.arena.get_mut(p)) {
            Some(before) => before.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.arena.get_mut(n)) {
            Some(after) => after.prev = prev,
            None => self.tail = prev,
        }
    }

    /// Walks the links front to back and checks them against the arena.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.arena.check_invariants()?;

        if self.head.is_none() != self.tail.is_none() || self.head.is_none() != self.is_empty() {
            return Err(InvariantError::new("list head/tail disagree with node count"));
        }

        let mut walked = 0usize;
        let mut expected_prev = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let node = self
                .arena
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("link to vacant slot {id}")))?;
            if node.prev != expected_prev {
                return Err(InvariantError::new(format!("broken back-link at {id}")));
            }
            walked += 1;
            if walked > self.len() {
                return Err(InvariantError::new("cycle in list links"));
            }
            expected_prev = Some(id);
            cursor = node.next;
        }

        if expected_prev != self.tail {
            return Err(InvariantError::new("walk did not end at tail"));
        }
        if walked != self.len() {
            return Err(InvariantError::new(format!(
                "walked {walked} nodes but list holds {}",
                self.len()
            )));
        }
        Ok(())
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`IntrusiveList::iter`] and [`IntrusiveList::iter_rev`].
pub struct Iter<'a, T> {
    list: &'a IntrusiveList<T>,
    cursor: Option<SlotId>,
    forward: bool,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.arena.get(self.cursor?)?;
        self.cursor = if self.forward { node.next } else { node.prev };
        Some(&node.value)
    }
}
