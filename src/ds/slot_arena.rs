//! Dense slot storage with free-list reuse.
//!
//! Every element a policy admits lives in one slot of a `SlotArena`. The
//! slot's position in the backing vector is its [`SlotId`]; vacated positions
//! are pushed onto a free list and handed out again by the next insert.
//!
//! ```text
//!   slots:     [Some(a)] [None] [Some(c)] [Some(d)] [None]
//!   free_list: [4, 1]                                  ▲
//!                                                      └── next insert reuses 1
//! ```
//!
//! Ids are generation-free: once a slot is vacated and reused, an old id for
//! it refers to the new occupant. Policies own their arena exclusively, so the
//! only way to hold a reused id is to keep one past `remove`/`evict_next`.

use std::fmt;

use crate::error::InvariantError;

/// Handle to a live slot, as returned by [`ReplacementPolicy::add`].
///
/// [`ReplacementPolicy::add`]: crate::traits::ReplacementPolicy::add
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Returns the raw slot position.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Vector of optional slots plus a free list of vacated positions.
#[derive(Debug, Clone)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Stores `value`, reusing the most recently vacated slot if any.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;
        match self.free_list.pop() {
            Some(pos) => {
                self.slots[pos] = Some(value);
                SlotId(pos)
            },
            None => {
                self.slots.push(Some(value));
                SlotId(self.slots.len() - 1)
            },
        }
    }

    /// Vacates `id`. `None` if it was already vacant or never allocated.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0).and_then(Option::take)?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slot positions ever allocated, live or vacant.
    pub fn slot_len(&self) -> usize {
        self.slots.len()
    }

    /// Drops every element and forgets all positions.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
    }

    /// Verifies that the live count and the free list agree with the slots.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let occupied = self.slots.iter().flatten().count();
        if occupied != self.len {
            return Err(InvariantError::new(format!(
                "arena len {} but {occupied} occupied slots",
                self.len
            )));
        }
        if occupied + self.free_list.len() != self.slots.len() {
            return Err(InvariantError::new(format!(
                "{occupied} occupied + {} free != {} slots",
                self.free_list.len(),
                self.slots.len()
            )));
        }
        if let Some(pos) = self
            .free_list
            .iter()
            .find(|&&pos| self.slots.get(pos).is_none_or(Option::is_some))
        {
            return Err(InvariantError::new(format!(
                "free list entry {pos} is not a vacant slot"
            )));
        }
        Ok(())
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
