//! # Least Frequently Used (LFU) Replacement Policy
//!
//! Evicts the element with the lowest access count. Admission counts as the
//! first access; every `touch` adds one. Among equal counts the element that
//! was admitted first goes first, independent of when the count was reached.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LfuPolicy<T>                                │
//!   │                                                                      │
//!   │   slots: SlotArena<Entry<T>>          order: BTreeMap<(freq, seq),   │
//!   │   ┌────────┬──────────────────────┐                   SlotId>        │
//!   │   │ SlotId │ Entry                │   ┌────────────┬────────┐        │
//!   │   ├────────┼──────────────────────┤   │ (1, 2)     │ id_2   │ ◄ next │
//!   │   │ id_0   │ { A, freq: 3, seq 0 }│   │ (2, 1)     │ id_1   │  victim│
//!   │   │ id_1   │ { B, freq: 2, seq 1 }│   │ (3, 0)     │ id_0   │        │
//!   │   │ id_2   │ { C, freq: 1, seq 2 }│   └────────────┴────────┘        │
//!   │   └────────┴──────────────────────┘                                  │
//!   │                                                                      │
//!   │   seq: monotonic admission counter (stable tie-break)                │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation    | Time     | Notes                                    |
//! |--------------|----------|------------------------------------------|
//! | `add`        | O(log n) | freq = 1, fresh seq                      |
//! | `touch`      | O(log n) | re-key (freq + 1, same seq)              |
//! | `update`     | O(1)     | element swapped, freq and seq kept       |
//! | `remove`     | O(log n) |                                          |
//! | `evict_next` | O(log n) | pops the smallest `(freq, seq)`          |
//! | `peek_all`   | O(n)     | in-order walk of the index               |
//!
//! Counts saturate at `u64::MAX` instead of wrapping.

use std::collections::BTreeMap;

use crate::ds::{SlotArena, SlotId};
use crate::error::{InvariantError, Rejected, UpdateRejected};
use crate::traits::{Attributes, ReplacementPolicy, stale_slot};

#[derive(Debug, Clone)]
struct Entry<T> {
    element: T,
    freq: u64,
    seq: u64,
}

/// Frequency-ordered policy with admission-order tie-breaking.
///
/// # Example
///
/// ```
/// use evictkit::policy::lfu::LfuPolicy;
/// use evictkit::traits::ReplacementPolicy;
///
/// let mut lfu = LfuPolicy::new();
/// let a = lfu.add("a").unwrap();
/// let b = lfu.add("b").unwrap();
/// lfu.add("c").unwrap();
/// lfu.touch(a);
/// lfu.touch(a);
/// lfu.touch(b);
///
/// assert_eq!(lfu.frequency(a), Some(3));
/// assert_eq!(lfu.evict_all(), vec!["c", "b", "a"]);
/// ```
#[derive(Debug, Clone)]
pub struct LfuPolicy<T> {
    slots: SlotArena<Entry<T>>,
    order: BTreeMap<(u64, u64), SlotId>,
    next_seq: u64,
}

impl<T> LfuPolicy<T> {
    /// Creates an empty LFU policy.
    pub fn new() -> Self {
        Self {
            slots: SlotArena::new(),
            order: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Creates an empty LFU policy with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotArena::with_capacity(capacity),
            order: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Access count of the element at `id`, if live.
    pub fn frequency(&self, id: SlotId) -> Option<u64> {
        self.slots.get(id).map(|entry| entry.freq)
    }

    fn victim_id(&self) -> Option<SlotId> {
        self.order.first_key_value().map(|(_, &id)| id)
    }
}

impl<T> Default for LfuPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementPolicy<T> for LfuPolicy<T> {
    fn add_with(&mut self, element: T, _attributes: &Attributes) -> Result<SlotId, Rejected<T>> {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = self.slots.insert(Entry {
            element,
            freq: 1,
            seq,
        });
        self.order.insert((1, seq), id);
        Ok(id)
    }

    fn update_with(
        &mut self,
        id: SlotId,
        element: T,
        _attributes: &Attributes,
    ) -> Result<T, UpdateRejected<T>> {
        match self.slots.get_mut(id) {
            Some(entry) => Ok(std::mem::replace(&mut entry.element, element)),
            None => stale_slot(self.name(), id),
        }
    }

    fn touch(&mut self, id: SlotId) {
        let Some(entry) = self.slots.get_mut(id) else {
            stale_slot(self.name(), id);
        };
        let old_key = (entry.freq, entry.seq);
        entry.freq = entry.freq.saturating_add(1);
        let new_key = (entry.freq, entry.seq);
        if old_key != new_key {
            self.order.remove(&old_key);
            self.order.insert(new_key, id);
        }
    }

    fn remove(&mut self, id: SlotId) -> T {
        let Some(entry) = self.slots.remove(id) else {
            stale_slot(self.name(), id);
        };
        self.order.remove(&(entry.freq, entry.seq));
        entry.element
    }

    fn evict_next(&mut self) -> Option<T> {
        let (_, id) = self.order.pop_first()?;
        self.slots.remove(id).map(|entry| entry.element)
    }

    fn peek(&self) -> Option<&T> {
        self.victim_id()
            .and_then(|id| self.slots.get(id))
            .map(|entry| &entry.element)
    }

    fn peek_all(&self) -> Vec<&T> {
        self.order
            .values()
            .filter_map(|&id| self.slots.get(id).map(|entry| &entry.element))
            .collect()
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn contains(&self, id: SlotId) -> bool {
        self.slots.contains(id)
    }

    fn name(&self) -> &'static str {
        "lfu"
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.slots.check_invariants()?;
        if self.order.len() != self.slots.len() {
            return Err(InvariantError::new(format!(
                "lfu index holds {} keys for {} slots",
                self.order.len(),
                self.slots.len()
            )));
        }
        for (&(freq, seq), &id) in &self.order {
            match self.slots.get(id) {
                Some(entry) if entry.freq == freq && entry.seq == seq => {},
                Some(_) => {
                    return Err(InvariantError::new(format!(
                        "lfu index key ({freq}, {seq}) disagrees with slot {id}"
                    )));
                },
                None => {
                    return Err(InvariantError::new(format!(
                        "lfu index points to vacant slot {id}"
                    )));
                },
            }
        }
        Ok(())
    }
}
