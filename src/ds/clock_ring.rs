//! Clock-sweep ring for second-chance eviction.
//!
//! Ring positions are the slots of a `SlotArena`, so a position doubles as
//! the slot id handed back to the caller. Accesses set a referenced bit that
//! grants a second chance before eviction.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         ClockRing<T>                                  │
//!   │                                                                       │
//!   │   ring: SlotArena<Entry<T>>                                           │
//!   │   hand ─────────────────────────────────┐                             │
//!   │                                         ▼                             │
//!   │   slot[0] = Entry { A, ref:1 }   slot[1] = Entry { B, ref:0 }         │
//!   │   slot[2] = vacant               slot[3] = Entry { D, ref:1 }         │
//!   │                                                                       │
//!   │   Eviction scan (hand moves forward, wraps at slot_len):              │
//!   │   [B ref=0] -> evict B, hand -> 2                                     │
//!   │   next scan: [vacant] skip, [D ref=1] -> clear, [A ref=1] -> clear,   │
//!   │              [D ref=0] -> evict D                                     │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! New entries go into whatever position the arena recycles (or a new
//! position at the end), unreferenced. The ring only grows; vacant positions
//! are skipped by the hand.
//!
//! ## Performance Characteristics
//!
//! | Operation    | Time        | Notes                                  |
//! |--------------|-------------|----------------------------------------|
//! | `insert`     | O(1) amort. | Arena push or free-list reuse           |
//! | `touch`      | O(1)        | Sets reference bit                      |
//! | `pop_victim` | O(n) worst  | At most two sweeps                      |
//! | `remove`     | O(1)        | Vacates the position                    |
use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    referenced: bool,
}

/// Growable ring implementing the CLOCK (second-chance) sweep.
#[derive(Debug, Clone)]
pub struct ClockRing<T> {
    ring: SlotArena<Entry<T>>,
    hand: usize,
}

impl<T> ClockRing<T> {
    /// Creates an empty ring.
    pub fn new() -> Self {
        Self {
            ring: SlotArena::new(),
            hand: 0,
        }
    }

    /// Creates an empty ring with room for `capacity` positions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ring: SlotArena::with_capacity(capacity),
            hand: 0,
        }
    }

    /// Returns the number of occupied positions.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Returns `true` if `id` is an occupied position.
    pub fn contains(&self, id: SlotId) -> bool {
        self.ring.contains(id)
    }

    /// Current hand position.
    pub fn hand(&self) -> usize {
        self.hand
    }

    /// Returns the value stored at `id`.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.ring.get(id).map(|entry| &entry.value)
    }

    /// Returns the value stored at `id` mutably; the reference bit is untouched.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.ring.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Returns the reference bit for `id`.
    pub fn is_referenced(&self, id: SlotId) -> Option<bool> {
        self.ring.get(id).map(|entry| entry.referenced)
    }

    /// Stores `value` unreferenced and returns its position.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.ring.insert(Entry {
            value,
            referenced: false,
        })
    }

    /// Sets the reference bit for `id`; returns `false` if the position is vacant.
    pub fn touch(&mut self, id: SlotId) -> bool {
        match self.ring.get_mut(id) {
            Some(entry) => {
                entry.referenced = true;
                true
            },
            None => false,
        }
    }

    /// Removes the entry at `id` regardless of its reference bit.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.ring.remove(id).map(|entry| entry.value)
    }

    /// Sweeps from the hand, clearing reference bits, and evicts the first
    /// unreferenced entry. The hand is left on the position after the victim.
    pub fn pop_victim(&mut self) -> Option<T> {
        if self.ring.is_empty() {
            return None;
        }
        let cap = self.ring.slot_len();
        if self.hand >= cap {
            self.hand = 0;
        }
        // Two sweeps always suffice: the first clears every bit it passes.
        for _ in 0..=2 * cap {
            let id = SlotId(self.hand);
            self.hand = (self.hand + 1) % cap;
            if let Some(entry) = self.ring.get_mut(id) {
                if entry.referenced {
                    entry.referenced = false;
                    continue;
                }
                return self.ring.remove(id).map(|entry| entry.value);
            }
        }
        None
    }

    /// Position `pop_victim` would evict, without clearing any bits.
    pub fn peek_victim(&self) -> Option<SlotId> {
        if self.ring.is_empty() {
            return None;
        }
        let cap = self.ring.slot_len();
        let start = if self.hand >= cap { 0 } else { self.hand };
        let mut first_occupied = None;
        for offset in 0..cap {
            let id = SlotId((start + offset) % cap);
            if let Some(entry) = self.ring.get(id) {
                if !entry.referenced {
                    return Some(id);
                }
                first_occupied.get_or_insert(id);
            }
        }
        // Every entry is referenced: the first sweep clears them all and the
        // second evicts the first one it meets.
        first_occupied
    }

    /// Order in which repeated `pop_victim` calls would evict every entry.
    pub fn victim_order(&self) -> Vec<SlotId> {
        let cap = self.ring.slot_len();
        let mut bits: Vec<Option<bool>> = (0..cap)
            .map(|idx| self.ring.get(SlotId(idx)).map(|entry| entry.referenced))
            .collect();
        let mut order = Vec::with_capacity(self.ring.len());
        let mut hand = if self.hand >= cap { 0 } else { self.hand };

        while order.len() < self.ring.len() {
            let idx = hand;
            hand = (hand + 1) % cap;
            match bits[idx] {
                Some(true) => bits[idx] = Some(false),
                Some(false) => {
                    bits[idx] = None;
                    order.push(SlotId(idx));
                },
                None => {},
            }
        }
        order
    }

    /// Drops every entry and resets the hand.
    pub fn clear(&mut self) {
        self.ring.clear();
        self.hand = 0;
    }

    /// Verifies arena bookkeeping and the hand position.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.ring.check_invariants()?;
        let cap = self.ring.slot_len();
        if cap > 0 && self.hand >= cap {
            return Err(InvariantError::new(format!(
                "clock hand {} outside ring of {}",
                self.hand, cap
            )));
        }
        Ok(())
    }
}

impl<T> Default for ClockRing<T> {
    fn default() -> Self {
        Self::new()
    }
}
