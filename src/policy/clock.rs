//! Clock (second-chance) replacement policy.
//!
//! An approximation of LRU that keeps one reference bit per slot instead of a
//! full recency order. `touch` sets the bit; eviction sweeps a hand around
//! the ring, clearing set bits and taking the first slot whose bit was
//! already clear.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          ClockPolicy<T>                               │
//!   │                                                                       │
//!   │        ┌─────┐     ┌─────┐                                            │
//!   │        │ A:1 │ ──► │ B:0 │ ◄── hand                                   │
//!   │        └─────┘     └─────┘                                            │
//!   │           ▲           │                                               │
//!   │           │           ▼                                               │
//!   │        ┌─────┐     ┌─────┐                                            │
//!   │        │ D:1 │ ◄── │ C:1 │                                            │
//!   │        └─────┘     └─────┘                                            │
//!   │                                                                       │
//!   │   evict_next(): B has ref=0 → evict B, hand moves to C                │
//!   │   evict_next(): C ref=1 → clear, D ref=1 → clear, A ref=1 → clear,    │
//!   │                 C ref=0 → evict C                                     │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Properties
//!
//! - A slot touched before the hand reaches it survives that sweep.
//! - A slot touched between every pair of sweeps is never chosen by
//!   `evict_next` while another unreferenced slot exists; only `remove`
//!   takes it out.
//! - New elements are admitted with a clear bit.
//! - `peek` and `peek_all` simulate the sweep on a copy of the bits; they
//!   never clear anything.

use crate::ds::{ClockRing, SlotId};
use crate::error::{InvariantError, Rejected, UpdateRejected};
use crate::traits::{Attributes, ReplacementPolicy, stale_slot};

/// Second-chance policy built on [`ClockRing`].
///
/// # Example
///
/// ```
/// use evictkit::policy::clock::ClockPolicy;
/// use evictkit::traits::ReplacementPolicy;
///
/// let mut clock = ClockPolicy::new();
/// let a = clock.add("a").unwrap();
/// clock.add("b").unwrap();
/// clock.touch(a);
///
/// // "a" gets a second chance; "b" is taken first.
/// assert_eq!(clock.evict_next(), Some("b"));
/// assert_eq!(clock.evict_next(), Some("a"));
/// ```
#[derive(Debug, Clone)]
pub struct ClockPolicy<T> {
    ring: ClockRing<T>,
}

impl<T> ClockPolicy<T> {
    /// Creates an empty clock policy.
    pub fn new() -> Self {
        Self {
            ring: ClockRing::new(),
        }
    }

    /// Creates an empty clock policy with room for `capacity` ring positions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ring: ClockRing::with_capacity(capacity),
        }
    }

    /// Reference bit of the slot at `id`, if live.
    pub fn is_referenced(&self, id: SlotId) -> Option<bool> {
        self.ring.is_referenced(id)
    }
}

impl<T> Default for ClockPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementPolicy<T> for ClockPolicy<T> {
    fn add_with(&mut self, element: T, _attributes: &Attributes) -> Result<SlotId, Rejected<T>> {
        Ok(self.ring.insert(element))
    }

    fn update_with(
        &mut self,
        id: SlotId,
        element: T,
        _attributes: &Attributes,
    ) -> Result<T, UpdateRejected<T>> {
        match self.ring.get_mut(id) {
            Some(slot) => Ok(std::mem::replace(slot, element)),
            None => stale_slot(self.name(), id),
        }
    }

    fn touch(&mut self, id: SlotId) {
        if !self.ring.touch(id) {
            stale_slot(self.name(), id);
        }
    }

    fn remove(&mut self, id: SlotId) -> T {
        match self.ring.remove(id) {
            Some(element) => element,
            None => stale_slot(self.name(), id),
        }
    }

    fn evict_next(&mut self) -> Option<T> {
        self.ring.pop_victim()
    }

    fn peek(&self) -> Option<&T> {
        self.ring.peek_victim().and_then(|id| self.ring.get(id))
    }

    fn peek_all(&self) -> Vec<&T> {
        self.ring
            .victim_order()
            .into_iter()
            .filter_map(|id| self.ring.get(id))
            .collect()
    }

    fn clear(&mut self) {
        self.ring.clear();
    }

    fn len(&self) -> usize {
        self.ring.len()
    }

    fn contains(&self, id: SlotId) -> bool {
        self.ring.contains(id)
    }

    fn name(&self) -> &'static str {
        "clock"
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.ring.check_invariants()
    }
}
