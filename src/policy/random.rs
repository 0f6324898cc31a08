//! Random replacement policy.
//!
//! Victims are drawn uniformly from the live slots. Accesses are ignored,
//! which makes this the zero-information baseline in policy comparisons.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                        RandomPolicy<T> Layout                               │
//! │                                                                             │
//! │   slots: SlotArena<Entry<T>>            dense: Vec<SlotId>                  │
//! │   ┌────────┬───────────────────┐        ┌──────┬──────┬──────┬──────┐       │
//! │   │ SlotId │ Entry             │        │  0   │  1   │  2   │  3   │       │
//! │   ├────────┼───────────────────┤        ├──────┼──────┼──────┼──────┤       │
//! │   │ id_0   │ { A, pos: 0 }     │───────►│ id_0 │ id_2 │ id_1 │ id_3 │       │
//! │   │ id_1   │ { B, pos: 2 }     │        └──────┴──────┴──────┴──────┘       │
//! │   │ id_2   │ { C, pos: 1 }     │                                            │
//! │   │ id_3   │ { D, pos: 3 }     │                                            │
//! │   └────────┴───────────────────┘                                            │
//! │                                                                             │
//! │   Eviction (O(1)):                                                          │
//! │     1. i = rng.random_range(0..len)                                         │
//! │     2. dense.swap_remove(i)                                                 │
//! │     3. fix `pos` of the id moved into i                                     │
//! │     4. free the victim's slot                                               │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `remove(id)` uses the same swap-remove at the entry's recorded `pos`, so
//! random eviction stays O(1) after arbitrary deletions.
//!
//! ## Determinism
//!
//! The generator is a [`SmallRng`]. [`RandomPolicy::with_seed`] makes runs
//! reproducible. `peek` and `peek_all` draw from a clone of the generator, so
//! they report exactly what the following evictions will return as long as
//! nothing is added or removed in between.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::ds::{SlotArena, SlotId};
use crate::error::{InvariantError, Rejected, UpdateRejected};
use crate::traits::{Attributes, ReplacementPolicy, stale_slot};

#[derive(Debug, Clone)]
struct Entry<T> {
    element: T,
    pos: usize,
}

/// Uniform random eviction over a dense id array.
///
/// # Example
///
/// ```
/// use evictkit::policy::random::RandomPolicy;
/// use evictkit::traits::ReplacementPolicy;
///
/// let mut random = RandomPolicy::with_seed(7);
/// random.add_all(0..10);
///
/// let mut evicted = random.evict_all();
/// evicted.sort();
/// assert_eq!(evicted, (0..10).collect::<Vec<_>>());
/// ```
#[derive(Debug, Clone)]
pub struct RandomPolicy<T> {
    slots: SlotArena<Entry<T>>,
    dense: Vec<SlotId>,
    rng: SmallRng,
}

impl<T> RandomPolicy<T> {
    /// Creates an empty policy seeded from the operating system.
    pub fn new() -> Self {
        Self::from_rng(SmallRng::from_os_rng())
    }

    /// Creates an empty policy with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    fn from_rng(rng: SmallRng) -> Self {
        Self {
            slots: SlotArena::new(),
            dense: Vec::new(),
            rng,
        }
    }

    /// Removes `dense[pos]` by swapping in the last id.
    fn swap_remove_at(&mut self, pos: usize) -> Option<T> {
        let id = self.dense.swap_remove(pos);
        if let Some(&moved) = self.dense.get(pos)
            && let Some(entry) = self.slots.get_mut(moved)
        {
            entry.pos = pos;
        }
        self.slots.remove(id).map(|entry| entry.element)
    }
}

impl<T> Default for RandomPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementPolicy<T> for RandomPolicy<T> {
    fn add_with(&mut self, element: T, _attributes: &Attributes) -> Result<SlotId, Rejected<T>> {
        let pos = self.dense.len();
        let id = self.slots.insert(Entry { element, pos });
        self.dense.push(id);
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
        if !self.slots.contains(id) {
            stale_slot(self.name(), id);
        }
    }

    fn remove(&mut self, id: SlotId) -> T {
        let Some(pos) = self.slots.get(id).map(|entry| entry.pos) else {
            stale_slot(self.name(), id);
        };
        match self.swap_remove_at(pos) {
            Some(element) => element,
            None => stale_slot(self.name(), id),
        }
    }

    fn evict_next(&mut self) -> Option<T> {
        if self.dense.is_empty() {
            return None;
        }
        let pos = self.rng.random_range(0..self.dense.len());
        self.swap_remove_at(pos)
    }

    fn peek(&self) -> Option<&T> {
        if self.dense.is_empty() {
            return None;
        }
        let pos = self.rng.clone().random_range(0..self.dense.len());
        self.slots.get(self.dense[pos]).map(|entry| &entry.element)
    }

    fn peek_all(&self) -> Vec<&T> {
        let mut rng = self.rng.clone();
        let mut dense = self.dense.clone();
        let mut order = Vec::with_capacity(dense.len());
        while !dense.is_empty() {
            let pos = rng.random_range(0..dense.len());
            let id = dense.swap_remove(pos);
            if let Some(entry) = self.slots.get(id) {
                order.push(&entry.element);
            }
        }
        order
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.dense.clear();
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    fn contains(&self, id: SlotId) -> bool {
        self.slots.contains(id)
    }

    fn name(&self) -> &'static str {
        "random"
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.slots.check_invariants()?;
        if self.dense.len() != self.slots.len() {
            return Err(InvariantError::new(format!(
                "random dense array holds {} ids for {} slots",
                self.dense.len(),
                self.slots.len()
            )));
        }
        for (pos, &id) in self.dense.iter().enumerate() {
            match self.slots.get(id) {
                Some(entry) if entry.pos == pos => {},
                _ => {
                    return Err(InvariantError::new(format!(
                        "dense[{pos}] = {id} does not point back"
                    )));
                },
            }
        }
        Ok(())
    }
}
