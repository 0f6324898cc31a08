//! Hit/miss bookkeeping around a single policy.
//!
//! ```text
//!   add_if_missing(key)
//!        │
//!        ├── key in slots ──► policy.touch(id), hits += 1, return false
//!        │
//!        └── absent ──► misses += 1
//!                       while policy.len() >= max_size:
//!                           victim = policy.evict_next(); slots.remove(victim)
//!                       policy.add(key) ──► Ok(id): slots.insert(key, id)
//!                                        └► Err(_): refused, nothing recorded
//!                       return true
//! ```
//!
//! The policy stores the keys themselves as its elements, so an evicted
//! element names exactly the map entry to drop.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::analysis::HitStat;
use crate::ds::SlotId;
use crate::error::{ConfigError, InvariantError};
use crate::traits::{Attributes, BoxedPolicy};

/// A policy bounded to `max_size` keys, counting hits and misses.
///
/// # Example
///
/// ```
/// use evictkit::analysis::PolicyMonitor;
/// use evictkit::policy::fifo::FifoPolicy;
///
/// let mut monitor = PolicyMonitor::new(Box::new(FifoPolicy::new()), 2).unwrap();
/// assert!(monitor.add_if_missing("a"));
/// assert!(!monitor.add_if_missing("a"));
/// assert!(monitor.add_if_missing("b"));
/// assert!(monitor.add_if_missing("c"));
///
/// assert!(!monitor.contains_element(&"a"));
/// let stats = monitor.hit_statistics();
/// assert_eq!((stats.hits, stats.misses), (1, 3));
/// ```
pub struct PolicyMonitor<K> {
    policy: BoxedPolicy<K>,
    slots: FxHashMap<K, SlotId>,
    max_size: usize,
    stats: HitStat,
}

impl<K> PolicyMonitor<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a monitor holding at most `max_size` keys.
    ///
    /// The policy should be empty; elements already inside it are not known
    /// to the monitor and only leave through eviction.
    pub fn new(policy: BoxedPolicy<K>, max_size: usize) -> Result<Self, ConfigError> {
        if max_size == 0 {
            return Err(ConfigError::new("monitor max_size must be >= 1"));
        }
        Ok(Self {
            policy,
            slots: FxHashMap::with_capacity_and_hasher(max_size, Default::default()),
            max_size,
            stats: HitStat::default(),
        })
    }

    /// Records an access to `key`. Returns `true` on a miss.
    pub fn add_if_missing(&mut self, key: K) -> bool {
        self.add_if_missing_with(key, &Attributes::EMPTY)
    }

    /// Like [`add_if_missing`](Self::add_if_missing), passing `attributes`
    /// to the policy on admission.
    pub fn add_if_missing_with(&mut self, key: K, attributes: &Attributes) -> bool {
        if let Some(&id) = self.slots.get(&key) {
            self.policy.touch(id);
            self.stats.record(true);
            return false;
        }

        self.stats.record(false);
        // A refused key must not cost a resident one its slot.
        if !self.policy.admits(attributes) {
            return true;
        }
        while self.policy.len() >= self.max_size {
            match self.policy.evict_next() {
                Some(victim) => {
                    self.slots.remove(&victim);
                },
                None => break,
            }
        }
        if let Ok(id) = self.policy.add_with(key.clone(), attributes) {
            self.slots.insert(key, id);
        }
        true
    }

    /// Returns `true` if `key` is currently held.
    pub fn contains_element(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// Empties the policy and the key map. Counters are kept.
    pub fn clear(&mut self) {
        self.policy.clear();
        self.slots.clear();
    }

    /// Checks that the key map and the policy agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.policy.check_invariants()?;
        if self.slots.len() != self.policy.len() {
            return Err(InvariantError::new(format!(
                "{} monitor maps {} keys but policy holds {}",
                self.name(),
                self.slots.len(),
                self.policy.len()
            )));
        }
        if self.policy.len() > self.max_size {
            return Err(InvariantError::new(format!(
                "{} monitor holds {} keys over max_size {}",
                self.name(),
                self.policy.len(),
                self.max_size
            )));
        }
        if let Some(id) = self.slots.values().find(|id| !self.policy.contains(**id)) {
            return Err(InvariantError::new(format!(
                "{} monitor maps a key to vacant slot {id}",
                self.name()
            )));
        }
        Ok(())
    }
}

impl<K> PolicyMonitor<K> {
    /// Snapshot of the counters.
    pub fn hit_statistics(&self) -> HitStat {
        self.stats
    }

    /// Zeroes the counters; held keys are untouched.
    pub fn reset_statistics(&mut self) {
        self.stats = HitStat::default();
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.policy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policy.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Name of the wrapped policy.
    pub fn name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn policy(&self) -> &BoxedPolicy<K> {
        &self.policy
    }
}

impl<K> fmt::Debug for PolicyMonitor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyMonitor")
            .field("policy", &self.policy.name())
            .field("len", &self.policy.len())
            .field("max_size", &self.max_size)
            .field("stats", &self.stats)
            .finish()
    }
}
