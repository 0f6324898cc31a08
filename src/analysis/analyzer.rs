//! Races several monitors against one key stream.
//!
//! ```text
//!                         ┌──► monitor #0 (lru,   max 100) ──► miss?
//!   add_if_missing(key) ──┼──► monitor #1 (lfu,   max 100) ──► miss?   ──► FanOut
//!                         └──► monitor #2 (clock, max 100) ──► miss?
//! ```
//!
//! Each key is fed to every monitor in registration order and each monitor
//! reports its own outcome. A key can be a hit for one policy and a miss for
//! another, so there is no single aggregate answer.
//!
//! ## Ranking
//!
//! [`PolicyAnalyzer::monitors`] sorts by descending hit ratio. The sort is
//! stable: monitors with equal ratios keep registration order. Monitors that
//! have seen no accesses report a ratio of `-1.0` and rank last.

use std::hash::Hash;

use crate::analysis::{HitStat, PolicyMonitor};
use crate::error::ConfigError;
use crate::traits::BoxedPolicy;

/// Handle to a monitor registered with a [`PolicyAnalyzer`].
///
/// Ids are never reused within one analyzer, even after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonitorId(usize);

impl MonitorId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Per-monitor outcome of one [`PolicyAnalyzer::add_if_missing`] call.
///
/// `true` means the key was a miss for that monitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOut {
    results: Vec<(MonitorId, bool)>,
}

impl FanOut {
    /// Miss flag for `id`, or `None` if it was not registered at the time.
    pub fn get(&self, id: MonitorId) -> Option<bool> {
        self.results
            .iter()
            .find(|(monitor, _)| *monitor == id)
            .map(|&(_, missed)| missed)
    }

    /// Results in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (MonitorId, bool)> + '_ {
        self.results.iter().copied()
    }

    /// `true` if every monitor missed (vacuously true with no monitors).
    pub fn all_missed(&self) -> bool {
        self.results.iter().all(|&(_, missed)| missed)
    }

    /// `true` if at least one monitor missed.
    pub fn any_missed(&self) -> bool {
        self.results.iter().any(|&(_, missed)| missed)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A set of monitors fed the same keys.
///
/// # Example
///
/// ```
/// use evictkit::analysis::PolicyAnalyzer;
/// use evictkit::policy::{lfu::LfuPolicy, lru::LruPolicy};
///
/// let mut analyzer = PolicyAnalyzer::new();
/// let lru = analyzer.add_monitor(Box::new(LruPolicy::new()), 2).unwrap();
/// let lfu = analyzer.add_monitor(Box::new(LfuPolicy::new()), 2).unwrap();
///
/// analyzer.add_if_missing(1);
/// let outcome = analyzer.add_if_missing(1);
/// assert_eq!(outcome.get(lru), Some(false));
/// assert_eq!(outcome.get(lfu), Some(false));
/// assert!(!outcome.any_missed());
/// ```
pub struct PolicyAnalyzer<K> {
    monitors: Vec<(MonitorId, PolicyMonitor<K>)>,
    next_id: usize,
}

impl<K> PolicyAnalyzer<K> {
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
            next_id: 0,
        }
    }

    /// Number of registered monitors.
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Looks up a registered monitor.
    pub fn monitor(&self, id: MonitorId) -> Option<&PolicyMonitor<K>> {
        self.monitors
            .iter()
            .find(|(monitor_id, _)| *monitor_id == id)
            .map(|(_, monitor)| monitor)
    }

    /// Monitors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (MonitorId, &PolicyMonitor<K>)> + '_ {
        self.monitors.iter().map(|(id, monitor)| (*id, monitor))
    }

    /// Monitors ranked by descending hit ratio, ties in registration order.
    pub fn ranking(&self) -> Vec<(MonitorId, &PolicyMonitor<K>)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|(_, a), (_, b)| {
            b.hit_statistics()
                .hit_ratio()
                .total_cmp(&a.hit_statistics().hit_ratio())
        });
        ranked
    }

    /// Monitors ranked by descending hit ratio, ties in registration order.
    pub fn monitors(&self) -> Vec<&PolicyMonitor<K>> {
        self.ranking()
            .into_iter()
            .map(|(_, monitor)| monitor)
            .collect()
    }

    /// Unregisters a monitor. Returns `false` if `id` is unknown.
    pub fn remove_monitor(&mut self, id: MonitorId) -> bool {
        let Some(pos) = self.monitors.iter().position(|(monitor_id, _)| *monitor_id == id) else {
            return false;
        };
        let (_, monitor) = self.monitors.remove(pos);
        tracing::debug!(
            monitor = id.index(),
            policy = monitor.name(),
            stats = %monitor.hit_statistics(),
            "monitor removed"
        );
        true
    }

    /// Zeroes every monitor's counters; held keys are untouched.
    pub fn reset_statistics(&mut self) {
        for (_, monitor) in &mut self.monitors {
            monitor.reset_statistics();
        }
    }

    /// Sum of all monitors' counters.
    pub fn combined_statistics(&self) -> HitStat {
        self.monitors
            .iter()
            .fold(HitStat::default(), |acc, (_, monitor)| {
                let stat = monitor.hit_statistics();
                HitStat::new(acc.hits + stat.hits, acc.misses + stat.misses)
            })
    }
}

impl<K> PolicyAnalyzer<K>
where
    K: Eq + Hash + Clone,
{
    /// Registers a monitor over `policy` holding at most `max_size` keys.
    pub fn add_monitor(
        &mut self,
        policy: BoxedPolicy<K>,
        max_size: usize,
    ) -> Result<MonitorId, ConfigError> {
        let monitor = PolicyMonitor::new(policy, max_size)?;
        let id = MonitorId(self.next_id);
        self.next_id += 1;
        tracing::debug!(
            monitor = id.index(),
            policy = monitor.name(),
            max_size,
            "monitor registered"
        );
        self.monitors.push((id, monitor));
        Ok(id)
    }

    /// Feeds `key` to every monitor in registration order.
    pub fn add_if_missing(&mut self, key: K) -> FanOut {
        let results = self
            .monitors
            .iter_mut()
            .map(|(id, monitor)| (*id, monitor.add_if_missing(key.clone())))
            .collect();
        FanOut { results }
    }

    /// Feeds every key of `trace` in order. Returns the number of keys fed.
    pub fn run_trace<I>(&mut self, trace: I) -> u64
    where
        I: IntoIterator<Item = K>,
    {
        let mut fed = 0;
        for key in trace {
            self.add_if_missing(key);
            fed += 1;
        }
        fed
    }

    /// Empties every monitor's keys. Counters are kept.
    pub fn clear(&mut self) {
        for (_, monitor) in &mut self.monitors {
            monitor.clear();
        }
    }
}

impl<K> Default for PolicyAnalyzer<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> std::fmt::Debug for PolicyAnalyzer<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyAnalyzer")
            .field("monitors", &self.monitors)
            .finish()
    }
}
