//! Offline replay of a recorded key trace.
//!
//! ## Step Snapshots
//!
//! ```text
//!   trace:   k0 k1 k2 k3 │ k4 k5 k6 k7 │ k8 k9
//!            └─ step 0 ─┘ └─ step 1 ─┘ └ step 2 (partial)
//!
//!   result(0) = counts after k3
//!   result(1) = counts after k7   (cumulative from k0, not from k4)
//!   result(2) = counts after k9   == total()
//! ```
//!
//! `steps() == ceil(trace.len() / step_width)`. A trace shorter than one
//! step still yields one snapshot; an empty trace yields none.
//!
//! ## Parallel Replay
//!
//! [`OfflineReplay::run_parallel`] replays several policies over the same
//! trace on scoped threads. Each policy still sees the keys strictly in
//! trace order; only the policies run side by side.

use std::hash::Hash;
use std::thread;

use crate::analysis::{HitStat, PolicyMonitor};
use crate::error::ConfigError;
use crate::traits::BoxedPolicy;

/// Replays traces with a fixed checkpoint interval.
///
/// # Example
///
/// ```
/// use evictkit::analysis::OfflineReplay;
/// use evictkit::policy::lru::LruPolicy;
///
/// let replay = OfflineReplay::new(4).unwrap();
/// let trace = [1, 2, 1, 3, 1, 2, 4, 1, 2, 5];
/// let result = replay.run(trace, Box::new(LruPolicy::new()), 3).unwrap();
///
/// assert_eq!(result.steps(), 3);
/// assert_eq!(result.result(result.steps() - 1), result.total());
/// assert_eq!(result.total().total(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfflineReplay {
    step_width: usize,
}

impl OfflineReplay {
    /// Creates a replay recording a snapshot every `step_width` accesses.
    pub fn new(step_width: usize) -> Result<Self, ConfigError> {
        if step_width == 0 {
            return Err(ConfigError::new("step width must be >= 1"));
        }
        Ok(Self { step_width })
    }

    pub fn step_width(&self) -> usize {
        self.step_width
    }

    /// Replays `trace` through a fresh monitor over `policy`.
    pub fn run<K, I>(
        &self,
        trace: I,
        policy: BoxedPolicy<K>,
        max_size: usize,
    ) -> Result<OfflineResult, ConfigError>
    where
        K: Eq + Hash + Clone,
        I: IntoIterator<Item = K>,
    {
        let mut monitor = PolicyMonitor::new(policy, max_size)?;
        Ok(self.replay(&mut monitor, trace))
    }

    /// Replays `trace` through each policy on its own scoped thread.
    ///
    /// Results are returned in the order of `policies`. Fails before any
    /// thread starts if `max_size` is invalid.
    pub fn run_parallel<K>(
        &self,
        trace: &[K],
        policies: Vec<BoxedPolicy<K>>,
        max_size: usize,
    ) -> Result<Vec<OfflineResult>, ConfigError>
    where
        K: Eq + Hash + Clone + Send + Sync,
    {
        let monitors = policies
            .into_iter()
            .map(|policy| PolicyMonitor::new(policy, max_size))
            .collect::<Result<Vec<_>, _>>()?;

        let results = thread::scope(|scope| {
            let handles: Vec<_> = monitors
                .into_iter()
                .map(|mut monitor| {
                    scope.spawn(move || self.replay(&mut monitor, trace.iter().cloned()))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        });
        Ok(results)
    }

    fn replay<K, I>(&self, monitor: &mut PolicyMonitor<K>, trace: I) -> OfflineResult
    where
        K: Eq + Hash + Clone,
        I: IntoIterator<Item = K>,
    {
        let mut hits = Vec::new();
        let mut misses = Vec::new();
        let mut in_step = 0;

        for key in trace {
            monitor.add_if_missing(key);
            in_step += 1;
            if in_step == self.step_width {
                self.snapshot(monitor, &mut hits, &mut misses);
                in_step = 0;
            }
        }
        if in_step > 0 {
            self.snapshot(monitor, &mut hits, &mut misses);
        }

        let total = monitor.hit_statistics();
        tracing::debug!(
            policy = monitor.name(),
            steps = hits.len(),
            %total,
            "offline replay finished"
        );
        OfflineResult {
            step_width: self.step_width,
            hits,
            misses,
            total,
        }
    }

    fn snapshot<K>(&self, monitor: &PolicyMonitor<K>, hits: &mut Vec<u64>, misses: &mut Vec<u64>) {
        let stat = monitor.hit_statistics();
        tracing::trace!(
            policy = monitor.name(),
            step = hits.len(),
            hits = stat.hits,
            misses = stat.misses,
            "step snapshot"
        );
        hits.push(stat.hits);
        misses.push(stat.misses);
    }
}

/// Cumulative hit/miss curve produced by [`OfflineReplay`].
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflineResult {
    step_width: usize,
    hits: Vec<u64>,
    misses: Vec<u64>,
    total: HitStat,
}

impl OfflineResult {
    /// Builds a result from parallel cumulative arrays.
    ///
    /// Fails if `step_width == 0` or the arrays differ in length.
    pub fn new(
        step_width: usize,
        hits: Vec<u64>,
        misses: Vec<u64>,
        total: HitStat,
    ) -> Result<Self, ConfigError> {
        if step_width == 0 {
            return Err(ConfigError::new("step width must be >= 1"));
        }
        if hits.len() != misses.len() {
            return Err(ConfigError::new(format!(
                "hits length {} does not match misses length {}",
                hits.len(),
                misses.len()
            )));
        }
        Ok(Self {
            step_width,
            hits,
            misses,
            total,
        })
    }

    /// Number of recorded snapshots.
    pub fn steps(&self) -> usize {
        self.hits.len()
    }

    pub fn step_width(&self) -> usize {
        self.step_width
    }

    /// Counts from the start of the trace through the end of `step`.
    ///
    /// # Panics
    ///
    /// Panics if `step >= self.steps()`.
    pub fn result(&self, step: usize) -> HitStat {
        match self.get(step) {
            Some(stat) => stat,
            None => panic!(
                "offline step {step} out of range ({} steps recorded)",
                self.steps()
            ),
        }
    }

    /// Non-panicking [`result`](Self::result).
    pub fn get(&self, step: usize) -> Option<HitStat> {
        Some(HitStat::new(*self.hits.get(step)?, *self.misses.get(step)?))
    }

    /// Counts accrued during `step` alone.
    pub fn increment(&self, step: usize) -> Option<HitStat> {
        let current = self.get(step)?;
        match step.checked_sub(1) {
            Some(previous) => Some(current - self.get(previous)?),
            None => Some(current),
        }
    }

    /// Grand total over the whole trace.
    pub fn total(&self) -> HitStat {
        self.total
    }

    /// Cumulative snapshots in step order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = HitStat> + '_ {
        self.hits
            .iter()
            .zip(&self.misses)
            .map(|(&hits, &misses)| HitStat::new(hits, misses))
    }
}
