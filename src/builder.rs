//! Policy builder: construct any eviction policy by name.
//!
//! Hides the concrete policy types behind [`BoxedPolicy`] so callers (the
//! analyzer, the comparison CLI) can pick policies at runtime.
//!
//! ## Example
//!
//! ```rust
//! use evictkit::builder::{PolicyBuilder, PolicyKind};
//! use evictkit::traits::{Attribute, Attributes};
//!
//! let mut policy = PolicyBuilder::new(PolicyKind::Lru)
//!     .capacity_hint(64)
//!     .threshold(Attribute::Size, 1024.0)
//!     .build::<u64>()
//!     .unwrap();
//!
//! assert!(policy.add_with(1, &Attributes::new().with(Attribute::Size, 10.0)).is_ok());
//! assert!(policy.add_with(2, &Attributes::new().with(Attribute::Size, 4096.0)).is_err());
//! assert_eq!(policy.name(), "lru");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::policy::clock::ClockPolicy;
use crate::policy::fifo::FifoPolicy;
use crate::policy::lfu::LfuPolicy;
use crate::policy::lifo::LifoPolicy;
use crate::policy::lru::LruPolicy;
use crate::policy::mru::MruPolicy;
use crate::policy::random::RandomPolicy;
use crate::policy::threshold::ThresholdPolicy;
use crate::traits::{Attribute, BoxedPolicy};

/// Available eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// Least Recently Used eviction.
    Lru,
    /// Most Recently Used eviction.
    Mru,
    /// First In, First Out eviction.
    Fifo,
    /// Last In, First Out eviction.
    Lifo,
    /// Least Frequently Used eviction, ties in admission order.
    Lfu,
    /// Second-chance clock.
    Clock,
    /// Uniform random eviction; `None` seeds from the operating system.
    Random { seed: Option<u64> },
}

impl PolicyKind {
    /// Every policy, with an OS-seeded random policy.
    pub const ALL: [PolicyKind; 7] = [
        PolicyKind::Lru,
        PolicyKind::Mru,
        PolicyKind::Fifo,
        PolicyKind::Lifo,
        PolicyKind::Lfu,
        PolicyKind::Clock,
        PolicyKind::Random { seed: None },
    ];

    /// Name matching [`ReplacementPolicy::name`](crate::traits::ReplacementPolicy::name).
    pub fn name(&self) -> &'static str {
        match self {
            PolicyKind::Lru => "lru",
            PolicyKind::Mru => "mru",
            PolicyKind::Fifo => "fifo",
            PolicyKind::Lifo => "lifo",
            PolicyKind::Lfu => "lfu",
            PolicyKind::Clock => "clock",
            PolicyKind::Random { .. } => "random",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Random { seed: Some(seed) } => write!(f, "random:{seed}"),
            other => f.write_str(other.name()),
        }
    }
}

/// Case-insensitive policy name; `random:<seed>` fixes the random seed.
impl FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        if let Some(seed) = lowered.strip_prefix("random:") {
            let seed = seed
                .parse()
                .map_err(|_| ConfigError::new(format!("invalid random seed: {seed:?}")))?;
            return Ok(PolicyKind::Random { seed: Some(seed) });
        }
        match lowered.as_str() {
            "lru" => Ok(PolicyKind::Lru),
            "mru" => Ok(PolicyKind::Mru),
            "fifo" => Ok(PolicyKind::Fifo),
            "lifo" => Ok(PolicyKind::Lifo),
            "lfu" => Ok(PolicyKind::Lfu),
            "clock" => Ok(PolicyKind::Clock),
            "random" => Ok(PolicyKind::Random { seed: None }),
            _ => Err(ConfigError::new(format!("unknown policy: {s:?}"))),
        }
    }
}

/// Builder for boxed policy instances.
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    kind: PolicyKind,
    capacity_hint: usize,
    threshold: Option<(Attribute, f64)>,
}

impl PolicyBuilder {
    pub fn new(kind: PolicyKind) -> Self {
        Self {
            kind,
            capacity_hint: 0,
            threshold: None,
        }
    }

    /// Preallocates room for `capacity` slots where the policy supports it.
    pub fn capacity_hint(mut self, capacity: usize) -> Self {
        self.capacity_hint = capacity;
        self
    }

    /// Wraps the policy in a [`ThresholdPolicy`] on `attribute`.
    pub fn threshold(mut self, attribute: Attribute, ceiling: f64) -> Self {
        self.threshold = Some((attribute, ceiling));
        self
    }

    pub fn kind(&self) -> PolicyKind {
        self.kind
    }

    /// Builds the policy.
    ///
    /// Fails if the threshold ceiling is negative or NaN.
    pub fn build<T>(&self) -> Result<BoxedPolicy<T>, ConfigError>
    where
        T: Send + 'static,
    {
        let capacity = self.capacity_hint;
        let policy: BoxedPolicy<T> = match self.kind {
            PolicyKind::Lru => Box::new(LruPolicy::with_capacity(capacity)),
            PolicyKind::Mru => Box::new(MruPolicy::with_capacity(capacity)),
            PolicyKind::Fifo => Box::new(FifoPolicy::with_capacity(capacity)),
            PolicyKind::Lifo => Box::new(LifoPolicy::with_capacity(capacity)),
            PolicyKind::Lfu => Box::new(LfuPolicy::with_capacity(capacity)),
            PolicyKind::Clock => Box::new(ClockPolicy::with_capacity(capacity)),
            PolicyKind::Random { seed: Some(seed) } => Box::new(RandomPolicy::with_seed(seed)),
            PolicyKind::Random { seed: None } => Box::new(RandomPolicy::new()),
        };

        match self.threshold {
            Some((attribute, ceiling)) => Ok(Box::new(ThresholdPolicy::with_attribute(
                policy, attribute, ceiling,
            )?)),
            None => Ok(policy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Attributes;

    #[test]
    fn all_policies_basic_ops() {
        for kind in PolicyKind::ALL {
            let mut policy = PolicyBuilder::new(kind).capacity_hint(8).build::<u64>().unwrap();
            assert_eq!(policy.name(), kind.name());

            let a = policy.add(1).unwrap();
            let b = policy.add(2).unwrap();
            assert_eq!(policy.len(), 2);
            policy.touch(a);
            assert_eq!(policy.update(b, 20), Ok(2));
            assert_eq!(policy.peek_all().len(), 2);
            policy.check_invariants().unwrap();

            let mut drained = policy.evict_all();
            drained.sort();
            assert_eq!(drained, vec![1, 20], "{kind}");
            assert!(policy.is_empty());
        }
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in PolicyKind::ALL {
            assert_eq!(kind.to_string().parse::<PolicyKind>().unwrap(), kind);
        }
        assert_eq!("LRU".parse::<PolicyKind>().unwrap(), PolicyKind::Lru);
        assert_eq!(
            "random:17".parse::<PolicyKind>().unwrap(),
            PolicyKind::Random { seed: Some(17) }
        );
    }

    #[test]
    fn unknown_names_are_config_errors() {
        assert!("arc".parse::<PolicyKind>().is_err());
        let err = "random:x".parse::<PolicyKind>().unwrap_err();
        assert!(err.message().contains("seed"));
    }

    #[test]
    fn threshold_wraps_policy() {
        let mut policy = PolicyBuilder::new(PolicyKind::Fifo)
            .threshold(Attribute::Cost, 5.0)
            .build::<&'static str>()
            .unwrap();
        let cheap = Attributes::new().with(Attribute::Cost, 1.0);
        let dear = Attributes::new().with(Attribute::Cost, 6.0);
        assert!(policy.add_with("cheap", &cheap).is_ok());
        assert!(policy.add_with("dear", &dear).is_err());
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn invalid_threshold_fails_build() {
        let builder = PolicyBuilder::new(PolicyKind::Lru).threshold(Attribute::Size, -3.0);
        assert!(builder.build::<u8>().is_err());
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let builder = PolicyBuilder::new(PolicyKind::Random { seed: Some(4) });
        let mut a = builder.build::<u32>().unwrap();
        let mut b = builder.build::<u32>().unwrap();
        for key in 0..32 {
            a.add(key).unwrap();
            b.add(key).unwrap();
        }
        assert_eq!(a.evict_all(), b.evict_all());
    }
}
