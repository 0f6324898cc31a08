//! evictkit: cache replacement policies and an offline harness for comparing them.
//!
//! Policies order opaque elements and pick eviction victims
//! ([`traits::ReplacementPolicy`]). A [`analysis::PolicyMonitor`] turns a policy
//! into hit/miss counts for a key stream, a [`analysis::PolicyAnalyzer`] races
//! several monitors against the same keys, and [`analysis::OfflineReplay`]
//! produces cumulative hit curves from a recorded trace.
//!
//! ```
//! use evictkit::prelude::*;
//!
//! let mut analyzer = PolicyAnalyzer::new();
//! analyzer.add_monitor(Box::new(LruPolicy::new()), 2).unwrap();
//! analyzer.add_monitor(Box::new(FifoPolicy::new()), 2).unwrap();
//! analyzer.run_trace([1, 2, 1, 3, 1, 2]);
//!
//! let ranked = analyzer.monitors();
//! assert_eq!(ranked[0].name(), "lru");
//! ```

pub mod analysis;
pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod trace;
pub mod traits;
