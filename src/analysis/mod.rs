//! Hit/miss measurement on top of replacement policies.
//!
//! - [`PolicyMonitor`]: one policy bounded to a key budget, counting hits and
//!   misses.
//! - [`PolicyAnalyzer`]: several monitors fed the same keys and ranked by hit
//!   ratio.
//! - [`OfflineReplay`] / [`OfflineResult`]: cumulative hit curves over a
//!   recorded trace.

pub mod analyzer;
pub mod hit_stat;
pub mod monitor;
pub mod offline;

pub use analyzer::{FanOut, MonitorId, PolicyAnalyzer};
pub use hit_stat::HitStat;
pub use monitor::PolicyMonitor;
pub use offline::{OfflineReplay, OfflineResult};
