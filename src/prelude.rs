pub use crate::analysis::{
    FanOut, HitStat, MonitorId, OfflineReplay, OfflineResult, PolicyAnalyzer, PolicyMonitor,
};
pub use crate::builder::{PolicyBuilder, PolicyKind};
pub use crate::ds::SlotId;
pub use crate::error::{ConfigError, InvariantError, Rejected, UpdateRejected};
pub use crate::policy::clock::ClockPolicy;
pub use crate::policy::fifo::FifoPolicy;
pub use crate::policy::lfu::LfuPolicy;
pub use crate::policy::lifo::LifoPolicy;
pub use crate::policy::lru::LruPolicy;
pub use crate::policy::mru::MruPolicy;
pub use crate::policy::random::RandomPolicy;
pub use crate::policy::synchronized::SynchronizedPolicy;
pub use crate::policy::threshold::ThresholdPolicy;
pub use crate::trace::{TraceGenerator, Workload};
pub use crate::traits::{Attribute, Attributes, BoxedPolicy, ReplacementPolicy};
