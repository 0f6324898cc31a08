use std::fmt;
use std::ops::Sub;

/// Hit/miss counters for one monitor or one replay step.
///
/// # Example
///
/// ```
/// use evictkit::analysis::HitStat;
///
/// let stat = HitStat::new(3, 1);
/// assert_eq!(stat.total(), 4);
/// assert_eq!(stat.hit_ratio(), 0.75);
/// assert_eq!(HitStat::default().hit_ratio(), -1.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HitStat {
    pub hits: u64,
    pub misses: u64,
}

impl HitStat {
    pub const fn new(hits: u64, misses: u64) -> Self {
        Self { hits, misses }
    }

    /// Number of recorded accesses.
    #[inline]
    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }

    /// `hits / total`, or `-1.0` when nothing has been recorded.
    ///
    /// The sentinel sorts below every real ratio, so idle monitors rank last.
    #[inline]
    pub fn hit_ratio(&self) -> f64 {
        match self.total() {
            0 => -1.0,
            total => self.hits as f64 / total as f64,
        }
    }

    /// `misses / total`, or `-1.0` when nothing has been recorded.
    #[inline]
    pub fn miss_ratio(&self) -> f64 {
        match self.total() {
            0 => -1.0,
            total => self.misses as f64 / total as f64,
        }
    }

    #[inline]
    pub(crate) fn record(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }
}

/// Counts accrued between two cumulative snapshots.
impl Sub for HitStat {
    type Output = HitStat;

    fn sub(self, earlier: HitStat) -> HitStat {
        HitStat {
            hits: self.hits.saturating_sub(earlier.hits),
            misses: self.misses.saturating_sub(earlier.misses),
        }
    }
}

impl fmt::Display for HitStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hits={} misses={}", self.hits, self.misses)?;
        if self.total() > 0 {
            write!(f, " ratio={:.2}%", self.hit_ratio() * 100.0)?;
        }
        Ok(())
    }
}
