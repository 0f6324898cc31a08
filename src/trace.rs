//! Synthetic and file-backed key traces for offline replay.
//!
//! [`TraceGenerator`] produces deterministic key streams from a seed;
//! [`parse_trace`] reads one key per line from a recorded trace.

use std::fmt;
use std::io::{self, BufRead};
use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Workload {
    /// Uniform random keys in `[0, universe)`.
    Uniform,
    /// Hot/cold split with a configurable hot fraction and hot access probability.
    Hotset { hot_fraction: f64, hot_prob: f64 },
    /// Sequential scan in `[0, universe)`, wrapping around.
    Scan,
    /// Zipfian distribution - models real-world skewed access patterns.
    /// `theta` controls skew: 0.0 = uniform, 0.99 = highly skewed (YCSB default).
    Zipfian { theta: f64 },
}

impl Workload {
    /// Hot set of 10% of the keys receiving 90% of accesses.
    pub const HOTSET: Workload = Workload::Hotset {
        hot_fraction: 0.1,
        hot_prob: 0.9,
    };

    /// YCSB-style zipfian skew.
    pub const ZIPFIAN: Workload = Workload::Zipfian { theta: 0.99 };

    pub fn name(&self) -> &'static str {
        match self {
            Workload::Uniform => "uniform",
            Workload::Hotset { .. } => "hotset",
            Workload::Scan => "scan",
            Workload::Zipfian { .. } => "zipfian",
        }
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workload::Hotset {
                hot_fraction,
                hot_prob,
            } => write!(f, "hotset({hot_fraction}, {hot_prob})"),
            Workload::Zipfian { theta } => write!(f, "zipfian({theta})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Parses `uniform`, `hotset`, `scan` or `zipfian` (case-insensitive) with
/// default parameters.
impl FromStr for Workload {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(Workload::Uniform),
            "hotset" => Ok(Workload::HOTSET),
            "scan" => Ok(Workload::Scan),
            "zipfian" | "zipf" => Ok(Workload::ZIPFIAN),
            other => Err(ConfigError::new(format!("unknown workload: {other:?}"))),
        }
    }
}

/// Deterministic key stream over `[0, universe)`.
///
/// # Example
///
/// ```
/// use evictkit::trace::{TraceGenerator, Workload};
///
/// let a: Vec<u64> = TraceGenerator::new(100, Workload::ZIPFIAN, 7).take(50).collect();
/// let b: Vec<u64> = TraceGenerator::new(100, Workload::ZIPFIAN, 7).take(50).collect();
/// assert_eq!(a, b);
/// assert!(a.iter().all(|&key| key < 100));
/// ```
#[derive(Debug, Clone)]
pub struct TraceGenerator {
    universe: u64,
    workload: Workload,
    rng: SmallRng,
    scan_pos: u64,
    zipfian: Option<ZipfianState>,
}

impl TraceGenerator {
    /// A `universe` of zero is treated as one.
    pub fn new(universe: u64, workload: Workload, seed: u64) -> Self {
        let universe = universe.max(1);
        let zipfian = match workload {
            Workload::Zipfian { theta } => Some(ZipfianState::new(universe, theta)),
            _ => None,
        };
        Self {
            universe,
            workload,
            rng: SmallRng::seed_from_u64(seed),
            scan_pos: 0,
            zipfian,
        }
    }

    pub fn universe(&self) -> u64 {
        self.universe
    }

    pub fn workload(&self) -> Workload {
        self.workload
    }

    pub fn next_key(&mut self) -> u64 {
        match self.workload {
            Workload::Uniform => self.rng.random_range(0..self.universe),
            Workload::Hotset {
                hot_fraction,
                hot_prob,
            } => {
                let hot_fraction = hot_fraction.clamp(0.0, 1.0);
                let hot_prob = hot_prob.clamp(0.0, 1.0);
                let hot_size = ((self.universe as f64) * hot_fraction).round() as u64;
                let hot_size = hot_size.clamp(1, self.universe);
                if self.rng.random::<f64>() < hot_prob || hot_size == self.universe {
                    self.rng.random_range(0..hot_size.max(1))
                } else {
                    self.rng.random_range(hot_size..self.universe)
                }
            },
            Workload::Scan => {
                let key = self.scan_pos;
                self.scan_pos = (self.scan_pos + 1) % self.universe;
                key
            },
            Workload::Zipfian { .. } => {
                let u = self.rng.random::<f64>();
                match &self.zipfian {
                    Some(zipf) => zipf.sample(u),
                    None => 0,
                }
            },
        }
    }

    /// Collects the next `len` keys.
    pub fn take_trace(&mut self, len: usize) -> Vec<u64> {
        (0..len).map(|_| self.next_key()).collect()
    }
}

impl Iterator for TraceGenerator {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_key())
    }
}

/// Zipfian distribution state for inverse CDF sampling.
///
/// Uses the algorithm from YCSB (Yahoo Cloud Serving Benchmark).
/// Pre-computes zeta values for efficient sampling.
#[derive(Debug, Clone)]
struct ZipfianState {
    n: u64,
    theta: f64,
    zeta_n: f64,
    alpha: f64,
    eta: f64,
}

impl ZipfianState {
    fn new(n: u64, theta: f64) -> Self {
        let theta = theta.clamp(0.0, 0.9999);
        let zeta_2 = Self::zeta(2, theta);
        let zeta_n = Self::zeta(n, theta);
        let alpha = 1.0 / (1.0 - theta);
        // n == 1 makes the denominator zero; `sample` never reaches eta then.
        let eta = if n > 1 {
            (1.0 - (2.0 / n as f64).powf(1.0 - theta)) / (1.0 - zeta_2 / zeta_n)
        } else {
            0.0
        };

        Self {
            n,
            theta,
            zeta_n,
            alpha,
            eta,
        }
    }

    /// zeta(n, theta) = sum(1/i^theta for i in 1..=n)
    fn zeta(n: u64, theta: f64) -> f64 {
        (1..=n).map(|i| 1.0 / (i as f64).powf(theta)).sum()
    }

    /// Sample given uniform `u` in `[0, 1)`.
    fn sample(&self, u: f64) -> u64 {
        let uz = u * self.zeta_n;
        if uz < 1.0 || self.n == 1 {
            return 0;
        }
        if uz < 1.0 + 0.5_f64.powf(self.theta) {
            return 1;
        }
        let spread = (self.n as f64) * (self.eta * u - self.eta + 1.0).powf(self.alpha);
        (spread as u64).min(self.n - 1)
    }
}

/// Reads a recorded trace: one key per line, surrounding whitespace trimmed.
/// Blank lines and lines starting with `#` are skipped.
///
/// ```
/// use evictkit::trace::parse_trace;
///
/// let input = "# warmup\nalpha\n\n  beta \nalpha\n";
/// let keys = parse_trace(input.as_bytes()).unwrap();
/// assert_eq!(keys, vec!["alpha", "beta", "alpha"]);
/// ```
pub fn parse_trace<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut keys = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let key = line.trim();
        if key.is_empty() || key.starts_with('#') {
            continue;
        }
        keys.push(key.to_owned());
    }
    Ok(keys)
}
