// ==============================================
// MONITOR / ANALYZER / OFFLINE REPLAY (integration)
// ==============================================
//
// End-to-end scenarios through the public analysis API.

use evictkit::analysis::{HitStat, OfflineReplay, OfflineResult, PolicyAnalyzer, PolicyMonitor};
use evictkit::builder::{PolicyBuilder, PolicyKind};
use evictkit::policy::fifo::FifoPolicy;
use evictkit::policy::lru::LruPolicy;
use evictkit::policy::threshold::ThresholdPolicy;
use evictkit::trace::{TraceGenerator, Workload};
use evictkit::traits::{Attribute, Attributes};
use proptest::prelude::*;

// ==============================================
// LRU Regression Scenario
// ==============================================
//
// Keys 0-9 admitted, then accessed 4,4,0,3,2,9. Inserting 10-19 one at a
// time must push out 1,5,6,7,8,4,0,3,2,9 in exactly that order.

#[test]
fn lru_monitor_evicts_in_recency_order() {
    let mut monitor = PolicyMonitor::new(Box::new(LruPolicy::new()), 10).unwrap();
    for key in 0..10 {
        assert!(monitor.add_if_missing(key));
    }
    for key in [4, 4, 0, 3, 2, 9] {
        assert!(!monitor.add_if_missing(key));
    }

    let expected = [1, 5, 6, 7, 8, 4, 0, 3, 2, 9];
    for (new_key, evicted) in (10..20).zip(expected) {
        assert!(monitor.contains_element(&evicted));
        assert!(monitor.add_if_missing(new_key));
        assert!(
            !monitor.contains_element(&evicted),
            "inserting {new_key} should evict {evicted}"
        );
        assert_eq!(monitor.len(), 10);
    }
    assert_eq!(monitor.hit_statistics(), HitStat::new(6, 20));
    monitor.check_invariants().unwrap();
}

// ==============================================
// Monitor Accounting
// ==============================================

proptest! {
    /// Property: a trace without repeats is all misses, for every policy
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_distinct_keys_never_hit(len in 0u64..300, capacity in 1usize..32) {
        for kind in PolicyKind::ALL {
            let policy = PolicyBuilder::new(kind).build().unwrap();
            let mut monitor = PolicyMonitor::new(policy, capacity).unwrap();
            for key in 0..len {
                monitor.add_if_missing(key);
            }
            prop_assert_eq!(monitor.hit_statistics(), HitStat::new(0, len));
            prop_assert!(monitor.len() <= capacity);
        }
    }

    /// Property: repeating a key right after admission is a hit
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_immediate_repeat_hits(keys in prop::collection::vec(0u32..50, 1..100)) {
        for kind in PolicyKind::ALL {
            let policy = PolicyBuilder::new(kind).build().unwrap();
            let mut monitor = PolicyMonitor::new(policy, 4).unwrap();
            for &key in &keys {
                monitor.add_if_missing(key);
                prop_assert!(!monitor.add_if_missing(key));
            }
            prop_assert!(monitor.hit_statistics().hits >= keys.len() as u64);
            prop_assert!(monitor.check_invariants().is_ok());
        }
    }

    /// Property: steps == ceil(len / width) and the last step equals the total
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_offline_step_count(len in 1usize..500, width in 1usize..64) {
        let trace = TraceGenerator::new(40, Workload::Uniform, len as u64).take_trace(len);
        let result = OfflineReplay::new(width)
            .unwrap()
            .run(trace, Box::new(LruPolicy::new()), 8)
            .unwrap();
        prop_assert_eq!(result.steps(), len.div_ceil(width));
        prop_assert_eq!(result.result(result.steps() - 1), result.total());
        prop_assert_eq!(result.total().total(), len as u64);

        let cumulative: Vec<u64> = result.iter().map(|stat| stat.total()).collect();
        prop_assert!(cumulative.windows(2).all(|w| w[0] < w[1]));
    }
}

// ==============================================
// Threshold Admission Through a Monitor
// ==============================================

#[test]
fn threshold_refusals_count_as_misses_without_admission() {
    let policy = ThresholdPolicy::new(FifoPolicy::new(), 100.0).unwrap();
    let mut monitor = PolicyMonitor::new(Box::new(policy), 4).unwrap();
    let small = Attributes::new().with(Attribute::Size, 10.0);
    let large = Attributes::new().with(Attribute::Size, 1_000.0);

    assert!(monitor.add_if_missing_with("a", &small));
    assert!(monitor.add_if_missing_with("huge", &large));
    assert!(!monitor.add_if_missing_with("a", &small));
    assert!(monitor.add_if_missing_with("huge", &large));

    assert!(!monitor.contains_element(&"huge"));
    assert_eq!(monitor.len(), 1);
    assert_eq!(monitor.hit_statistics(), HitStat::new(1, 3));
}

#[test]
fn refused_key_leaves_full_monitor_intact() {
    let builder = PolicyBuilder::new(PolicyKind::Lru).threshold(Attribute::Size, 10.0);
    let mut monitor = PolicyMonitor::new(builder.build().unwrap(), 2).unwrap();
    let small = Attributes::new().with(Attribute::Size, 1.0);
    let large = Attributes::new().with(Attribute::Size, 100.0);

    monitor.add_if_missing_with(1, &small);
    monitor.add_if_missing_with(2, &small);
    assert!(monitor.add_if_missing_with(99, &large));
    assert_eq!(monitor.len(), 2);

    assert!(!monitor.add_if_missing_with(1, &small));
    assert!(!monitor.add_if_missing_with(2, &small));
    assert_eq!(monitor.hit_statistics(), HitStat::new(2, 3));
    monitor.check_invariants().unwrap();
}

// ==============================================
// Analyzer End to End
// ==============================================

#[test]
fn analyzer_ranks_mru_above_lru_on_cyclic_scan() {
    let mut analyzer = PolicyAnalyzer::new();
    let lru = analyzer
        .add_monitor(PolicyBuilder::new(PolicyKind::Lru).build().unwrap(), 100)
        .unwrap();
    let mru = analyzer
        .add_monitor(PolicyBuilder::new(PolicyKind::Mru).build().unwrap(), 100)
        .unwrap();

    // A loop slightly larger than the cache defeats LRU completely.
    let trace = TraceGenerator::new(150, Workload::Scan, 0).take_trace(3_000);
    assert_eq!(analyzer.run_trace(trace), 3_000);

    let ranked = analyzer.ranking();
    assert_eq!(ranked[0].0, mru);
    assert_eq!(ranked[1].0, lru);

    let lru_stats = analyzer.monitor(lru).unwrap().hit_statistics();
    assert_eq!(lru_stats, HitStat::new(0, 3_000));
    assert!(analyzer.monitor(mru).unwrap().hit_statistics().hit_ratio() > 0.5);
}

#[test]
fn analyzer_replay_matches_offline_total() {
    let trace = TraceGenerator::new(200, Workload::ZIPFIAN, 11).take_trace(5_000);

    let mut analyzer = PolicyAnalyzer::new();
    let id = analyzer
        .add_monitor(PolicyBuilder::new(PolicyKind::Lfu).build().unwrap(), 32)
        .unwrap();
    analyzer.run_trace(trace.iter().copied());

    let result = OfflineReplay::new(500)
        .unwrap()
        .run(trace, PolicyBuilder::new(PolicyKind::Lfu).build().unwrap(), 32)
        .unwrap();

    assert_eq!(result.steps(), 10);
    assert_eq!(analyzer.monitor(id).unwrap().hit_statistics(), result.total());
}

#[test]
fn clear_then_reset_gives_fresh_analyzer_state() {
    let mut analyzer = PolicyAnalyzer::new();
    analyzer
        .add_monitor(Box::new(LruPolicy::new()), 8)
        .unwrap();
    analyzer.run_trace([1, 2, 1, 2]);

    analyzer.clear();
    let stats = analyzer.monitors()[0].hit_statistics();
    assert_eq!(stats, HitStat::new(2, 2));

    analyzer.reset_statistics();
    assert_eq!(analyzer.monitors()[0].hit_statistics(), HitStat::default());
    assert!(analyzer.add_if_missing(1).all_missed());
}

// ==============================================
// OfflineResult Construction
// ==============================================

#[test]
fn offline_result_rejects_bad_inputs() {
    assert!(OfflineResult::new(0, vec![1], vec![1], HitStat::new(1, 1)).is_err());
    assert!(OfflineResult::new(3, vec![1, 2], vec![1], HitStat::new(2, 1)).is_err());
    assert!(OfflineResult::new(3, vec![], vec![], HitStat::default()).is_ok());
}
