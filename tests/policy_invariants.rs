// ==============================================
// CROSS-POLICY INVARIANT TESTS (integration)
// ==============================================
//
// Behavioral guarantees every policy shares, driven through the public API
// and the boxed form the analyzer uses.

use std::collections::HashMap;

use evictkit::builder::{PolicyBuilder, PolicyKind};
use evictkit::ds::SlotId;
use evictkit::traits::{BoxedPolicy, ReplacementPolicy};
use proptest::prelude::*;

fn seeded_kinds() -> Vec<PolicyKind> {
    PolicyKind::ALL
        .into_iter()
        .map(|kind| match kind {
            PolicyKind::Random { .. } => PolicyKind::Random { seed: Some(7) },
            other => other,
        })
        .collect()
}

fn build(kind: PolicyKind) -> BoxedPolicy<u64> {
    PolicyBuilder::new(kind).build().unwrap()
}

#[derive(Debug, Clone)]
enum Op {
    Add,
    Touch(usize),
    Update(usize),
    Remove(usize),
    Evict,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Add),
        3 => any::<usize>().prop_map(Op::Touch),
        1 => any::<usize>().prop_map(Op::Update),
        1 => any::<usize>().prop_map(Op::Remove),
        2 => Just(Op::Evict),
    ]
}

/// Elements are unique counters so an evicted element names its slot.
struct Model {
    live: HashMap<u64, SlotId>,
    next: u64,
}

impl Model {
    fn new() -> Self {
        Self {
            live: HashMap::new(),
            next: 0,
        }
    }

    fn fresh(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    fn pick(&self, i: usize) -> Option<(u64, SlotId)> {
        let mut keys: Vec<_> = self.live.keys().copied().collect();
        keys.sort_unstable();
        let key = *keys.get(i % keys.len().max(1))?;
        Some((key, self.live[&key]))
    }
}

fn apply(policy: &mut BoxedPolicy<u64>, model: &mut Model, op: &Op) {
    match *op {
        Op::Add => {
            let element = model.fresh();
            let id = policy.add(element).unwrap();
            model.live.insert(element, id);
        },
        Op::Touch(i) => {
            if let Some((_, id)) = model.pick(i) {
                policy.touch(id);
            }
        },
        Op::Update(i) => {
            if let Some((old, id)) = model.pick(i) {
                let element = model.fresh();
                assert_eq!(policy.update(id, element), Ok(old));
                model.live.remove(&old);
                model.live.insert(element, id);
            }
        },
        Op::Remove(i) => {
            if let Some((old, id)) = model.pick(i) {
                assert_eq!(policy.remove(id), old);
                model.live.remove(&old);
            }
        },
        Op::Evict => match policy.evict_next() {
            Some(element) => {
                assert!(model.live.remove(&element).is_some());
            },
            None => assert!(model.live.is_empty()),
        },
    }
}

// ==============================================
// Size Accounting
// ==============================================

proptest! {
    /// Property: len() equals admitted minus evicted/removed, for every policy
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_len_tracks_live_slots(ops in prop::collection::vec(op_strategy(), 0..200)) {
        for kind in seeded_kinds() {
            let mut policy = build(kind);
            let mut model = Model::new();
            for op in &ops {
                apply(&mut policy, &mut model, op);
                prop_assert_eq!(policy.len(), model.live.len(), "{}", kind);
            }
            prop_assert!(policy.check_invariants().is_ok());
            for (_, &id) in &model.live {
                prop_assert!(policy.contains(id));
            }
        }
    }

    /// Property: peek() is the head of peek_all(), and both are repeatable
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_peek_is_head_of_peek_all(ops in prop::collection::vec(op_strategy(), 0..120)) {
        for kind in seeded_kinds() {
            let mut policy = build(kind);
            let mut model = Model::new();
            for op in &ops {
                apply(&mut policy, &mut model, op);
            }
            let first = policy.peek_all();
            let second = policy.peek_all();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.len(), policy.len());
            prop_assert_eq!(policy.peek(), first.first().copied());
        }
    }

    /// Property: peek_all() predicts the order evict_all() produces
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_peek_all_predicts_eviction(ops in prop::collection::vec(op_strategy(), 0..120)) {
        for kind in seeded_kinds() {
            let mut policy = build(kind);
            let mut model = Model::new();
            for op in &ops {
                apply(&mut policy, &mut model, op);
            }
            let predicted: Vec<u64> = policy.peek_all().into_iter().copied().collect();
            prop_assert_eq!(policy.evict_all(), predicted, "{}", kind);
            prop_assert!(policy.is_empty());
        }
    }

    /// Property: FIFO and LIFO ignore touch entirely
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_insertion_order_policies_ignore_touch(
        n in 1u64..40,
        touches in prop::collection::vec(any::<usize>(), 0..60)
    ) {
        for (kind, reversed) in [(PolicyKind::Fifo, false), (PolicyKind::Lifo, true)] {
            let mut policy = build(kind);
            let ids: Vec<_> = (0..n).map(|k| policy.add(k).unwrap()).collect();
            for t in &touches {
                policy.touch(ids[t % ids.len()]);
            }
            let mut expected: Vec<u64> = (0..n).collect();
            if reversed {
                expected.reverse();
            }
            prop_assert_eq!(policy.evict_all(), expected);
        }
    }

    /// Property: random evict_all() is a permutation of the admitted elements
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_random_evict_all_is_permutation(n in 0u64..200, seed in any::<u64>()) {
        let mut policy = build(PolicyKind::Random { seed: Some(seed) });
        for k in 0..n {
            policy.add(k).unwrap();
        }
        let mut evicted = policy.evict_all();
        evicted.sort_unstable();
        prop_assert_eq!(evicted, (0..n).collect::<Vec<_>>());
    }
}

// ==============================================
// Slot Reuse
// ==============================================

#[test]
fn freed_slots_are_reused() {
    for kind in seeded_kinds() {
        let mut policy = build(kind);
        let a = policy.add(1).unwrap();
        policy.add(2).unwrap();
        policy.remove(a);
        let c = policy.add(3).unwrap();
        assert_eq!(c, a, "{kind}");
        assert_eq!(policy.len(), 2);
    }
}

#[test]
fn empty_policies_return_none() {
    for kind in seeded_kinds() {
        let mut policy = build(kind);
        assert_eq!(policy.peek(), None);
        assert_eq!(policy.evict_next(), None);
        assert!(policy.peek_all().is_empty());
        assert!(policy.evict_all().is_empty());
    }
}

#[test]
fn clear_empties_every_policy() {
    for kind in seeded_kinds() {
        let mut policy = build(kind);
        let ids: Vec<_> = (0..10).map(|k| policy.add(k).unwrap()).collect();
        policy.clear();
        assert!(policy.is_empty(), "{kind}");
        assert!(ids.iter().all(|id| !policy.contains(*id)));
        policy.check_invariants().unwrap();
    }
}

// ==============================================
// Stale Slot Preconditions
// ==============================================

#[test]
fn stale_slot_panics_for_every_policy() {
    for kind in seeded_kinds() {
        let result = std::panic::catch_unwind(|| {
            let mut policy = build(kind);
            let id = policy.add(1).unwrap();
            policy.evict_next();
            policy.touch(id);
        });
        assert!(result.is_err(), "{kind} accepted a stale slot");
    }
}
