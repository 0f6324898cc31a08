// ==============================================
// SYNCHRONIZED POLICY CONCURRENCY TESTS (integration)
// ==============================================
//
// Multi-threaded use of SynchronizedPolicy. These need real threads and
// cannot live inline.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use evictkit::policy::clock::ClockPolicy;
use evictkit::policy::lfu::LfuPolicy;
use evictkit::policy::lru::LruPolicy;
use evictkit::policy::synchronized::SynchronizedPolicy;
use evictkit::traits::ReplacementPolicy;

// ==============================================
// No Lost or Duplicated Elements
// ==============================================
//
// Producers add while evictors drain. Every element must come out exactly
// once, either from an evictor or from the final drain.

mod add_evict_race {
    use super::*;

    #[test]
    fn every_element_leaves_exactly_once() {
        let producers = 4u64;
        let per_producer = 500u64;
        let sync = SynchronizedPolicy::new(LruPolicy::new());
        let barrier = Arc::new(Barrier::new(producers as usize + 2));
        let done = Arc::new(AtomicBool::new(false));

        let producer_handles: Vec<_> = (0..producers)
            .map(|p| {
                let sync = sync.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..per_producer {
                        let id = sync.add(p * per_producer + i).unwrap();
                        if i % 3 == 0 {
                            // May already be evicted and reused; only touch
                            // what is still live.
                            sync.with_inner(|lru| {
                                if lru.contains(id) {
                                    lru.touch(id);
                                }
                            });
                        }
                    }
                })
            })
            .collect();

        let evictor_handles: Vec<_> = (0..2)
            .map(|_| {
                let sync = sync.clone();
                let barrier = barrier.clone();
                let done = done.clone();
                thread::spawn(move || {
                    barrier.wait();
                    let mut evicted = Vec::new();
                    while !done.load(Ordering::Acquire) {
                        if let Some(element) = sync.evict_next() {
                            evicted.push(element);
                        } else {
                            thread::yield_now();
                        }
                    }
                    evicted
                })
            })
            .collect();

        for handle in producer_handles {
            handle.join().unwrap();
        }
        done.store(true, Ordering::Release);

        let mut seen = HashSet::new();
        for handle in evictor_handles {
            for element in handle.join().unwrap() {
                assert!(seen.insert(element), "{element} evicted twice");
            }
        }
        for element in sync.evict_all() {
            assert!(seen.insert(element), "{element} also drained at the end");
        }
        assert_eq!(seen.len() as u64, producers * per_producer);
        sync.check_invariants().unwrap();
    }
}

// ==============================================
// Bounded Admission Under One Lock
// ==============================================
//
// Check-then-evict-then-add must be a single critical section; with_inner
// provides that, so the bound holds at every observation.

mod bounded_admission {
    use super::*;

    #[test]
    fn len_never_exceeds_bound() {
        let bound = 16;
        let sync = SynchronizedPolicy::new(ClockPolicy::new());
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4u32)
            .map(|t| {
                let sync = sync.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..1_000 {
                        let observed = sync.with_inner(|clock| {
                            while clock.len() >= bound {
                                clock.evict_next();
                            }
                            clock.add(t * 10_000 + i).unwrap();
                            clock.len()
                        });
                        assert!(observed <= bound);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(sync.len(), bound);
        sync.check_invariants().unwrap();
    }
}

// ==============================================
// Caller-Supplied Mutex
// ==============================================

mod shared_mutex {
    use super::*;

    #[test]
    fn external_lock_holders_see_consistent_state() {
        let mutex = Arc::new(parking_lot::Mutex::new(LfuPolicy::new()));
        let sync = SynchronizedPolicy::from_shared(mutex.clone());

        let writers: Vec<_> = (0..3u32)
            .map(|t| {
                let sync = sync.clone();
                thread::spawn(move || {
                    for i in 0..200 {
                        sync.add(t * 1_000 + i).unwrap();
                    }
                })
            })
            .collect();

        for _ in 0..50 {
            let policy = mutex.lock();
            assert!(policy.check_invariants().is_ok());
            assert_eq!(policy.peek_all().len(), policy.len());
        }

        for writer in writers {
            writer.join().unwrap();
        }
        assert_eq!(sync.len(), 600);
        assert_eq!(sync.peek_all_cloned().len(), 600);
    }
}
