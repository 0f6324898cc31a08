//! Eviction-order implementations and decorators.
//!
//! Every type here implements [`ReplacementPolicy`](crate::traits::ReplacementPolicy)
//! except [`SynchronizedPolicy`](synchronized::SynchronizedPolicy), which exposes
//! the same operations through `&self`. It cannot implement the trait because
//! `peek` would have to return a reference that outlives the lock guard.
//!
//! The deterministic policies compare and hash by eviction order: two
//! policies are equal when `peek_all` yields equal elements in the same
//! order. `RandomPolicy` is left out because its order lives in the RNG.

pub mod clock;
pub mod fifo;
pub mod lfu;
pub mod lifo;
pub mod lru;
pub mod mru;
pub mod random;
pub mod synchronized;
pub mod threshold;

use std::hash::{Hash, Hasher};

use crate::traits::ReplacementPolicy;
use clock::ClockPolicy;
use fifo::FifoPolicy;
use lfu::LfuPolicy;
use lifo::LifoPolicy;
use lru::LruPolicy;
use mru::MruPolicy;

macro_rules! impl_eviction_order_eq {
    ($($policy:ident),+ $(,)?) => {$(
        impl<T: PartialEq> PartialEq for $policy<T> {
            fn eq(&self, other: &Self) -> bool {
                self.peek_all() == other.peek_all()
            }
        }

        impl<T: Eq> Eq for $policy<T> {}

        impl<T: Hash> Hash for $policy<T> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.peek_all().hash(state)
            }
        }
    )+};
}

impl_eviction_order_eq!(ClockPolicy, FifoPolicy, LfuPolicy, LifoPolicy, LruPolicy, MruPolicy);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_when_eviction_order_matches() {
        let mut a = LruPolicy::new();
        let mut b = LruPolicy::new();
        let first = a.add(1).unwrap();
        a.add(2).unwrap();
        b.add(2).unwrap();
        b.add(1).unwrap();
        assert_ne!(a, b);

        // Touching 1 moves it behind 2, matching b.
        a.touch(first);
        assert_eq!(a, b);
    }

    #[test]
    fn slot_layout_does_not_affect_equality() {
        let mut a = FifoPolicy::new();
        let stale = a.add('x').unwrap();
        a.add('y').unwrap();
        a.remove(stale);
        a.add('z').unwrap();

        let mut b = FifoPolicy::new();
        b.add_all(['y', 'z']);
        assert_eq!(a, b);
    }
}
