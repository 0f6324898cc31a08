//! Mutex-guarded policy handle for sharing one policy between threads.
//!
//! Every operation takes `&self`, acquires the lock, delegates to the inner
//! policy and releases the lock before returning. There is one coarse lock;
//! no operation holds more than one at a time except `PartialEq` between two
//! distinct handles, which locks in address order.
//!
//! ```text
//!   thread A ──┐
//!   thread B ──┼──► SynchronizedPolicy ──► Arc<Mutex<P>> ──► P: ReplacementPolicy<T>
//!   thread C ──┘        (Clone = same lock)
//! ```
//!
//! Borrowed peeks cannot outlive the guard, so peeking either clones the
//! elements ([`peek_cloned`](SynchronizedPolicy::peek_cloned),
//! [`peek_all_cloned`](SynchronizedPolicy::peek_all_cloned)) or runs a
//! closure under the lock ([`with_peek`](SynchronizedPolicy::with_peek),
//! [`with_inner`](SynchronizedPolicy::with_inner)).
//!
//! `parking_lot::Mutex` does not poison: a panic inside a delegated call
//! (for example a stale slot id) releases the lock and leaves the handle
//! usable.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::ds::SlotId;
use crate::error::{InvariantError, Rejected, UpdateRejected};
use crate::traits::{Attributes, ReplacementPolicy};

/// Shared, lock-protected policy.
///
/// This is a handle, not a [`ReplacementPolicy`], so it cannot be boxed into
/// a [`PolicyMonitor`](crate::analysis::PolicyMonitor). For a bounded,
/// multi-step admission (evict until there is room, then add) use
/// [`with_inner`](Self::with_inner), which holds the lock for the whole
/// closure.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruPolicy;
/// use evictkit::policy::synchronized::SynchronizedPolicy;
///
/// let shared = SynchronizedPolicy::new(LruPolicy::new());
/// let worker = shared.clone();
///
/// std::thread::spawn(move || {
///     worker.add(1).unwrap();
///     worker.add(2).unwrap();
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(shared.len(), 2);
/// assert_eq!(shared.peek_cloned(), Some(1));
/// ```
pub struct SynchronizedPolicy<T, P> {
    inner: Arc<Mutex<P>>,
    _element: PhantomData<fn(T) -> T>,
}

impl<T, P> SynchronizedPolicy<T, P> {
    /// Wraps `policy` in a fresh mutex.
    pub fn new(policy: P) -> Self {
        Self::from_shared(Arc::new(Mutex::new(policy)))
    }

    /// Uses a caller-supplied mutex, so other code can lock the same policy.
    pub fn from_shared(inner: Arc<Mutex<P>>) -> Self {
        Self {
            inner,
            _element: PhantomData,
        }
    }

    /// Returns the underlying mutex.
    pub fn shared(&self) -> Arc<Mutex<P>> {
        Arc::clone(&self.inner)
    }

    /// Returns `true` if both handles guard the same mutex.
    pub fn same_lock(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Runs `f` with exclusive access to the inner policy.
    pub fn with_inner<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        let mut policy = self.inner.lock();
        f(&mut policy)
    }

    /// Unwraps the policy if this is the last handle; otherwise returns the
    /// handle unchanged.
    pub fn try_into_inner(self) -> Result<P, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(Self::from_shared)
    }
}

impl<T, P> SynchronizedPolicy<T, P>
where
    P: ReplacementPolicy<T>,
{
    pub fn add(&self, element: T) -> Result<SlotId, Rejected<T>> {
        self.inner.lock().add(element)
    }

    pub fn add_with(&self, element: T, attributes: &Attributes) -> Result<SlotId, Rejected<T>> {
        self.inner.lock().add_with(element, attributes)
    }

    /// Adds every element under a single lock acquisition.
    pub fn add_all<I>(&self, elements: I) -> Vec<Result<SlotId, Rejected<T>>>
    where
        I: IntoIterator<Item = T>,
    {
        let mut policy = self.inner.lock();
        elements
            .into_iter()
            .map(|element| policy.add(element))
            .collect()
    }

    pub fn update(&self, id: SlotId, element: T) -> Result<T, UpdateRejected<T>> {
        self.inner.lock().update(id, element)
    }

    pub fn update_with(
        &self,
        id: SlotId,
        element: T,
        attributes: &Attributes,
    ) -> Result<T, UpdateRejected<T>> {
        self.inner.lock().update_with(id, element, attributes)
    }

    pub fn touch(&self, id: SlotId) {
        self.inner.lock().touch(id)
    }

    pub fn remove(&self, id: SlotId) -> T {
        self.inner.lock().remove(id)
    }

    pub fn evict_next(&self) -> Option<T> {
        self.inner.lock().evict_next()
    }

    /// Evicts up to `n` elements under one lock acquisition.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn evict(&self, n: usize) -> Vec<T> {
        self.inner.lock().evict(n)
    }

    pub fn evict_all(&self) -> Vec<T> {
        self.inner.lock().evict_all()
    }

    /// Runs `f` on the next victim while the lock is held.
    pub fn with_peek<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        let policy = self.inner.lock();
        f(policy.peek())
    }

    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.inner.lock().contains(id)
    }

    pub fn name(&self) -> &'static str {
        self.inner.lock().name()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }
}

impl<T, P> SynchronizedPolicy<T, P>
where
    T: Clone,
    P: ReplacementPolicy<T>,
{
    /// Clone of the next victim.
    pub fn peek_cloned(&self) -> Option<T> {
        self.inner.lock().peek().cloned()
    }

    /// Clones of every element in eviction order.
    pub fn peek_all_cloned(&self) -> Vec<T> {
        self.inner
            .lock()
            .peek_all()
            .into_iter()
            .cloned()
            .collect()
    }
}

impl<T, P> Clone for SynchronizedPolicy<T, P> {
    /// Returns another handle on the same lock.
    fn clone(&self) -> Self {
        Self::from_shared(Arc::clone(&self.inner))
    }
}

impl<T, P: fmt::Debug> fmt::Debug for SynchronizedPolicy<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy = self.inner.lock();
        f.debug_tuple("SynchronizedPolicy").field(&*policy).finish()
    }
}

impl<T, P> fmt::Display for SynchronizedPolicy<T, P>
where
    P: ReplacementPolicy<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy = self.inner.lock();
        write!(f, "synchronized {} ({} slots)", policy.name(), policy.len())
    }
}

impl<T, P: PartialEq> PartialEq for SynchronizedPolicy<T, P> {
    fn eq(&self, other: &Self) -> bool {
        if self.same_lock(other) {
            return true;
        }
        // Fixed lock order keeps concurrent `a == b` and `b == a` from
        // deadlocking.
        let (first, second) = if Arc::as_ptr(&self.inner) < Arc::as_ptr(&other.inner) {
            (&self.inner, &other.inner)
        } else {
            (&other.inner, &self.inner)
        };
        let first = first.lock();
        let second = second.lock();
        *first == *second
    }
}

impl<T, P: Eq> Eq for SynchronizedPolicy<T, P> {}

impl<T, P: Hash> Hash for SynchronizedPolicy<T, P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.lock().hash(state)
    }
}
