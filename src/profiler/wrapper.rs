//! Transparent timing wrapper
//!
//! `Profiled<T>` implements the same capability traits as `T` by delegation. Each
//! forwarding impl decides per operation whether to go through [`Profiled::profile`]
//! (timed) or [`Profiled::forward`] (untimed), so the set of profiled operations is
//! fixed at the trait level rather than discovered at run time.

use crate::profiler::state::ProfilingState;
use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Instant;

/// Records elapsed time for one call when dropped
///
/// Dropping happens on normal return, on an early `Err`, and while unwinding a
/// panic, so every completed call is recorded.
struct CallTimer<'a> {
    state: &'a ProfilingState,
    target: &'static str,
    operation: &'static str,
    start: Instant,
}

impl<'a> CallTimer<'a> {
    fn start<T: ?Sized>(state: &'a ProfilingState, operation: &'static str) -> Self {
        Self {
            state,
            target: type_name::<T>(),
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for CallTimer<'_> {
    fn drop(&mut self) {
        self.state
            .record(self.target, self.operation, self.start.elapsed());
    }
}

/// A target wrapped for profiling
pub struct Profiled<T> {
    target: T,
    state: Arc<ProfilingState>,
}

impl<T> Profiled<T> {
    pub(crate) fn new(target: T, state: Arc<ProfilingState>) -> Self {
        Self { target, state }
    }

    /// Returns the wrapped target
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Unwraps the target, discarding the profiling hook
    pub fn into_inner(self) -> T {
        self.target
    }

    /// Invokes a profiled operation on the target
    ///
    /// The return value (including any `Err`) is passed back unchanged, and a
    /// panic unwinds through unchanged. Either way the elapsed time is recorded
    /// against `(type_name::<T>(), operation)`.
    pub fn profile<R>(&self, operation: &'static str, call: impl FnOnce(&T) -> R) -> R {
        let _timer = CallTimer::start::<T>(&self.state, operation);
        call(&self.target)
    }

    /// Async counterpart of [`Profiled::profile`]
    ///
    /// Timing covers the whole lifetime of the returned future, from the call
    /// until it completes or is dropped.
    pub async fn profile_async<'a, F, Fut>(&'a self, operation: &'static str, call: F) -> Fut::Output
    where
        F: FnOnce(&'a T) -> Fut,
        Fut: Future,
    {
        let _timer = CallTimer::start::<T>(&self.state, operation);
        call(&self.target).await
    }

    /// Invokes an unprofiled operation on the target; nothing is recorded
    pub fn forward<R>(&self, call: impl FnOnce(&T) -> R) -> R {
        call(&self.target)
    }
}

// Equality and hashing see through the wrapper so a wrapped value behaves like
// its target as a map key.
impl<T: PartialEq> PartialEq for Profiled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl<T: Eq> Eq for Profiled<T> {}

impl<T: Hash> Hash for Profiled<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Profiled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Profiled").field(&self.target).finish()
    }
}
