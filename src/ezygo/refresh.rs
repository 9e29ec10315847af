use std::sync::atomic::{AtomicBool, Ordering};

/// Single-flight gate for silent re-login.
///
/// A caller that finds a refresh already running gets `None` and is expected
/// to give up rather than wait.
#[derive(Debug, Default)]
pub struct RefreshGuard {
    in_progress: AtomicBool,
}

impl RefreshGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the gate. The returned permit releases it on drop.
    pub fn try_begin(&self) -> Option<RefreshPermit<'_>> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshPermit { guard: self })
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct RefreshPermit<'a> {
    guard: &'a RefreshGuard,
}

impl Drop for RefreshPermit<'_> {
    fn drop(&mut self) {
        self.guard.in_progress.store(false, Ordering::Release);
    }
}
