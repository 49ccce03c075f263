//! Single-slot guard for the simulated processing time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Allows at most one pending operation at a time.
///
/// New work is rejected while a [`ProcessingGuard`] is alive. Nothing is
/// queued.
#[derive(Debug, Clone, Default)]
pub struct ProcessingGate {
    busy: Arc<AtomicBool>,
}

impl ProcessingGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot, or returns `None` when it is already taken.
    pub fn try_begin(&self) -> Option<ProcessingGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard {
                busy: self.busy.clone(),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Holds the gate's slot; releases it when dropped.
#[derive(Debug)]
pub struct ProcessingGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
