//! Cooperative cancellation shared between a search worker and its owner.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Cloneable stop flag. Every clone observes the same signal.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    stop: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}
