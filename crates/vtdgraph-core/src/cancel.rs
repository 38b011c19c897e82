//! Cooperative cancellation between compilation stages.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::CompileError;

/// Shared flag checked between major stages and between adjacency rows.
///
/// Clones share the same flag, so a signal handler can hold one clone while
/// the compiler polls another.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Returns [`CompileError::Cancelled`] once cancellation was requested.
    pub fn check(&self) -> Result<(), CompileError> {
        if self.is_cancelled() {
            Err(CompileError::Cancelled)
        } else {
            Ok(())
        }
    }
}
