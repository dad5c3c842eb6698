//! Optional injected error hook.

use std::sync::Mutex;

/// Hook notified of dispatch errors.
///
/// Invoked for every per-recipient transport failure and for batch-level
/// failures. Fire-and-forget: nothing is awaited and no result is consumed,
/// so an observer cannot feed failures back into dispatch.
pub trait ErrorObserver: Send + Sync {
    fn notify(&self, error: &(dyn std::error::Error + Send + Sync));
}

/// Observer that stores rendered error messages, for assertions in tests
#[derive(Debug, Default)]
pub struct RecordingObserver {
    errors: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages seen so far, in notification order
    pub fn recorded(&self) -> Vec<String> {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn count(&self) -> usize {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl ErrorObserver for RecordingObserver {
    fn notify(&self, error: &(dyn std::error::Error + Send + Sync)) {
        self.errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(error.to_string());
    }
}
