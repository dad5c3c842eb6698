//! Bulk dispatch coordinator.
//!
//! This module provides:
//! - `dispatcher`: Concurrent fan-out of personalized sends with
//!   per-recipient failure isolation
//! - `types`: Send options, per-recipient outcomes and the batch report
//! - `observer`: Optional injected error hook

mod dispatcher;
mod observer;
mod types;

pub use dispatcher::BulkDispatcher;
pub use observer::{ErrorObserver, RecordingObserver};
pub use types::{BatchReport, DeliveryOutcome, DeliveryStatus, SendOptions};
