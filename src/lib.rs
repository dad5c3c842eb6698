// Supporting infrastructure
pub mod address;
pub mod config;
pub mod error;
pub mod telemetry;

// Domain layer (business logic)
pub mod dispatch;
pub mod template;
pub mod transport;

// Re-export the main entry points at the crate root
pub use dispatch::{
    BatchReport, BulkDispatcher, DeliveryOutcome, DeliveryStatus, ErrorObserver, SendOptions,
};
pub use error::{DispatchError, Result};
pub use template::{render, BulkEmail, Recipient, RenderedEmail, Substitution};
pub use transport::{DeliveryReceipt, EmailTransport, OutboundEmail, TransportError};
