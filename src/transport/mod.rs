//! Outbound email transport seam.
//!
//! The dispatcher hands fully rendered messages to an [`EmailTransport`]
//! one at a time; the transport owns actual delivery. A batch issues all of
//! its sends concurrently, so implementations must be safe for concurrent
//! invocation on a shared instance.

pub mod inmemory;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::address::Mailbox;

pub use inmemory::InMemoryTransport;

/// A message ready to hand to the transport.
///
/// `reply_to` is `None` when the template carries no reply-to address;
/// implementations must not emit an empty reply-to header in that case.
/// The destination address is unvalidated; rejecting it is the
/// transport's call, and the dispatcher contains that failure to the one
/// recipient.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub from: Mailbox,
    pub reply_to: Option<Mailbox>,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Acknowledgement returned by a transport for one accepted message
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    /// Transport-assigned message id, when the backend provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Raw backend response line, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// Errors a transport backend can produce for a single send
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("recipient rejected: {reason}")]
    Rejected { reason: String },

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait implemented by concrete delivery backends.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Deliver a single rendered message.
    async fn send_one(&self, email: &OutboundEmail) -> Result<DeliveryReceipt, TransportError>;
}
