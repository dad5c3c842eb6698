//! In-memory transport for tests and local development.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use super::{DeliveryReceipt, EmailTransport, OutboundEmail, TransportError};

/// Transport that records accepted mail instead of delivering it.
///
/// Failures can be scripted per recipient address or for the transport as
/// a whole, which makes this the workhorse double for dispatch tests.
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    outbox: Mutex<Vec<OutboundEmail>>,
    failures: DashMap<String, String>,
    fail_all: AtomicBool,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a rejection for every send addressed to `address`
    pub fn fail_recipient(&self, address: impl Into<String>, reason: impl Into<String>) {
        self.failures.insert(address.into(), reason.into());
    }

    /// Reject every send until switched back off
    pub fn fail_all(&self, enabled: bool) {
        self.fail_all.store(enabled, Ordering::SeqCst);
    }

    /// Accepted messages, in acceptance order
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.outbox.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn sent_count(&self) -> usize {
        self.outbox.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl EmailTransport for InMemoryTransport {
    async fn send_one(&self, email: &OutboundEmail) -> Result<DeliveryReceipt, TransportError> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(TransportError::Connection(
                "transport unavailable".to_string(),
            ));
        }

        if let Some(reason) = self.failures.get(&email.to) {
            return Err(TransportError::Rejected {
                reason: reason.value().clone(),
            });
        }

        self.outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(email.clone());

        Ok(DeliveryReceipt {
            message_id: Some(Uuid::new_v4().to_string()),
            response: Some("250 2.0.0 OK".to_string()),
        })
    }
}
