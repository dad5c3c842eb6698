//! Send options, per-recipient outcomes and the batch report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::transport::DeliveryReceipt;

/// Per-send options accepted for interface parity with other providers.
///
/// The underlying transport supports neither link rewriting nor scheduled
/// delivery, so none of these alter rendering or dispatch here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOptions {
    #[serde(default)]
    pub click_tracking_enabled: bool,

    #[serde(default)]
    pub open_tracking_enabled: bool,

    /// Requested delivery time; advisory, enforced by the scheduler above
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<DateTime<Utc>>,
}

/// Terminal state of one recipient's send attempt
#[derive(Debug, Clone, Serialize)]
pub enum DeliveryStatus {
    /// Transport accepted the message
    Delivered(DeliveryReceipt),

    /// Transport failed; the batch carried on without this recipient
    Failed { reason: String },
}

/// Outcome of a single recipient within a batch
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryOutcome {
    /// Recipient address as supplied by the caller
    pub recipient: String,
    pub status: DeliveryStatus,
}

impl DeliveryOutcome {
    pub fn delivered(recipient: impl Into<String>, receipt: DeliveryReceipt) -> Self {
        Self {
            recipient: recipient.into(),
            status: DeliveryStatus::Delivered(receipt),
        }
    }

    pub fn failed(recipient: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            status: DeliveryStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    /// Whether the transport accepted this recipient's message
    pub fn succeeded(&self) -> bool {
        matches!(self.status, DeliveryStatus::Delivered(_))
    }

    /// Failure reason, when the send failed
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            DeliveryStatus::Failed { reason } => Some(reason),
            DeliveryStatus::Delivered(_) => None,
        }
    }
}

/// Aggregate result of one batch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Synthesized batch identifier
    pub batch_id: String,

    /// One outcome per input recipient, in input order
    pub outcomes: Vec<DeliveryOutcome>,

    /// Number of sends the transport accepted
    pub delivered: usize,

    /// Total recipients attempted
    pub total: usize,
}

impl BatchReport {
    pub fn new(batch_id: impl Into<String>, outcomes: Vec<DeliveryOutcome>) -> Self {
        let delivered = outcomes.iter().filter(|o| o.succeeded()).count();
        let total = outcomes.len();
        Self {
            batch_id: batch_id.into(),
            outcomes,
            delivered,
            total,
        }
    }

    /// True when every recipient was accepted
    pub fn all_delivered(&self) -> bool {
        self.delivered == self.total
    }
}
