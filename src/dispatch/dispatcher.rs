use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future;

use crate::address::{AddressError, Mailbox};
use crate::config::ProviderConfig;
use crate::error::DispatchError;
use crate::template::{render, BulkEmail, Recipient};
use crate::transport::{EmailTransport, OutboundEmail};

use super::observer::ErrorObserver;
use super::types::{BatchReport, DeliveryOutcome, SendOptions};

/// Sender-side envelope shared by every message in a batch.
///
/// Prepared once before fan-out; a malformed sender or reply-to aborts the
/// batch before any recipient is attempted.
struct Envelope {
    from: Mailbox,
    reply_to: Option<Mailbox>,
}

impl Envelope {
    fn prepare(email: &BulkEmail) -> Result<Self, AddressError> {
        let from = email.from.parse()?;
        let reply_to = email
            .reply_to
            .as_deref()
            .map(|raw| raw.parse::<Mailbox>())
            .transpose()?;
        Ok(Self { from, reply_to })
    }
}

/// Dispatches personalized bulk email over a single-message transport.
///
/// The transport has no native batching, so every recipient gets an
/// independent, concurrently issued send. A failing recipient is converted
/// into a failed outcome and never interrupts its siblings; the call itself
/// fails only when batch preparation fails before fan-out.
pub struct BulkDispatcher {
    transport: Arc<dyn EmailTransport>,
    observer: Option<Arc<dyn ErrorObserver>>,
    provider: ProviderConfig,
}

impl BulkDispatcher {
    /// Create a dispatcher with default provider limits
    pub fn new(transport: Arc<dyn EmailTransport>) -> Self {
        Self {
            transport,
            observer: None,
            provider: ProviderConfig::default(),
        }
    }

    /// Create a dispatcher with explicit provider limits
    pub fn with_config(transport: Arc<dyn EmailTransport>, provider: ProviderConfig) -> Self {
        Self {
            transport,
            observer: None,
            provider,
        }
    }

    /// Create a dispatcher with provider limits and an error observer
    pub fn with_observer(
        transport: Arc<dyn EmailTransport>,
        provider: ProviderConfig,
        observer: Arc<dyn ErrorObserver>,
    ) -> Self {
        Self {
            transport,
            observer: Some(observer),
            provider,
        }
    }

    /// Set the error observer (for deferred initialization)
    pub fn set_observer(&mut self, observer: Arc<dyn ErrorObserver>) {
        self.observer = Some(observer);
    }

    /// Largest recipient list the scheduler should submit in one batch.
    ///
    /// Fixed conservative ceiling: the transport has no native batching,
    /// and a single-connection server is easy to overwhelm.
    pub fn max_recipients_per_batch(&self) -> usize {
        self.provider.max_recipients_per_batch
    }

    /// Wall-clock budget the scheduler should allow for one batch.
    ///
    /// Advisory only; this core enforces no deadline on individual sends.
    pub fn target_delivery_window(&self) -> Duration {
        Duration::from_secs(self.provider.target_delivery_window_secs)
    }

    /// Send one personalized message per recipient.
    ///
    /// All sends are issued concurrently and joined with a full barrier:
    /// every attempt resolves, success or failure, before the report is
    /// built. Per-recipient transport failures are captured inside the
    /// report and never surface as the call's error.
    #[tracing::instrument(
        name = "dispatch.send",
        skip(self, email, options),
        fields(
            email_id = email.email_id.as_deref().unwrap_or("unknown"),
            recipient_count = email.recipients.len()
        )
    )]
    pub async fn send(
        &self,
        email: &BulkEmail,
        options: &SendOptions,
    ) -> Result<BatchReport, DispatchError> {
        if options.click_tracking_enabled
            || options.open_tracking_enabled
            || options.delivery_time.is_some()
        {
            tracing::debug!(
                click_tracking = options.click_tracking_enabled,
                open_tracking = options.open_tracking_enabled,
                delivery_time = ?options.delivery_time,
                "Send options accepted for parity; this transport handles none of them"
            );
        }

        let envelope = Envelope::prepare(email).map_err(|e| self.batch_failure(e))?;
        let batch_id = synthesize_batch_id(email.email_id.as_deref());

        let sends = email
            .recipients
            .iter()
            .map(|recipient| self.send_single(email, &envelope, recipient));
        let outcomes = future::join_all(sends).await;

        let report = BatchReport::new(batch_id, outcomes);
        tracing::info!(
            batch_id = %report.batch_id,
            delivered = report.delivered,
            total = report.total,
            "Bulk email batch complete"
        );
        Ok(report)
    }

    /// Render and deliver one recipient's message; never propagates errors.
    async fn send_single(
        &self,
        email: &BulkEmail,
        envelope: &Envelope,
        recipient: &Recipient,
    ) -> DeliveryOutcome {
        let rendered = render(email, recipient);
        let outbound = OutboundEmail {
            to: rendered.to,
            from: envelope.from.clone(),
            reply_to: envelope.reply_to.clone(),
            subject: rendered.subject,
            html_body: rendered.html_body,
            text_body: rendered.text_body,
        };

        match self.transport.send_one(&outbound).await {
            Ok(receipt) => DeliveryOutcome::delivered(outbound.to, receipt),
            Err(err) => {
                tracing::warn!(
                    recipient = %recipient.address,
                    error = %err,
                    "Recipient send failed; continuing batch"
                );
                if let Some(observer) = &self.observer {
                    observer.notify(&err);
                }
                DeliveryOutcome::failed(outbound.to, err.to_string())
            }
        }
    }

    fn batch_failure(&self, source: impl Into<anyhow::Error>) -> DispatchError {
        let error = DispatchError::batch(source);
        tracing::error!(error = %error, "Bulk email batch aborted before dispatch");
        if let Some(observer) = &self.observer {
            observer.notify(&error);
        }
        error
    }
}

fn synthesize_batch_id(email_id: Option<&str>) -> String {
    format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        email_id.unwrap_or("unknown")
    )
}
