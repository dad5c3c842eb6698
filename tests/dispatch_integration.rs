//! Bulk dispatch integration tests
//!
//! These tests exercise the dispatcher end to end against the in-memory
//! transport: rendering, fan-out, failure isolation and aggregation,
//! without any network involvement.

use std::sync::Arc;

use bulkmail::config::ProviderConfig;
use bulkmail::dispatch::{BulkDispatcher, RecordingObserver, SendOptions};
use bulkmail::template::{BulkEmail, Recipient};
use bulkmail::transport::InMemoryTransport;

/// Create a dispatcher wired to an in-memory transport and a recording observer
fn create_test_environment() -> TestEnvironment {
    let transport = Arc::new(InMemoryTransport::new());
    let observer = Arc::new(RecordingObserver::new());
    let dispatcher = BulkDispatcher::with_observer(
        transport.clone(),
        ProviderConfig::default(),
        observer.clone(),
    );

    TestEnvironment {
        transport,
        observer,
        dispatcher,
    }
}

struct TestEnvironment {
    transport: Arc<InMemoryTransport>,
    observer: Arc<RecordingObserver>,
    dispatcher: BulkDispatcher,
}

fn newsletter(recipients: Vec<Recipient>) -> BulkEmail {
    BulkEmail {
        subject: "Hello {name}".to_string(),
        html: "<p>Hello {name}</p>".to_string(),
        plaintext: "Hello {name}".to_string(),
        from: "Weekly News <news@example.com>".to_string(),
        reply_to: None,
        email_id: Some("weekly-42".to_string()),
        recipients,
    }
}

// =============================================================================
// Personalization Tests
// =============================================================================

mod personalization_tests {
    use super::*;

    #[tokio::test]
    async fn test_each_recipient_gets_individually_rendered_message() {
        let env = create_test_environment();
        let email = newsletter(vec![
            Recipient::new("a@x.com").substitution("{name}", "Alice"),
            Recipient::new("b@x.com").substitution("{name}", "Bob"),
        ]);

        let report = env
            .dispatcher
            .send(&email, &SendOptions::default())
            .await
            .unwrap();

        assert_eq!(report.delivered, 2);
        assert_eq!(report.total, 2);

        let sent = env.transport.sent();
        assert_eq!(sent.len(), 2);
        let alice = sent.iter().find(|m| m.to == "a@x.com").unwrap();
        assert_eq!(alice.subject, "Hello Alice");
        assert_eq!(alice.html_body, "<p>Hello Alice</p>");
        assert_eq!(alice.text_body, "Hello Alice");
        let bob = sent.iter().find(|m| m.to == "b@x.com").unwrap();
        assert_eq!(bob.subject, "Hello Bob");
    }

    #[tokio::test]
    async fn test_recipient_without_substitutions_gets_template_verbatim() {
        let env = create_test_environment();
        let email = newsletter(vec![Recipient::new("raw@x.com")]);

        env.dispatcher
            .send(&email, &SendOptions::default())
            .await
            .unwrap();

        let sent = env.transport.sent();
        assert_eq!(sent[0].subject, "Hello {name}");
    }

    #[tokio::test]
    async fn test_duplicate_recipients_are_sent_independently() {
        let env = create_test_environment();
        let email = newsletter(vec![
            Recipient::new("dup@x.com").substitution("{name}", "First"),
            Recipient::new("dup@x.com").substitution("{name}", "Second"),
        ]);

        let report = env
            .dispatcher
            .send(&email, &SendOptions::default())
            .await
            .unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(env.transport.sent_count(), 2);
    }
}

// =============================================================================
// Failure Isolation Tests
// =============================================================================

mod isolation_tests {
    use super::*;

    #[tokio::test]
    async fn test_one_failing_recipient_does_not_abort_the_batch() {
        let env = create_test_environment();
        env.transport.fail_recipient("b@x.com", "mailbox full");

        let email = newsletter(vec![
            Recipient::new("a@x.com").substitution("{name}", "Alice"),
            Recipient::new("b@x.com").substitution("{name}", "Bob"),
            Recipient::new("c@x.com").substitution("{name}", "Cleo"),
        ]);

        let report = env
            .dispatcher
            .send(&email, &SendOptions::default())
            .await
            .unwrap();

        assert_eq!(report.delivered, 2);
        assert_eq!(report.total, 3);
        assert_eq!(report.outcomes.len(), 3);

        // Outcomes keep input order; only the middle one failed
        assert!(report.outcomes[0].succeeded());
        assert!(!report.outcomes[1].succeeded());
        assert!(report.outcomes[2].succeeded());
        assert_eq!(report.outcomes[1].recipient, "b@x.com");
        assert!(report.outcomes[1]
            .failure_reason()
            .unwrap()
            .contains("mailbox full"));

        // The siblings still reached the transport
        assert_eq!(env.transport.sent_count(), 2);
    }

    #[tokio::test]
    async fn test_total_transport_failure_still_resolves_with_report() {
        let env = create_test_environment();
        env.transport.fail_all(true);

        let email = newsletter(vec![
            Recipient::new("a@x.com"),
            Recipient::new("b@x.com"),
            Recipient::new("c@x.com"),
        ]);

        let report = env
            .dispatcher
            .send(&email, &SendOptions::default())
            .await
            .unwrap();

        assert_eq!(report.delivered, 0);
        assert_eq!(report.total, 3);
        assert_eq!(report.outcomes.len(), 3);
        assert!(report.outcomes.iter().all(|o| !o.succeeded()));
    }

    #[tokio::test]
    async fn test_observer_sees_every_recipient_failure() {
        let env = create_test_environment();
        env.transport.fail_recipient("b@x.com", "mailbox full");
        env.transport.fail_recipient("c@x.com", "unknown user");

        let email = newsletter(vec![
            Recipient::new("a@x.com"),
            Recipient::new("b@x.com"),
            Recipient::new("c@x.com"),
        ]);

        env.dispatcher
            .send(&email, &SendOptions::default())
            .await
            .unwrap();

        let recorded = env.observer.recorded();
        assert_eq!(recorded.len(), 2);
        assert!(recorded.iter().any(|m| m.contains("mailbox full")));
        assert!(recorded.iter().any(|m| m.contains("unknown user")));
    }
}

// =============================================================================
// Batch-Level Failure Tests
// =============================================================================

mod batch_failure_tests {
    use super::*;
    use std::error::Error as _;

    #[tokio::test]
    async fn test_malformed_sender_rejects_before_any_send() {
        let env = create_test_environment();
        let mut email = newsletter(vec![Recipient::new("a@x.com")]);
        email.from = "not-an-address".to_string();

        let error = env
            .dispatcher
            .send(&email, &SendOptions::default())
            .await
            .unwrap_err();

        assert_eq!(error.status(), 500);
        assert!(error.to_string().contains("not-an-address"));
        assert!(error.source().is_some());

        // Nothing reached the transport, and the observer was told
        assert_eq!(env.transport.sent_count(), 0);
        assert_eq!(env.observer.count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_reply_to_rejects_the_batch() {
        let env = create_test_environment();
        let mut email = newsletter(vec![Recipient::new("a@x.com")]);
        email.reply_to = Some("broken".to_string());

        let result = env.dispatcher.send(&email, &SendOptions::default()).await;

        assert!(result.is_err());
        assert_eq!(env.transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_bad_recipient_address_is_not_a_batch_failure() {
        // Recipient addresses are the transport's problem, one at a time
        let env = create_test_environment();
        env.transport.fail_recipient("not-an-address", "malformed address");

        let email = newsletter(vec![
            Recipient::new("not-an-address"),
            Recipient::new("ok@x.com"),
        ]);

        let report = env
            .dispatcher
            .send(&email, &SendOptions::default())
            .await
            .unwrap();

        assert_eq!(report.delivered, 1);
        assert_eq!(report.total, 2);
    }
}

// =============================================================================
// Report & Envelope Tests
// =============================================================================

mod report_tests {
    use super::*;

    #[tokio::test]
    async fn test_batch_id_embeds_email_id_with_unknown_fallback() {
        let env = create_test_environment();

        let email = newsletter(vec![Recipient::new("a@x.com")]);
        let report = env
            .dispatcher
            .send(&email, &SendOptions::default())
            .await
            .unwrap();
        assert!(report.batch_id.ends_with("-weekly-42"));

        let mut anonymous = newsletter(vec![Recipient::new("a@x.com")]);
        anonymous.email_id = None;
        let report = env
            .dispatcher
            .send(&anonymous, &SendOptions::default())
            .await
            .unwrap();
        assert!(report.batch_id.ends_with("-unknown"));
    }

    #[tokio::test]
    async fn test_reply_to_is_omitted_when_template_has_none() {
        let env = create_test_environment();
        let email = newsletter(vec![Recipient::new("a@x.com")]);

        env.dispatcher
            .send(&email, &SendOptions::default())
            .await
            .unwrap();

        assert!(env.transport.sent()[0].reply_to.is_none());
    }

    #[tokio::test]
    async fn test_reply_to_is_forwarded_when_present() {
        let env = create_test_environment();
        let mut email = newsletter(vec![Recipient::new("a@x.com")]);
        email.reply_to = Some("Support <support@example.com>".to_string());

        env.dispatcher
            .send(&email, &SendOptions::default())
            .await
            .unwrap();

        let sent = env.transport.sent();
        let reply_to = sent[0].reply_to.as_ref().unwrap();
        assert_eq!(reply_to.address, "support@example.com");
        assert_eq!(reply_to.name.as_deref(), Some("Support"));
    }

    #[tokio::test]
    async fn test_sender_display_name_is_preserved() {
        let env = create_test_environment();
        let email = newsletter(vec![Recipient::new("a@x.com")]);

        env.dispatcher
            .send(&email, &SendOptions::default())
            .await
            .unwrap();

        let sent = env.transport.sent();
        assert_eq!(sent[0].from.address, "news@example.com");
        assert_eq!(sent[0].from.name.as_deref(), Some("Weekly News"));
    }

    #[tokio::test]
    async fn test_tracking_options_do_not_change_dispatch() {
        let env = create_test_environment();
        let email = newsletter(vec![Recipient::new("a@x.com").substitution("{name}", "Alice")]);
        let options = SendOptions {
            click_tracking_enabled: true,
            open_tracking_enabled: true,
            delivery_time: Some(chrono::Utc::now()),
        };

        let report = env.dispatcher.send(&email, &options).await.unwrap();

        assert_eq!(report.delivered, 1);
        assert_eq!(env.transport.sent()[0].subject, "Hello Alice");
    }
}

// =============================================================================
// Concurrency Tests
// =============================================================================

mod concurrency_tests {
    use super::*;

    #[tokio::test]
    async fn test_large_batch_yields_one_outcome_per_recipient_in_order() {
        let env = create_test_environment();
        let recipients: Vec<Recipient> = (0..50)
            .map(|i| Recipient::new(format!("user{i}@x.com")))
            .collect();
        let email = newsletter(recipients);

        let report = env
            .dispatcher
            .send(&email, &SendOptions::default())
            .await
            .unwrap();

        assert_eq!(report.total, 50);
        assert_eq!(report.delivered, 50);
        for (i, outcome) in report.outcomes.iter().enumerate() {
            assert_eq!(outcome.recipient, format!("user{i}@x.com"));
        }
    }

    #[tokio::test]
    async fn test_interleaved_failures_leave_sibling_outcomes_complete() {
        let env = create_test_environment();
        for i in (0..20).step_by(2) {
            env.transport
                .fail_recipient(format!("user{i}@x.com"), "bounced");
        }

        let recipients: Vec<Recipient> = (0..20)
            .map(|i| Recipient::new(format!("user{i}@x.com")))
            .collect();
        let email = newsletter(recipients);

        let report = env
            .dispatcher
            .send(&email, &SendOptions::default())
            .await
            .unwrap();

        assert_eq!(report.total, 20);
        assert_eq!(report.delivered, 10);
        assert_eq!(
            report.outcomes.iter().filter(|o| o.succeeded()).count(),
            report.delivered
        );
    }
}
