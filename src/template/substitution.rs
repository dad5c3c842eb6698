//! Per-recipient token substitution engine.

use super::types::{BulkEmail, Recipient, RenderedEmail};

/// Render the template for a single recipient.
///
/// Subject, HTML body and plaintext body are rendered independently. Each
/// substitution is applied in sequence order and replaces every occurrence
/// of its token in the current text state, so later pairs operate on the
/// output of earlier ones. Tokens are matched as literal text. A recipient
/// with no substitutions gets the template text unchanged, and tokens
/// absent from the text are simply skipped.
pub fn render(email: &BulkEmail, recipient: &Recipient) -> RenderedEmail {
    RenderedEmail {
        to: recipient.address.clone(),
        subject: substitute(&email.subject, recipient),
        html_body: substitute(&email.html, recipient),
        text_body: substitute(&email.plaintext, recipient),
    }
}

fn substitute(text: &str, recipient: &Recipient) -> String {
    let mut result = text.to_string();

    for sub in &recipient.substitutions {
        result = result.replace(&sub.token, &sub.value);
    }

    result
}
