//! Bulk email and recipient definitions.

use serde::{Deserialize, Serialize};

/// A bulk email: one shared template and the recipients it fans out to.
///
/// Field names follow the camelCase wire shape shared with the other
/// provider integrations. The payload is read-only for the duration of a
/// send; rendering works on copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEmail {
    /// Subject line, may contain substitution tokens
    pub subject: String,

    /// HTML body, may contain substitution tokens
    pub html: String,

    /// Plaintext body, may contain substitution tokens
    pub plaintext: String,

    /// Sender, either `user@host` or `Name <user@host>`
    pub from: String,

    /// Reply-to address (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,

    /// Opaque identifier of the email this batch belongs to (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,

    /// Recipients; duplicates are not rejected and are each sent independently
    pub recipients: Vec<Recipient>,
}

/// A single recipient with its personalization set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// Destination address, passed to the transport as supplied
    pub address: String,

    /// Substitutions applied in order when rendering this recipient's message
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
}

impl Recipient {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            substitutions: Vec::new(),
        }
    }

    /// Append a substitution, keeping insertion order
    pub fn substitution(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.substitutions.push(Substitution::new(token, value));
        self
    }
}

/// A literal find/replace pair
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Substitution {
    /// Literal text to find; never interpreted as a pattern
    pub token: String,

    /// Literal replacement value
    pub value: String,

    /// Opaque identifier carried through from the rule that produced this pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Substitution {
    pub fn new(token: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            value: value.into(),
            id: None,
        }
    }
}

/// A message rendered for one recipient; the source template is untouched
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}
