//! Mailbox parsing for sender and reply-to addresses.
//!
//! Accepts the two forms the wire payload carries: a bare `user@host`
//! address or a display-name form like `Weekly News <news@example.com>`.
//! Recipient addresses are deliberately NOT parsed through this type; they
//! are handed to the transport as-is so a bad recipient fails its own send
//! instead of the whole batch.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error produced when a mailbox string cannot be parsed
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("empty mailbox")]
    Empty,

    #[error("invalid mailbox: {0:?}")]
    Invalid(String),
}

/// An email mailbox, optionally carrying a display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub name: Option<String>,
    pub address: String,
}

impl Mailbox {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }

    pub fn with_name(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            address: address.into(),
        }
    }
}

impl FromStr for Mailbox {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(AddressError::Empty);
        }

        let (name, address) = match (raw.find('<'), raw.ends_with('>')) {
            (Some(open), true) => {
                let name = raw[..open].trim().trim_matches('"').trim();
                let address = raw[open + 1..raw.len() - 1].trim();
                let name = if name.is_empty() {
                    None
                } else {
                    Some(name.to_string())
                };
                (name, address)
            }
            _ => (None, raw),
        };

        let (local, domain) = address
            .split_once('@')
            .ok_or_else(|| AddressError::Invalid(raw.to_string()))?;
        if local.is_empty() || domain.is_empty() || address.contains(char::is_whitespace) {
            return Err(AddressError::Invalid(raw.to_string()));
        }

        Ok(Mailbox {
            name,
            address: address.to_string(),
        })
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.address),
            None => write!(f, "{}", self.address),
        }
    }
}
