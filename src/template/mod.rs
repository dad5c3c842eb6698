//! Bulk email template system.
//!
//! This module provides:
//! - The bulk email payload: one shared template plus its recipient list
//! - Per-recipient substitution pairs produced by the personalization rules
//! - The rendering engine that applies them to subject and bodies

mod substitution;
mod types;

pub use substitution::render;
pub use types::{BulkEmail, Recipient, RenderedEmail, Substitution};
