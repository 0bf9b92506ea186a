//! Structural well-formedness checks for HTML fragments.
//!
//! This is a syntactic check only. Nothing is sanitized or rewritten.

mod error;
mod parser;

pub use error::{MarkupError, MarkupErrorKind, MarkupErrors};
pub use parser::parse_errors;

/// Succeeds when `html` parses without structural errors.
pub fn validate(html: &str) -> Result<(), MarkupErrors> {
    let errors = parse_errors(html);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(MarkupErrors(errors))
    }
}
