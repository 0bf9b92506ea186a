use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupErrorKind {
    #[error("end tag </{0}> has no matching start tag")]
    TagNotOpened(String),
    #[error("start tag <{0}> is never closed")]
    TagNotClosed(String),
    #[error("unterminated tag <{0}")]
    UnterminatedTag(String),
    #[error("unterminated comment")]
    UnterminatedComment,
}

/// A parse error at a 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct MarkupError {
    pub kind: MarkupErrorKind,
    pub line: usize,
    pub column: usize,
}

/// Every error reported for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupErrors(pub Vec<MarkupError>);

impl std::error::Error for MarkupErrors {}

impl fmt::Display for MarkupErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{err}")?;
            first = false;
        }
        Ok(())
    }
}
