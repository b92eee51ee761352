//! Error type shared across the crate.

use std::fmt;

pub type Result<T> = std::result::Result<T, ShaclError>;

/// Failure modes named by the recovery policy: I/O, shape parsing, query
/// execution, and lowering a tree that still contains an unresolved shape
/// reference.
#[derive(Debug, Clone)]
pub enum ShaclError {
    Io(String),
    Parse(String),
    Query(String),
    Lowering(String),
}

impl fmt::Display for ShaclError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaclError::Io(msg) => write!(f, "I/O error: {}", msg),
            ShaclError::Parse(msg) => write!(f, "parse error: {}", msg),
            ShaclError::Query(msg) => write!(f, "query error: {}", msg),
            ShaclError::Lowering(msg) => write!(f, "lowering error: {}", msg),
        }
    }
}

impl std::error::Error for ShaclError {}
