//! Error definitions for the `tl_typegen` pipeline.
//!
//! Parsing and emission never fail: malformed declarations are skipped and
//! reported through [`crate::ast::Diagnostic`] instead. Only the edges that
//! touch the filesystem or user-supplied options return errors.

use thiserror::Error;

#[derive(Debug, Error)]
/// Top-level error type returned by public APIs.
pub enum TypegenError {
    /// Invalid generator options (for example an unknown key in a config file).
    #[error("config error: {0}")]
    Config(String),
    /// Model serialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Filesystem I/O error while reading a schema or config file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
