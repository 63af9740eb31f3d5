//! Error type shared by every fallible table operation.

use thiserror::Error;

/// Failures a `SymTable` can report.
///
/// A missing key is not an error: lookups return `None`/`false` for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymTableError {
    /// Allocating a key copy or a bucket array failed.
    #[error("out of memory: failed to allocate {bytes} bytes")]
    OutOfMemory { bytes: usize },
}

pub type Result<T> = core::result::Result<T, SymTableError>;
