//! Error types for MARC record parsing and decoding.
//!
//! This module provides the [`MarcError`] type for every fallible operation in
//! the crate and the [`Result`] convenience alias.

use thiserror::Error;

/// Error type for all MARC library operations.
///
/// Each variant corresponds to one of the failure points in the stream
/// reading algorithm (leader, directory, data area, field body) or to a
/// model-mutation invariant violated after a record has already been built.
#[derive(Error, Debug)]
pub enum MarcError {
    /// The underlying byte source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fewer than 24 octets were available at the start of a record.
    #[error("truncated leader: expected 24 bytes, got {available}")]
    TruncatedLeader {
        /// Number of bytes actually read before the source ended.
        available: usize,
    },

    /// A numeric leader position contained a non-digit octet.
    #[error("malformed leader: {0}")]
    MalformedLeader(String),

    /// The directory was not a whole number of 12-byte entries, or an entry
    /// contained non-digit octets.
    #[error("malformed directory: {0}")]
    MalformedDirectory(String),

    /// The data area was shorter than `recordLength - baseAddressOfData`.
    #[error("truncated record: {0}")]
    TruncatedRecord(String),

    /// The last octet of the data area was not `0x1D`.
    #[error("missing record terminator")]
    MissingRecordTerminator,

    /// A field slice was missing its trailing field terminator.
    #[error("malformed field: {0}")]
    MalformedField(String),

    /// A tag assigned to a field failed the tag invariants (length 3, all
    /// digits, and the correct control/data numeric range).
    #[error("invalid tag: {0}")]
    InvalidTag(String),

    /// A named charset could not be resolved.
    #[error("unknown charset: {0}")]
    UnknownCharset(String),

    /// A charset-specific decode failure (e.g. invalid UTF-8).
    #[error("decode error: {0}")]
    DecodeError(String),
}

/// Convenience alias for [`std::result::Result`] with [`MarcError`].
pub type Result<T> = std::result::Result<T, MarcError>;
