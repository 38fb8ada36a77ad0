use std::io;

use thiserror::Error;

/// Typed outcomes of a fallible index-file or B-tree operation.
///
/// This crate never swallows an I/O failure: anything bubbling up from the
/// OS is wrapped as [`IndexError::IoFailure`] or [`IndexError::ShortRead`],
/// while the remaining variants are outcomes the engine itself decides.
#[derive(Debug, Error)]
pub enum IndexError {
    /// An index operation was requested without an open file.
    #[error("no index file is open")]
    NotOpen,

    /// `open` read fewer than 512 bytes, or the magic tag did not match.
    #[error("invalid index header")]
    InvalidHeader,

    /// A node block read returned fewer than 512 bytes.
    #[error("short read on block {block_id}: file truncated or corrupted")]
    ShortRead { block_id: u64 },

    /// `insert` rejected because the key is already present.
    #[error("key {key} already exists")]
    DuplicateKey { key: u64 },

    /// Any lower-level read/write failure from the OS.
    #[error("I/O failure: {0}")]
    IoFailure(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, IndexError>;
