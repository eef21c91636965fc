use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
pub type Result<T> = std::result::Result<T, EmfError>;

/// Coarse classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// A computed offset/length would read past the end of the buffer.
    OutOfBounds,
    /// The bytes are readable, but the expected marker is not there.
    Absent,
}

/// Errors raised while walking from the primary header to the EMF+ header.
///
/// Every variant carries the buffer offset of the structure being inspected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("buffer too small for {what} at offset {offset} (need {need} bytes, have {have})")]
    Truncated {
        what: &'static str,
        offset: u64,
        need: usize,
        have: usize,
    },

    #[error("offset of {what} overflows (base {base}, displacement {displacement})")]
    OffsetOverflow {
        what: &'static str,
        base: u64,
        displacement: u64,
    },

    #[error("record at offset {offset} is not a comment record (type 0x{record_type:08x})")]
    NotAComment { offset: u64, record_type: u32 },

    #[error("comment at offset {offset} has signature {found:02X?}, expected `EMF+`")]
    SignatureMismatch { offset: u64, found: [u8; 4] },

    #[error("record at offset {offset} is not an EMF+ header (type 0x{record_type:04x})")]
    NotAnEmfPlusHeader { offset: u64, record_type: u16 },

    #[error("EMF+ header at offset {offset} declares size {size}, expected 28")]
    UnexpectedHeaderSize { offset: u64, size: u32 },
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::Truncated { .. } | DecodeError::OffsetOverflow { .. } => {
                DecodeErrorKind::OutOfBounds
            }
            DecodeError::NotAComment { .. }
            | DecodeError::SignatureMismatch { .. }
            | DecodeError::NotAnEmfPlusHeader { .. }
            | DecodeError::UnexpectedHeaderSize { .. } => DecodeErrorKind::Absent,
        }
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.kind() == DecodeErrorKind::OutOfBounds
    }

    pub fn is_absent(&self) -> bool {
        self.kind() == DecodeErrorKind::Absent
    }
}

/// Errors raised while acquiring a metafile and its primary header.
#[derive(Debug, Error)]
pub enum EmfError {
    #[error("failed to open file {}: {source}", .path.display())]
    FailedToOpenFile { path: PathBuf, source: io::Error },

    #[error("an I/O error has occurred while reading {what}: {source}")]
    Io {
        what: &'static str,
        source: io::Error,
    },

    #[error("failed to allocate {size} bytes for the metafile")]
    AllocationFailure { size: usize },

    #[error("invalid EMF header record type, expected `0x00000001`, found `0x{record_type:08x}`")]
    InvalidHeaderRecordType { record_type: u32 },

    #[error("invalid EMF header signature, expected `0x464d4520`, found `0x{signature:08x}`")]
    InvalidHeaderSignature { signature: u32 },

    #[error("invalid EMF primary header: {0}")]
    InvalidPrimaryHeader(#[from] DecodeError),
}
