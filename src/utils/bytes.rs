//! Byte-slice utilities for bounds-oriented parsing.
//!
//! There are two layers:
//! - **Option layer** (`read_*`): helpers that return `Option<T>`.
//! - **Result layer** (`*_r`): wrappers that map `None` to `DecodeError::Truncated`.
//!
//! All numeric reads are **little-endian** (EMF and EMF+ are LE on disk). Offsets are `usize` and
//! are interpreted relative to the slice you pass in.
//!
//! Prefer a single up-front bounds check with [`slice_r`] when parsing fixed-size structs:
//!
//! ```ignore
//! use crate::utils::bytes;
//!
//! let record = bytes::slice_r(buf, offset, 16, "comment record")?;
//! let record_type = bytes::read_u32_le_r(record, 0, "comment record type")?;
//! let signature = bytes::read_sig_r(record, 12, "comment signature")?;
//! ```

use crate::err::DecodeError;

/// Read `N` raw bytes at `offset`.
///
/// Returns `None` if the range is out of bounds.
pub(crate) fn read_array<const N: usize>(buf: &[u8], offset: usize) -> Option<[u8; N]> {
    let end = offset.checked_add(N)?;
    let bytes: [u8; N] = buf.get(offset..end)?.try_into().ok()?;
    Some(bytes)
}

/// Read a 4-byte signature at `offset` (e.g. `b"EMF+"`).
pub(crate) fn read_sig(buf: &[u8], offset: usize) -> Option<[u8; 4]> {
    read_array::<4>(buf, offset)
}

pub(crate) fn read_u16_le(buf: &[u8], offset: usize) -> Option<u16> {
    Some(u16::from_le_bytes(read_array::<2>(buf, offset)?))
}

pub(crate) fn read_u32_le(buf: &[u8], offset: usize) -> Option<u32> {
    Some(u32::from_le_bytes(read_array::<4>(buf, offset)?))
}

pub(crate) fn read_i32_le(buf: &[u8], offset: usize) -> Option<i32> {
    Some(i32::from_le_bytes(read_array::<4>(buf, offset)?))
}

#[inline]
fn truncated(what: &'static str, offset: usize, need: usize, len: usize) -> DecodeError {
    DecodeError::Truncated {
        what,
        offset: offset as u64,
        need,
        have: len.saturating_sub(offset),
    }
}

/// Borrow `len` bytes at `offset`, or return `DecodeError::Truncated`.
pub(crate) fn slice_r<'a>(
    buf: &'a [u8],
    offset: usize,
    len: usize,
    what: &'static str,
) -> Result<&'a [u8], DecodeError> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| truncated(what, offset, len, buf.len()))?;
    buf.get(offset..end)
        .ok_or_else(|| truncated(what, offset, len, buf.len()))
}

pub(crate) fn read_sig_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<[u8; 4], DecodeError> {
    read_sig(buf, offset).ok_or_else(|| truncated(what, offset, 4, buf.len()))
}

pub(crate) fn read_u16_le_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<u16, DecodeError> {
    read_u16_le(buf, offset).ok_or_else(|| truncated(what, offset, 2, buf.len()))
}

pub(crate) fn read_u32_le_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<u32, DecodeError> {
    read_u32_le(buf, offset).ok_or_else(|| truncated(what, offset, 4, buf.len()))
}

pub(crate) fn read_i32_le_r(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<i32, DecodeError> {
    read_i32_le(buf, offset).ok_or_else(|| truncated(what, offset, 4, buf.len()))
}
