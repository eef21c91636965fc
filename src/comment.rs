use crate::err::{DecodeError, DecodeResult};
use crate::utils::{bytes, hexdump};

use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, log_enabled, trace, Level};
use std::io::{self, Write};

/// `EMR_COMMENT`
pub const EMR_COMMENT: u32 = 0x0000_0046;
/// Comment identifier of an `EMR_COMMENT_EMFPLUS` record.
pub const EMF_PLUS_SIGNATURE: [u8; 4] = *b"EMF+";
pub const COMMENT_RECORD_HEADER_SIZE: usize = 16;

/// The fixed part of an `EMR_COMMENT_EMFPLUS` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRecordHeader {
    pub record_type: u32,
    pub record_size: u32,
    pub data_size: u32,
    pub signature: [u8; 4],
}

impl CommentRecordHeader {
    /// A header for a comment carrying `payload_len` bytes of EMF+ records.
    pub fn emf_plus(payload_len: u32) -> Self {
        CommentRecordHeader {
            record_type: EMR_COMMENT,
            record_size: COMMENT_RECORD_HEADER_SIZE as u32 + payload_len,
            data_size: 4 + payload_len,
            signature: EMF_PLUS_SIGNATURE,
        }
    }

    /// Reads the record header at `offset` without checking its contents.
    pub fn from_bytes(buf: &[u8], offset: usize) -> DecodeResult<CommentRecordHeader> {
        let record = bytes::slice_r(buf, offset, COMMENT_RECORD_HEADER_SIZE, "comment record")?;

        Ok(CommentRecordHeader {
            record_type: bytes::read_u32_le_r(record, 0, "comment record type")?,
            record_size: bytes::read_u32_le_r(record, 4, "comment record size")?,
            data_size: bytes::read_u32_le_r(record, 8, "comment data size")?,
            signature: bytes::read_sig_r(record, 12, "comment signature")?,
        })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.record_type)?;
        w.write_u32::<LittleEndian>(self.record_size)?;
        w.write_u32::<LittleEndian>(self.data_size)?;
        w.write_all(&self.signature)
    }

    pub fn is_emf_plus(&self) -> bool {
        self.record_type == EMR_COMMENT && self.signature == EMF_PLUS_SIGNATURE
    }
}

/// Computes where the EMF+ comment record is expected, `primary_header_size +
/// description_offset`, and makes sure a whole comment record header fits there.
pub fn locate(
    buf: &[u8],
    primary_header_size: usize,
    description_offset: u32,
) -> DecodeResult<usize> {
    let candidate = usize::try_from(description_offset)
        .ok()
        .and_then(|displacement| primary_header_size.checked_add(displacement))
        .ok_or(DecodeError::OffsetOverflow {
            what: "comment record",
            base: primary_header_size as u64,
            displacement: u64::from(description_offset),
        })?;

    let _ = bytes::slice_r(buf, candidate, COMMENT_RECORD_HEADER_SIZE, "comment record")?;
    debug!("EMF+ comment record expected at offset {}", candidate);

    Ok(candidate)
}

/// Checks that the record at `offset` is an `EMR_COMMENT` carrying the `EMF+` signature.
///
/// Returns the offset just past the comment record header, where the first EMF+ record starts.
pub fn validate(buf: &[u8], offset: usize) -> DecodeResult<usize> {
    let header = CommentRecordHeader::from_bytes(buf, offset)?;

    if log_enabled!(Level::Trace) {
        trace!(
            "Comment record:\n{}",
            hexdump(&buf[offset..offset + COMMENT_RECORD_HEADER_SIZE], offset)
        );
    }

    if header.record_type != EMR_COMMENT {
        return Err(DecodeError::NotAComment {
            offset: offset as u64,
            record_type: header.record_type,
        });
    }

    if header.signature != EMF_PLUS_SIGNATURE {
        return Err(DecodeError::SignatureMismatch {
            offset: offset as u64,
            found: header.signature,
        });
    }

    debug!("{:?}", header);
    Ok(offset + COMMENT_RECORD_HEADER_SIZE)
}
