use crate::err::{DecodeError, DecodeResult};
use crate::utils::bytes;

use bitflags::bitflags;
use byteorder::{LittleEndian, WriteBytesExt};
use log::debug;
use serde::Serialize;
use std::io::{self, Write};

/// `EmfPlusHeader` record type.
pub const EMF_PLUS_HEADER: u16 = 0x4001;
pub const EMF_PLUS_HEADER_SIZE: usize = 28;
/// The 20-bit signature every GDI+ producer writes into the version word.
pub const METAFILE_SIGNATURE: u32 = 0xDBC01;

const GRAPHICS_VERSION_MASK: u32 = 0xFFF;
const GRAPHICS_VERSION_BITS: u32 = 12;

bitflags! {
    /// Flags of the `EmfPlusHeader` record header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EmfPlusRecordFlags: u16 {
        /// The metafile contains both EMF+ records and their EMF equivalents.
        const DUAL = 0x0001;
    }
}

bitflags! {
    /// `EmfPlusFlags` of the EMF+ header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EmfPlusHeaderFlags: u32 {
        /// Recorded against a video display reference device. Clear means a printer.
        const VIDEO_DISPLAY = 0x0000_0001;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmfPlusRecordHeader {
    pub record_type: u16,
    pub flags: u16,
    pub size: u32,
    pub data_size: u32,
}

impl EmfPlusRecordHeader {
    pub fn record_flags(&self) -> EmfPlusRecordFlags {
        EmfPlusRecordFlags::from_bits_retain(self.flags)
    }
}

/// The packed version word: 12 bits of graphics version below 20 bits of metafile signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmfPlusGraphicsVersion {
    pub graphics_version: u32,
    pub metafile_signature: u32,
}

impl EmfPlusGraphicsVersion {
    pub fn from_packed(packed: u32) -> Self {
        EmfPlusGraphicsVersion {
            graphics_version: packed & GRAPHICS_VERSION_MASK,
            metafile_signature: packed >> GRAPHICS_VERSION_BITS,
        }
    }

    /// Inverse of [`EmfPlusGraphicsVersion::from_packed`]. Out-of-range fields are truncated.
    pub fn packed(&self) -> u32 {
        (self.metafile_signature << GRAPHICS_VERSION_BITS)
            | (self.graphics_version & GRAPHICS_VERSION_MASK)
    }

    pub fn has_valid_signature(&self) -> bool {
        self.metafile_signature == METAFILE_SIGNATURE
    }

    /// Name of the GDI+ release that wrote the metafile, when known.
    pub fn name(&self) -> Option<&'static str> {
        match self.graphics_version {
            0x001 => Some("GDI+ 1.0"),
            0x002 => Some("GDI+ 1.1"),
            _ => None,
        }
    }
}

/// The `EmfPlusHeader` record, always the first record of an EMF+ stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmfPlusHeader {
    pub record_header: EmfPlusRecordHeader,
    pub version: EmfPlusGraphicsVersion,
    pub flags: u32,
    pub logical_dpi_x: u32,
    pub logical_dpi_y: u32,
}

impl EmfPlusHeader {
    /// A well-formed header record.
    pub fn new(version: EmfPlusGraphicsVersion, flags: u32, dpi_x: u32, dpi_y: u32) -> Self {
        EmfPlusHeader {
            record_header: EmfPlusRecordHeader {
                record_type: EMF_PLUS_HEADER,
                flags: EmfPlusRecordFlags::empty().bits(),
                size: EMF_PLUS_HEADER_SIZE as u32,
                data_size: (EMF_PLUS_HEADER_SIZE - 12) as u32,
            },
            version,
            flags,
            logical_dpi_x: dpi_x,
            logical_dpi_y: dpi_y,
        }
    }

    /// Decodes the record at `offset`.
    ///
    /// Bytes that are in bounds but do not form an EMF+ header record (wrong type, or a size other
    /// than 28) produce an absent-kind error rather than a header.
    pub fn from_bytes(buf: &[u8], offset: usize) -> DecodeResult<EmfPlusHeader> {
        let record = bytes::slice_r(buf, offset, EMF_PLUS_HEADER_SIZE, "EMF+ header")?;

        let record_header = EmfPlusRecordHeader {
            record_type: bytes::read_u16_le_r(record, 0, "EMF+ record type")?,
            flags: bytes::read_u16_le_r(record, 2, "EMF+ record flags")?,
            size: bytes::read_u32_le_r(record, 4, "EMF+ record size")?,
            data_size: bytes::read_u32_le_r(record, 8, "EMF+ record data size")?,
        };

        if record_header.record_type != EMF_PLUS_HEADER {
            return Err(DecodeError::NotAnEmfPlusHeader {
                offset: offset as u64,
                record_type: record_header.record_type,
            });
        }

        if record_header.size != EMF_PLUS_HEADER_SIZE as u32 {
            return Err(DecodeError::UnexpectedHeaderSize {
                offset: offset as u64,
                size: record_header.size,
            });
        }

        let header = EmfPlusHeader {
            record_header,
            version: EmfPlusGraphicsVersion::from_packed(bytes::read_u32_le_r(
                record,
                12,
                "EMF+ graphics version",
            )?),
            flags: bytes::read_u32_le_r(record, 16, "EMF+ flags")?,
            logical_dpi_x: bytes::read_u32_le_r(record, 20, "EMF+ logical dpi x")?,
            logical_dpi_y: bytes::read_u32_le_r(record, 24, "EMF+ logical dpi y")?,
        };

        debug!("EMF+ header at offset {}: {:?}", offset, header);
        Ok(header)
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u16::<LittleEndian>(self.record_header.record_type)?;
        w.write_u16::<LittleEndian>(self.record_header.flags)?;
        w.write_u32::<LittleEndian>(self.record_header.size)?;
        w.write_u32::<LittleEndian>(self.record_header.data_size)?;
        w.write_u32::<LittleEndian>(self.version.packed())?;
        w.write_u32::<LittleEndian>(self.flags)?;
        w.write_u32::<LittleEndian>(self.logical_dpi_x)?;
        w.write_u32::<LittleEndian>(self.logical_dpi_y)
    }

    pub fn to_bytes(&self) -> [u8; EMF_PLUS_HEADER_SIZE] {
        let mut out = [0_u8; EMF_PLUS_HEADER_SIZE];
        let mut w = &mut out[..];
        let _ = self.write_to(&mut w);
        out
    }

    pub fn header_flags(&self) -> EmfPlusHeaderFlags {
        EmfPlusHeaderFlags::from_bits_retain(self.flags)
    }

    pub fn is_dual(&self) -> bool {
        self.record_header.record_flags().contains(EmfPlusRecordFlags::DUAL)
    }

    pub fn is_video_display(&self) -> bool {
        self.header_flags().contains(EmfPlusHeaderFlags::VIDEO_DISPLAY)
    }
}
