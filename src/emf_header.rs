use crate::err::{EmfError, Result};
use crate::utils::bytes;

use byteorder::{LittleEndian, WriteBytesExt};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

/// `EMR_HEADER`
pub const EMR_HEADER: u32 = 0x0000_0001;
/// `ENHMETA_SIGNATURE`, `" EMF"` read as a little-endian `u32`.
pub const ENHMETA_SIGNATURE: u32 = 0x464D_4520;
/// Size of the original (extension-less) `ENHMETAHEADER`.
pub const MIN_HEADER_SIZE: usize = 88;
/// `sizeof(ENHMETAHEADER)` with both header extensions.
pub const PRIMARY_HEADER_SIZE: usize = 108;

const EXTENSION_1_END: u32 = 100;
const EXTENSION_2_END: u32 = 108;

/// A `RECTL`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    fn read(buf: &[u8], offset: usize, what: &'static str) -> Result<Rect> {
        Ok(Rect {
            left: bytes::read_i32_le_r(buf, offset, what)?,
            top: bytes::read_i32_le_r(buf, offset + 4, what)?,
            right: bytes::read_i32_le_r(buf, offset + 8, what)?,
            bottom: bytes::read_i32_le_r(buf, offset + 12, what)?,
        })
    }

    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_i32::<LittleEndian>(self.left)?;
        w.write_i32::<LittleEndian>(self.top)?;
        w.write_i32::<LittleEndian>(self.right)?;
        w.write_i32::<LittleEndian>(self.bottom)
    }
}

/// Horizontal extent first, then vertical: `[left,right:top,bottom]`.
impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{}:{},{}]",
            self.left, self.right, self.top, self.bottom
        )
    }
}

/// A `SIZEL`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub cx: i32,
    pub cy: i32,
}

impl Size {
    pub fn new(cx: i32, cy: i32) -> Self {
        Size { cx, cy }
    }

    fn read(buf: &[u8], offset: usize, what: &'static str) -> Result<Size> {
        Ok(Size {
            cx: bytes::read_i32_le_r(buf, offset, what)?,
            cy: bytes::read_i32_le_r(buf, offset + 4, what)?,
        })
    }

    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_i32::<LittleEndian>(self.cx)?;
        w.write_i32::<LittleEndian>(self.cy)
    }
}

/// Pixel format fields appended to the header by `HeaderExtension1`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelFormat {
    pub size: u32,
    pub offset: u32,
    pub open_gl: bool,
}

/// The `EMR_HEADER` record (`ENHMETAHEADER`) at the start of every EMF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmfHeader {
    pub header_size: u32,
    /// Bounds in device units.
    pub bounds: Rect,
    /// Picture frame in .01 millimeter units.
    pub frame: Rect,
    pub version: u32,
    pub total_bytes: u32,
    pub record_count: u32,
    pub handle_count: u16,
    /// Length of the description in UTF-16 code units, including NULs.
    pub description_len: u32,
    /// Offset of the description from the start of the header.
    pub description_offset: u32,
    pub palette_entries: u32,
    pub device: Size,
    pub millimeters: Size,
    pub pixel_format: Option<PixelFormat>,
    pub micrometers: Option<Size>,
}

impl EmfHeader {
    /// Parses the header at the very start of `buf`.
    ///
    /// Extension fields are only read when the declared header size covers them.
    pub fn from_bytes(buf: &[u8]) -> Result<EmfHeader> {
        Self::check_markers(buf)?;

        let header_size = bytes::read_u32_le_r(buf, 4, "EMF header size")?;

        let pixel_format = if header_size >= EXTENSION_1_END {
            Some(PixelFormat {
                size: bytes::read_u32_le_r(buf, 88, "EMF pixel format size")?,
                offset: bytes::read_u32_le_r(buf, 92, "EMF pixel format offset")?,
                open_gl: bytes::read_u32_le_r(buf, 96, "EMF OpenGL flag")? != 0,
            })
        } else {
            None
        };

        let micrometers = if header_size >= EXTENSION_2_END {
            Some(Size::read(buf, 100, "EMF device micrometers")?)
        } else {
            None
        };

        Ok(EmfHeader {
            header_size,
            bounds: Rect::read(buf, 8, "EMF bounds")?,
            frame: Rect::read(buf, 24, "EMF frame")?,
            version: bytes::read_u32_le_r(buf, 44, "EMF version")?,
            total_bytes: bytes::read_u32_le_r(buf, 48, "EMF total bytes")?,
            record_count: bytes::read_u32_le_r(buf, 52, "EMF record count")?,
            handle_count: bytes::read_u16_le_r(buf, 56, "EMF handle count")?,
            description_len: bytes::read_u32_le_r(buf, 60, "EMF description length")?,
            description_offset: bytes::read_u32_le_r(buf, 64, "EMF description offset")?,
            palette_entries: bytes::read_u32_le_r(buf, 68, "EMF palette entries")?,
            device: Size::read(buf, 72, "EMF device pixels")?,
            millimeters: Size::read(buf, 80, "EMF device millimeters")?,
            pixel_format,
            micrometers,
        })
    }

    /// Checks the record type and signature of the header at the start of `buf`.
    pub fn check_markers(buf: &[u8]) -> Result<()> {
        let _ = bytes::slice_r(buf, 0, MIN_HEADER_SIZE, "EMF header")?;

        let record_type = bytes::read_u32_le_r(buf, 0, "EMF header record type")?;
        if record_type != EMR_HEADER {
            return Err(EmfError::InvalidHeaderRecordType { record_type });
        }

        let signature = bytes::read_u32_le_r(buf, 40, "EMF header signature")?;
        if signature != ENHMETA_SIGNATURE {
            return Err(EmfError::InvalidHeaderSignature { signature });
        }
        Ok(())
    }

    /// Writes the header fields. Extensions are written only when present, so `header_size`
    /// should agree with them.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(EMR_HEADER)?;
        w.write_u32::<LittleEndian>(self.header_size)?;
        self.bounds.write_to(w)?;
        self.frame.write_to(w)?;
        w.write_u32::<LittleEndian>(ENHMETA_SIGNATURE)?;
        w.write_u32::<LittleEndian>(self.version)?;
        w.write_u32::<LittleEndian>(self.total_bytes)?;
        w.write_u32::<LittleEndian>(self.record_count)?;
        w.write_u16::<LittleEndian>(self.handle_count)?;
        // reserved
        w.write_u16::<LittleEndian>(0)?;
        w.write_u32::<LittleEndian>(self.description_len)?;
        w.write_u32::<LittleEndian>(self.description_offset)?;
        w.write_u32::<LittleEndian>(self.palette_entries)?;
        self.device.write_to(w)?;
        self.millimeters.write_to(w)?;

        if let Some(pixel_format) = self.pixel_format {
            w.write_u32::<LittleEndian>(pixel_format.size)?;
            w.write_u32::<LittleEndian>(pixel_format.offset)?;
            w.write_u32::<LittleEndian>(u32::from(pixel_format.open_gl))?;
        }
        if let Some(micrometers) = self.micrometers {
            micrometers.write_to(w)?;
        }
        Ok(())
    }
}

impl Default for EmfHeader {
    fn default() -> Self {
        EmfHeader {
            header_size: PRIMARY_HEADER_SIZE as u32,
            bounds: Rect::default(),
            frame: Rect::default(),
            version: 0x0001_0000,
            total_bytes: PRIMARY_HEADER_SIZE as u32,
            record_count: 1,
            handle_count: 1,
            description_len: 0,
            description_offset: 0,
            palette_entries: 0,
            device: Size::default(),
            millimeters: Size::default(),
            pixel_format: Some(PixelFormat::default()),
            micrometers: Some(Size::default()),
        }
    }
}
