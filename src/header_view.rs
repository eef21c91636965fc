use crate::emf_header::{EmfHeader, Rect};
use crate::err::DecodeResult;
use crate::utils::{bytes, decode_utf16le_lossy};

use serde::Serialize;
use std::cmp;

/// The two NUL-terminated strings of an EMF description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Description {
    /// Name of the application that created the picture.
    pub application: String,
    pub picture: Option<String>,
}

/// Read-only accessors over a primary header and the metafile bytes it came from.
#[derive(Debug, Clone, Copy)]
pub struct HeaderView<'a> {
    header: &'a EmfHeader,
    bytes: &'a [u8],
}

impl<'a> HeaderView<'a> {
    pub fn new(header: &'a EmfHeader, bytes: &'a [u8]) -> Self {
        HeaderView { header, bytes }
    }

    pub fn header(&self) -> &'a EmfHeader {
        self.header
    }

    /// Every byte that was acquired, regardless of the declared size.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The acquired bytes, cut down to the declared `total_bytes` if the buffer is longer.
    pub fn declared_bytes(&self) -> &'a [u8] {
        let declared = usize::try_from(self.header.total_bytes).unwrap_or(usize::MAX);
        &self.bytes[..cmp::min(self.bytes.len(), declared)]
    }

    pub fn bounds(&self) -> Rect {
        self.header.bounds
    }

    pub fn frame(&self) -> Rect {
        self.header.frame
    }

    pub fn version(&self) -> u32 {
        self.header.version
    }

    pub fn total_bytes(&self) -> u32 {
        self.header.total_bytes
    }

    pub fn description_offset(&self) -> u32 {
        self.header.description_offset
    }

    /// Description length in UTF-16 code units.
    pub fn description_len(&self) -> u32 {
        self.header.description_len
    }

    /// Byte offset and byte length of the description, as declared. Not checked against the
    /// buffer.
    pub fn description_bounds(&self) -> (u64, u64) {
        (
            u64::from(self.header.description_offset),
            u64::from(self.header.description_len) * 2,
        )
    }

    /// The description text with trailing NULs removed.
    ///
    /// `None` when the header declares no description.
    pub fn description(&self) -> DecodeResult<Option<String>> {
        let (offset, len) = self.description_bounds();
        if offset == 0 || len == 0 {
            return Ok(None);
        }

        let buf = self.declared_bytes();
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        let raw = bytes::slice_r(buf, offset, len, "EMF description")?;

        let text = decode_utf16le_lossy(raw);
        Ok(Some(text.trim_end_matches('\0').to_owned()))
    }

    pub fn description_parts(&self) -> DecodeResult<Option<Description>> {
        Ok(self.description()?.map(|text| {
            let mut parts = text.splitn(2, '\0');
            let application = parts.next().unwrap_or_default().to_owned();
            let picture = parts
                .next()
                .map(|p| p.trim_end_matches('\0'))
                .filter(|p| !p.is_empty())
                .map(str::to_owned);

            Description {
                application,
                picture,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emf_header::PRIMARY_HEADER_SIZE;
    use pretty_assertions::assert_eq;

    fn with_description(text: &str) -> (EmfHeader, Vec<u8>) {
        let units: Vec<u16> = text.encode_utf16().collect();
        let header = EmfHeader {
            description_len: units.len() as u32,
            description_offset: PRIMARY_HEADER_SIZE as u32,
            total_bytes: (PRIMARY_HEADER_SIZE + units.len() * 2) as u32,
            ..EmfHeader::default()
        };

        let mut buf = vec![];
        header.write_to(&mut buf).unwrap();
        buf.extend(units.iter().flat_map(|u| u.to_le_bytes()));
        (header, buf)
    }

    #[test]
    fn test_reads_description() {
        let (header, buf) = with_description("Paint\0Sunset\0\0");
        let view = HeaderView::new(&header, &buf);

        assert_eq!(view.description().unwrap().as_deref(), Some("Paint\0Sunset"));
        assert_eq!(
            view.description_parts().unwrap(),
            Some(Description {
                application: "Paint".to_owned(),
                picture: Some("Sunset".to_owned()),
            })
        );
    }

    #[test]
    fn test_application_only_description() {
        let (header, buf) = with_description("Paint\0");
        let view = HeaderView::new(&header, &buf);

        assert_eq!(
            view.description_parts().unwrap(),
            Some(Description {
                application: "Paint".to_owned(),
                picture: None,
            })
        );
    }

    #[test]
    fn test_missing_description() {
        let header = EmfHeader::default();
        let mut buf = vec![];
        header.write_to(&mut buf).unwrap();

        let view = HeaderView::new(&header, &buf);
        assert_eq!(view.description(), Ok(None));
    }

    #[test]
    fn test_description_past_end_is_out_of_bounds() {
        let (mut header, buf) = with_description("Paint\0Sunset\0\0");
        header.description_len = 1000;

        let view = HeaderView::new(&header, &buf);
        assert!(view.description().unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn test_description_is_bounded_by_declared_size() {
        let (mut header, buf) = with_description("Paint\0Sunset\0\0");
        header.total_bytes = PRIMARY_HEADER_SIZE as u32 + 4;

        let view = HeaderView::new(&header, &buf);
        assert_eq!(view.declared_bytes().len(), PRIMARY_HEADER_SIZE + 4);
        assert!(view.description().unwrap_err().is_out_of_bounds());
    }

    #[test]
    fn test_accessors_expose_header_fields() {
        let (header, buf) = with_description("x\0");
        let view = HeaderView::new(&header, &buf);

        assert_eq!(view.version(), 0x0001_0000);
        assert_eq!(view.bounds(), header.bounds);
        assert_eq!(view.frame(), header.frame);
        assert_eq!(view.description_bounds(), (108, 4));
    }
}
