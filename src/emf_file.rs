use crate::emf_header::{EmfHeader, MIN_HEADER_SIZE, PRIMARY_HEADER_SIZE};
use crate::emf_plus::EmfPlusHeader;
use crate::err::{DecodeResult, EmfError, Result};
use crate::header_view::HeaderView;
use crate::probe;
use crate::report::EmfReport;
use crate::utils::bytes;

use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Anything that can hand out the raw metafile bytes along with their parsed primary header.
pub trait MetafileSource {
    fn bytes(&self) -> &[u8];
    fn header(&self) -> &EmfHeader;

    fn header_view(&self) -> HeaderView<'_> {
        HeaderView::new(self.header(), self.bytes())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderSettings {
    /// Base added to the description offset to find the EMF+ comment record.
    primary_header_size: usize,
    /// Ignore bytes past the header's `total_bytes`.
    respect_declared_size: bool,
}

impl Default for DecoderSettings {
    fn default() -> Self {
        DecoderSettings {
            primary_header_size: PRIMARY_HEADER_SIZE,
            respect_declared_size: true,
        }
    }
}

impl DecoderSettings {
    pub fn new() -> Self {
        DecoderSettings::default()
    }

    pub fn primary_header_size(mut self, primary_header_size: usize) -> Self {
        self.primary_header_size = primary_header_size;
        self
    }

    pub fn respect_declared_size(mut self, respect_declared_size: bool) -> Self {
        self.respect_declared_size = respect_declared_size;
        self
    }

    pub fn get_primary_header_size(&self) -> usize {
        self.primary_header_size
    }

    pub fn should_respect_declared_size(&self) -> bool {
        self.respect_declared_size
    }
}

/// A metafile held entirely in memory.
#[derive(Debug, Clone)]
pub struct EmfFile {
    data: Vec<u8>,
    header: EmfHeader,
    config: DecoderSettings,
}

impl EmfFile {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|source| EmfError::FailedToOpenFile {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(BufReader::new(f))
    }

    /// Reads the primary header, then at most `total_bytes` bytes in total.
    ///
    /// The primary header is always read in full, up to `nSize` bytes (at most
    /// [`PRIMARY_HEADER_SIZE`]), even when `total_bytes` claims less. A stream shorter than the
    /// declared size is kept as is.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::with_capacity(MIN_HEADER_SIZE);
        reader
            .by_ref()
            .take(MIN_HEADER_SIZE as u64)
            .read_to_end(&mut data)
            .map_err(|source| EmfError::Io {
                what: "EMF header",
                source,
            })?;

        EmfHeader::check_markers(&data)?;
        let header_size = bytes::read_u32_le_r(&data, 4, "EMF header size")? as usize;
        let declared = bytes::read_u32_le_r(&data, 48, "EMF total bytes")? as usize;
        let wanted = declared.max(header_size.clamp(MIN_HEADER_SIZE, PRIMARY_HEADER_SIZE));
        let remaining = wanted.saturating_sub(data.len());

        data.try_reserve_exact(remaining)
            .map_err(|_| EmfError::AllocationFailure { size: wanted })?;
        reader
            .take(remaining as u64)
            .read_to_end(&mut data)
            .map_err(|source| EmfError::Io {
                what: "EMF records",
                source,
            })?;

        if data.len() < declared {
            info!(
                "Metafile declares {} bytes, but only {} could be read",
                declared,
                data.len()
            );
        }

        Self::from_bytes(data)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let header = EmfHeader::from_bytes(&data)?;
        debug!("EMF Header: {:#?}", header);

        Ok(EmfFile {
            data,
            header,
            config: DecoderSettings::default(),
        })
    }

    pub fn with_configuration(mut self, configuration: DecoderSettings) -> Self {
        self.config = configuration;
        self
    }

    /// The EMF+ header, if this metafile carries one where expected.
    pub fn emf_plus_header(&self) -> Option<EmfPlusHeader> {
        probe::try_extract_emf_plus_header(self, &self.config)
    }

    /// Like [`EmfFile::emf_plus_header`], but tells why no header was found.
    pub fn probe_emf_plus_header(&self) -> DecodeResult<EmfPlusHeader> {
        probe::probe_emf_plus_header(self, &self.config)
    }

    pub fn report(&self) -> EmfReport {
        EmfReport::from_source(self, &self.config)
    }
}

impl MetafileSource for EmfFile {
    fn bytes(&self) -> &[u8] {
        &self.data
    }

    fn header(&self) -> &EmfHeader {
        &self.header
    }
}
