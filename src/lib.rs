#![deny(unused_must_use)]
#![forbid(unsafe_code)]
//! Decodes the primary header of an Enhanced Metafile (EMF) and, when present, the EMF+ header
//! carried by the `EMR_COMMENT_EMFPLUS` record that follows it.
//!
//! ```no_run
//! use emfinfo::{EmfFile, MetafileSource};
//!
//! let emf = EmfFile::from_path("picture.emf")?;
//! println!("bounds: {}", emf.header().bounds);
//! if let Some(plus) = emf.emf_plus_header() {
//!     println!("dpi: {}x{}", plus.logical_dpi_x, plus.logical_dpi_y);
//! }
//! # Ok::<(), emfinfo::err::EmfError>(())
//! ```

pub mod comment;
pub mod emf_file;
pub mod emf_header;
pub mod emf_plus;
pub mod err;
pub mod header_view;
pub mod probe;
pub mod report;

mod utils;

pub use comment::{CommentRecordHeader, EMF_PLUS_SIGNATURE, EMR_COMMENT};
pub use emf_file::{DecoderSettings, EmfFile, MetafileSource};
pub use emf_header::{EmfHeader, PRIMARY_HEADER_SIZE, Rect, Size};
pub use emf_plus::{
    EMF_PLUS_HEADER, EMF_PLUS_HEADER_SIZE, EmfPlusGraphicsVersion, EmfPlusHeader,
    EmfPlusHeaderFlags, EmfPlusRecordFlags, EmfPlusRecordHeader,
};
pub use err::{DecodeError, DecodeErrorKind, EmfError};
pub use header_view::{Description, HeaderView};
pub use probe::{probe_emf_plus_header, try_extract_emf_plus_header};
pub use report::EmfReport;
