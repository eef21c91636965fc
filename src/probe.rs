//! Walks from the primary header to the EMF+ header.
//!
//! The stages are:
//! 1. [`comment::locate`] the comment record at `primary_header_size + description_offset`.
//! 2. [`comment::validate`] that it is an `EMR_COMMENT` with the `EMF+` signature.
//! 3. Decode the [`EmfPlusHeader`] that immediately follows it.
//!
//! [`probe_emf_plus_header`] reports the stage that gave up, while
//! [`try_extract_emf_plus_header`] folds every failure into `None`.

use crate::comment;
use crate::emf_file::{DecoderSettings, MetafileSource};
use crate::emf_plus::EmfPlusHeader;
use crate::err::DecodeResult;

use log::info;

pub fn probe_emf_plus_header<S: MetafileSource + ?Sized>(
    source: &S,
    settings: &DecoderSettings,
) -> DecodeResult<EmfPlusHeader> {
    let view = source.header_view();
    let buf = if settings.should_respect_declared_size() {
        view.declared_bytes()
    } else {
        view.bytes()
    };

    let comment_offset = comment::locate(
        buf,
        settings.get_primary_header_size(),
        view.description_offset(),
    )?;
    let header_offset = comment::validate(buf, comment_offset)?;

    EmfPlusHeader::from_bytes(buf, header_offset)
}

pub fn try_extract_emf_plus_header<S: MetafileSource + ?Sized>(
    source: &S,
    settings: &DecoderSettings,
) -> Option<EmfPlusHeader> {
    match probe_emf_plus_header(source, settings) {
        Ok(header) => Some(header),
        Err(e) => {
            info!("No EMF+ header: {}", e);
            None
        }
    }
}
