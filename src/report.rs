use crate::emf_file::{DecoderSettings, MetafileSource};
use crate::emf_header::Rect;
use crate::emf_plus::{EmfPlusHeader, METAFILE_SIGNATURE};
use crate::header_view::Description;
use crate::probe;

use log::warn;
use serde::Serialize;
use std::io::{self, Write};

/// Everything the dump tool prints about one metafile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmfReport {
    pub bounds: Rect,
    pub frame: Rect,
    pub version: u32,
    pub description: Option<Description>,
    pub emf_plus: Option<EmfPlusHeader>,
}

impl EmfReport {
    pub fn from_source<S: MetafileSource + ?Sized>(source: &S, settings: &DecoderSettings) -> Self {
        let view = source.header_view();

        let description = match view.description_parts() {
            Ok(description) => description,
            Err(e) => {
                warn!("Ignoring description: {}", e);
                None
            }
        };

        EmfReport {
            bounds: view.bounds(),
            frame: view.frame(),
            version: view.version(),
            description,
            emf_plus: probe::try_extract_emf_plus_header(source, settings),
        }
    }

    /// Writes the report as plain text. The EMF+ section is left out when there is no EMF+ header.
    pub fn write_text<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "device units: {}", self.bounds)?;
        writeln!(w, "Picture Frame: {}", self.frame)?;
        writeln!(w, "version: {}", self.version)?;

        match &self.description {
            Some(Description {
                application,
                picture: Some(picture),
            }) => writeln!(w, "description: {} / {}", application, picture)?,
            Some(Description {
                application,
                picture: None,
            }) => writeln!(w, "description: {}", application)?,
            None => writeln!(w, "description:")?,
        }

        if let Some(plus) = &self.emf_plus {
            writeln!(w, "EMF+ header::")?;
            match plus.version.name() {
                Some(name) => writeln!(
                    w,
                    "GraphicsVersion: {} ({})",
                    plus.version.graphics_version, name
                )?,
                None => writeln!(w, "GraphicsVersion: {}", plus.version.graphics_version)?,
            }
            if !plus.version.has_valid_signature() {
                writeln!(
                    w,
                    "MetafileSignature: {:x} (expected {:x})",
                    plus.version.metafile_signature, METAFILE_SIGNATURE
                )?;
            }
            writeln!(w, "EmfPlusFlags: {:x}", plus.flags)?;
            writeln!(
                w,
                "LogicalDpi: [{},{}]",
                plus.logical_dpi_x, plus.logical_dpi_y
            )?;
        }

        Ok(())
    }

    pub fn to_text(&self) -> io::Result<String> {
        let mut out = Vec::new();
        self.write_text(&mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn to_json(&self, indent: bool) -> serde_json::Result<String> {
        if indent {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emf_plus::EmfPlusGraphicsVersion;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn report() -> EmfReport {
        EmfReport {
            bounds: Rect::new(0, 0, 639, 479),
            frame: Rect::new(0, 0, 16933, 12700),
            version: 65536,
            description: Some(Description {
                application: "Paint".to_owned(),
                picture: Some("Sunset".to_owned()),
            }),
            emf_plus: Some(EmfPlusHeader::new(
                EmfPlusGraphicsVersion {
                    graphics_version: 2,
                    metafile_signature: METAFILE_SIGNATURE,
                },
                1,
                96,
                96,
            )),
        }
    }

    #[test]
    fn test_text_report() {
        assert_eq!(
            report().to_text().unwrap(),
            indoc! {"
                device units: [0,639:0,479]
                Picture Frame: [0,16933:0,12700]
                version: 65536
                description: Paint / Sunset
                EMF+ header::
                GraphicsVersion: 2 (GDI+ 1.1)
                EmfPlusFlags: 1
                LogicalDpi: [96,96]
            "}
        );
    }

    #[test]
    fn test_text_report_omits_missing_emf_plus_section() {
        let report = EmfReport {
            description: None,
            emf_plus: None,
            ..report()
        };

        assert_eq!(
            report.to_text().unwrap(),
            indoc! {"
                device units: [0,639:0,479]
                Picture Frame: [0,16933:0,12700]
                version: 65536
                description:
            "}
        );
    }

    #[test]
    fn test_text_report_flags_unknown_version_and_signature() {
        let report = EmfReport {
            emf_plus: Some(EmfPlusHeader::new(
                EmfPlusGraphicsVersion::from_packed(0x0000_1007),
                0x2a,
                120,
                72,
            )),
            ..report()
        };

        assert_eq!(
            report.to_text().unwrap(),
            indoc! {"
                device units: [0,639:0,479]
                Picture Frame: [0,16933:0,12700]
                version: 65536
                description: Paint / Sunset
                EMF+ header::
                GraphicsVersion: 7
                MetafileSignature: 1 (expected dbc01)
                EmfPlusFlags: 2a
                LogicalDpi: [120,72]
            "}
        );
    }

    #[test]
    fn test_json_report() {
        let value: serde_json::Value =
            serde_json::from_str(&report().to_json(false).unwrap()).unwrap();

        assert_eq!(value["bounds"]["right"], 639);
        assert_eq!(value["description"]["picture"], "Sunset");
        assert_eq!(value["emf_plus"]["version"]["graphics_version"], 2);
        assert_eq!(value["emf_plus"]["logical_dpi_y"], 96);
        assert_eq!(value["emf_plus"]["record_header"]["record_type"], 0x4001);
    }
}
