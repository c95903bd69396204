//! KMZ output: the KML document packed into a zip archive.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::document::Document;
use crate::error::ExportFailure;
use crate::export::{write_atomically, ExportFormat, Exporter};
use crate::kml::to_kml;

/// Name of the archive entry holding the KML document.
pub const KMZ_ENTRY: &str = "doc.kml";

/// Writes features into a `.kmz` archive with a single `doc.kml` entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct KmzExporter;

impl Exporter for KmzExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Kmz
    }

    fn write(&self, document: &Document, path: &Path) -> Result<Vec<PathBuf>, ExportFailure> {
        write_atomically(path, &to_kmz(document)?)?;
        Ok(vec![path.to_path_buf()])
    }
}

/// Packs the KML text of the document into an in-memory archive.
///
/// The entry timestamp is fixed, so the same document always produces the same bytes.
pub fn to_kmz(document: &Document) -> Result<Vec<u8>, ExportFailure> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(KMZ_ENTRY, options)?;
    writer.write_all(to_kml(document).as_bytes())?;

    Ok(writer.finish()?.into_inner())
}
