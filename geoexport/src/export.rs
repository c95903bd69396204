//! Export contract shared by all output formats.

use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostics, Warning, WarningAction};
use crate::document::{Document, DocumentBuilder};
use crate::error::{ExportError, ExportFailure};
use crate::feature::Feature;
use crate::kml::KmlExporter;
use crate::kmz::KmzExporter;
use crate::reproject::{CoordinateTransform, UtmParams, UtmReprojector};
use crate::shp::ShapefileExporter;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Keyhole Markup Language.
    Kml,
    /// Zipped KML.
    Kmz,
    /// ESRI Shapefile set.
    Shapefile,
}

impl ExportFormat {
    /// All supported formats.
    pub const ALL: [ExportFormat; 3] = [Self::Kml, Self::Kmz, Self::Shapefile];

    /// File extension (without the dot) the output file name must have.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Kml => "kml",
            Self::Kmz => "kmz",
            Self::Shapefile => "shp",
        }
    }

    /// Infers the format from the extension of the file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|format| extension.eq_ignore_ascii_case(format.extension()))
    }

    /// Checks that the file name carries the extension of this format, ignoring case.
    pub fn matches_path(&self, path: &Path) -> bool {
        Self::from_path(path) == Some(*self)
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Kml => "KML",
            Self::Kmz => "KMZ",
            Self::Shapefile => "Shapefile",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kml" => Ok(Self::Kml),
            "kmz" => Ok(Self::Kmz),
            "shp" | "shapefile" => Ok(Self::Shapefile),
            _ => Err(ExportError::InvalidArgument(format!(
                "unknown export format '{s}'"
            ))),
        }
    }
}

/// Result of a successful export.
#[derive(Debug)]
pub struct ExportReport {
    /// Format of the written files.
    pub format: ExportFormat,
    /// Paths of all written files.
    pub files: Vec<PathBuf>,
    /// Number of placemarks written.
    pub exported: usize,
    /// Features and coordinates left out of the output.
    pub warnings: Vec<Warning>,
}

impl ExportReport {
    /// Number of features that were not exported at all.
    pub fn skipped_features(&self) -> usize {
        self.warnings
            .iter()
            .filter(|warning| warning.action == WarningAction::FeatureSkipped)
            .count()
    }
}

/// Writer of one output format.
///
/// Implementors only provide serialization of a built [`Document`], the request checks and
/// reprojection are common to all formats.
pub trait Exporter {
    /// Format produced by this exporter.
    fn format(&self) -> ExportFormat;

    /// Serializes the document to `path`, returning the list of written files.
    fn write(&self, document: &Document, path: &Path) -> Result<Vec<PathBuf>, ExportFailure>;

    /// Exports UTM features given in `hemisphere` and `zone` into `path`.
    ///
    /// Fails before any geometry work if the feature list is empty, the file name has the wrong
    /// extension or the parameters cannot be parsed. Features that cannot be exported are skipped
    /// and reported in the returned [`ExportReport`].
    fn export(
        &self,
        features: &[Feature],
        path: &Path,
        hemisphere: &str,
        zone: &str,
    ) -> Result<ExportReport, ExportError> {
        check_request(self.format(), features, path)?;
        let params = UtmParams::parse(hemisphere, zone)?;
        let transform = UtmReprojector::new(params)?;
        self.export_with(features, path, params, &transform)
    }

    /// Same as [`Exporter::export`] with already parsed parameters and a custom transform.
    fn export_with(
        &self,
        features: &[Feature],
        path: &Path,
        params: UtmParams,
        transform: &dyn CoordinateTransform,
    ) -> Result<ExportReport, ExportError> {
        check_request(self.format(), features, path)?;

        let mut diagnostics = Diagnostics::new();
        let document = DocumentBuilder::new(params, transform).build(features, &mut diagnostics);
        let files = self
            .write(&document, path)
            .map_err(|source| ExportError::ExportFailed {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            "Exported {} of {} features from EPSG:{} to {} file {path:?}",
            document.len(),
            features.len(),
            params.epsg(),
            self.format(),
        );

        Ok(ExportReport {
            format: self.format(),
            files,
            exported: document.len(),
            warnings: diagnostics.into_warnings(),
        })
    }
}

/// Exports features in the given format. See [`Exporter::export`].
pub fn export(
    format: ExportFormat,
    features: &[Feature],
    path: &Path,
    hemisphere: &str,
    zone: &str,
) -> Result<ExportReport, ExportError> {
    exporter(format).export(features, path, hemisphere, zone)
}

/// Returns the exporter for the format.
pub fn exporter(format: ExportFormat) -> &'static dyn Exporter {
    match format {
        ExportFormat::Kml => &KmlExporter,
        ExportFormat::Kmz => &KmzExporter,
        ExportFormat::Shapefile => &ShapefileExporter,
    }
}

/// Checks the parts of an export request that do not depend on coordinates.
pub(crate) fn check_request(
    format: ExportFormat,
    features: &[Feature],
    path: &Path,
) -> Result<(), ExportError> {
    if features.is_empty() {
        return Err(ExportError::InvalidArgument(
            "no features to export".to_string(),
        ));
    }

    if !format.matches_path(path) {
        return Err(ExportError::InvalidArgument(format!(
            "file name {path:?} must have the .{} extension",
            format.extension()
        )));
    }

    Ok(())
}

/// Writes the contents into a temporary sibling file and moves it over `path`, so readers never
/// see a partially written file.
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut tmp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, contents)?;
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use assert_matches::assert_matches;
    use geoexport_types::cartesian::Point2d;
    use geoexport_types::geo::{GeoPoint2d, Hemisphere, NewGeoPoint, UtmZone};

    use super::*;
    use crate::error::ProjectionError;

    /// Creates an empty directory under `target/` for a test writing files.
    pub(crate) fn test_dir(name: &str) -> PathBuf {
        let dir = PathBuf::from("target/export-tests").join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("failed to create test directory");
        dir
    }

    pub(crate) fn scale(x: f64, y: f64) -> Result<GeoPoint2d, ProjectionError> {
        if x >= 1_000_000.0 {
            return Err(ProjectionError::OutOfDomain { x, y });
        }
        Ok(GeoPoint2d::lonlat(x / 100_000.0, y / 100_000.0))
    }

    pub(crate) fn params() -> UtmParams {
        UtmParams::new(Hemisphere::North, UtmZone::new(18).expect("valid zone"))
    }

    #[test]
    fn format_from_path() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out.KML")),
            Some(ExportFormat::Kml)
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("dir/out.kmz")),
            Some(ExportFormat::Kmz)
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("out.Shp")),
            Some(ExportFormat::Shapefile)
        );
        assert_eq!(ExportFormat::from_path(Path::new("out.txt")), None);
        assert_eq!(ExportFormat::from_path(Path::new("kml")), None);
    }

    #[test]
    fn format_from_str() {
        assert_eq!("KMZ".parse::<ExportFormat>().ok(), Some(ExportFormat::Kmz));
        assert_eq!(
            "shapefile".parse::<ExportFormat>().ok(),
            Some(ExportFormat::Shapefile)
        );
        assert_matches!(
            "gpx".parse::<ExportFormat>(),
            Err(ExportError::InvalidArgument(_))
        );
    }

    #[test]
    fn empty_feature_list_is_rejected_by_every_format() {
        for format in ExportFormat::ALL {
            let path = PathBuf::from(format!("never-written.{}", format.extension()));
            assert_matches!(
                export(format, &[], &path, "North", "18"),
                Err(ExportError::InvalidArgument(_)),
                "{format}"
            );
            assert!(!path.exists());
        }
    }

    #[test]
    fn wrong_extension_is_rejected_before_parameters() {
        let features = vec![Feature::point(1, Point2d::new(500_000.0, 4_000_000.0))];
        for format in ExportFormat::ALL {
            assert_matches!(
                export(format, &features, Path::new("out.txt"), "West", "99"),
                Err(ExportError::InvalidArgument(_)),
                "{format}"
            );
        }
    }

    #[test]
    fn point_in_zone_18_north() {
        let features = vec![Feature::point(1, Point2d::new(500_000.0, 4_000_000.0))];
        let dir = test_dir("point_in_zone_18_north");
        let path = dir.join("out.kml");

        let report =
            export(ExportFormat::Kml, &features, &path, "north", "18").expect("export failed");
        assert_eq!(report.exported, 1);

        let kml = fs::read_to_string(&path).expect("not written");
        assert!(kml.contains("<name>1</name>"));
        assert!(kml.contains("Zone: 18 (North)"));
        assert!(kml.contains("<coordinates>-75.000000,36.1447"));
    }

    #[test]
    fn invalid_zone() {
        let features = vec![Feature::point(1, Point2d::new(500_000.0, 4_000_000.0))];
        let dir = test_dir("invalid_zone");
        let result = export(
            ExportFormat::Kml,
            &features,
            &dir.join("out.kml"),
            "North",
            "99",
        );

        assert_matches!(result, Err(ExportError::InvalidParameter(message)) => {
            assert!(message.contains("99"));
            assert!(message.contains("out of range"));
        });
        assert!(!dir.join("out.kml").exists());
    }

    #[test]
    fn invalid_hemisphere() {
        let features = vec![Feature::point(1, Point2d::new(500_000.0, 4_000_000.0))];
        assert_matches!(
            export(
                ExportFormat::Kml,
                &features,
                Path::new("target/export-tests/never.kml"),
                "East",
                "18"
            ),
            Err(ExportError::InvalidParameter(_))
        );
    }

    #[test]
    fn write_failure_is_wrapped() {
        let features = vec![Feature::point(1, Point2d::new(500_000.0, 4_000_000.0))];
        let path = PathBuf::from("target/export-tests/missing-dir/nested/out.kml");
        let result = KmlExporter.export_with(&features, &path, params(), &scale);

        assert_matches!(
            result,
            Err(ExportError::ExportFailed { path: failed, source: ExportFailure::Io(_) }) => {
                assert_eq!(failed, path);
            }
        );
    }

    #[test]
    fn report_counts_skipped_features() {
        let features = vec![
            Feature::point(1, Point2d::new(500_000.0, 4_000_000.0)),
            Feature::point(2, Point2d::new(2_000_000.0, 4_000_000.0)),
            Feature::polyline(
                3,
                vec![
                    Point2d::new(500_000.0, 4_000_000.0),
                    Point2d::new(f64::NAN, 4_000_100.0),
                    Point2d::new(500_200.0, 4_000_200.0),
                ],
            )
            .expect("valid polyline"),
        ];
        let dir = test_dir("report_counts_skipped_features");

        let report = KmlExporter
            .export_with(&features, &dir.join("out.kml"), params(), &scale)
            .expect("export failed");

        assert_eq!(report.format, ExportFormat::Kml);
        assert_eq!(report.files, vec![dir.join("out.kml")]);
        assert_eq!(report.exported, 2);
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(report.skipped_features(), 1);
    }

    #[test]
    fn atomic_write_leaves_no_temporary_file() {
        let dir = test_dir("atomic_write_leaves_no_temporary_file");
        let path = dir.join("out.kml");

        write_atomically(&path, b"first").expect("write failed");
        write_atomically(&path, b"second").expect("overwrite failed");

        assert_eq!(fs::read(&path).expect("read failed"), b"second");
        assert!(!dir.join("out.kml.tmp").exists());
    }
}
