//! Shapefile output. Each geometry kind goes into its own layer, since a shapefile holds shapes of
//! a single type.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use geoexport_types::geo::{Crs, GeoPoint, GeoPoint2d};
use log::debug;
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::record::EsriShape;
use shapefile::{Point, Polygon, PolygonRing, Polyline, Writer};

use crate::document::{Document, Placemark, PlacemarkGeometry};
use crate::error::ExportFailure;
use crate::export::{ExportFormat, Exporter};
use crate::feature::GeometryKind;

/// Name of the attribute column holding the feature id.
pub const ID_FIELD: &str = "id";
const ID_FIELD_LENGTH: u8 = 50;

/// Writes features into shapefile layers named `<stem>_points.shp`, `<stem>_linestrings.shp` and
/// `<stem>_polygons.shp` next to the requested path. Only layers with at least one feature are
/// written.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShapefileExporter;

impl Exporter for ShapefileExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Shapefile
    }

    fn write(&self, document: &Document, path: &Path) -> Result<Vec<PathBuf>, ExportFailure> {
        if document.is_empty() {
            return Err(ExportFailure::NothingToWrite);
        }

        let mut files = vec![];
        for kind in [
            GeometryKind::Point,
            GeometryKind::Polyline,
            GeometryKind::Polygon,
        ] {
            let placemarks: Vec<&Placemark> = document
                .placemarks()
                .iter()
                .filter(|placemark| placemark.geometry.kind() == kind)
                .collect();
            if placemarks.is_empty() {
                continue;
            }

            let layer_path = layer_path(path, kind)?;
            match kind {
                GeometryKind::Point => write_layer(&layer_path, &placemarks, point)?,
                GeometryKind::Polyline => write_layer(&layer_path, &placemarks, polyline)?,
                GeometryKind::Polygon => write_layer(&layer_path, &placemarks, polygon)?,
            }

            debug!(
                "Written {} features into layer {layer_path:?}",
                placemarks.len()
            );

            files.extend(
                ["shp", "shx", "dbf", "prj"]
                    .into_iter()
                    .map(|extension| layer_path.with_extension(extension)),
            );
        }

        Ok(files)
    }
}

/// Path of the layer holding features of the given kind.
pub fn layer_path(path: &Path, kind: GeometryKind) -> io::Result<PathBuf> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid file name"))?;
    let suffix = match kind {
        GeometryKind::Point => "points",
        GeometryKind::Polyline => "linestrings",
        GeometryKind::Polygon => "polygons",
    };

    Ok(path.with_file_name(format!("{stem}_{suffix}.shp")))
}

fn write_layer<S: EsriShape>(
    path: &Path,
    placemarks: &[&Placemark],
    to_shape: fn(&PlacemarkGeometry) -> Option<S>,
) -> Result<(), ExportFailure> {
    let id_field = FieldName::try_from(ID_FIELD)
        .map_err(|_| ExportFailure::Shapefile(format!("invalid field name '{ID_FIELD}'")))?;
    let table = TableWriterBuilder::new().add_character_field(id_field, ID_FIELD_LENGTH);

    let mut writer = Writer::from_path(path, table)?;
    for placemark in placemarks {
        let Some(shape) = to_shape(&placemark.geometry) else {
            continue;
        };

        let mut record = Record::default();
        record.insert(
            ID_FIELD.to_string(),
            FieldValue::Character(Some(placemark.name.clone())),
        );
        writer.write_shape_and_record(&shape, &record)?;
    }
    // Headers are finalized when the writer is dropped.
    drop(writer);

    let wkt = Crs::WGS84
        .geographic_wkt()
        .ok_or_else(|| ExportFailure::Shapefile("no WKT for the output CRS".to_string()))?;
    fs::write(path.with_extension("prj"), wkt)?;

    Ok(())
}

fn shape_point(position: &GeoPoint2d) -> Point {
    Point::new(position.lon(), position.lat())
}

fn point(geometry: &PlacemarkGeometry) -> Option<Point> {
    match geometry {
        PlacemarkGeometry::Point(position) => Some(shape_point(position)),
        _ => None,
    }
}

fn polyline(geometry: &PlacemarkGeometry) -> Option<Polyline> {
    match geometry {
        PlacemarkGeometry::LineString(positions) => Some(Polyline::new(
            positions.iter().map(shape_point).collect(),
        )),
        _ => None,
    }
}

fn polygon(geometry: &PlacemarkGeometry) -> Option<Polygon> {
    match geometry {
        PlacemarkGeometry::Polygon { outer } => Some(Polygon::new(PolygonRing::Outer(
            outer.iter().map(shape_point).collect(),
        ))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use geoexport_types::cartesian::Point2d;
    use shapefile::Shape;

    use super::*;
    use crate::error::ExportError;
    use crate::export::tests::{params, scale, test_dir};
    use crate::feature::Feature;

    fn read_ids(path: &Path) -> Vec<(Shape, String)> {
        shapefile::read(path)
            .expect("failed to read layer")
            .into_iter()
            .map(|(shape, record)| {
                let id = match record.get(ID_FIELD) {
                    Some(FieldValue::Character(Some(id))) => id.trim().to_string(),
                    other => panic!("unexpected id value {other:?}"),
                };
                (shape, id)
            })
            .collect()
    }

    #[test]
    fn layer_names() {
        let path = Path::new("out/survey.shp");
        assert_eq!(
            layer_path(path, GeometryKind::Point).expect("valid path"),
            Path::new("out/survey_points.shp")
        );
        assert_eq!(
            layer_path(path, GeometryKind::Polyline).expect("valid path"),
            Path::new("out/survey_linestrings.shp")
        );
        assert_eq!(
            layer_path(path, GeometryKind::Polygon).expect("valid path"),
            Path::new("out/survey_polygons.shp")
        );
    }

    #[test]
    fn layers_per_geometry_kind() {
        let features = vec![
            Feature::point(1, Point2d::new(500_000.0, 4_000_000.0)),
            Feature::point(2, Point2d::new(500_100.0, 4_000_100.0)),
            Feature::polygon(
                3,
                vec![
                    Point2d::new(500_000.0, 4_000_000.0),
                    Point2d::new(500_100.0, 4_000_000.0),
                    Point2d::new(500_050.0, 4_000_100.0),
                ],
            )
            .expect("valid polygon"),
        ];
        let dir = test_dir("layers_per_geometry_kind");

        let report = ShapefileExporter
            .export_with(&features, &dir.join("survey.shp"), params(), &scale)
            .expect("export failed");

        assert_eq!(report.exported, 3);
        assert_eq!(report.files.len(), 8);
        for file in &report.files {
            assert!(file.exists(), "{file:?} is not written");
        }
        assert!(!dir.join("survey_linestrings.shp").exists());
        assert!(!dir.join("survey.shp").exists());

        let points = read_ids(&dir.join("survey_points.shp"));
        assert_eq!(points.len(), 2);
        let (Shape::Point(point), id) = &points[0] else {
            panic!("first shape of the points layer is not a point");
        };
        assert_abs_diff_eq!(point.x, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(point.y, 40.0, epsilon = 1e-9);
        assert_eq!(id, "1");
        assert_eq!(points[1].1, "2");

        let polygons = read_ids(&dir.join("survey_polygons.shp"));
        assert_eq!(polygons.len(), 1);
        let (Shape::Polygon(polygon), id) = &polygons[0] else {
            panic!("shape of the polygons layer is not a polygon");
        };
        assert_eq!(polygon.rings().len(), 1);
        assert_eq!(polygon.rings()[0].points().len(), 4);
        assert_eq!(id, "3");

        let prj = fs::read_to_string(dir.join("survey_points.prj")).expect("no .prj file");
        assert!(prj.starts_with("GEOGCS[\"GCS_WGS_1984\""));
    }

    #[test]
    fn nothing_to_write() {
        let features = vec![Feature::point(1, Point2d::new(5_000_000.0, 4_000_000.0))];
        let dir = test_dir("nothing_to_write");
        let path = dir.join("survey.shp");

        assert_matches!(
            ShapefileExporter.export_with(&features, &path, params(), &scale),
            Err(ExportError::ExportFailed { source: ExportFailure::NothingToWrite, .. })
        );
        assert!(!dir.join("survey_points.shp").exists());
    }
}
