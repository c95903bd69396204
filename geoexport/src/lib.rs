//! Export of features given in UTM coordinates into KML, KMZ and Shapefile, reprojected to WGS84.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//! use geoexport::{ExportFormat, GeometryKind, FeatureStore, UtmParams};
//!
//! let params = UtmParams::parse("North", "18")?;
//! let mut store = FeatureStore::new(params);
//! store.add_feature(1, GeometryKind::Point, vec![geoexport::Point2d::new(500000.0, 4000000.0)])?;
//!
//! let report = store.export(ExportFormat::Kml, Path::new("points.kml"))?;
//! println!("exported {} features", report.exported);
//! # Ok::<(), geoexport::ExportError>(())
//! ```
//!
//! # How an export works
//!
//! Every export goes through the same steps, regardless of the output format:
//!
//! * the request is checked: there must be at least one feature and the file name must have the
//!   extension of the format. Hemisphere and zone are parsed into [`UtmParams`];
//! * a [`UtmReprojector`] is created once for the whole export;
//! * the [`DocumentBuilder`](document::DocumentBuilder) turns features into a
//!   [`Document`](document::Document) of placemarks in WGS84. Features and coordinates that cannot
//!   be converted are left out and recorded as [`Warning`]s instead of failing the export;
//! * an [`Exporter`] writes the document.
//!
//! The result is an [`ExportReport`] with the written files and all warnings.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod diagnostics;
pub mod document;
pub mod error;
pub mod export;
pub mod feature;
pub mod kml;
pub mod kmz;
pub mod reproject;
pub mod shp;
mod store;
pub mod validate;

pub use diagnostics::{Diagnostics, Warning, WarningAction, WarningReason};
pub use error::{ExportError, ExportFailure, ProjectionError};
pub use export::{export, ExportFormat, ExportReport, Exporter};
pub use feature::{Feature, FeatureGeometry, FeatureId, GeometryKind};
pub use kml::KmlExporter;
pub use kmz::KmzExporter;
pub use reproject::{CoordinateTransform, UtmParams, UtmReprojector};
pub use shp::ShapefileExporter;
pub use store::{FeatureStore, TableRow};

// Reexport geoexport_types
pub use geoexport_types;
pub use geoexport_types::cartesian::Point2d;
pub use geoexport_types::geo::{Hemisphere, UtmZone};
