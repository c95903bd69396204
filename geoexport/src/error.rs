//! Error types used by the crate.

use std::path::PathBuf;

use geoexport_types::GeoTypesError;
use thiserror::Error;

use crate::feature::FeatureId;
use crate::validate::GeometryViolation;

/// Error returned by the export pipeline.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The export request itself is wrong (no features, bad file name). Nothing was attempted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Hemisphere or zone could not be parsed. Nothing was attempted.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// The shared coordinate transform could not be created.
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),
    /// A feature violates the invariants of its geometry kind.
    #[error("invalid geometry of feature {id}: {violation}")]
    InvalidGeometry {
        /// Id of the rejected feature.
        id: FeatureId,
        /// What is wrong with the geometry.
        violation: GeometryViolation,
    },
    /// Writing the output failed.
    #[error("failed to export {path:?}: {source}")]
    ExportFailed {
        /// Path of the file being written.
        path: PathBuf,
        /// The cause.
        #[source]
        source: ExportFailure,
    },
}

impl From<GeoTypesError> for ExportError {
    fn from(value: GeoTypesError) -> Self {
        match value {
            GeoTypesError::InvalidParameter(message) => Self::InvalidParameter(message),
            other => Self::Projection(ProjectionError::Transform(other.to_string())),
        }
    }
}

/// Error of the coordinate transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// The transform could not be constructed.
    #[error("cannot create transform: {0}")]
    Transform(String),
    /// Input coordinate is not a pair of finite numbers.
    #[error("coordinate ({x}, {y}) is not finite")]
    NonFinite {
        /// Easting.
        x: f64,
        /// Northing.
        y: f64,
    },
    /// Input coordinate cannot be represented in the target coordinate system.
    #[error("coordinate ({x}, {y}) is outside of the projection domain")]
    OutOfDomain {
        /// Easting.
        x: f64,
        /// Northing.
        y: f64,
    },
}

/// Cause of an [`ExportError::ExportFailed`].
#[derive(Debug, Error)]
pub enum ExportFailure {
    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Error creating the KMZ archive.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// Error reported by the Shapefile writer.
    #[error("shapefile error: {0}")]
    Shapefile(String),
    /// No placemark survived validation, so there is nothing to write.
    #[error("no valid features to write")]
    NothingToWrite,
}

impl From<shapefile::Error> for ExportFailure {
    fn from(value: shapefile::Error) -> Self {
        Self::Shapefile(value.to_string())
    }
}
