//! Feature model: an identified geometry in UTM coordinates.

use std::fmt::{Display, Formatter};

use geoexport_types::cartesian::Point2d;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::validate::{self, GeometryViolation};

/// Identifier of a feature. Usually the row number of the coordinates table, but any label can be
/// used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FeatureId {
    /// Numeric id.
    Number(i64),
    /// Text label.
    Label(String),
}

impl Display for FeatureId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureId::Number(v) => write!(f, "{v}"),
            FeatureId::Label(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for FeatureId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        Self::Label(value.to_string())
    }
}

impl From<String> for FeatureId {
    fn from(value: String) -> Self {
        Self::Label(value)
    }
}

/// Kind of the geometry of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum GeometryKind {
    /// Single position.
    Point,
    /// Open line through two or more positions.
    Polyline,
    /// Area bounded by a closed ring.
    Polygon,
}

impl GeometryKind {
    /// Minimum number of coordinates a feature of this kind must be created with.
    pub fn min_coordinates(&self) -> usize {
        match self {
            GeometryKind::Point => 1,
            GeometryKind::Polyline => 2,
            GeometryKind::Polygon => 3,
        }
    }

    /// Minimum number of positions the exported geometry must have. For polygons this counts the
    /// closing position of the ring.
    pub fn min_exported_points(&self) -> usize {
        match self {
            GeometryKind::Point => 1,
            GeometryKind::Polyline => 2,
            GeometryKind::Polygon => 4,
        }
    }
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryKind::Point => write!(f, "Point"),
            GeometryKind::Polyline => write!(f, "Polyline"),
            GeometryKind::Polygon => write!(f, "Polygon"),
        }
    }
}

/// Geometry of a feature in UTM coordinates (easting, northing).
///
/// Polygon coordinates may be given with or without the closing position, the ring is closed
/// on export.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    /// Single position.
    Point(Point2d),
    /// Line through the positions in order.
    Polyline(Vec<Point2d>),
    /// Outer ring of a polygon.
    Polygon(Vec<Point2d>),
}

impl FeatureGeometry {
    /// Creates a geometry of the given kind, checking the number of coordinates.
    pub fn from_coordinates(
        kind: GeometryKind,
        coordinates: Vec<Point2d>,
    ) -> Result<Self, GeometryViolation> {
        validate::check_coordinates(kind, &coordinates)?;
        Ok(match kind {
            GeometryKind::Point => FeatureGeometry::Point(coordinates[0]),
            GeometryKind::Polyline => FeatureGeometry::Polyline(coordinates),
            GeometryKind::Polygon => FeatureGeometry::Polygon(coordinates),
        })
    }

    /// Kind of the geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            FeatureGeometry::Point(_) => GeometryKind::Point,
            FeatureGeometry::Polyline(_) => GeometryKind::Polyline,
            FeatureGeometry::Polygon(_) => GeometryKind::Polygon,
        }
    }

    /// Coordinates as given, without ring closure.
    pub fn coordinates(&self) -> &[Point2d] {
        match self {
            FeatureGeometry::Point(p) => std::slice::from_ref(p),
            FeatureGeometry::Polyline(points) | FeatureGeometry::Polygon(points) => points,
        }
    }
}

/// A feature to be exported.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: FeatureId,
    geometry: FeatureGeometry,
}

impl Feature {
    /// Creates a new feature, checking that the geometry has enough coordinates for its kind.
    pub fn new(id: impl Into<FeatureId>, geometry: FeatureGeometry) -> Result<Self, ExportError> {
        let id = id.into();
        if let Err(violation) =
            validate::check_coordinates(geometry.kind(), geometry.coordinates())
        {
            return Err(ExportError::InvalidGeometry { id, violation });
        }

        Ok(Self { id, geometry })
    }

    /// Creates a point feature.
    pub fn point(id: impl Into<FeatureId>, position: Point2d) -> Self {
        Self {
            id: id.into(),
            geometry: FeatureGeometry::Point(position),
        }
    }

    /// Creates a polyline feature.
    pub fn polyline(
        id: impl Into<FeatureId>,
        coordinates: Vec<Point2d>,
    ) -> Result<Self, ExportError> {
        Self::new(id, FeatureGeometry::Polyline(coordinates))
    }

    /// Creates a polygon feature.
    pub fn polygon(
        id: impl Into<FeatureId>,
        coordinates: Vec<Point2d>,
    ) -> Result<Self, ExportError> {
        Self::new(id, FeatureGeometry::Polygon(coordinates))
    }

    /// Id of the feature.
    pub fn id(&self) -> &FeatureId {
        &self.id
    }

    /// Geometry of the feature.
    pub fn geometry(&self) -> &FeatureGeometry {
        &self.geometry
    }

    /// Kind of the feature geometry.
    pub fn kind(&self) -> GeometryKind {
        self.geometry.kind()
    }

    /// Coordinates of the feature.
    pub fn coordinates(&self) -> &[Point2d] {
        self.geometry.coordinates()
    }
}
