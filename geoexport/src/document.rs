//! Output document: placemarks with WGS84 geometries built from the features.
//!
//! The [`DocumentBuilder`] is the only place where features are validated and reprojected. All
//! exporters serialize the same [`Document`], so a feature is either written to every format or
//! skipped in every format with the same warnings.

use geoexport_types::cartesian::{CartesianPoint2d, Point2d};
use geoexport_types::geo::GeoPoint2d;
use log::debug;

use crate::diagnostics::{Diagnostics, WarningAction, WarningReason};
use crate::feature::{Feature, FeatureId, GeometryKind};
use crate::reproject::{CoordinateTransform, UtmParams};
use crate::validate;

/// Geometry of a placemark in geographic coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacemarkGeometry {
    /// Single position.
    Point(GeoPoint2d),
    /// Line through two or more positions.
    LineString(Vec<GeoPoint2d>),
    /// Polygon given by its closed outer ring.
    Polygon {
        /// Outer boundary, the first position is repeated as the last one.
        outer: Vec<GeoPoint2d>,
    },
}

impl PlacemarkGeometry {
    /// Kind of the source feature geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            PlacemarkGeometry::Point(_) => GeometryKind::Point,
            PlacemarkGeometry::LineString(_) => GeometryKind::Polyline,
            PlacemarkGeometry::Polygon { .. } => GeometryKind::Polygon,
        }
    }

    /// Positions of the geometry.
    pub fn positions(&self) -> &[GeoPoint2d] {
        match self {
            PlacemarkGeometry::Point(p) => std::slice::from_ref(p),
            PlacemarkGeometry::LineString(points) => points,
            PlacemarkGeometry::Polygon { outer } => outer,
        }
    }
}

/// One exported feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Placemark {
    /// Id of the source feature.
    pub id: FeatureId,
    /// Display name, the string form of the id.
    pub name: String,
    /// Human readable summary of the source coordinates.
    pub description: Option<String>,
    /// Reprojected geometry.
    pub geometry: PlacemarkGeometry,
}

/// Document with all placemarks that passed validation, in feature order.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    placemarks: Vec<Placemark>,
}

impl Document {
    /// Placemarks of the document.
    pub fn placemarks(&self) -> &[Placemark] {
        &self.placemarks
    }

    /// Number of placemarks.
    pub fn len(&self) -> usize {
        self.placemarks.len()
    }

    /// Returns true if no feature made it into the document.
    pub fn is_empty(&self) -> bool {
        self.placemarks.is_empty()
    }
}

/// Builds a [`Document`] from features, reprojecting every coordinate with the given transform.
pub struct DocumentBuilder<'a, T: ?Sized> {
    params: UtmParams,
    transform: &'a T,
}

impl<'a, T: CoordinateTransform + ?Sized> DocumentBuilder<'a, T> {
    /// Creates a builder. `params` are used for placemark descriptions, `transform` must convert
    /// coordinates of that hemisphere and zone.
    pub fn new(params: UtmParams, transform: &'a T) -> Self {
        Self { params, transform }
    }

    /// Builds the document. Problems with single features or coordinates are recorded in
    /// `diagnostics` and never abort the build.
    pub fn build(&self, features: &[Feature], diagnostics: &mut Diagnostics) -> Document {
        let placemarks: Vec<_> = features
            .iter()
            .filter_map(|feature| self.placemark(feature, diagnostics))
            .collect();

        debug!(
            "Built document with {} placemarks out of {} features",
            placemarks.len(),
            features.len()
        );

        Document { placemarks }
    }

    fn placemark(&self, feature: &Feature, diagnostics: &mut Diagnostics) -> Option<Placemark> {
        let id = feature.id();
        let coordinates = feature.coordinates();

        let Some(first) = coordinates.first() else {
            diagnostics.skip_feature(id, WarningReason::EmptyCoordinates);
            return None;
        };

        let description = if first.is_finite() {
            Some(self.description(first))
        } else {
            diagnostics.record(
                id,
                WarningAction::DescriptionOmitted,
                WarningReason::MalformedCoordinate,
            );
            None
        };

        let geometry = match feature.kind() {
            GeometryKind::Point => self.point(id, coordinates, diagnostics)?,
            GeometryKind::Polyline => PlacemarkGeometry::LineString(self.positions(
                id,
                GeometryKind::Polyline,
                coordinates,
                diagnostics,
            )?),
            GeometryKind::Polygon => PlacemarkGeometry::Polygon {
                outer: self.positions(id, GeometryKind::Polygon, coordinates, diagnostics)?,
            },
        };

        Some(Placemark {
            id: id.clone(),
            name: id.to_string(),
            description,
            geometry,
        })
    }

    fn description(&self, position: &Point2d) -> String {
        format!(
            "Zone: {} ({})\nEasting: {:.2} m\nNorthing: {:.2} m",
            self.params.zone,
            self.params.hemisphere,
            position.x(),
            position.y()
        )
    }

    fn point(
        &self,
        id: &FeatureId,
        coordinates: &[Point2d],
        diagnostics: &mut Diagnostics,
    ) -> Option<PlacemarkGeometry> {
        if let Err(violation) = validate::check_count(GeometryKind::Point, coordinates.len()) {
            diagnostics.skip_feature(id, WarningReason::Geometry(violation));
            return None;
        }

        let position = coordinates[0];
        if !position.is_finite() {
            diagnostics.skip_feature(id, WarningReason::MalformedCoordinate);
            return None;
        }

        match self.transform.apply(position.x(), position.y()) {
            Ok(projected) => Some(PlacemarkGeometry::Point(projected)),
            Err(err) => {
                diagnostics.skip_feature(id, WarningReason::Projection(err));
                None
            }
        }
    }

    /// Reprojects positions of a line or a polygon ring, dropping the ones that cannot be
    /// converted.
    fn positions(
        &self,
        id: &FeatureId,
        kind: GeometryKind,
        coordinates: &[Point2d],
        diagnostics: &mut Diagnostics,
    ) -> Option<Vec<GeoPoint2d>> {
        let normalized = match validate::normalize(kind, coordinates) {
            Ok(points) => points,
            Err(violation) => {
                diagnostics.skip_feature(id, WarningReason::Geometry(violation));
                return None;
            }
        };

        let mut accepted: Vec<Point2d> = Vec::with_capacity(normalized.len());
        let mut projected = Vec::with_capacity(normalized.len());
        for (index, position) in normalized.iter().enumerate() {
            if !position.is_finite() {
                diagnostics.drop_coordinate(id, index, WarningReason::MalformedCoordinate);
                continue;
            }

            match self.transform.apply(position.x(), position.y()) {
                Ok(geo) => {
                    accepted.push(*position);
                    projected.push(geo);
                }
                Err(err) => {
                    diagnostics.drop_coordinate(id, index, WarningReason::Projection(err))
                }
            }
        }

        // Dropping the first or last ring position leaves the ring open.
        if kind == GeometryKind::Polygon && !validate::is_closed(&accepted) {
            if let Some(first) = projected.first().copied() {
                projected.push(first);
            }
        }

        let counts = validate::check_exported_count(kind, projected.len())
            .and_then(|()| validate::check_distinct(kind, &accepted));
        if let Err(violation) = counts {
            diagnostics.skip_feature(id, WarningReason::Geometry(violation));
            return None;
        }

        Some(projected)
    }
}
