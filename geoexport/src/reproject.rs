//! Conversion of UTM coordinates into WGS84 longitude and latitude.

use geoexport_types::cartesian::{CartesianPoint2d, Point2d};
use geoexport_types::geo::{
    Crs, GeoPoint, GeoPoint2d, Hemisphere, NewGeoPoint, Projection, UtmZone,
};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ProjectionError};

/// Maximum distance in meters between an input coordinate and the forward projection of its
/// inverse. Points further off are outside of the domain where the projection series converge.
const ROUND_TRIP_TOLERANCE: f64 = 0.01;

/// Hemisphere and zone the input coordinates are given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct UtmParams {
    /// Hemisphere.
    pub hemisphere: Hemisphere,
    /// Zone number.
    pub zone: UtmZone,
}

impl UtmParams {
    /// Creates new parameters.
    pub fn new(hemisphere: Hemisphere, zone: UtmZone) -> Self {
        Self { hemisphere, zone }
    }

    /// Parses hemisphere and zone as they come from the user interface, e.g. `("North", "18")`.
    pub fn parse(hemisphere: &str, zone: &str) -> Result<Self, ExportError> {
        let zone = zone.parse::<UtmZone>()?;
        let hemisphere = hemisphere.parse::<Hemisphere>()?;
        Ok(Self { hemisphere, zone })
    }

    /// Coordinate system of the input coordinates.
    pub fn crs(&self) -> Crs {
        Crs::utm(self.zone, self.hemisphere)
    }

    /// EPSG code of the input coordinate system.
    pub fn epsg(&self) -> u32 {
        self.crs().epsg()
    }
}

/// Transform of projected coordinates into geographic ones.
pub trait CoordinateTransform {
    /// Converts easting `x` and northing `y` into a geographic point.
    fn apply(&self, x: f64, y: f64) -> Result<GeoPoint2d, ProjectionError>;
}

impl<F> CoordinateTransform for F
where
    F: Fn(f64, f64) -> Result<GeoPoint2d, ProjectionError>,
{
    fn apply(&self, x: f64, y: f64) -> Result<GeoPoint2d, ProjectionError> {
        self(x, y)
    }
}

/// Transform from a WGS84 / UTM zone into WGS84 geographic coordinates (EPSG:4326).
///
/// ```
/// use geoexport::reproject::{CoordinateTransform, UtmReprojector};
/// use geoexport_types::geo::GeoPoint;
///
/// let reprojector = UtmReprojector::build("North", "18")?;
/// assert_eq!(reprojector.params().epsg(), 32618);
///
/// let position = reprojector.apply(500_000.0, 4_000_000.0)?;
/// assert!((position.lon() + 75.0).abs() < 1e-9);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct UtmReprojector {
    params: UtmParams,
    projection: Box<dyn Projection<InPoint = GeoPoint2d, OutPoint = Point2d>>,
}

impl UtmReprojector {
    /// Parses hemisphere and zone and creates the transform.
    ///
    /// Fails with [`ExportError::InvalidParameter`] if the hemisphere or zone are not valid, and
    /// with [`ExportError::Projection`] if the transform cannot be created.
    pub fn build(hemisphere: &str, zone: &str) -> Result<Self, ExportError> {
        Self::new(UtmParams::parse(hemisphere, zone)?)
    }

    /// Creates the transform for the given parameters.
    pub fn new(params: UtmParams) -> Result<Self, ExportError> {
        let crs = params.crs();
        let projection = crs.get_projection::<GeoPoint2d, Point2d>()?;
        debug!(
            "Created transform EPSG:{} -> EPSG:{}",
            crs.epsg(),
            Crs::WGS84.epsg()
        );

        Ok(Self { params, projection })
    }

    /// Hemisphere and zone of the transform.
    pub fn params(&self) -> UtmParams {
        self.params
    }
}

impl std::fmt::Debug for UtmReprojector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UtmReprojector")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl CoordinateTransform for UtmReprojector {
    fn apply(&self, x: f64, y: f64) -> Result<GeoPoint2d, ProjectionError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::NonFinite { x, y });
        }

        let input = Point2d::new(x, y);
        let out_of_domain = || ProjectionError::OutOfDomain { x, y };

        let position = self
            .projection
            .unproject(&input)
            .ok_or_else(out_of_domain)?;

        let round_trip = self.projection.project(&position).ok_or_else(out_of_domain)?;
        let distance = round_trip.distance_sq(&input).sqrt();
        if !(distance <= ROUND_TRIP_TOLERANCE) {
            debug!(
                "Inverse of ({x}, {y}) gives ({}, {}) which projects {distance} m away",
                position.lon(),
                position.lat()
            );
            return Err(out_of_domain());
        }

        let position = GeoPoint2d::latlon(position.lat(), wrap_longitude(position.lon()));
        if !position.is_valid() {
            return Err(out_of_domain());
        }

        Ok(position)
    }
}

/// Brings the longitude into `[-180, 180]`. Zones 1 and 60 may produce longitudes beyond the
/// antimeridian.
fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}
