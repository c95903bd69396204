use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Point on the surface of the Earth given by latitude and longitude.
pub trait GeoPoint {
    /// Numeric type used to represent coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;
}

/// Geographic point that can be constructed from its coordinates.
pub trait NewGeoPoint<N = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude in degrees.
    fn latlon(lat: N, lon: N) -> Self;

    /// Creates a point from longitude and latitude in degrees.
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }
}

/// 2d point on the surface of the Earth.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct GeoPoint2d {
    lat: f64,
    lon: f64,
}

impl GeoPoint for GeoPoint2d {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl NewGeoPoint<f64> for GeoPoint2d {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl GeoPoint2d {
    /// Returns true if the point is a valid WGS84 position: finite coordinates, latitude within
    /// `[-90, 90]` and longitude within `[-180, 180]`.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && self.lat.abs() <= 90.0
            && self.lon.abs() <= 180.0
    }
}

/// Creates a new GeoPoint2d from latitude and longitude values (in degrees).
///
/// ```
/// use geoexport_types::geo::GeoPoint;
/// use geoexport_types::latlon;
///
/// let point = latlon!(38.0, 52.0);
/// assert_eq!(point.lat(), 38.0);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        <$crate::geo::GeoPoint2d as $crate::geo::NewGeoPoint<f64>>::latlon($lat, $lon)
    };
}
