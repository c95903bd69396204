//! Geometries in geographic coordinates (latitude and longitude) (see [`GeoPoint`]) and conversion
//! between projected and geographic coordinate systems (see [`Projection`]).

mod crs;
mod datum;
mod point;
mod projection;

#[cfg(feature = "geodesy")]
mod geodesy;

pub use crs::{Crs, Hemisphere, ProjectionType, UtmZone};
pub use datum::Datum;
#[cfg(feature = "geodesy")]
pub use geodesy::GeodesyProjection;
pub use point::{GeoPoint, GeoPoint2d, NewGeoPoint};
pub use projection::Projection;
