//! Coordinate primitives used by the `geoexport` crate.
//!
//! Two coordinate spaces are involved in every export:
//!
//! * projected UTM coordinates (easting and northing in meters), represented by the
//!   [`cartesian::Point2d`] type and the [`cartesian::CartesianPoint2d`] trait;
//! * geographic WGS84 coordinates (latitude and longitude in degrees), represented by
//!   [`geo::GeoPoint2d`] and the [`geo::GeoPoint`] trait.
//!
//! Conversion between the two goes through the [`geo::Projection`] trait. A projection for a
//! given coordinate system can be obtained from [`geo::Crs::get_projection`].

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod cartesian;
pub mod error;
pub mod geo;

pub use error::GeoTypesError;
