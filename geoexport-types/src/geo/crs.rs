use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(feature = "geodesy")]
use crate::cartesian::NewCartesianPoint2d;
use crate::error::GeoTypesError;
use crate::geo::datum::Datum;
#[cfg(feature = "geodesy")]
use crate::geo::point::NewGeoPoint;
#[cfg(feature = "geodesy")]
use crate::geo::projection::Projection;

/// Hemisphere of a UTM zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Hemisphere {
    /// Northern hemisphere (EPSG:326xx).
    North,
    /// Southern hemisphere (EPSG:327xx).
    South,
}

impl Hemisphere {
    fn epsg_base(&self) -> u32 {
        match self {
            Hemisphere::North => 32600,
            Hemisphere::South => 32700,
        }
    }
}

impl Display for Hemisphere {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Hemisphere::North => write!(f, "North"),
            Hemisphere::South => write!(f, "South"),
        }
    }
}

impl FromStr for Hemisphere {
    type Err = GeoTypesError;

    /// Parses a hemisphere name, ignoring case. `Norte` and `Sur` are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "north" | "n" | "norte" => Ok(Hemisphere::North),
            "south" | "s" | "sur" => Ok(Hemisphere::South),
            _ => Err(GeoTypesError::InvalidParameter(format!(
                "hemisphere '{s}' is not recognized, expected 'North' or 'South'"
            ))),
        }
    }
}

/// UTM zone number, guaranteed to be within `1..=60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct UtmZone(u8);

impl UtmZone {
    /// Smallest valid zone number.
    pub const MIN: u8 = 1;
    /// Largest valid zone number.
    pub const MAX: u8 = 60;

    /// Creates a zone, failing if the number is out of range.
    pub fn new(zone: i64) -> Result<Self, GeoTypesError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&zone) {
            Ok(Self(zone as u8))
        } else {
            Err(GeoTypesError::InvalidParameter(format!(
                "UTM zone {zone} is out of range, expected {}..={}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// Zone number.
    pub fn number(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for UtmZone {
    type Error = GeoTypesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value as i64)
    }
}

impl From<UtmZone> for u8 {
    fn from(value: UtmZone) -> Self {
        value.0
    }
}

impl Display for UtmZone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UtmZone {
    type Err = GeoTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let zone = s.trim().parse::<i64>().map_err(|_| {
            GeoTypesError::InvalidParameter(format!("UTM zone '{s}' is not an integer"))
        })?;
        Self::new(zone)
    }
}

/// Coordinate reference system.
#[derive(Debug, Clone, PartialEq)]
pub struct Crs {
    datum: Datum,
    projection_type: ProjectionType,
}

/// Projection used by a [`Crs`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum ProjectionType {
    /// Geographic coordinates, no projection.
    None,
    /// Universal Transverse Mercator.
    Utm {
        /// Zone number.
        zone: UtmZone,
        /// Hemisphere of the zone.
        hemisphere: Hemisphere,
    },
}

impl Crs {
    /// Geographic WGS84 coordinates (EPSG:4326).
    pub const WGS84: Crs = Crs {
        datum: Datum::WGS84,
        projection_type: ProjectionType::None,
    };

    /// WGS84 / UTM coordinate system for the given zone and hemisphere.
    pub fn utm(zone: UtmZone, hemisphere: Hemisphere) -> Self {
        Self {
            datum: Datum::WGS84,
            projection_type: ProjectionType::Utm { zone, hemisphere },
        }
    }

    /// EPSG code of the CRS: `4326` for WGS84, `32600 + zone` for northern and `32700 + zone`
    /// for southern UTM zones.
    pub fn epsg(&self) -> u32 {
        match self.projection_type {
            ProjectionType::None => 4326,
            ProjectionType::Utm { zone, hemisphere } => {
                hemisphere.epsg_base() + zone.number() as u32
            }
        }
    }

    /// Operator definition of the projection in `geodesy` syntax, if the CRS is projected.
    pub fn projection_definition(&self) -> Option<String> {
        match self.projection_type {
            ProjectionType::None => None,
            ProjectionType::Utm { zone, hemisphere } => {
                let mut definition = format!("utm zone={zone} ellps={}", self.datum.name());
                if hemisphere == Hemisphere::South {
                    definition.push_str(" south");
                }
                Some(definition)
            }
        }
    }

    /// Well-known text of a geographic CRS, as used in `.prj` files. Returns `None` for projected
    /// coordinate systems.
    pub fn geographic_wkt(&self) -> Option<String> {
        match self.projection_type {
            ProjectionType::None => Some(format!(
                "GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",SPHEROID[\"WGS_1984\",{:.1},{}]],PRIMEM[\"Greenwich\",0.0],UNIT[\"Degree\",0.0174532925199433]]",
                self.datum.semimajor(),
                self.datum.inv_flattening()
            )),
            ProjectionType::Utm { .. } => None,
        }
    }

    /// Returns the projection from geographic coordinates into this CRS.
    #[cfg(feature = "geodesy")]
    pub fn get_projection<In, Out>(
        &self,
    ) -> Result<Box<dyn Projection<InPoint = In, OutPoint = Out>>, GeoTypesError>
    where
        In: NewGeoPoint + 'static,
        Out: NewCartesianPoint2d + 'static,
    {
        match self.projection_definition() {
            Some(definition) => Ok(Box::new(
                crate::geo::geodesy::GeodesyProjection::<In, Out>::new(&definition)?,
            )),
            None => Err(GeoTypesError::NoProjection(self.epsg())),
        }
    }
}
