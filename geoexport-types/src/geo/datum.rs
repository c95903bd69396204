/// Reference ellipsoid of a geographic coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    name: &'static str,
    semimajor: f64,
    inv_flattening: f64,
}

impl Datum {
    /// World Geodetic System 1984.
    pub const WGS84: Self = Datum {
        name: "WGS84",
        semimajor: 6_378_137.0,
        inv_flattening: 298.257223563,
    };

    /// Ellipsoid name as understood by the projection backend.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Semi-major axis in meters.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Inverse flattening.
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }
}
