//! Points in projected (cartesian) coordinates.

pub use nalgebra::Point2;
use num_traits::Float;

/// Point in a projected coordinate system, e.g. UTM easting and northing in meters.
pub type Point2d = Point2<f64>;

/// Point with `x` and `y` cartesian coordinates.
pub trait CartesianPoint2d {
    /// Numeric type used to represent coordinates.
    type Num: Float;

    /// X coordinate (easting).
    fn x(&self) -> Self::Num;
    /// Y coordinate (northing).
    fn y(&self) -> Self::Num;

    /// Returns true if both coordinates are finite numbers.
    fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }

    /// Returns true if the point coordinates are exactly equal.
    fn equal(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> bool {
        self.x() == other.x() && self.y() == other.y()
    }

    /// Returns the squared euclidean distance to the `other` point.
    fn distance_sq(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Self::Num {
        let dx = self.x() - other.x();
        let dy = self.y() - other.y();
        dx * dx + dy * dy
    }
}

/// Cartesian point that can be constructed from its coordinates.
pub trait NewCartesianPoint2d<Num = f64>: CartesianPoint2d<Num = Num> {
    /// Creates a new point.
    fn new(x: Num, y: Num) -> Self;
}

impl<Num: Float + nalgebra::Scalar> CartesianPoint2d for Point2<Num> {
    type Num = Num;

    fn x(&self) -> Num {
        self.x
    }

    fn y(&self) -> Num {
        self.y
    }
}

impl<Num: Float + nalgebra::Scalar> NewCartesianPoint2d<Num> for Point2<Num> {
    fn new(x: Num, y: Num) -> Self {
        Point2::new(x, y)
    }
}
