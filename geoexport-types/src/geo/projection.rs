/// Projection converts points from one coordinate system into another.
///
/// `project` goes from the "source" space (e.g. geographic coordinates) into the "target" space
/// (e.g. UTM meters), `unproject` does the opposite. Both return `None` if the point cannot be
/// represented in the other space.
pub trait Projection {
    /// Type of the input point.
    type InPoint;
    /// Type of the output point.
    type OutPoint;

    /// Projects a point from the source space into the target space.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Projects a point from the target space back into the source space.
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}
