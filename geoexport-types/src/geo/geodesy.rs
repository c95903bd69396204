use std::marker::PhantomData;

use geodesy::prelude::*;

use crate::cartesian::NewCartesianPoint2d;
use crate::error::GeoTypesError;
use crate::geo::point::NewGeoPoint;
use crate::geo::projection::Projection;

/// Projection backed by an operator of the `geodesy` crate.
///
/// `project` runs the operator forward (geographic degrees into projected meters), `unproject`
/// runs it inverse. Points the operator cannot handle come out as `None`.
pub struct GeodesyProjection<In, Out> {
    context: Minimal,
    op: OpHandle,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> GeodesyProjection<In, Out> {
    /// Creates a projection from a `geodesy` operator definition, e.g. `utm zone=18`.
    pub fn new(definition: &str) -> Result<Self, GeoTypesError> {
        let mut context = Minimal::new();
        let op = context
            .op(definition)
            .map_err(|err| GeoTypesError::Projection {
                definition: definition.to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self {
            context,
            op,
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        })
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection
    for GeodesyProjection<In, Out>
{
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let mut data = [Coor2D::geo(input.lat(), input.lon())];
        self.context.apply(self.op, Fwd, &mut data).ok()?;

        if !data[0].0[0].is_finite() || !data[0].0[1].is_finite() {
            return None;
        }

        Some(Out::new(data[0].0[0], data[0].0[1]))
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let mut data = [Coor2D([input.x(), input.y()])];
        self.context.apply(self.op, Inv, &mut data).ok()?;

        if !data[0].0[0].is_finite() || !data[0].0[1].is_finite() {
            return None;
        }

        Some(In::latlon(
            data[0].0[1].to_degrees(),
            data[0].0[0].to_degrees(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::cartesian::Point2d;
    use crate::geo::{GeoPoint, GeoPoint2d};

    #[test]
    fn utm_central_meridian_round_trip() {
        let projection =
            GeodesyProjection::<GeoPoint2d, Point2d>::new("utm zone=18 ellps=WGS84")
                .expect("valid definition");

        let geo = projection
            .unproject(&Point2d::new(500_000.0, 4_000_000.0))
            .expect("inside the zone");
        assert_abs_diff_eq!(geo.lon(), -75.0, epsilon = 1e-9);
        assert_abs_diff_eq!(geo.lat(), 36.14, epsilon = 0.01);

        let projected = projection.project(&geo).expect("inside the zone");
        assert_abs_diff_eq!(projected.x, 500_000.0, epsilon = 1e-3);
        assert_abs_diff_eq!(projected.y, 4_000_000.0, epsilon = 1e-3);
    }

    #[test]
    fn southern_hemisphere_uses_false_northing() {
        let projection =
            GeodesyProjection::<GeoPoint2d, Point2d>::new("utm zone=19 ellps=WGS84 south")
                .expect("valid definition");

        let geo = projection
            .unproject(&Point2d::new(500_000.0, 10_000_000.0))
            .expect("on the equator");
        assert_abs_diff_eq!(geo.lon(), -69.0, epsilon = 1e-9);
        assert_abs_diff_eq!(geo.lat(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn invalid_definition() {
        let result = GeodesyProjection::<GeoPoint2d, Point2d>::new("no_such_operator zone=1");
        assert!(matches!(result, Err(GeoTypesError::Projection { .. })));
    }
}
