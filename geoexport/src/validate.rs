//! Per-kind geometry rules: minimum point counts and polygon ring closure.

use geoexport_types::cartesian::{CartesianPoint2d, Point2d};
use thiserror::Error;

use crate::feature::GeometryKind;

/// Violation of the point count rules of a geometry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryViolation {
    /// A point must have exactly one position.
    #[error("point must have exactly 1 coordinate, found {found}")]
    PointCount {
        /// Number of coordinates found.
        found: usize,
    },
    /// Not enough positions for the kind.
    #[error("{kind} requires at least {required} coordinates, found {found}")]
    TooFewPoints {
        /// Geometry kind.
        kind: GeometryKind,
        /// Minimum number of positions.
        required: usize,
        /// Number of positions found.
        found: usize,
    },
}

/// Checks the number of input coordinates of a geometry against the minimum of its kind.
pub fn check_count(kind: GeometryKind, count: usize) -> Result<(), GeometryViolation> {
    match kind {
        GeometryKind::Point if count != 1 => Err(GeometryViolation::PointCount { found: count }),
        _ if count < kind.min_coordinates() => Err(GeometryViolation::TooFewPoints {
            kind,
            required: kind.min_coordinates(),
            found: count,
        }),
        _ => Ok(()),
    }
}

/// Number of positions in the sequence not equal to any position before them.
pub fn distinct_count<P: CartesianPoint2d>(points: &[P]) -> usize {
    points
        .iter()
        .enumerate()
        .filter(|(index, point)| !points[..*index].iter().any(|earlier| earlier.equal(*point)))
        .count()
}

/// Checks that a polygon has enough distinct positions to enclose an area. Other kinds are
/// always accepted.
pub fn check_distinct<P: CartesianPoint2d>(
    kind: GeometryKind,
    points: &[P],
) -> Result<(), GeometryViolation> {
    if kind != GeometryKind::Polygon {
        return Ok(());
    }

    let found = distinct_count(points);
    if found < kind.min_coordinates() {
        return Err(GeometryViolation::TooFewPoints {
            kind,
            required: kind.min_coordinates(),
            found,
        });
    }

    Ok(())
}

/// Checks input coordinates of a geometry: their number and, for polygons, the number of distinct
/// positions before ring closure.
pub fn check_coordinates(kind: GeometryKind, points: &[Point2d]) -> Result<(), GeometryViolation> {
    check_count(kind, points.len())?;
    check_distinct(kind, points)
}

/// Checks the number of positions left after dropping invalid coordinates. Polygon rings must
/// have at least 4 positions including the closing one.
pub fn check_exported_count(kind: GeometryKind, count: usize) -> Result<(), GeometryViolation> {
    match kind {
        GeometryKind::Point if count != 1 => Err(GeometryViolation::PointCount { found: count }),
        _ if count < kind.min_exported_points() => Err(GeometryViolation::TooFewPoints {
            kind,
            required: kind.min_exported_points(),
            found: count,
        }),
        _ => Ok(()),
    }
}

/// Returns true if the first and the last positions of the sequence are equal.
pub fn is_closed<P: CartesianPoint2d>(points: &[P]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => first.equal(last),
        _ => false,
    }
}

/// Closes the ring by appending a copy of its first position, unless it is already closed.
pub fn close_ring<P: CartesianPoint2d + Clone>(points: &mut Vec<P>) {
    if !is_closed(points) {
        if let Some(first) = points.first().cloned() {
            points.push(first);
        }
    }
}

/// Normalizes raw coordinates of a feature for export.
///
/// Checks the raw point count and, for polygons, returns the closed ring. Coordinates are not
/// checked for being finite here, that happens per position when they are reprojected.
pub fn normalize(kind: GeometryKind, points: &[Point2d]) -> Result<Vec<Point2d>, GeometryViolation> {
    check_coordinates(kind, points)?;

    let mut normalized = points.to_vec();
    if kind == GeometryKind::Polygon {
        close_ring(&mut normalized);
        check_exported_count(kind, normalized.len())?;
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn p(x: f64, y: f64) -> Point2d {
        Point2d::new(x, y)
    }

    #[test]
    fn open_ring_is_closed() {
        let ring = normalize(
            GeometryKind::Polygon,
            &[p(0.0, 0.0), p(10.0, 0.0), p(5.0, 10.0)],
        )
        .expect("valid polygon");
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], ring[3]);
    }

    #[test]
    fn closed_ring_is_not_closed_twice() {
        let ring = normalize(
            GeometryKind::Polygon,
            &[p(0.0, 0.0), p(10.0, 0.0), p(5.0, 10.0), p(0.0, 0.0)],
        )
        .expect("valid polygon");
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn degenerate_closed_ring_is_rejected() {
        assert_matches!(
            normalize(GeometryKind::Polygon, &[p(0.0, 0.0), p(10.0, 0.0), p(0.0, 0.0)]),
            Err(GeometryViolation::TooFewPoints {
                kind: GeometryKind::Polygon,
                required: 3,
                found: 2
            })
        );
    }

    #[test]
    fn repeated_polygon_positions_are_not_counted() {
        assert_matches!(
            normalize(GeometryKind::Polygon, &[p(0.0, 0.0), p(0.0, 0.0), p(10.0, 0.0)]),
            Err(GeometryViolation::TooFewPoints {
                kind: GeometryKind::Polygon,
                required: 3,
                found: 2
            })
        );
        assert_eq!(
            distinct_count(&[p(0.0, 0.0), p(1.0, 0.0), p(0.0, 0.0), p(1.0, 1.0)]),
            3
        );
    }

    #[test]
    fn repeated_polyline_positions_are_accepted() {
        assert_eq!(
            check_coordinates(GeometryKind::Polyline, &[p(0.0, 0.0), p(0.0, 0.0)]),
            Ok(())
        );
    }

    #[test]
    fn polyline_is_not_closed() {
        let line = normalize(GeometryKind::Polyline, &[p(0.0, 0.0), p(10.0, 0.0), p(0.0, 5.0)])
            .expect("valid polyline");
        assert_eq!(line.len(), 3);
    }

    #[test]
    fn point_counts() {
        assert_eq!(check_count(GeometryKind::Point, 1), Ok(()));
        assert_matches!(
            check_count(GeometryKind::Point, 2),
            Err(GeometryViolation::PointCount { found: 2 })
        );
        assert_matches!(
            check_count(GeometryKind::Polyline, 1),
            Err(GeometryViolation::TooFewPoints { required: 2, .. })
        );
        assert_matches!(
            check_exported_count(GeometryKind::Polygon, 3),
            Err(GeometryViolation::TooFewPoints { required: 4, .. })
        );
    }

    #[test]
    fn nan_ring_start_is_never_considered_closed() {
        let mut ring = vec![p(f64::NAN, 0.0), p(1.0, 0.0), p(f64::NAN, 0.0)];
        close_ring(&mut ring);
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn violation_messages() {
        insta::assert_snapshot!(
            GeometryViolation::TooFewPoints { kind: GeometryKind::Polyline, required: 2, found: 1 },
            @"Polyline requires at least 2 coordinates, found 1"
        );
    }
}
