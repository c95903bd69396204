//! Ordered collection of features sharing one UTM zone.

use std::path::Path;

use geoexport_types::cartesian::Point2d;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::export::{check_request, exporter, ExportFormat, ExportReport};
use crate::feature::{Feature, FeatureGeometry, FeatureId, GeometryKind};
use crate::reproject::{UtmParams, UtmReprojector};

/// One row of a coordinate table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TableRow {
    /// Row id.
    pub id: FeatureId,
    /// Easting.
    pub x: f64,
    /// Northing.
    pub y: f64,
}

impl TableRow {
    /// Creates a new row.
    pub fn new(id: impl Into<FeatureId>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
        }
    }
}

/// Features in the order they were added, all given in the same hemisphere and zone.
///
/// Features can only be appended or cleared all at once.
#[derive(Debug, Clone)]
pub struct FeatureStore {
    params: UtmParams,
    features: Vec<Feature>,
}

impl FeatureStore {
    /// Creates an empty store.
    pub fn new(params: UtmParams) -> Self {
        Self {
            params,
            features: vec![],
        }
    }

    /// Builds features from a coordinate table.
    ///
    /// For [`GeometryKind::Point`] every row becomes a point with the row id. A polyline and a
    /// polygon are created over all rows, if there are enough of them. Their ids continue after
    /// the largest numeric row id, or start at 1 if no points are created. Kinds the rows are not
    /// enough for are skipped with a warning.
    pub fn from_rows(
        params: UtmParams,
        rows: &[TableRow],
        kinds: &[GeometryKind],
    ) -> Result<Self, ExportError> {
        if kinds.is_empty() {
            return Err(ExportError::InvalidArgument(
                "no geometry kind selected".to_string(),
            ));
        }

        let mut store = Self::new(params);
        if rows.is_empty() {
            return Ok(store);
        }

        let coordinates: Vec<Point2d> = rows.iter().map(|row| Point2d::new(row.x, row.y)).collect();
        let mut next_id: i64 = 1;

        if kinds.contains(&GeometryKind::Point) {
            for row in rows {
                store.push(Feature::point(row.id.clone(), Point2d::new(row.x, row.y)));
            }

            next_id = rows
                .iter()
                .filter_map(|row| row.id.to_string().parse::<i64>().ok())
                .max()
                .map_or(1, |max| max.saturating_add(1));
        }

        for kind in [GeometryKind::Polyline, GeometryKind::Polygon] {
            if !kinds.contains(&kind) {
                continue;
            }

            if rows.len() < kind.min_coordinates() {
                warn!(
                    "{kind} requires at least {} rows, the table has {}",
                    kind.min_coordinates(),
                    rows.len()
                );
                continue;
            }

            match store.add_feature(next_id, kind, coordinates.clone()) {
                Ok(()) => next_id += 1,
                Err(err) => warn!("{kind} is not created from the table: {err}"),
            }
        }

        Ok(store)
    }

    /// Hemisphere and zone of the features.
    pub fn params(&self) -> UtmParams {
        self.params
    }

    /// Adds a feature at the end of the list. Fails with [`ExportError::InvalidGeometry`] if the
    /// number of coordinates does not fit the kind.
    pub fn add_feature(
        &mut self,
        id: impl Into<FeatureId>,
        kind: GeometryKind,
        coordinates: Vec<Point2d>,
    ) -> Result<(), ExportError> {
        let id = id.into();
        let geometry = FeatureGeometry::from_coordinates(kind, coordinates)
            .map_err(|violation| ExportError::InvalidGeometry {
                id: id.clone(),
                violation,
            })?;

        self.push(Feature::new(id, geometry)?);
        Ok(())
    }

    /// Adds an already constructed feature.
    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Removes all features.
    pub fn clear(&mut self) {
        self.features.clear();
    }

    /// Features in insertion order.
    pub fn list_features(&self) -> &[Feature] {
        &self.features
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true if the store has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Exports all features of the store.
    pub fn export(&self, format: ExportFormat, path: &Path) -> Result<ExportReport, ExportError> {
        check_request(format, &self.features, path)?;
        let transform = UtmReprojector::new(self.params)?;
        exporter(format).export_with(&self.features, path, self.params, &transform)
    }
}
