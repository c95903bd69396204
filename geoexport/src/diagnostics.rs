//! Warnings about features and coordinates dropped during export.

use std::fmt::{Display, Formatter};

use log::warn;

use crate::error::ProjectionError;
use crate::feature::FeatureId;
use crate::validate::GeometryViolation;

/// What the exporter did about a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningAction {
    /// The whole feature was left out of the output.
    FeatureSkipped,
    /// A single coordinate was left out of the feature geometry.
    CoordinateDropped {
        /// Index of the coordinate in the feature (ring closure included for polygons).
        index: usize,
    },
    /// The placemark was written without a description.
    DescriptionOmitted,
}

/// Why the exporter had to drop something.
#[derive(Debug, Clone, PartialEq)]
pub enum WarningReason {
    /// The feature has no coordinates.
    EmptyCoordinates,
    /// The coordinate is not a pair of finite numbers.
    MalformedCoordinate,
    /// The coordinate could not be reprojected.
    Projection(ProjectionError),
    /// Not enough positions for the geometry kind.
    Geometry(GeometryViolation),
}

impl Display for WarningReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningReason::EmptyCoordinates => write!(f, "feature has no coordinates"),
            WarningReason::MalformedCoordinate => write!(f, "coordinate is not a pair of finite numbers"),
            WarningReason::Projection(err) => write!(f, "{err}"),
            WarningReason::Geometry(violation) => write!(f, "{violation}"),
        }
    }
}

/// A recoverable problem found while exporting a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    /// Feature the warning refers to.
    pub feature: FeatureId,
    /// What was dropped.
    pub action: WarningAction,
    /// Why it was dropped.
    pub reason: WarningReason,
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.action {
            WarningAction::FeatureSkipped => {
                write!(f, "feature {} skipped: {}", self.feature, self.reason)
            }
            WarningAction::CoordinateDropped { index } => write!(
                f,
                "coordinate {index} of feature {} dropped: {}",
                self.feature, self.reason
            ),
            WarningAction::DescriptionOmitted => write!(
                f,
                "description of feature {} omitted: {}",
                self.feature, self.reason
            ),
        }
    }
}

/// Collector of export warnings. Every recorded warning is also logged.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning.
    pub fn record(&mut self, feature: &FeatureId, action: WarningAction, reason: WarningReason) {
        let warning = Warning {
            feature: feature.clone(),
            action,
            reason,
        };
        warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Records that the feature was skipped.
    pub fn skip_feature(&mut self, feature: &FeatureId, reason: WarningReason) {
        self.record(feature, WarningAction::FeatureSkipped, reason);
    }

    /// Records that a coordinate was dropped.
    pub fn drop_coordinate(&mut self, feature: &FeatureId, index: usize, reason: WarningReason) {
        self.record(feature, WarningAction::CoordinateDropped { index }, reason);
    }

    /// All recorded warnings in the order they occurred.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of features left out of the output.
    pub fn skipped_features(&self) -> usize {
        self.count(|action| action == WarningAction::FeatureSkipped)
    }

    /// Number of coordinates left out of exported geometries.
    pub fn dropped_coordinates(&self) -> usize {
        self.count(|action| matches!(action, WarningAction::CoordinateDropped { .. }))
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Consumes the collector returning the warnings.
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    fn count(&self, predicate: impl Fn(WarningAction) -> bool) -> usize {
        self.warnings
            .iter()
            .filter(|warning| predicate(warning.action))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_action() {
        let mut diagnostics = Diagnostics::new();
        let id = FeatureId::from(3);
        diagnostics.drop_coordinate(&id, 1, WarningReason::MalformedCoordinate);
        diagnostics.drop_coordinate(&id, 2, WarningReason::MalformedCoordinate);
        diagnostics.skip_feature(&id, WarningReason::EmptyCoordinates);

        assert_eq!(diagnostics.skipped_features(), 1);
        assert_eq!(diagnostics.dropped_coordinates(), 2);
        assert_eq!(diagnostics.warnings().len(), 3);
    }

    #[test]
    fn warning_message() {
        let warning = Warning {
            feature: FeatureId::from("A"),
            action: WarningAction::CoordinateDropped { index: 4 },
            reason: WarningReason::Projection(ProjectionError::OutOfDomain {
                x: 99999999.0,
                y: 4000000.0,
            }),
        };
        insta::assert_snapshot!(
            warning,
            @"coordinate 4 of feature A dropped: coordinate (99999999, 4000000) is outside of the projection domain"
        );
    }
}
