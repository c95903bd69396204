//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoTypesError {
    /// A CRS parameter (hemisphere, zone) could not be parsed or is out of range.
    #[error("{0}")]
    InvalidParameter(String),
    /// The projection backend rejected the CRS definition.
    #[error("cannot create projection '{definition}': {reason}")]
    Projection {
        /// Definition string given to the projection backend.
        definition: String,
        /// Error reported by the backend.
        reason: String,
    },
    /// The CRS has no projection from geographic coordinates.
    #[error("CRS {0} has no projection")]
    NoProjection(u32),
}
