use thiserror::Error;

/// Top-level error type for the arealis CAG engine.
#[derive(Debug, Error)]
pub enum ArealisError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Numerical(#[from] NumericalError),
}

/// Errors related to invalid input geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("non-finite coordinate ({x}, {y}) in input segment")]
    NonFiniteCoordinate { x: f64, y: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to the planar topology store.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Numerical failures detected during the simplification pipeline.
///
/// These indicate that floating-point drift produced an inconsistent
/// intermediate state. The pipeline aborts rather than emit a corrupt shape.
#[derive(Debug, Error)]
pub enum NumericalError {
    #[error("winding propagation produced conflicting values across an edge")]
    WindingConflict,

    #[error("a face was unreachable during winding propagation")]
    UnreachableFace,

    #[error("half-edge has no boundary or face assigned after extraction")]
    MissingBoundary,

    #[error("boundary ray cast stayed indeterminate after {attempts} attempts")]
    IndeterminateRay { attempts: u32 },
}

/// Convenience type alias for results using [`ArealisError`].
pub type Result<T> = std::result::Result<T, ArealisError>;
