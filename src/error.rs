use thiserror::Error;

/// Top-level error type for the curvekit kernel.
#[derive(Debug, Error)]
pub enum CurvekitError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to curve modification operations.
///
/// These are contract violations: caller misuse or genuinely unimplemented
/// combinations. Data-quality problems (collapsed offsets, unreconcilable
/// fillets) are reported through the [`EventLog`](crate::log::EventLog)
/// instead and never surface as `Err`.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("curve fragments are disconnected and cannot be sorted into one chain")]
    DisconnectedCurves,

    #[error("{operation} does not support {curve} curves")]
    UnsupportedCurveType {
        operation: &'static str,
        curve: &'static str,
    },

    #[error("{operation} is not implemented for {curve}")]
    NotImplemented {
        operation: &'static str,
        curve: &'static str,
    },
}

/// Convenience type alias for results using [`CurvekitError`].
pub type Result<T> = std::result::Result<T, CurvekitError>;
