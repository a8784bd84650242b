/// Errors raised while configuring or driving a chi-square test.
///
/// Only invalid configuration surfaces as an `Error`. Statistical and
/// numerical problems found while tabulating or evaluating (samples outside
/// the domain, negative densities, missing degrees of freedom, ...) are
/// recorded in the test's message log and failure flag instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the grid resolution is even.
    #[error("invalid resolution: res ({0}) must be odd")]
    EvenResolution(usize),

    /// Returned when fewer than two quadrature nodes per axis are requested.
    #[error("invalid quadrature resolution: ires ({0}) must be >= 2")]
    InvalidQuadratureResolution(usize),

    /// Returned when the sampler consumes no uniform variates, or more than
    /// the selected uniform source can provide.
    #[error("invalid sample dimension: {0}")]
    InvalidSampleDim(usize),

    /// Returned when the sample count is zero.
    #[error("sample count must be positive")]
    InvalidSampleCount,

    /// Returned when the tabulation batch size is zero.
    #[error("batch size must be positive")]
    InvalidBatchSize,

    /// Returned when the pooling threshold is not a finite positive number.
    #[error("invalid pooling threshold: {0} must be finite and positive")]
    InvalidPoolingThreshold(f64),

    /// Returned when a bounding rectangle is empty or not finite.
    #[error(
        "invalid bounds: min ({min_x}, {min_y}) must be strictly less than max ({max_x}, {max_y})"
    )]
    InvalidBounds {
        /// Lower x bound.
        min_x: f64,
        /// Lower y bound.
        min_y: f64,
        /// Upper x bound.
        max_x: f64,
        /// Upper y bound.
        max_y: f64,
    },

    /// Returned when a supplied table does not match the test's grid.
    #[error("grid mismatch: expected {expected} cells but got {got}")]
    GridMismatch {
        /// Cells in the test's grid.
        expected: usize,
        /// Cells in the supplied table.
        got: usize,
    },

    /// Returned when the significance level is not in the open interval (0, 1).
    #[error("invalid significance level: {0} must be in (0.0, 1.0)")]
    InvalidSignificanceLevel(f64),

    /// Returned when the number of combined tests is zero.
    #[error("test count must be positive")]
    InvalidTestCount,

    /// Returned when writing or reading a diagnostic dump fails.
    #[error("diagnostic dump error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = core::result::Result<T, Error>;
