//! Error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Malformed input, rejected before any simulation work starts.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("grid has no cells")]
    EmptyGrid,

    #[error("row {row} has {found} values, expected {expected}")]
    NonRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("probability {value} at ({row}, {col}) is outside [0, 1]")]
    OutOfRange { row: usize, col: usize, value: f64 },

    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("expected 8 neighbor probabilities, got {0}")]
    NeighborCount(usize),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("shot count must be at least 1")]
    ZeroShots,

    #[error("history contains no generations")]
    EmptyHistory,

    #[error("generation {turn} is {found_rows}x{found_cols}, expected {rows}x{cols}")]
    DimensionMismatch {
        turn: usize,
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },
}

/// Errors raised while executing a circuit.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BackendError {
    #[error("circuit uses {signals} signals, backend capacity is {capacity}")]
    CapacityExceeded { signals: usize, capacity: usize },

    #[error("malformed circuit: {0}")]
    Malformed(String),
}

/// Top-level error for the simulator and its file collaborators.
#[derive(Debug, Error)]
pub enum QgolError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("cell ({row}, {col}) failed during turn {turn}: {source}")]
    CellFailed {
        turn: usize,
        row: usize,
        col: usize,
        #[source]
        source: BackendError,
    },

    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("history JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl QgolError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = QgolError> = std::result::Result<T, E>;
