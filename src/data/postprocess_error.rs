use thiserror::Error;

/// Failures surfaced by model load or by a single frame.
///
/// Recoverable conditions (label count mismatch, degenerate boxes, NaN scores) never become errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PostprocessError {
    #[error("unsupported output layout: {0}")]
    UnsupportedLayout(String),

    #[error("expected 1 or 2 output tensors, got {0}")]
    OutputCount(usize),

    #[error("tensor shape {shape:?} holds {expected} values but buffer has {actual}")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no model loaded")]
    NotLoaded,

    #[error("post-processing worker is not running")]
    WorkerStopped,

    #[error("mask resize failed: {0}")]
    MaskResize(String),
}
