use thiserror::Error;

use crate::features::FeatureCollection;

//=====================================================================
// Errors raised by the indexing and extrapolation engine. Every error
// is returned to the caller immediately, nothing is retried or
// partially applied.
//=====================================================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum XsError {
    // Declared lengths that cannot describe a valid structure
    #[error("{what}: expected {expected}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    // Pointer or isotope ordering that breaks the index layout
    #[error("Invalid reaction index: {0}")]
    InvalidIndex(String),

    // Array shapes that do not match what the structure was built for
    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    // Two index-bound structures built on different reaction indices
    #[error("Reaction indices do not conform")]
    StructuralMismatch,

    #[error("{0} not found")]
    NotFound(String),

    #[error("No data has been pushed, nothing to extrapolate from")]
    Uninitialized,

    #[error("Time {pushed} must be finite and greater than the previous time {previous}")]
    TimeNotIncreasing { previous: f64, pushed: f64 },

    #[error("Cannot build a linear combination from zero arrays")]
    EmptyCombination,

    #[error("Polynomial fit of order {order} over {points} points is singular")]
    SingularFit { order: usize, points: usize },

    #[error("Capacity must be positive, got {0}")]
    InvalidCapacity(usize),

    #[error("Cannot couple {provider} to {consumer}: {consumer} needs {needs}, {provider} has {has}, missing {missing}")]
    Incompatible {
        provider: String,
        consumer: String,
        needs: FeatureCollection,
        has: FeatureCollection,
        missing: FeatureCollection,
    },
}

pub type XsResult<T> = std::result::Result<T, XsError>;
