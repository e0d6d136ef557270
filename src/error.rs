//! Errors raised while setting up a verification run.
//!
//! The kernels themselves cannot fail.

use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A matrix buffer could not be allocated.
    #[error("failed to allocate {elements} f64 elements for a matrix")]
    Allocation {
        elements: usize,
        #[source]
        source: TryReserveError,
    },

    /// `n * rn` does not fit in `usize`.
    #[error("matrix of order {n} is too large to address")]
    SizeOverflow { n: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
