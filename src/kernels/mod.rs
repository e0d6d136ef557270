//! Microkernels for the inner loops of the blocked kernels.
//!
//! These compute small tiles of A from B and C. They're called by the
//! blocked kernels once the outer loops have picked which rows, columns and
//! reduction range a tile covers.
//!
//! Available kernels:
//! - `row_pair`: 2 rows × 4-way unrolled reduction, scalar
//! - `register_tile`: 2 rows × 4 vector columns of `f64x4` accumulators

pub mod register_tile;
pub mod row_pair;
