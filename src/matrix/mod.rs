//! Matrix layout and the unblocked kernels.
//!
//! These provide the stride policy every kernel shares, the correctness
//! baseline, and the panel transpose used by the vectorized kernel.

pub mod padding;
pub mod reference;
pub mod row_accumulate;
pub mod transpose;
