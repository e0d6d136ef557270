//! Cache-blocked kernels.
//!
//! These break the multiplication into row pairs, reduction chunks and
//! column blocks so the working set stays in L1/L2, then hand each tile to a
//! microkernel from [`crate::kernels`].
//!
//! Available implementations:
//! - `single_level`: row pairs with a 4-way unrolled reduction
//! - `hierarchical`: adds column and reduction blocks sized to the order
//! - `vectorized`: `f64x4` register tiles fed from a transposed C panel

pub mod hierarchical;
pub mod single_level;
pub mod vectorized;
