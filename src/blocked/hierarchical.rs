//! Two-level blocked GEMM: column blocks, then reduction blocks, then row pairs.

use crate::kernels::row_pair::{accumulate, zero_rows};
use crate::matrix::padding::Layout;

/// Widest column block.
pub const MAX_COL_BLOCK: usize = 512;
/// Reduction block for large matrices.
pub const LARGE_RED_BLOCK: usize = 16;
/// Orders at or above this use [`LARGE_RED_BLOCK`].
pub const LARGE_ORDER: usize = 256;
/// Working-set budget for small matrices: `kb * jb ≈ 4 * RED_BUDGET`.
const RED_BUDGET: usize = 1024;

/// Block sizes for [`matmul_hierarchical_with`].
///
/// Any positive sizes give the same product. They only change which part of
/// A, B and C is hot in cache at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchicalBlocking {
    /// Output columns per column block.
    pub jb: usize,
    /// Reduction indices per reduction block.
    pub kb: usize,
}

impl HierarchicalBlocking {
    /// Adaptive sizes for order `n`.
    ///
    /// The column block is `min(n, 512)`. Large matrices use 16-wide
    /// reduction blocks. Small ones grow the reduction block as the column
    /// block shrinks, keeping `kb * jb` around 4K elements.
    pub fn for_order(n: usize) -> Self {
        let jb = n.clamp(1, MAX_COL_BLOCK);
        let kb = if n < LARGE_ORDER {
            4 * (RED_BUDGET / jb)
        } else {
            LARGE_RED_BLOCK
        };
        Self { jb, kb }
    }
}

/// Hierarchically blocked matrix multiplication with adaptive block sizes.
///
/// See [`matmul_hierarchical_with`].
pub fn matmul_hierarchical(a: &mut [f64], b: &[f64], c: &[f64], layout: Layout) {
    matmul_hierarchical_with(a, b, c, layout, HierarchicalBlocking::for_order(layout.n));
}

/// Hierarchically blocked matrix multiplication: A = B × C.
///
/// The outer loop walks column blocks of width `jb`. Inside it, the
/// reduction dimension is cut into blocks of width `kb`, and every row pair
/// is swept across one reduction block before moving to the next. So the row
/// pair's slice of A and the `kb` rows of C for the current column range stay
/// in cache together.
///
/// The columns of a row pair are zeroed when the first reduction block of a
/// column block is reached. Every later reduction block adds to them. Each
/// reduction block runs the unrolled row-pair microkernel on its full groups
/// of four and the scalar remainder on the rest. With the default sizes (a
/// multiple of 4) that remainder is only non-empty for the final block.
///
/// # Panics
///
/// Panics if `blocking.jb` or `blocking.kb` is zero.
pub fn matmul_hierarchical_with(
    a: &mut [f64],
    b: &[f64],
    c: &[f64],
    layout: Layout,
    blocking: HierarchicalBlocking,
) {
    assert!(blocking.jb > 0 && blocking.kb > 0, "block sizes must be positive: {:?}", blocking);
    let Layout { n, rn } = layout;
    let HierarchicalBlocking { jb, kb } = blocking;
    tracing::debug!(n, rn, jb, kb, "hierarchical blocking");

    for jj in (0..n).step_by(jb) {
        let jlim = (jj + jb).min(n);
        for kk in (0..n).step_by(kb) {
            let klim = (kk + kb).min(n);
            let first = kk == 0;

            let mut i = 0;
            while i + 2 <= n {
                let rows = &mut a[i * rn..(i + 2) * rn];
                if first {
                    zero_rows::<2>(rows, rn, jj..jlim);
                }
                accumulate::<2>(rows, b, c, rn, i, kk..klim, jj..jlim);
                i += 2;
            }
            if i < n {
                let rows = &mut a[i * rn..(i + 1) * rn];
                if first {
                    zero_rows::<1>(rows, rn, jj..jlim);
                }
                accumulate::<1>(rows, b, c, rn, i, kk..klim, jj..jlim);
            }
        }
    }
}
