//! Row-pair blocked GEMM with a 4-way unrolled reduction.

use crate::kernels::row_pair::{UNROLL, remainder, unrolled_4, zero_rows};
use crate::matrix::padding::Layout;

/// Single-level blocked matrix multiplication: A = B × C.
///
/// Works on two output rows at a time. For every group of four reduction
/// indices it loads the 2×4 coefficients of B once, then sweeps every column
/// of the row pair with them. Reduction lengths not divisible by 4 are
/// finished by a scalar remainder loop. A trailing odd row runs through the
/// same code instantiated for one row.
///
/// Both the unrolled loop and the remainder index with the padded stride.
///
/// # Arguments
///
/// * `a` - Output matrix, overwritten (padding columns are zeroed)
/// * `b` - Left operand
/// * `c` - Right operand
/// * `layout` - Order and row stride shared by all three buffers
pub fn matmul_blocked(a: &mut [f64], b: &[f64], c: &[f64], layout: Layout) {
    let Layout { n, rn } = layout;
    let k_main = n - n % UNROLL;

    let mut i = 0;
    while i + 2 <= n {
        row_block::<2>(&mut a[i * rn..(i + 2) * rn], b, c, layout, i, k_main);
        i += 2;
    }
    if i < n {
        row_block::<1>(&mut a[i * rn..(i + 1) * rn], b, c, layout, i, k_main);
    }
}

#[inline(always)]
fn row_block<const R: usize>(
    rows: &mut [f64],
    b: &[f64],
    c: &[f64],
    layout: Layout,
    i: usize,
    k_main: usize,
) {
    let Layout { n, rn } = layout;
    zero_rows::<R>(rows, rn, 0..rn);
    for k in (0..k_main).step_by(UNROLL) {
        unrolled_4::<R>(rows, b, c, rn, i, k, 0..n);
    }
    remainder::<R>(rows, b, c, rn, i, k_main..n, 0..n);
}
