//! Scalar row-pair microkernel shared by the blocked kernels.
//!
//! `R` is the number of output rows handled together: 2 for the main loop,
//! 1 for the last row when n is odd. `rows` is always the slice of A holding
//! exactly those rows, `rows[r * rn + j]` being A[i + r, j].

use std::ops::Range;

/// Reduction unroll factor, matching the vector width.
pub const UNROLL: usize = 4;

/// Zero columns `cols` of each of the `R` rows.
#[inline(always)]
pub fn zero_rows<const R: usize>(rows: &mut [f64], rn: usize, cols: Range<usize>) {
    for r in 0..R {
        rows[r * rn + cols.start..r * rn + cols.end].fill(0.0);
    }
}

/// A[i+r, j] += Σ_{u<4} B[i+r, k+u] · C[k+u, j] for every r < R and j in `cols`.
///
/// The `R × 4` coefficients of B are loaded once and reused across the whole
/// column sweep.
#[inline(always)]
#[allow(clippy::too_many_arguments)]
pub fn unrolled_4<const R: usize>(
    rows: &mut [f64],
    b: &[f64],
    c: &[f64],
    rn: usize,
    i: usize,
    k: usize,
    cols: Range<usize>,
) {
    let mut coef = [[0.0f64; UNROLL]; R];
    for (r, row) in coef.iter_mut().enumerate() {
        let at = (i + r) * rn + k;
        row.copy_from_slice(&b[at..at + UNROLL]);
    }

    let c0 = &c[k * rn..];
    let c1 = &c[(k + 1) * rn..];
    let c2 = &c[(k + 2) * rn..];
    let c3 = &c[(k + 3) * rn..];

    for j in cols {
        for (r, bk) in coef.iter().enumerate() {
            let out = &mut rows[r * rn + j];
            let mut s = *out;
            s += bk[0] * c0[j];
            s += bk[1] * c1[j];
            s += bk[2] * c2[j];
            s += bk[3] * c3[j];
            *out = s;
        }
    }
}

/// Plain one-k-at-a-time update for the reduction indices `ks`.
#[inline(always)]
#[allow(clippy::too_many_arguments)]
pub fn remainder<const R: usize>(
    rows: &mut [f64],
    b: &[f64],
    c: &[f64],
    rn: usize,
    i: usize,
    ks: Range<usize>,
    cols: Range<usize>,
) {
    for k in ks {
        let c_row = &c[k * rn..];
        for r in 0..R {
            let coef = b[(i + r) * rn + k];
            for j in cols.clone() {
                rows[r * rn + j] += coef * c_row[j];
            }
        }
    }
}

/// Run [`unrolled_4`] over every full group of four in `ks`, then
/// [`remainder`] over what is left. Every k in `ks` is counted exactly once.
#[inline(always)]
#[allow(clippy::too_many_arguments)]
pub fn accumulate<const R: usize>(
    rows: &mut [f64],
    b: &[f64],
    c: &[f64],
    rn: usize,
    i: usize,
    ks: Range<usize>,
    cols: Range<usize>,
) {
    let k_main = ks.start + (ks.len() / UNROLL) * UNROLL;
    for k in (ks.start..k_main).step_by(UNROLL) {
        unrolled_4::<R>(rows, b, c, rn, i, k, cols.clone());
    }
    remainder::<R>(rows, b, c, rn, i, k_main..ks.end, cols);
}
