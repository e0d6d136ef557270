//! 2×4-vector register tile for the vectorized kernel.
//!
//! One tile covers `X` rows of A and `Y` vector columns (4 doubles each), so
//! the full 2×4 tile keeps 8 `f64x4` accumulators live across the reduction
//! loop: 2 × 16 = 32 output values.

use wide::f64x4;

use crate::matrix::padding::LANES;

/// Tile rows.
pub const XB: usize = 2;
/// Tile width in vector columns.
pub const YB: usize = 4;

/// Position of one tile within the current blocking step.
#[derive(Debug, Clone, Copy)]
pub struct Tile {
    /// First output row.
    pub i: usize,
    /// First vector column of the tile.
    pub jv: usize,
    /// First vector column of the panel the tile reads from.
    pub panel_jv: usize,
    /// First reduction index covered by the panel.
    pub kk: usize,
    /// Reduction indices in the panel.
    pub koff: usize,
    /// Overwrite A instead of adding to it. True for the sub-block starting at k = 0.
    pub first: bool,
}

/// Prefetch hint for the output tile: fetch into L1 with intent to write.
#[cfg(target_arch = "x86_64")]
const WRITE_HINT: i32 = std::arch::x86_64::_MM_HINT_ET0;

/// Hint that the cache line holding `data[at]` is about to be written.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
#[allow(unused_unsafe)]
fn prefetch(data: &[f64], at: usize) {
    use std::arch::x86_64::_mm_prefetch;
    let p = data.as_ptr().wrapping_add(at) as *const i8;
    // SAFETY: prefetch never faults and SSE is baseline on x86_64.
    unsafe { _mm_prefetch::<WRITE_HINT>(p) }
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
fn prefetch(_data: &[f64], _at: usize) {}

/// Computes an `X × Y` vector tile of A from rows of B and the transposed panel.
///
/// For each k in the panel, B[i+ui, k] is broadcast and multiplied with the
/// panel vector for tile column uj. The sums stay in registers until the
/// reduction loop ends, then are stored (`first`) or added into A.
///
/// # Arguments
///
/// * `a` - Output matrix, row stride `rn`
/// * `b` - Left operand, read untransposed
/// * `panel` - Transposed sub-panel of C, see [`transpose_panel`](crate::matrix::transpose::transpose_panel)
#[inline(always)]
pub fn tile<const X: usize, const Y: usize>(
    a: &mut [f64],
    b: &[f64],
    panel: &[f64x4],
    rn: usize,
    t: Tile,
) {
    // Two vectors per 64-byte line.
    for ui in 0..X {
        for uj in (0..Y).step_by(2) {
            prefetch(a, (t.i + ui) * rn + (t.jv + uj) * LANES);
        }
    }

    let mut sum = [[f64x4::splat(0.0); Y]; X];
    let rel = t.jv - t.panel_jv;
    for kr in 0..t.koff {
        for (ui, acc) in sum.iter_mut().enumerate() {
            let coef = f64x4::splat(b[(t.i + ui) * rn + t.kk + kr]);
            for (uj, s) in acc.iter_mut().enumerate() {
                *s = coef * panel[(rel + uj) * t.koff + kr] + *s;
            }
        }
    }

    for (ui, acc) in sum.iter().enumerate() {
        let row = (t.i + ui) * rn;
        for (uj, &s) in acc.iter().enumerate() {
            let at = row + (t.jv + uj) * LANES;
            let out = &mut a[at..at + LANES];
            let lanes: [f64; LANES] = s.into();
            if t.first {
                out.copy_from_slice(&lanes);
            } else {
                for (o, v) in out.iter_mut().zip(lanes) {
                    *o += v;
                }
            }
        }
    }
}

/// Dispatch to [`tile`] for a clipped tile of `xb` rows and `yb` vector columns.
///
/// Full tiles take the `XB × YB` instantiation. Edge tiles at the bottom or
/// right of a block use the smaller ones, so no lane past the block is touched.
#[inline(always)]
pub fn tile_clipped(
    a: &mut [f64],
    b: &[f64],
    panel: &[f64x4],
    rn: usize,
    t: Tile,
    xb: usize,
    yb: usize,
) {
    debug_assert!((1..=XB).contains(&xb) && (1..=YB).contains(&yb));
    match (xb, yb) {
        (2, 4) => tile::<2, 4>(a, b, panel, rn, t),
        (2, 3) => tile::<2, 3>(a, b, panel, rn, t),
        (2, 2) => tile::<2, 2>(a, b, panel, rn, t),
        (2, _) => tile::<2, 1>(a, b, panel, rn, t),
        (_, 4) => tile::<1, 4>(a, b, panel, rn, t),
        (_, 3) => tile::<1, 3>(a, b, panel, rn, t),
        (_, 2) => tile::<1, 2>(a, b, panel, rn, t),
        _ => tile::<1, 1>(a, b, panel, rn, t),
    }
}
