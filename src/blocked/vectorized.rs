//! Vectorized register-blocked GEMM with a transposed C panel.

use wide::f64x4;

use crate::kernels::register_tile::{Tile, XB, YB, tile_clipped};
use crate::matrix::padding::{LANES, Layout};
use crate::matrix::transpose::transpose_panel;

/// Column block, in vector columns (8 × 4 = 32 scalars).
pub const JB: usize = 8;
/// Reduction sub-block.
pub const KB: usize = 64;
/// Orders up to this use one row block covering the whole matrix.
pub const SINGLE_BLOCK_ORDER: usize = 512;
/// Row block for larger orders. The reduction block uses the same width.
pub const LARGE_ROW_BLOCK: usize = 4 * KB;
/// Vectors in the transposed scratch panel (16 KiB).
pub const PANEL_CAPACITY: usize = 512;

const _: () = assert!(JB * KB <= PANEL_CAPACITY, "C panel would overflow the scratch buffer");
const _: () = assert!(JB % YB == 0, "column block must hold whole register tiles");

/// Vectorized register-blocked matrix multiplication: A = B × C.
///
/// Blocks rows (`IB`), the reduction dimension (`KBB = IB`, then `KB`) and
/// vector columns (`JB`). For every column block and reduction sub-block the
/// matching part of C is transposed into a stack panel so the register tile
/// reads it with the reduction index as the fast dimension. Each 2×4-vector
/// tile is then prefetched, accumulated in registers, and stored into A:
/// overwritten on the sub-block starting at k = 0, added to on every later one.
///
/// Columns past the last whole vector (`4 * (n / 4)..n`) are finished by a
/// scalar pass, so no padding column of B or C is ever read.
///
/// # Arguments
///
/// * `a` - Output matrix, overwritten on columns `0..n`
/// * `b` - Left operand
/// * `c` - Right operand
/// * `layout` - Order and row stride shared by all three buffers
pub fn matmul_vectorized(a: &mut [f64], b: &[f64], c: &[f64], layout: Layout) {
    let Layout { n, rn } = layout;
    if n == 0 {
        return;
    }
    let ib = if n <= SINGLE_BLOCK_ORDER { n } else { LARGE_ROW_BLOCK };
    let kbb = ib;
    let nv = n / LANES;
    tracing::debug!(n, rn, ib, kb = KB, jb = JB, nv, "vectorized blocking");

    let mut panel = [f64x4::splat(0.0); PANEL_CAPACITY];

    for ii in (0..n).step_by(ib) {
        let ilim = (ii + ib).min(n);
        for kkk in (0..n).step_by(kbb) {
            let kklim = (kkk + kbb).min(n);
            for jj in (0..nv).step_by(JB) {
                let jlim = (jj + JB).min(nv);
                for kk in (kkk..kklim).step_by(KB) {
                    let klim = (kk + KB).min(kklim);
                    transpose_panel(c, rn, kk..klim, jj..jlim, &mut panel);

                    for i in (ii..ilim).step_by(XB) {
                        let xb = XB.min(ilim - i);
                        for j in (jj..jlim).step_by(YB) {
                            let yb = YB.min(jlim - j);
                            let t = Tile {
                                i,
                                jv: j,
                                panel_jv: jj,
                                kk,
                                koff: klim - kk,
                                first: kk == 0,
                            };
                            tile_clipped(a, b, &panel, rn, t, xb, yb);
                        }
                    }
                }
            }
        }
    }

    edge_columns(a, b, c, layout, nv * LANES);
}

/// Scalar dot products for the columns `j_start..n` no vector covers.
fn edge_columns(a: &mut [f64], b: &[f64], c: &[f64], layout: Layout, j_start: usize) {
    let Layout { n, rn } = layout;
    for i in 0..n {
        for j in j_start..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += b[i * rn + k] * c[k * rn + j];
            }
            a[i * rn + j] = sum;
        }
    }
}
