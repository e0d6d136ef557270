use std::ops::Range;

use wide::f64x4;

use super::padding::LANES;

/// Transpose a sub-panel of C into vector-column-major order.
///
/// C is viewed as rows of 4-lane vectors: vector column `jv` of row `k` is
/// `c[k * rn + 4 * jv..][..4]`. The panel covering rows `ks` and vector
/// columns `jvs` is written so that what was one vector column becomes one
/// contiguous run of `ks.len()` vectors:
///
/// `panel[(jv - jvs.start) * ks.len() + (k - ks.start)] = C[k, jv]`
///
/// The accumulation loop then reads the reduction index with stride 1.
///
/// # Arguments
///
/// * `c` - Source matrix, row stride `rn`
/// * `panel` - Destination, must hold at least `ks.len() * jvs.len()` vectors
///
/// # Example
///
/// ```
/// use mmblock::matrix::transpose::transpose_panel;
/// use wide::f64x4;
///
/// // 2 rows × 8 columns, i.e. 2 rows × 2 vector columns
/// let c: Vec<f64> = (0..16).map(|x| x as f64).collect();
/// let mut panel = [f64x4::splat(0.0); 4];
///
/// transpose_panel(&c, 8, 0..2, 0..2, &mut panel);
///
/// let lanes: Vec<[f64; 4]> = panel.iter().map(|&v| v.into()).collect();
/// assert_eq!(lanes[0], [0.0, 1.0, 2.0, 3.0]);    // C[0, 0..4]
/// assert_eq!(lanes[1], [8.0, 9.0, 10.0, 11.0]);  // C[1, 0..4]
/// assert_eq!(lanes[2], [4.0, 5.0, 6.0, 7.0]);    // C[0, 4..8]
/// assert_eq!(lanes[3], [12.0, 13.0, 14.0, 15.0]);
/// ```
pub fn transpose_panel(
    c: &[f64],
    rn: usize,
    ks: Range<usize>,
    jvs: Range<usize>,
    panel: &mut [f64x4],
) {
    let koff = ks.len();
    for k in ks.clone() {
        let row = &c[k * rn..];
        for jv in jvs.clone() {
            let at = jv * LANES;
            panel[(jv - jvs.start) * koff + (k - ks.start)] =
                f64x4::from([row[at], row[at + 1], row[at + 2], row[at + 3]]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose_offset_panel() {
        // 4 rows, stride 12 (3 vector columns). Take rows 1..3, vector columns 1..3.
        let rn = 12;
        let c: Vec<f64> = (0..4 * rn).map(|x| x as f64).collect();
        let mut panel = [f64x4::splat(-1.0); 4];

        transpose_panel(&c, rn, 1..3, 1..3, &mut panel);

        let lanes: Vec<[f64; 4]> = panel.iter().map(|&v| v.into()).collect();
        assert_eq!(lanes[0], [16.0, 17.0, 18.0, 19.0]); // C[1, 4..8]
        assert_eq!(lanes[1], [28.0, 29.0, 30.0, 31.0]); // C[2, 4..8]
        assert_eq!(lanes[2], [20.0, 21.0, 22.0, 23.0]); // C[1, 8..12]
        assert_eq!(lanes[3], [32.0, 33.0, 34.0, 35.0]); // C[2, 8..12]
    }
}
