use super::padding::Layout;

/// Row-accumulation matrix multiplication using i-k-j loop order.
///
/// By swapping the j and k loops, the innermost loop accesses both A and C
/// sequentially (stride 1). Each output row is zeroed and then built up one
/// reduction index at a time, so the row is re-read n times instead of
/// holding a running scalar.
///
/// # Arguments
///
/// * `a` - Output matrix, overwritten (padding columns of each row are zeroed)
/// * `b` - Left operand
/// * `c` - Right operand
/// * `layout` - Order and row stride shared by all three buffers
pub fn matmul_row_accumulate(a: &mut [f64], b: &[f64], c: &[f64], layout: Layout) {
    let Layout { n, rn } = layout;
    for i in 0..n {
        let row = &mut a[i * rn..(i + 1) * rn];
        row.fill(0.0);
        for k in 0..n {
            let coef = b[i * rn + k];
            let c_row = &c[k * rn..k * rn + n];
            for (out, &ckj) in row[..n].iter_mut().zip(c_row) {
                *out += coef * ckj;
            }
        }
    }
}
