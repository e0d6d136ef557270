use super::padding::Layout;

/// Reference matrix multiplication: A = B × C, i-j-k loop order.
///
/// This is the textbook triple loop with one scalar accumulator per output
/// element. It's slow because the innermost loop walks C down a column
/// (stride `rn`), but it defines the result every other kernel is checked
/// against.
///
/// # Arguments
///
/// * `a` - Output matrix, overwritten (not accumulated into)
/// * `b` - Left operand
/// * `c` - Right operand
/// * `layout` - Order and row stride shared by all three buffers
pub fn matmul_reference(a: &mut [f64], b: &[f64], c: &[f64], layout: Layout) {
    let Layout { n, rn } = layout;
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += b[i * rn + k] * c[k * rn + j];
            }
            a[i * rn + j] = sum;
        }
    }
}
