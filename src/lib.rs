//! Square dense matrix multiplication, from a textbook loop up to a
//! vectorized register-blocked kernel.
//!
//! Every kernel computes the same thing, `A = B × C` for n×n row-major f64
//! matrices, and they differ only in loop order and blocking. Going from the
//! reference to the vectorized kernel it's: loop reordering, register
//! blocking with an unrolled reduction, cache blocking, and finally explicit
//! 4-lane vectors reading a transposed panel of C.
//!
//! ## Usage
//!
//! ```
//! use mmblock::{Kernel, Layout, Padding};
//!
//! let layout = Layout::new(101, Padding::Rounded); // row stride 104
//! let b = vec![1.0f64; layout.len()];
//! let c = vec![1.0f64; layout.len()];
//! let mut a = vec![0.0f64; layout.len()];
//!
//! Kernel::Vectorized.multiply(&mut a, &b, &c, layout);
//! assert_eq!(a[layout.at(3, 7)], 101.0);
//! ```
//!
//! Or let the build's padding mode and the fastest kernel be picked for you:
//!
//! ```
//! let n = 64;
//! let rn = mmblock::Padding::build().stride(n);
//! let b = vec![1.0f64; n * rn];
//! let c = vec![2.0f64; n * rn];
//! let mut a = vec![0.0f64; n * rn];
//!
//! mmblock::multiply(&mut a, &b, &c, n);
//! assert_eq!(a[0], 128.0);
//! ```
//!
//! ## What's inside
//!
//! - Reference i-j-k and row-accumulating i-k-j kernels
//! - Row-pair blocking with a 4-way unrolled reduction
//! - Column/reduction cache blocking sized to the matrix order
//! - 2×4 `f64x4` register tiles over a transposed C panel, with prefetch

pub mod blocked;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod verify;

pub use blocked::hierarchical::{HierarchicalBlocking, matmul_hierarchical, matmul_hierarchical_with};
pub use blocked::single_level::matmul_blocked;
pub use blocked::vectorized::matmul_vectorized;
pub use error::{Error, Result};
pub use matrix::padding::{Layout, Padding};
pub use matrix::reference::matmul_reference;
pub use matrix::row_accumulate::matmul_row_accumulate;

/// The kernel variants, slowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Kernel {
    /// i-j-k triple loop, one accumulator per output
    Reference,
    /// i-k-j loop, each output row built up in place
    RowAccumulate,
    /// Row pairs with a 4-way unrolled reduction
    Blocked,
    /// Column and reduction blocks around the row-pair microkernel
    Hierarchical,
    /// f64x4 register tiles over a transposed C panel
    #[default]
    Vectorized,
}

impl Kernel {
    pub const ALL: [Kernel; 5] = [
        Kernel::Reference,
        Kernel::RowAccumulate,
        Kernel::Blocked,
        Kernel::Hierarchical,
        Kernel::Vectorized,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kernel::Reference => "reference (i-j-k)",
            Kernel::RowAccumulate => "row accum (i-k-j)",
            Kernel::Blocked => "blocked 2x4",
            Kernel::Hierarchical => "hierarchical",
            Kernel::Vectorized => "vectorized f64x4",
        }
    }

    /// A = B × C with this kernel.
    ///
    /// All three buffers must hold at least `layout.len()` elements and
    /// share `layout`. Only columns `0..n` of B and C are read.
    pub fn multiply(self, a: &mut [f64], b: &[f64], c: &[f64], layout: Layout) {
        match self {
            Kernel::Reference => matmul_reference(a, b, c, layout),
            Kernel::RowAccumulate => matmul_row_accumulate(a, b, c, layout),
            Kernel::Blocked => matmul_blocked(a, b, c, layout),
            Kernel::Hierarchical => matmul_hierarchical(a, b, c, layout),
            Kernel::Vectorized => matmul_vectorized(a, b, c, layout),
        }
    }
}

/// Matrix multiply: A = B × C
///
/// Uses the build's padding mode ([`Padding::build`]) for the row stride and
/// the vectorized kernel. Matrices are n×n, row-major, with stride
/// `Padding::build().stride(n)`.
///
/// # Panics
///
/// Panics if a slice is shorter than `n * rn`.
pub fn multiply(a: &mut [f64], b: &[f64], c: &[f64], n: usize) {
    let layout = Layout::new(n, Padding::build());
    let len = layout.len();
    assert!(a.len() >= len, "A: expected at least {}x{}={} elements", n, layout.rn, len);
    assert!(b.len() >= len, "B: expected at least {}x{}={} elements", n, layout.rn, len);
    assert!(c.len() >= len, "C: expected at least {}x{}={} elements", n, layout.rn, len);

    Kernel::default().multiply(a, b, c, layout);
}
