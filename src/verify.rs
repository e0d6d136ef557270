//! Verification driver: a product whose answer is known in closed form.
//!
//! B is the identity and `C[i, j] = 1/√(i+1) + 1/√(j+1)`, so a correct
//! kernel leaves A equal to C. The pattern has no zeros and spans a few
//! orders of magnitude, which makes index mix-ups visible.

use crate::Kernel;
use crate::error::{Error, Result};
use crate::matrix::padding::{Layout, Padding};

/// Relative tolerance for [`close`].
pub const TOLERANCE: f64 = 0.001;

/// `|x - y| < 0.001 * (|x| + |y|)`
pub fn close(x: f64, y: f64) -> bool {
    (x - y).abs() < TOLERANCE * (x.abs() + y.abs())
}

/// The test pattern value stored at (i, j) of C.
pub fn pattern(i: usize, j: usize) -> f64 {
    1.0 / ((i + 1) as f64).sqrt() + 1.0 / ((j + 1) as f64).sqrt()
}

/// Allocate a zeroed buffer, reporting failure instead of aborting.
///
/// The buffer has `Vec<f64>` alignment (8 bytes), not cache-line alignment,
/// so padded rows are not guaranteed to start on a 64-byte boundary. The
/// kernels load vectors unaligned, so this costs speed only, never
/// correctness.
pub fn alloc_matrix(layout: Layout) -> Result<Vec<f64>> {
    let elements = layout
        .n
        .checked_mul(layout.rn)
        .ok_or(Error::SizeOverflow { n: layout.n })?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(elements)
        .map_err(|source| Error::Allocation { elements, source })?;
    buf.resize(elements, 0.0);
    Ok(buf)
}

/// Buffers for one verification run: output `a`, identity `b`, pattern `c`.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub layout: Layout,
    pub a: Vec<f64>,
    pub b: Vec<f64>,
    pub c: Vec<f64>,
}

impl Problem {
    /// Allocate and fill the inputs for order `n`.
    ///
    /// Only the logical `n × n` region is written. Padding stays zero.
    pub fn new(n: usize, padding: Padding) -> Result<Self> {
        let layout = Layout::new(n, padding);
        let a = alloc_matrix(layout)?;
        let mut b = alloc_matrix(layout)?;
        let mut c = alloc_matrix(layout)?;

        for i in 0..n {
            for j in 0..n {
                c[layout.at(i, j)] = pattern(i, j);
                b[layout.at(i, j)] = if i == j { 1.0 } else { 0.0 };
            }
        }

        Ok(Self { layout, a, b, c })
    }

    /// Run `kernel` `reps` times, each one overwriting `a`.
    pub fn run(&mut self, kernel: Kernel, reps: usize) {
        for _ in 0..reps {
            kernel.multiply(&mut self.a, &self.b, &self.c, self.layout);
        }
    }

    /// Whether every logical element of `a` is [`close`] to `c`.
    pub fn check(&self) -> bool {
        let Layout { n, .. } = self.layout;
        (0..n).all(|i| {
            (0..n).all(|j| {
                let at = self.layout.at(i, j);
                close(self.a[at], self.c[at])
            })
        })
    }

    /// Largest `|a - c| / (|a| + |c|)` over the logical region.
    pub fn max_relative_error(&self) -> f64 {
        let Layout { n, .. } = self.layout;
        let mut worst: f64 = 0.0;
        for i in 0..n {
            for j in 0..n {
                let at = self.layout.at(i, j);
                let (x, y) = (self.a[at], self.c[at]);
                let denom = x.abs() + y.abs();
                let err = if denom == 0.0 { 0.0 } else { (x - y).abs() / denom };
                worst = if err.is_nan() { f64::INFINITY } else { worst.max(err) };
            }
        }
        worst
    }
}
