//! Row stride policy shared by every kernel.

/// Number of f64 lanes in the vector type used by the vectorized kernel.
/// Rounded padding aligns rows to this.
pub const LANES: usize = 4;

/// How the storage stride is derived from the logical order.
///
/// The default comes from the `rounded-padding` Cargo feature, so a whole
/// build agrees on one mode. Kernels never consult it themselves: they take a
/// [`Layout`] built from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Padding {
    /// `rn == n`
    Identity,
    /// `rn` is the smallest multiple of [`LANES`] that is `>= n`
    Rounded,
}

impl Padding {
    /// The mode selected at build time.
    pub const fn build() -> Self {
        if cfg!(feature = "rounded-padding") {
            Padding::Rounded
        } else {
            Padding::Identity
        }
    }

    /// Storage stride for a matrix of order `n`.
    pub const fn stride(self, n: usize) -> usize {
        match self {
            Padding::Identity => n,
            Padding::Rounded => n.next_multiple_of(LANES),
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::build()
    }
}

/// Logical order plus storage stride of an n×n row-major matrix.
///
/// Element (i, j) lives at `i * rn + j`. Columns `n..rn` are padding and no
/// kernel reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub n: usize,
    pub rn: usize,
}

impl Layout {
    pub const fn new(n: usize, padding: Padding) -> Self {
        Self {
            n,
            rn: padding.stride(n),
        }
    }

    /// Layout with no padding.
    pub const fn dense(n: usize) -> Self {
        Self { n, rn: n }
    }

    /// Elements a buffer must hold: `n * rn`.
    pub const fn len(&self) -> usize {
        self.n * self.rn
    }

    pub const fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline(always)]
    pub const fn at(&self, i: usize, j: usize) -> usize {
        i * self.rn + j
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_keeps_order() {
        for n in [0, 1, 3, 4, 17, 512] {
            assert_eq!(Padding::Identity.stride(n), n);
        }
    }

    #[test]
    fn rounded_goes_to_next_multiple_of_four() {
        let cases = [(0, 0), (1, 4), (2, 4), (3, 4), (4, 4), (5, 8), (17, 20), (256, 256), (257, 260)];
        for (n, rn) in cases {
            assert_eq!(Padding::Rounded.stride(n), rn, "n = {}", n);
        }
    }

    #[test]
    fn layout_indexing_uses_stride() {
        let layout = Layout::new(5, Padding::Rounded);
        assert_eq!(layout.rn, 8);
        assert_eq!(layout.len(), 40);
        assert_eq!(layout.at(2, 3), 19);
        assert!(Layout::dense(0).is_empty());
    }
}
