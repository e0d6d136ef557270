use mmblock::verify::{Problem, close, pattern};
use mmblock::{
    HierarchicalBlocking, Kernel, Layout, Padding, matmul_blocked, matmul_hierarchical_with,
    matmul_reference,
};

const SIZES: [usize; 13] = [0, 1, 2, 3, 4, 5, 16, 17, 31, 64, 100, 257, 512];

fn test_inputs(layout: Layout) -> (Vec<f64>, Vec<f64>) {
    let b: Vec<f64> = (0..layout.len()).map(|i| ((i * 7) % 10) as f64 * 0.1 + 0.05).collect();
    let c: Vec<f64> = (0..layout.len()).map(|i| ((i * 3) % 11) as f64 * 0.1 + 0.05).collect();
    (b, c)
}

fn assert_matrices_close(expected: &[f64], actual: &[f64], layout: Layout, name: &str) {
    for i in 0..layout.n {
        for j in 0..layout.n {
            let at = layout.at(i, j);
            assert!(
                close(expected[at], actual[at]),
                "{}: mismatch at ({}, {}): expected {}, got {}",
                name,
                i,
                j,
                expected[at],
                actual[at]
            );
        }
    }
}

// ============================================================
// Identity × pattern, the driver scenario
// ============================================================

#[test]
fn test_identity_times_pattern_all_kernels() {
    for padding in [Padding::Identity, Padding::Rounded] {
        for n in SIZES {
            for kernel in Kernel::ALL {
                let mut problem = Problem::new(n, padding).unwrap();
                problem.run(kernel, 1);
                assert!(problem.check(), "{:?} {:?} n={}", kernel, padding, n);
            }
        }
    }
}

#[test]
fn test_repeated_runs_overwrite() {
    let mut problem = Problem::new(37, Padding::Rounded).unwrap();
    for kernel in Kernel::ALL {
        problem.run(kernel, 3);
        assert!(problem.check(), "{:?}", kernel);
    }
}

#[test]
fn test_degenerate_orders() {
    for kernel in Kernel::ALL {
        let mut a: Vec<f64> = Vec::new();
        kernel.multiply(&mut a, &[], &[], Layout::dense(0));
        assert!(a.is_empty());

        for padding in [Padding::Identity, Padding::Rounded] {
            let layout = Layout::new(1, padding);
            let mut a = vec![f64::NAN; layout.len()];
            let b = vec![3.0; layout.len()];
            let c = vec![-2.0; layout.len()];
            kernel.multiply(&mut a, &b, &c, layout);
            assert_eq!(a[0], -6.0, "{:?} {:?}", kernel, padding);
        }
    }
}

#[test]
fn test_driver_setup_is_deterministic() {
    for padding in [Padding::Identity, Padding::Rounded] {
        let first = Problem::new(19, padding).unwrap();
        let second = Problem::new(19, padding).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.c[first.layout.at(3, 8)], pattern(3, 8));
    }
}

// ============================================================
// Cross-kernel agreement
// ============================================================

#[test]
fn test_kernels_agree_with_reference() {
    for padding in [Padding::Identity, Padding::Rounded] {
        for n in [2, 7, 16, 33, 65, 130] {
            let layout = Layout::new(n, padding);
            let (b, c) = test_inputs(layout);

            let mut expected = vec![0.0; layout.len()];
            matmul_reference(&mut expected, &b, &c, layout);

            for kernel in Kernel::ALL {
                let mut actual = vec![f64::NAN; layout.len()];
                kernel.multiply(&mut actual, &b, &c, layout);
                assert_matrices_close(&expected, &actual, layout, &format!("{:?} n={}", kernel, n));
            }
        }
    }
}

#[test]
fn test_bitwise_determinism() {
    let layout = Layout::new(67, Padding::Rounded);
    let (b, c) = test_inputs(layout);
    for kernel in Kernel::ALL {
        let mut first = vec![0.0; layout.len()];
        let mut second = vec![1.0; layout.len()];
        kernel.multiply(&mut first, &b, &c, layout);
        kernel.multiply(&mut second, &b, &c, layout);
        for i in 0..layout.n {
            for j in 0..layout.n {
                let at = layout.at(i, j);
                assert_eq!(first[at].to_bits(), second[at].to_bits(), "{:?}", kernel);
            }
        }
    }
}

// ============================================================
// Remainder and block boundary tests
// ============================================================

#[test]
fn test_blocked_remainder_uses_padded_stride() {
    // n % 4 != 0 under rounded padding: rn != n, and the reduction remainder
    // must walk rows with rn.
    for n in [5, 6, 7, 9, 10, 11, 13, 18] {
        let layout = Layout::new(n, Padding::Rounded);
        assert_ne!(layout.rn, n);
        let (b, c) = test_inputs(layout);

        let mut expected = vec![0.0; layout.len()];
        let mut actual = vec![0.0; layout.len()];
        matmul_reference(&mut expected, &b, &c, layout);
        matmul_blocked(&mut actual, &b, &c, layout);

        assert_matrices_close(&expected, &actual, layout, &format!("blocked n={}", n));
    }
}

#[test]
fn test_hierarchical_block_sizes_do_not_change_result() {
    let layout = Layout::new(45, Padding::Rounded);
    let (b, c) = test_inputs(layout);
    let mut expected = vec![0.0; layout.len()];
    matmul_reference(&mut expected, &b, &c, layout);

    for (jb, kb) in [(1, 1), (2, 3), (16, 16), (44, 9), (45, 45), (64, 100)] {
        let mut actual = vec![f64::NAN; layout.len()];
        matmul_hierarchical_with(&mut actual, &b, &c, layout, HierarchicalBlocking { jb, kb });
        assert_matrices_close(&expected, &actual, layout, &format!("jb={} kb={}", jb, kb));
    }
}

#[test]
fn test_vectorized_large_order_blocks() {
    // Above 512 the row and reduction blocks split (256 wide), and 515 leaves
    // both a partial block and three scalar edge columns.
    let n = 515;
    let mut problem = Problem::new(n, Padding::Identity).unwrap();
    problem.run(Kernel::Vectorized, 1);
    assert!(problem.check());
}

// ============================================================
// Padding transparency
// ============================================================

#[test]
fn test_padding_columns_are_never_read() {
    for n in [1, 3, 6, 17, 31, 50] {
        let layout = Layout::new(n, Padding::Rounded);
        let dense = Layout::new(n, Padding::Identity);
        let (b_dense, c_dense) = test_inputs(dense);

        // Copy the logical region into padded buffers whose padding is NaN.
        let mut b = vec![f64::NAN; layout.len()];
        let mut c = vec![f64::NAN; layout.len()];
        for i in 0..n {
            for j in 0..n {
                b[layout.at(i, j)] = b_dense[dense.at(i, j)];
                c[layout.at(i, j)] = c_dense[dense.at(i, j)];
            }
        }

        for kernel in Kernel::ALL {
            let mut padded = vec![0.0; layout.len()];
            let mut unpadded = vec![0.0; dense.len()];
            kernel.multiply(&mut padded, &b, &c, layout);
            kernel.multiply(&mut unpadded, &b_dense, &c_dense, dense);

            for i in 0..n {
                for j in 0..n {
                    let (p, u) = (padded[layout.at(i, j)], unpadded[dense.at(i, j)]);
                    assert!(!p.is_nan(), "{:?} n={} read padding at ({}, {})", kernel, n, i, j);
                    assert!(close(p, u), "{:?} n={} ({}, {}): {} vs {}", kernel, n, i, j, p, u);
                }
            }
        }
    }
}

#[test]
fn test_multiply_uses_build_padding() {
    let n = 10;
    let rn = Padding::build().stride(n);
    let b = vec![1.0; n * rn];
    let c = vec![0.5; n * rn];
    let mut a = vec![0.0; n * rn];

    mmblock::multiply(&mut a, &b, &c, n);

    for i in 0..n {
        for j in 0..n {
            assert_eq!(a[i * rn + j], 5.0);
        }
    }
}

#[test]
#[should_panic(expected = "A: expected at least")]
fn test_multiply_rejects_short_output() {
    let n = 8;
    let rn = Padding::build().stride(n);
    let b = vec![1.0; n * rn];
    let c = vec![1.0; n * rn];
    let mut a = vec![0.0; n * rn - 1];
    mmblock::multiply(&mut a, &b, &c, n);
}
