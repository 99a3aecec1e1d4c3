//! Square matrix inversion.

use crate::entity::Field;
use equator::debug_assert;

/// Inverts the square `(n, n)` store `src` into `dst` by Gauss-Jordan
/// elimination with partial pivoting (largest squared modulus). `src` is
/// preserved.
///
/// Returns `true` if the matrix was regular, `false` if it was singular;
/// in the singular case the contents of `dst` are unspecified.
pub fn invert<E: Field>(dst: &mut E::Store, src: &E::Store, n: usize) -> bool {
    debug_assert!(all(E::store_len(dst) == n * n, E::store_len(src) == n * n));
    let mut work = src.clone();

    E::store_fill(dst, E::ZERO);
    for i in 0..n {
        E::store_write(dst, i * n + i, E::ONE);
    }

    for k in 0..n {
        let mut piv = k;
        let mut abs = E::store_read(&work, k * n + k).abs2();
        for i in k + 1..n {
            let t = E::store_read(&work, i * n + k).abs2();
            if t > abs {
                piv = i;
                abs = t;
            }
        }
        if abs == 0.0 {
            return false;
        }
        if piv != k {
            for j in 0..n {
                E::store_swap(&mut work, k * n + j, piv * n + j);
                E::store_swap(dst, k * n + j, piv * n + j);
            }
        }

        let inv_pivot = E::ONE.div(E::store_read(&work, k * n + k));
        for j in 0..n {
            let w = E::store_read(&work, k * n + j).mul(inv_pivot);
            E::store_write(&mut work, k * n + j, w);
            let d = E::store_read(dst, k * n + j).mul(inv_pivot);
            E::store_write(dst, k * n + j, d);
        }

        for i in 0..n {
            if i == k {
                continue;
            }
            let factor = E::store_read(&work, i * n + k);
            if factor == E::ZERO {
                continue;
            }
            for j in 0..n {
                let w = E::store_read(&work, i * n + j)
                    .sub(factor.mul(E::store_read(&work, k * n + j)));
                E::store_write(&mut work, i * n + j, w);
                let d =
                    E::store_read(dst, i * n + j).sub(factor.mul(E::store_read(dst, k * n + j)));
                E::store_write(dst, i * n + j, d);
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::c64;
    use crate::entity::Entity;
    use crate::kernel::matmul;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn inverts_diagonal() {
        let src = vec![2.0, 0.0, 0.0, 2.0];
        let mut dst = vec![0.0; 4];
        assert!(invert::<f64>(&mut dst, &src, 2));
        assert_eq!(dst, vec![0.5, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn reports_singular() {
        let src = vec![1.0, 2.0, 2.0, 4.0];
        let mut dst = vec![0.0; 4];
        assert!(!invert::<f64>(&mut dst, &src, 2));
    }

    #[test]
    fn inverse_times_source_is_identity() {
        let src = vec![4.0, 7.0, 1.0, 2.0, 6.0, 0.0, 3.0, 5.0, 9.0];
        let mut inv = vec![0.0; 9];
        assert!(invert::<f64>(&mut inv, &src, 3));

        let mut prod = vec![0.0; 9];
        matmul::matmul::<f64>(&mut prod, &inv, &src, 3, 3, 3);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_approx_eq!(prod[i * 3 + j], expected, 1e-12);
            }
        }
    }

    #[test]
    fn complex_inverse() {
        // [[i, 0], [0, i]]^-1 = [[-i, 0], [0, -i]]
        let src = (vec![0.0, 0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0, 1.0]);
        let mut dst = <c64 as Entity>::store_zeroed(4);
        assert!(invert::<c64>(&mut dst, &src, 2));
        assert_approx_eq!(dst.1[0], -1.0);
        assert_approx_eq!(dst.1[3], -1.0);
        assert_approx_eq!(dst.0[0], 0.0);
    }
}
