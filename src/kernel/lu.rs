//! Merged LU decomposition with partial pivoting.

use crate::entity::Field;
use equator::debug_assert;

/// Decomposes the square `(n, n)` store in place into merged left and right
/// triangular factors, pivoting rows by largest squared modulus, and
/// returns the determinant.
///
/// The diagonal belongs to the right factor; the left factor's diagonal is
/// one by definition. A zero pivot writes zero Frobenius elements and
/// continues, which drives the returned determinant to zero.
pub fn decompose<E: Field>(a: &mut E::Store, n: usize) -> E {
    debug_assert!(E::store_len(a) == n * n);
    let mut det = E::ONE;
    for k in 0..n {
        let mut piv = k;
        let mut abs = E::store_read(a, k * n + k).abs2();
        for i in k + 1..n {
            let t = E::store_read(a, i * n + k).abs2();
            if t > abs {
                piv = i;
                abs = t;
            }
        }
        if piv != k {
            det = det.neg();
            for j in 0..n {
                E::store_swap(a, k * n + j, piv * n + j);
            }
        }
        let pivot = E::store_read(a, k * n + k);
        det = det.mul(pivot);
        for i in k + 1..n {
            let factor = if abs != 0.0 {
                E::store_read(a, i * n + k).div(pivot)
            } else {
                E::ZERO
            };
            E::store_write(a, i * n + k, factor);
            for j in k + 1..n {
                let x = E::store_read(a, i * n + j).sub(factor.mul(E::store_read(a, k * n + j)));
                E::store_write(a, i * n + j, x);
            }
        }
    }
    det
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::c64;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn real_determinant() {
        // det [[4, 3], [6, 3]] = -6
        let mut a = vec![4.0, 3.0, 6.0, 3.0];
        assert_approx_eq!(decompose::<f64>(&mut a, 2), -6.0);
    }

    #[test]
    fn singular_matrix_has_zero_determinant() {
        let mut a = vec![1.0, 2.0, 2.0, 4.0];
        assert_eq!(decompose::<f64>(&mut a, 2), 0.0);
    }

    #[test]
    fn complex_determinant() {
        // det [[i, 0], [0, i]] = -1
        let mut a = (vec![0.0, 0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0, 1.0]);
        let det = decompose::<c64>(&mut a, 2);
        assert_approx_eq!(det.re, -1.0);
        assert_approx_eq!(det.im, 0.0);
    }

    #[test]
    fn empty_matrix_has_unit_determinant() {
        let mut a: Vec<f64> = vec![];
        assert_eq!(decompose::<f64>(&mut a, 0), 1.0);
    }
}
