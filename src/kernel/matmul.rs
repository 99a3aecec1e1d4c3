//! Matrix product kernels.

use crate::entity::Entity;
use equator::debug_assert;

/// `dst = lhs * rhs` where `lhs` is `(m, k)`, `rhs` is `(k, n)` and `dst`
/// is `(m, n)`, all row-major.
pub fn matmul<E: Entity>(
    dst: &mut E::Store,
    lhs: &E::Store,
    rhs: &E::Store,
    m: usize,
    k: usize,
    n: usize,
) {
    debug_assert!(all(
        E::store_len(dst) == m * n,
        E::store_len(lhs) == m * k,
        E::store_len(rhs) == k * n
    ));
    for i in 0..m {
        for j in 0..n {
            let mut acc = E::ZERO;
            for p in 0..k {
                acc = acc.add(E::store_read(lhs, i * k + p).mul(E::store_read(rhs, p * n + j)));
            }
            E::store_write(dst, i * n + j, acc);
        }
    }
}

/// `dst = lhs * rhs` where `lhs` is `(m, k)` and `rhs`, `dst` are vectors
/// of lengths `k` and `m`.
pub fn matvec<E: Entity>(dst: &mut E::Store, lhs: &E::Store, rhs: &E::Store, m: usize, k: usize) {
    debug_assert!(all(
        E::store_len(dst) == m,
        E::store_len(lhs) == m * k,
        E::store_len(rhs) == k
    ));
    for i in 0..m {
        let mut acc = E::ZERO;
        for p in 0..k {
            acc = acc.add(E::store_read(lhs, i * k + p).mul(E::store_read(rhs, p)));
        }
        E::store_write(dst, i, acc);
    }
}

/// Unconjugated dot product of two vectors of the same length.
pub fn dot<E: Entity>(lhs: &E::Store, rhs: &E::Store) -> E {
    let n = E::store_len(lhs);
    debug_assert!(E::store_len(rhs) == n);
    let mut acc = E::ZERO;
    for i in 0..n {
        acc = acc.add(E::store_read(lhs, i).mul(E::store_read(rhs, i)));
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangular_product() {
        // (2x3) * (3x2) = (2x2)
        let lhs = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let rhs = vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        let mut dst = vec![0.0; 4];
        matmul::<f64>(&mut dst, &lhs, &rhs, 2, 3, 2);
        assert_eq!(dst, vec![58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn vector_product() {
        let lhs = vec![1.0, 2.0, 3.0, 4.0];
        let rhs = vec![1.0, -1.0];
        let mut dst = vec![0.0; 2];
        matvec::<f64>(&mut dst, &lhs, &rhs, 2, 2);
        assert_eq!(dst, vec![-1.0, -1.0]);
    }

    #[test]
    fn dot_product() {
        let lhs = vec![1i64, 2, 3];
        let rhs = vec![4i64, -5, 6];
        assert_eq!(dot::<i64>(&lhs, &rhs), 12);
    }
}
