//! Elementwise kernels: add, subtract, negate, scale, divide, round, floor.
//!
//! Each operation comes in a three-address form writing into a caller
//! supplied output and, where the object layer mutates a receiver in
//! place, an accumulate form. All stores must have the same length.

use crate::entity::Entity;
use equator::debug_assert;

/// `dst[i] = lhs[i] + rhs[i]`.
pub fn add<E: Entity>(dst: &mut E::Store, lhs: &E::Store, rhs: &E::Store) {
    let n = E::store_len(dst);
    debug_assert!(all(E::store_len(lhs) == n, E::store_len(rhs) == n));
    for i in 0..n {
        E::store_write(dst, i, E::store_read(lhs, i).add(E::store_read(rhs, i)));
    }
}

/// `acc[i] += rhs[i]`.
pub fn add_assign<E: Entity>(acc: &mut E::Store, rhs: &E::Store) {
    let n = E::store_len(acc);
    debug_assert!(E::store_len(rhs) == n);
    for i in 0..n {
        E::store_write(acc, i, E::store_read(acc, i).add(E::store_read(rhs, i)));
    }
}

/// `dst[i] = lhs[i] - rhs[i]`.
pub fn sub<E: Entity>(dst: &mut E::Store, lhs: &E::Store, rhs: &E::Store) {
    let n = E::store_len(dst);
    debug_assert!(all(E::store_len(lhs) == n, E::store_len(rhs) == n));
    for i in 0..n {
        E::store_write(dst, i, E::store_read(lhs, i).sub(E::store_read(rhs, i)));
    }
}

/// `acc[i] -= rhs[i]`.
pub fn sub_assign<E: Entity>(acc: &mut E::Store, rhs: &E::Store) {
    let n = E::store_len(acc);
    debug_assert!(E::store_len(rhs) == n);
    for i in 0..n {
        E::store_write(acc, i, E::store_read(acc, i).sub(E::store_read(rhs, i)));
    }
}

/// `dst[i] = -src[i]`.
pub fn neg<E: Entity>(dst: &mut E::Store, src: &E::Store) {
    let n = E::store_len(dst);
    debug_assert!(E::store_len(src) == n);
    for i in 0..n {
        E::store_write(dst, i, E::store_read(src, i).neg());
    }
}

/// `acc[i] = -acc[i]`.
pub fn neg_assign<E: Entity>(acc: &mut E::Store) {
    for i in 0..E::store_len(acc) {
        E::store_write(acc, i, E::store_read(acc, i).neg());
    }
}

/// `dst[i] = src[i] * factor`.
pub fn scale<E: Entity>(dst: &mut E::Store, src: &E::Store, factor: E) {
    let n = E::store_len(dst);
    debug_assert!(E::store_len(src) == n);
    for i in 0..n {
        E::store_write(dst, i, E::store_read(src, i).mul(factor));
    }
}

/// `acc[i] *= factor`.
pub fn scale_assign<E: Entity>(acc: &mut E::Store, factor: E) {
    for i in 0..E::store_len(acc) {
        E::store_write(acc, i, E::store_read(acc, i).mul(factor));
    }
}

/// `dst[i] = src[i] / divisor`.
pub fn div<E: Entity>(dst: &mut E::Store, src: &E::Store, divisor: E) {
    let n = E::store_len(dst);
    debug_assert!(E::store_len(src) == n);
    for i in 0..n {
        E::store_write(dst, i, E::store_read(src, i).div(divisor));
    }
}

/// `acc[i] /= divisor`.
pub fn div_assign<E: Entity>(acc: &mut E::Store, divisor: E) {
    for i in 0..E::store_len(acc) {
        E::store_write(acc, i, E::store_read(acc, i).div(divisor));
    }
}

/// `dst[i] = numerator / src[i]`.
pub fn scalar_div<E: Entity>(dst: &mut E::Store, numerator: E, src: &E::Store) {
    let n = E::store_len(dst);
    debug_assert!(E::store_len(src) == n);
    for i in 0..n {
        E::store_write(dst, i, numerator.div(E::store_read(src, i)));
    }
}

/// `dst[i] = round(src[i])`.
pub fn round<E: Entity>(dst: &mut E::Store, src: &E::Store) {
    let n = E::store_len(dst);
    debug_assert!(E::store_len(src) == n);
    for i in 0..n {
        E::store_write(dst, i, E::store_read(src, i).round());
    }
}

/// `acc[i] = round(acc[i])`.
pub fn round_assign<E: Entity>(acc: &mut E::Store) {
    for i in 0..E::store_len(acc) {
        E::store_write(acc, i, E::store_read(acc, i).round());
    }
}

/// `dst[i] = floor(src[i])`.
pub fn floor<E: Entity>(dst: &mut E::Store, src: &E::Store) {
    let n = E::store_len(dst);
    debug_assert!(E::store_len(src) == n);
    for i in 0..n {
        E::store_write(dst, i, E::store_read(src, i).floor());
    }
}

/// `acc[i] = floor(acc[i])`.
pub fn floor_assign<E: Entity>(acc: &mut E::Store) {
    for i in 0..E::store_len(acc) {
        E::store_write(acc, i, E::store_read(acc, i).floor());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub_are_inverse() {
        let lhs = vec![1.0, 2.0, 3.0];
        let rhs = vec![0.5, -1.5, 4.0];
        let mut sum = vec![0.0; 3];
        add::<f64>(&mut sum, &lhs, &rhs);
        assert_eq!(sum, vec![1.5, 0.5, 7.0]);
        sub_assign::<f64>(&mut sum, &rhs);
        assert_eq!(sum, lhs);
    }

    #[test]
    fn scalar_div_divides_numerator() {
        let src = vec![2.0, 4.0];
        let mut dst = vec![0.0; 2];
        scalar_div::<f64>(&mut dst, 8.0, &src);
        assert_eq!(dst, vec![4.0, 2.0]);
    }

    #[test]
    fn round_is_identity_on_integers() {
        let src = vec![3i64, -7];
        let mut dst = vec![0i64; 2];
        round::<i64>(&mut dst, &src);
        assert_eq!(dst, src);
    }
}
