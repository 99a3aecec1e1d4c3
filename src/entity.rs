//! Element domains and the storage capability backing [`Mat`](crate::Mat)
//! and [`Col`](crate::Col).
//!
//! An [`Entity`] bundles the scalar arithmetic of one element domain with
//! the primitive operations on its backing store. Integer and real entities
//! are stored as a single contiguous plane; complex entities as two
//! congruent `f64` planes (real and imaginary), and every store primitive
//! applies to both planes so the congruence invariant cannot be broken from
//! outside this module.
//!
//! [`Widen`] encodes the promotion order Integer < Real < Complex: the six
//! lossless injections between domains, both for scalars and for whole
//! stores. [`Promote`] maps an ordered pair of domains to the wider of the
//! two, which is the result domain of every mixed binary operation.

use crate::complex::c64;
use core::fmt;

/// Element domain of a matrix or vector: scalar arithmetic plus the
/// primitive operations on the backing store of that domain.
///
/// Implemented by [`i64`], [`f64`] and [`c64`]. The store primitives are
/// the only way shape-changing code touches storage, so domains with more
/// than one plane stay congruent by construction.
pub trait Entity: Copy + PartialEq + fmt::Debug + fmt::Display + 'static {
    /// Contiguous backing storage for a block of entities.
    type Store: Clone + PartialEq + fmt::Debug + Default;

    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;

    /// Returns a zero-filled store of `len` entities.
    fn store_zeroed(len: usize) -> Self::Store;
    /// Returns the number of entities in `store`.
    fn store_len(store: &Self::Store) -> usize;
    /// Reads the entity at `idx`.
    fn store_read(store: &Self::Store, idx: usize) -> Self;
    /// Writes the entity at `idx`.
    fn store_write(store: &mut Self::Store, idx: usize, value: Self);
    /// Fills the whole store with `value`.
    fn store_fill(store: &mut Self::Store, value: Self);
    /// Swaps the entities at `i` and `j`.
    fn store_swap(store: &mut Self::Store, i: usize, j: usize);
    /// Shortens the store to `new_len` entities.
    fn store_truncate(store: &mut Self::Store, new_len: usize);
    /// Grows the store to `new_len` entities, zero-filling the new tail.
    fn store_grow_zeroed(store: &mut Self::Store, new_len: usize);
    /// Copies `len` entities from `src[src_at..]` into `dst[dst_at..]`.
    fn store_copy_range(
        src: &Self::Store,
        src_at: usize,
        dst: &mut Self::Store,
        dst_at: usize,
        len: usize,
    );

    /// Scalar addition.
    fn add(self, rhs: Self) -> Self;
    /// Scalar subtraction.
    fn sub(self, rhs: Self) -> Self;
    /// Scalar multiplication.
    fn mul(self, rhs: Self) -> Self;
    /// Scalar division. Integer division truncates and panics on a zero
    /// divisor; the floating domains propagate IEEE-754 non-finite values.
    fn div(self, rhs: Self) -> Self;
    /// Scalar negation.
    fn neg(self) -> Self;
    /// Squared modulus, as the tolerance metric `|a|²`.
    fn abs2(self) -> f64;
    /// Rounds to the nearest integer value (identity on the integer
    /// domain; componentwise on the complex domain).
    fn round(self) -> Self;
    /// Floor (identity on the integer domain; componentwise on the complex
    /// domain).
    fn floor(self) -> Self;
}

/// Domains with exact division, over which the LU-based kernel routines
/// (determinant, inversion) are defined.
pub trait Field: Entity {}

impl Field for f64 {}
impl Field for c64 {}

/// A store of domain `E` obtained by lifting an operand: either the
/// operand's own store (when the domains coincide) or a widened copy.
pub enum Lifted<'a, E: Entity> {
    /// The operand already lives in the target domain.
    Borrowed(&'a E::Store),
    /// Widened copy of a narrower operand.
    Owned(E::Store),
}

impl<E: Entity> Lifted<'_, E> {
    /// Returns the lifted store.
    #[inline]
    pub fn as_store(&self) -> &E::Store {
        match self {
            Lifted::Borrowed(store) => store,
            Lifted::Owned(store) => store,
        }
    }

    /// Returns an owned store, cloning in the borrowed case.
    #[inline]
    pub fn into_store(self) -> E::Store {
        match self {
            Lifted::Borrowed(store) => store.clone(),
            Lifted::Owned(store) => store,
        }
    }
}

/// Lossless injection of `Self` into the domain `T`.
///
/// The promotion order is Integer < Real < Complex: integers widen exactly
/// into reals, and widening into the complex domain fills a zero imaginary
/// part. Every domain also widens into itself, which lifts stores without
/// copying.
pub trait Widen<T: Entity>: Entity {
    /// Widens one scalar.
    fn widen(self) -> T;
    /// Lifts a whole store into the target domain.
    fn lift_store(store: &Self::Store) -> Lifted<'_, T>;
}

/// Maps an ordered pair of domains to the result domain of a binary
/// operation between them: the wider of the two under
/// Integer < Real < Complex.
pub trait Promote<Rhs: Entity>: Entity {
    /// The wider of `Self` and `Rhs`.
    type Wider: Entity;
}

impl Entity for i64 {
    type Store = Vec<i64>;

    const ZERO: Self = 0;
    const ONE: Self = 1;

    #[inline]
    fn store_zeroed(len: usize) -> Vec<i64> {
        vec![0; len]
    }
    #[inline]
    fn store_len(store: &Vec<i64>) -> usize {
        store.len()
    }
    #[inline]
    fn store_read(store: &Vec<i64>, idx: usize) -> i64 {
        store[idx]
    }
    #[inline]
    fn store_write(store: &mut Vec<i64>, idx: usize, value: i64) {
        store[idx] = value;
    }
    #[inline]
    fn store_fill(store: &mut Vec<i64>, value: i64) {
        store.fill(value);
    }
    #[inline]
    fn store_swap(store: &mut Vec<i64>, i: usize, j: usize) {
        store.swap(i, j);
    }
    #[inline]
    fn store_truncate(store: &mut Vec<i64>, new_len: usize) {
        store.truncate(new_len);
    }
    #[inline]
    fn store_grow_zeroed(store: &mut Vec<i64>, new_len: usize) {
        store.resize(new_len, 0);
    }
    #[inline]
    fn store_copy_range(src: &Vec<i64>, src_at: usize, dst: &mut Vec<i64>, dst_at: usize, len: usize) {
        dst[dst_at..dst_at + len].copy_from_slice(&src[src_at..src_at + len]);
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self + rhs
    }
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self - rhs
    }
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self * rhs
    }
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        self / rhs
    }
    #[inline(always)]
    fn neg(self) -> Self {
        -self
    }
    #[inline(always)]
    fn abs2(self) -> f64 {
        (self as f64) * (self as f64)
    }
    #[inline(always)]
    fn round(self) -> Self {
        self
    }
    #[inline(always)]
    fn floor(self) -> Self {
        self
    }
}

impl Entity for f64 {
    type Store = Vec<f64>;

    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn store_zeroed(len: usize) -> Vec<f64> {
        vec![0.0; len]
    }
    #[inline]
    fn store_len(store: &Vec<f64>) -> usize {
        store.len()
    }
    #[inline]
    fn store_read(store: &Vec<f64>, idx: usize) -> f64 {
        store[idx]
    }
    #[inline]
    fn store_write(store: &mut Vec<f64>, idx: usize, value: f64) {
        store[idx] = value;
    }
    #[inline]
    fn store_fill(store: &mut Vec<f64>, value: f64) {
        store.fill(value);
    }
    #[inline]
    fn store_swap(store: &mut Vec<f64>, i: usize, j: usize) {
        store.swap(i, j);
    }
    #[inline]
    fn store_truncate(store: &mut Vec<f64>, new_len: usize) {
        store.truncate(new_len);
    }
    #[inline]
    fn store_grow_zeroed(store: &mut Vec<f64>, new_len: usize) {
        store.resize(new_len, 0.0);
    }
    #[inline]
    fn store_copy_range(src: &Vec<f64>, src_at: usize, dst: &mut Vec<f64>, dst_at: usize, len: usize) {
        dst[dst_at..dst_at + len].copy_from_slice(&src[src_at..src_at + len]);
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self + rhs
    }
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self - rhs
    }
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self * rhs
    }
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        self / rhs
    }
    #[inline(always)]
    fn neg(self) -> Self {
        -self
    }
    #[inline(always)]
    fn abs2(self) -> f64 {
        self * self
    }
    #[inline(always)]
    fn round(self) -> Self {
        f64::round(self)
    }
    #[inline(always)]
    fn floor(self) -> Self {
        f64::floor(self)
    }
}

impl Entity for c64 {
    // Real and imaginary planes, congruent at all times.
    type Store = (Vec<f64>, Vec<f64>);

    const ZERO: Self = c64::new(0.0, 0.0);
    const ONE: Self = c64::new(1.0, 0.0);

    #[inline]
    fn store_zeroed(len: usize) -> Self::Store {
        (vec![0.0; len], vec![0.0; len])
    }
    #[inline]
    fn store_len(store: &Self::Store) -> usize {
        store.0.len()
    }
    #[inline]
    fn store_read(store: &Self::Store, idx: usize) -> c64 {
        c64::new(store.0[idx], store.1[idx])
    }
    #[inline]
    fn store_write(store: &mut Self::Store, idx: usize, value: c64) {
        store.0[idx] = value.re;
        store.1[idx] = value.im;
    }
    #[inline]
    fn store_fill(store: &mut Self::Store, value: c64) {
        store.0.fill(value.re);
        store.1.fill(value.im);
    }
    #[inline]
    fn store_swap(store: &mut Self::Store, i: usize, j: usize) {
        store.0.swap(i, j);
        store.1.swap(i, j);
    }
    #[inline]
    fn store_truncate(store: &mut Self::Store, new_len: usize) {
        store.0.truncate(new_len);
        store.1.truncate(new_len);
    }
    #[inline]
    fn store_grow_zeroed(store: &mut Self::Store, new_len: usize) {
        store.0.resize(new_len, 0.0);
        store.1.resize(new_len, 0.0);
    }
    #[inline]
    fn store_copy_range(
        src: &Self::Store,
        src_at: usize,
        dst: &mut Self::Store,
        dst_at: usize,
        len: usize,
    ) {
        dst.0[dst_at..dst_at + len].copy_from_slice(&src.0[src_at..src_at + len]);
        dst.1[dst_at..dst_at + len].copy_from_slice(&src.1[src_at..src_at + len]);
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self + rhs
    }
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self - rhs
    }
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self * rhs
    }
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        self / rhs
    }
    #[inline(always)]
    fn neg(self) -> Self {
        -self
    }
    #[inline(always)]
    fn abs2(self) -> f64 {
        c64::abs2(self)
    }
    #[inline(always)]
    fn round(self) -> Self {
        c64::round(self)
    }
    #[inline(always)]
    fn floor(self) -> Self {
        c64::floor(self)
    }
}

macro_rules! impl_widen_identity {
    ($ty: ty) => {
        impl Widen<$ty> for $ty {
            #[inline(always)]
            fn widen(self) -> $ty {
                self
            }
            #[inline]
            fn lift_store(store: &<$ty as Entity>::Store) -> Lifted<'_, $ty> {
                Lifted::Borrowed(store)
            }
        }
    };
}

impl_widen_identity!(i64);
impl_widen_identity!(f64);
impl_widen_identity!(c64);

impl Widen<f64> for i64 {
    #[inline(always)]
    fn widen(self) -> f64 {
        self as f64
    }
    #[inline]
    fn lift_store(store: &Vec<i64>) -> Lifted<'_, f64> {
        Lifted::Owned(store.iter().map(|&x| x as f64).collect())
    }
}

impl Widen<c64> for i64 {
    #[inline(always)]
    fn widen(self) -> c64 {
        c64::from_real(self as f64)
    }
    #[inline]
    fn lift_store(store: &Vec<i64>) -> Lifted<'_, c64> {
        let re = store.iter().map(|&x| x as f64).collect();
        Lifted::Owned((re, vec![0.0; store.len()]))
    }
}

impl Widen<c64> for f64 {
    #[inline(always)]
    fn widen(self) -> c64 {
        c64::from_real(self)
    }
    #[inline]
    fn lift_store(store: &Vec<f64>) -> Lifted<'_, c64> {
        Lifted::Owned((store.clone(), vec![0.0; store.len()]))
    }
}

macro_rules! impl_promote {
    ($lhs: ty, $rhs: ty => $wider: ty) => {
        impl Promote<$rhs> for $lhs {
            type Wider = $wider;
        }
    };
}

impl_promote!(i64, i64 => i64);
impl_promote!(i64, f64 => f64);
impl_promote!(i64, c64 => c64);
impl_promote!(f64, i64 => f64);
impl_promote!(f64, f64 => f64);
impl_promote!(f64, c64 => c64);
impl_promote!(c64, i64 => c64);
impl_promote!(c64, f64 => c64);
impl_promote!(c64, c64 => c64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_is_exact() {
        assert_eq!(Widen::<f64>::widen(3i64), 3.0);
        assert_eq!(Widen::<c64>::widen(3i64), c64::new(3.0, 0.0));
        assert_eq!(Widen::<c64>::widen(0.5f64), c64::new(0.5, 0.0));
    }

    #[test]
    fn identity_lift_borrows() {
        let store = vec![1.0f64, 2.0];
        match <f64 as Widen<f64>>::lift_store(&store) {
            Lifted::Borrowed(_) => {}
            Lifted::Owned(_) => panic!("identity lift must not copy"),
        }
    }

    #[test]
    fn complex_lift_zero_fills_imaginary_plane() {
        let store = vec![1i64, -2];
        let lifted = <i64 as Widen<c64>>::lift_store(&store);
        let (re, im) = lifted.into_store();
        assert_eq!(re, vec![1.0, -2.0]);
        assert_eq!(im, vec![0.0, 0.0]);
    }

    #[test]
    fn complex_store_planes_stay_congruent() {
        let mut store = <c64 as Entity>::store_zeroed(4);
        <c64 as Entity>::store_write(&mut store, 2, c64::new(1.0, -1.0));
        <c64 as Entity>::store_grow_zeroed(&mut store, 6);
        assert_eq!(store.0.len(), store.1.len());
        <c64 as Entity>::store_truncate(&mut store, 3);
        assert_eq!(store.0.len(), 3);
        assert_eq!(store.1.len(), 3);
        assert_eq!(<c64 as Entity>::store_read(&store, 2), c64::new(1.0, -1.0));
    }
}
