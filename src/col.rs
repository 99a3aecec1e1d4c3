//! Heap allocated, resizable dense vector.

use crate::complex::c64;
use crate::entity::{Entity, Promote, Widen};
use crate::kernel;
use crate::mat::Mat;
use crate::EPSILON;
use core::fmt;
use equator::assert;

#[cfg(feature = "rand")]
use rand::distributions::{Distribution, Standard};

/// Dense vector over the element domain `E`.
///
/// Shares the matrix contract: the backing store holds exactly `len`
/// entities at every observable instant (two congruent planes in the
/// complex domain), the length is mutated only through the resize
/// operations, and arithmetic follows the same three-fold protocol as
/// [`Mat`].
#[derive(Clone, PartialEq)]
pub struct Col<E: Entity> {
    pub(crate) len: usize,
    pub(crate) store: E::Store,
}

impl<E: Entity> Default for Col<E> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Col<E> {
    /// Returns an empty vector.
    #[inline]
    pub fn new() -> Self {
        Self {
            len: 0,
            store: E::Store::default(),
        }
    }

    /// Returns a zero-filled vector of the given length.
    pub fn zeros(len: usize) -> Self {
        Self {
            len,
            store: E::store_zeroed(len),
        }
    }

    /// Returns a vector of the given length, all entries equal to `value`.
    pub fn full(len: usize, value: E) -> Self {
        let mut out = Self::zeros(len);
        out.fill(value);
        out
    }

    /// Returns a vector of the given length, filled with the provided
    /// function.
    pub fn from_fn(len: usize, mut f: impl FnMut(usize) -> E) -> Self {
        let mut out = Self::zeros(len);
        for i in 0..len {
            E::store_write(&mut out.store, i, f(i));
        }
        out
    }

    /// Returns the number of entries.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Panics unless `idx` is in `[0, len)`.
    #[inline]
    #[track_caller]
    pub fn check_index(&self, idx: usize) {
        assert!(idx < self.len);
    }

    /// Returns `true` if `other` has the same length as `self`, regardless
    /// of its element domain.
    #[inline]
    pub fn has_same_len<R: Entity>(&self, other: &Col<R>) -> bool {
        self.len == other.len
    }

    /// Panics unless `other` has the same length as `self`.
    #[inline]
    #[track_caller]
    pub fn check_same_len<R: Entity>(&self, other: &Col<R>) {
        assert!(self.len == other.len);
    }

    /// Reads the entry at `idx`.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    #[inline]
    #[track_caller]
    pub fn read(&self, idx: usize) -> E {
        self.check_index(idx);
        E::store_read(&self.store, idx)
    }

    /// Writes `value` to the entry at `idx`.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    #[inline]
    #[track_caller]
    pub fn write(&mut self, idx: usize, value: E) {
        self.check_index(idx);
        E::store_write(&mut self.store, idx, value);
    }

    /// The resize primitive: truncates or zero-extends in the preserving
    /// case; the discard path never reads old values.
    fn change_size(&mut self, new_len: usize, preserve: bool) {
        if new_len == self.len {
            return;
        }
        if !preserve {
            self.store = E::store_zeroed(new_len);
        } else if new_len < self.len {
            E::store_truncate(&mut self.store, new_len);
        } else {
            E::store_grow_zeroed(&mut self.store, new_len);
        }
        self.len = new_len;
    }

    /// Resizes the vector, discarding its values. The surviving contents
    /// are unspecified; new entries are zero.
    #[inline]
    pub fn new_size(&mut self, len: usize) {
        self.change_size(len, false);
    }

    /// Resizes the vector, preserving the overlapping entries and
    /// zero-filling new ones.
    #[inline]
    pub fn resize(&mut self, len: usize) {
        self.change_size(len, true);
    }

    /// Fills all entries with `value`.
    #[inline]
    pub fn fill(&mut self, value: E) {
        E::store_fill(&mut self.store, value);
    }

    /// Fills all entries with zero.
    #[inline]
    pub fn fill_zero(&mut self) {
        self.fill(E::ZERO);
    }

    /// Fills all entries with samples from the standard distribution of
    /// the element domain.
    #[cfg(feature = "rand")]
    pub fn fill_random<R: rand::Rng + ?Sized>(&mut self, rng: &mut R)
    where
        Standard: Distribution<E>,
    {
        for i in 0..self.len {
            E::store_write(&mut self.store, i, Standard.sample(rng));
        }
    }

    /// Returns a copy of the `len` entries starting at `at`.
    ///
    /// # Panics
    /// Panics unless the range lies within the vector.
    #[track_caller]
    pub fn block(&self, at: usize, len: usize) -> Col<E> {
        assert!(at + len <= self.len);
        let mut out = Col::zeros(len);
        E::store_copy_range(&self.store, at, &mut out.store, 0, len);
        out
    }

    /// Overwrites the entries starting at `at` with `v`, widening its
    /// elements if needed.
    ///
    /// # Panics
    /// Panics unless `v` fits at that offset.
    #[track_caller]
    pub fn set_block<A: Widen<E>>(&mut self, at: usize, v: &Col<A>) {
        assert!(at + v.len <= self.len);
        let lifted = A::lift_store(&v.store);
        E::store_copy_range(lifted.as_store(), 0, &mut self.store, at, v.len);
    }

    /// Returns the unconjugated dot product of `self` and `rhs` in the
    /// promoted domain.
    ///
    /// # Panics
    /// Panics unless the lengths agree.
    #[track_caller]
    pub fn dot<R: Entity>(&self, rhs: &Col<R>) -> <E as Promote<R>>::Wider
    where
        E: Promote<R> + Widen<<E as Promote<R>>::Wider>,
        R: Widen<<E as Promote<R>>::Wider>,
    {
        self.check_same_len(rhs);
        let lhs = E::lift_store(&self.store);
        let rhs = R::lift_store(&rhs.store);
        kernel::matmul::dot::<<E as Promote<R>>::Wider>(lhs.as_store(), rhs.as_store())
    }

    /// Stores `a + b` into `self`, resizing it first.
    ///
    /// # Panics
    /// Panics unless `a` and `b` have the same length.
    #[track_caller]
    pub fn assign_add<A: Widen<E>, B: Widen<E>>(&mut self, a: &Col<A>, b: &Col<B>) {
        a.check_same_len(b);
        let lhs = A::lift_store(&a.store);
        let rhs = B::lift_store(&b.store);
        self.new_size(a.len);
        kernel::elementwise::add::<E>(&mut self.store, lhs.as_store(), rhs.as_store());
    }

    /// Stores `a - b` into `self`, resizing it first.
    ///
    /// # Panics
    /// Panics unless `a` and `b` have the same length.
    #[track_caller]
    pub fn assign_sub<A: Widen<E>, B: Widen<E>>(&mut self, a: &Col<A>, b: &Col<B>) {
        a.check_same_len(b);
        let lhs = A::lift_store(&a.store);
        let rhs = B::lift_store(&b.store);
        self.new_size(a.len);
        kernel::elementwise::sub::<E>(&mut self.store, lhs.as_store(), rhs.as_store());
    }

    /// Stores the matrix-vector product `m · v` into `self`, resizing it
    /// first.
    ///
    /// # Panics
    /// Panics unless `m.ncols() == v.len()`.
    #[track_caller]
    pub fn assign_mul<A: Widen<E>, B: Widen<E>>(&mut self, m: &Mat<A>, v: &Col<B>) {
        assert!(m.ncols() == v.len);
        let lhs = A::lift_store(&m.store);
        let rhs = B::lift_store(&v.store);
        self.new_size(m.nrows());
        kernel::matmul::matvec::<E>(
            &mut self.store,
            lhs.as_store(),
            rhs.as_store(),
            m.nrows(),
            m.ncols(),
        );
    }

    /// Stores `a * factor` into `self`, resizing it first.
    pub fn assign_scaled<A: Widen<E>, S: Widen<E>>(&mut self, a: &Col<A>, factor: S) {
        let lifted = A::lift_store(&a.store);
        self.new_size(a.len);
        kernel::elementwise::scale::<E>(&mut self.store, lifted.as_store(), factor.widen());
    }

    /// Stores `a / divisor` into `self`, resizing it first.
    pub fn assign_div<A: Widen<E>, S: Widen<E>>(&mut self, a: &Col<A>, divisor: S) {
        let lifted = A::lift_store(&a.store);
        self.new_size(a.len);
        kernel::elementwise::div::<E>(&mut self.store, lifted.as_store(), divisor.widen());
    }

    /// Stores the elementwise quotient `numerator / a` into `self`,
    /// resizing it first.
    pub fn assign_scalar_div<S: Widen<E>, A: Widen<E>>(&mut self, numerator: S, a: &Col<A>) {
        let lifted = A::lift_store(&a.store);
        self.new_size(a.len);
        kernel::elementwise::scalar_div::<E>(&mut self.store, numerator.widen(), lifted.as_store());
    }

    /// Stores `-a` into `self`, resizing it first.
    pub fn assign_neg<A: Widen<E>>(&mut self, a: &Col<A>) {
        let lifted = A::lift_store(&a.store);
        self.new_size(a.len);
        kernel::elementwise::neg::<E>(&mut self.store, lifted.as_store());
    }

    /// Stores the entrywise rounding of `a` into `self`, resizing it
    /// first.
    pub fn assign_round<A: Widen<E>>(&mut self, a: &Col<A>) {
        let lifted = A::lift_store(&a.store);
        self.new_size(a.len);
        kernel::elementwise::round::<E>(&mut self.store, lifted.as_store());
    }

    /// Stores the entrywise floor of `a` into `self`, resizing it first.
    pub fn assign_floor<A: Widen<E>>(&mut self, a: &Col<A>) {
        let lifted = A::lift_store(&a.store);
        self.new_size(a.len);
        kernel::elementwise::floor::<E>(&mut self.store, lifted.as_store());
    }

    /// Overwrites `self` with `a`, widening its elements if needed.
    pub fn copy_from<A: Widen<E>>(&mut self, a: &Col<A>) {
        self.store = A::lift_store(&a.store).into_store();
        self.len = a.len;
    }

    /// Returns the entrywise rounding of `self`.
    pub fn rounded(&self) -> Col<E>
    where
        E: Widen<E>,
    {
        let mut out = Col::new();
        out.assign_round(self);
        out
    }

    /// Returns the entrywise floor of `self`.
    pub fn floored(&self) -> Col<E>
    where
        E: Widen<E>,
    {
        let mut out = Col::new();
        out.assign_floor(self);
        out
    }

    /// Rounds all entries in place.
    pub fn round_in_place(&mut self) {
        kernel::elementwise::round_assign::<E>(&mut self.store);
    }

    /// Floors all entries in place.
    pub fn floor_in_place(&mut self) {
        kernel::elementwise::floor_assign::<E>(&mut self.store);
    }

    /// Returns the sum of the squared moduli of all entries.
    pub fn squared_norm_l2(&self) -> f64 {
        let mut acc = 0.0;
        for i in 0..self.len {
            acc += E::store_read(&self.store, i).abs2();
        }
        acc
    }

    /// Returns the Euclidean norm of the vector.
    pub fn norm_l2(&self) -> f64 {
        self.squared_norm_l2().sqrt()
    }

    /// Returns `true` if all entries vanish within the default tolerance.
    pub fn is_zero(&self) -> bool {
        self.squared_norm_l2() <= self.len as f64 * EPSILON
    }

    /// Returns `true` if `other` has the same length and every entry is
    /// within the default tolerance: `|a - b|² <= EPSILON`.
    pub fn approx_eq(&self, other: &Col<E>) -> bool {
        self.approx_eq_within(other, EPSILON)
    }

    /// Returns `true` if `other` has the same length and every entry is
    /// within the given tolerance: `|a - b|² <= tol`.
    pub fn approx_eq_within(&self, other: &Col<E>, tol: f64) -> bool {
        if self.len != other.len {
            return false;
        }
        for i in 0..self.len {
            let diff = E::store_read(&self.store, i).sub(E::store_read(&other.store, i));
            if diff.abs2() > tol {
                return false;
            }
        }
        true
    }
}

macro_rules! impl_single_plane_views {
    ($ty: ty) => {
        impl Col<$ty> {
            /// Returns a vector adopting `data` as its backing store.
            /// Ownership of the buffer transfers to the vector; no copy is
            /// made.
            #[inline]
            pub fn from_vec(data: Vec<$ty>) -> Self {
                Self {
                    len: data.len(),
                    store: data,
                }
            }

            /// Returns the backing store, consuming the vector.
            #[inline]
            pub fn into_vec(self) -> Vec<$ty> {
                self.store
            }

            /// Returns the backing store as a slice.
            ///
            /// This is a live alias of the vector contents, intended for
            /// zero-copy interop.
            #[inline]
            pub fn as_slice(&self) -> &[$ty] {
                &self.store
            }

            /// Returns the backing store as a mutable slice.
            ///
            /// This is a live alias: writes through it mutate the vector
            /// directly.
            #[inline]
            pub fn as_slice_mut(&mut self) -> &mut [$ty] {
                &mut self.store
            }

            /// Returns a copy of the backing store.
            #[inline]
            pub fn to_vec(&self) -> Vec<$ty> {
                self.store.clone()
            }
        }
    };
}

impl_single_plane_views!(i64);
impl_single_plane_views!(f64);

impl Col<c64> {
    /// Returns a vector adopting `re` and `im` as its real and imaginary
    /// planes. Ownership of both buffers transfers to the vector; no copy
    /// is made.
    ///
    /// # Panics
    /// Panics unless both planes have the same length.
    #[track_caller]
    pub fn from_planes(re: Vec<f64>, im: Vec<f64>) -> Self {
        assert!(re.len() == im.len());
        Self {
            len: re.len(),
            store: (re, im),
        }
    }

    /// Returns the real and imaginary planes, consuming the vector.
    #[inline]
    pub fn into_planes(self) -> (Vec<f64>, Vec<f64>) {
        self.store
    }

    /// Returns the real plane as a slice.
    ///
    /// This is a live alias of the vector contents, intended for zero-copy
    /// interop.
    #[inline]
    pub fn re(&self) -> &[f64] {
        &self.store.0
    }

    /// Returns the imaginary plane as a slice.
    ///
    /// This is a live alias of the vector contents, intended for zero-copy
    /// interop.
    #[inline]
    pub fn im(&self) -> &[f64] {
        &self.store.1
    }

    /// Returns the real plane as a mutable slice.
    ///
    /// This is a live alias: writes through it mutate the vector directly.
    #[inline]
    pub fn re_mut(&mut self) -> &mut [f64] {
        &mut self.store.0
    }

    /// Returns the imaginary plane as a mutable slice.
    ///
    /// This is a live alias: writes through it mutate the vector directly.
    #[inline]
    pub fn im_mut(&mut self) -> &mut [f64] {
        &mut self.store.1
    }

    /// Returns the entrywise conjugate of `self`.
    pub fn conjugated(&self) -> Col<c64> {
        let mut out = self.clone();
        out.conjugate_in_place();
        out
    }

    /// Conjugates all entries in place by negating the imaginary plane.
    pub fn conjugate_in_place(&mut self) {
        for x in &mut self.store.1 {
            *x = -*x;
        }
    }
}

impl<E: Entity> fmt::Display for Col<E> {
    /// Renders the vector as a tuple: `(a, b, c)`. This is a diagnostic
    /// rendering, not a machine-readable format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for i in 0..self.len {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", E::store_read(&self.store, i))?;
        }
        write!(f, ")")
    }
}

impl<E: Entity> fmt::Debug for Col<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.len {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", E::store_read(&self.store, i))?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::{col, mat};
    use assert_approx_eq::assert_approx_eq;
    use equator::assert;

    #[test]
    fn resize_round_trip() {
        let v = col![1.0, 2.0, 3.0];
        let mut w = v.clone();
        w.resize(5);
        assert!(all(w.len() == 5, w.read(4) == 0.0, w.read(1) == 2.0));
        w.resize(3);
        assert!(w == v);
    }

    #[test]
    fn three_fold_consistency() {
        let v = col![1.0, -2.0, 3.0];
        let w = col![0.5, 0.5, -0.5];

        let pure = &v + &w;
        let mut two_op = Col::<f64>::new();
        two_op.assign_add(&v, &w);
        let mut receiver = v.clone();
        receiver += &w;

        assert!(pure.approx_eq(&two_op));
        assert!(pure.approx_eq(&receiver));
    }

    #[test]
    fn dot_products_promote() {
        let v = col![1i64, 2, 3];
        let w = col![4i64, -5, 6];
        assert!(v.dot(&w) == 12);

        let r = col![0.5, 0.5, 0.5];
        assert_approx_eq!(v.dot(&r), 3.0);

        let z = Col::<c64>::full(3, crate::c64::i());
        let d = v.dot(&z);
        assert_approx_eq!(d.re, 0.0);
        assert_approx_eq!(d.im, 6.0);
    }

    #[test]
    #[should_panic]
    fn dot_with_mismatched_lengths_panics() {
        let _ = col![1.0, 2.0].dot(&col![1.0, 2.0, 3.0]);
    }

    #[test]
    fn matrix_vector_product() {
        let M = mat![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let v = col![1.0, -1.0];
        let mut out = Col::<f64>::new();
        out.assign_mul(&M, &v);
        assert!(out == col![-1.0, -1.0, -1.0]);
        assert!(&M * &v == out);
    }

    #[test]
    fn block_round_trip() {
        let v = col![1.0, 2.0, 3.0, 4.0];
        let b = v.block(1, 2);
        assert!(b == col![2.0, 3.0]);

        let mut w = Col::<f64>::zeros(4);
        w.set_block(2, &b);
        assert!(w == col![0.0, 0.0, 2.0, 3.0]);
    }

    #[test]
    fn views_alias_backing_store() {
        let mut v = col![1.0, 2.0];
        v.as_slice_mut()[0] = 7.0;
        assert!(v.read(0) == 7.0);

        let mut z = Col::<c64>::zeros(2);
        z.re_mut()[1] = 3.0;
        assert!(z.read(1) == crate::c64::new(3.0, 0.0));
    }

    #[test]
    fn conjugate() {
        let z = Col::<c64>::full(2, crate::c64::new(1.0, 2.0));
        assert!(z.conjugated().read(0) == crate::c64::new(1.0, -2.0));
    }

    #[test]
    fn display_is_tuple_grouped() {
        assert!(col![1.0, 2.5].to_string() == "(1, 2.5)");
        assert!(Col::<f64>::new().to_string() == "()");
    }

    #[test]
    fn norms_and_zero() {
        let v = col![3.0, 4.0];
        assert_approx_eq!(v.norm_l2(), 5.0);
        assert!(Col::<f64>::zeros(3).is_zero());
        assert!(!v.is_zero());
    }
}
