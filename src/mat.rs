//! Heap allocated, resizable dense matrix.

use crate::col::Col;
use crate::complex::c64;
use crate::entity::{Entity, Field, Widen};
use crate::kernel;
use crate::{InverseError, EPSILON};
use core::fmt;
use equator::assert;

#[cfg(feature = "rand")]
use rand::distributions::{Distribution, Standard};

/// Dense matrix over the element domain `E`, stored row-major.
///
/// The backing store holds exactly `nrows * ncols` entities at every
/// observable instant; the complex domain keeps two congruent planes (see
/// [`Entity`]). The shape is mutated only through the resize operations,
/// never by direct field assignment.
///
/// Operations come in three forms: a pure form allocating a new result
/// (the `std::ops` operators), a receiver-mutating form (`+=`, `-=`, `*=`,
/// `/=`), and a two-operand form (`assign_*`) that stores the result of an
/// operation between its arguments into `self`, resizing it first.
/// Noncommutative operators are right operations: `a *= &b` assigns
/// `a · b` to `a`; to assign `b · a`, call `a.assign_mul(&b, &a)` with an
/// explicit copy of `a` — the borrow rules do not allow the receiver of a
/// two-operand form to alias an operand.
#[derive(Clone, PartialEq)]
pub struct Mat<E: Entity> {
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
    pub(crate) store: E::Store,
}

impl<E: Entity> Default for Mat<E> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Mat<E> {
    /// Returns an empty matrix of dimension `0×0`.
    #[inline]
    pub fn new() -> Self {
        Self {
            nrows: 0,
            ncols: 0,
            store: E::Store::default(),
        }
    }

    /// Returns a zero-filled matrix with dimensions `(nrows, ncols)`.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            store: E::store_zeroed(nrows * ncols),
        }
    }

    /// Returns a matrix with dimensions `(nrows, ncols)`, all entries equal
    /// to `value`.
    pub fn full(nrows: usize, ncols: usize, value: E) -> Self {
        let mut out = Self::zeros(nrows, ncols);
        out.fill(value);
        out
    }

    /// Returns a matrix with dimensions `(nrows, ncols)`, filled with the
    /// provided function.
    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> E) -> Self {
        let mut out = Self::zeros(nrows, ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                E::store_write(&mut out.store, i * ncols + j, f(i, j));
            }
        }
        out
    }

    /// Returns the square identity matrix of the given dimension.
    pub fn identity(dim: usize) -> Self {
        let mut out = Self::zeros(dim, dim);
        kernel::access::fill_diagonal::<E>(&mut out.store, dim, dim, E::ONE);
        out
    }

    /// Returns the `1×n` matrix whose single row is `v`.
    pub fn from_row(v: &Col<E>) -> Self {
        let mut out = Self::zeros(1, v.len());
        kernel::access::write_row::<E>(&mut out.store, v.len(), 0, &v.store);
        out
    }

    /// Returns the `n×1` matrix whose single column is `v`.
    pub fn from_col(v: &Col<E>) -> Self {
        let mut out = Self::zeros(v.len(), 1);
        kernel::access::write_col::<E>(&mut out.store, v.len(), 1, 0, &v.store);
        out
    }

    /// Returns the square matrix with diagonal `v` and zeros elsewhere.
    pub fn from_diagonal(v: &Col<E>) -> Self {
        let mut out = Self::zeros(v.len(), v.len());
        kernel::access::write_diagonal::<E>(&mut out.store, v.len(), v.len(), &v.store);
        out
    }

    /// Returns the number of rows of the matrix.
    #[inline(always)]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Returns the number of columns of the matrix.
    #[inline(always)]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Returns the total number of entries, `nrows * ncols`.
    #[inline]
    pub fn size(&self) -> usize {
        self.nrows * self.ncols
    }

    /// Returns `true` if the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Panics unless `row` is in `[0, nrows)`.
    #[inline]
    #[track_caller]
    pub fn check_row_index(&self, row: usize) {
        assert!(row < self.nrows);
    }

    /// Panics unless `col` is in `[0, ncols)`.
    #[inline]
    #[track_caller]
    pub fn check_col_index(&self, col: usize) {
        assert!(col < self.ncols);
    }

    /// Returns `true` if `other` has the same shape as `self`, regardless
    /// of its element domain.
    #[inline]
    pub fn has_same_shape<R: Entity>(&self, other: &Mat<R>) -> bool {
        self.nrows == other.nrows && self.ncols == other.ncols
    }

    /// Panics unless `other` has the same shape as `self`.
    #[inline]
    #[track_caller]
    pub fn check_same_shape<R: Entity>(&self, other: &Mat<R>) {
        assert!(all(self.nrows == other.nrows, self.ncols == other.ncols));
    }

    /// Panics unless the matrix is square.
    #[inline]
    #[track_caller]
    pub fn check_square(&self) {
        assert!(self.nrows == self.ncols);
    }

    /// Reads the entry at `(row, col)`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    #[inline]
    #[track_caller]
    pub fn read(&self, row: usize, col: usize) -> E {
        self.check_row_index(row);
        self.check_col_index(col);
        E::store_read(&self.store, row * self.ncols + col)
    }

    /// Writes `value` to the entry at `(row, col)`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    #[inline]
    #[track_caller]
    pub fn write(&mut self, row: usize, col: usize, value: E) {
        self.check_row_index(row);
        self.check_col_index(col);
        E::store_write(&mut self.store, row * self.ncols + col, value);
    }

    /// The resize primitive. A row-count-only change splices whole rows
    /// (truncating or appending zero-filled ones); a column-count change
    /// allocates a fresh store and, when preserving, copies the overlapping
    /// rectangle row by row. The discard path never reads old values.
    fn change_size(&mut self, new_nrows: usize, new_ncols: usize, preserve: bool) {
        if new_nrows == self.nrows && new_ncols == self.ncols {
            return;
        }
        let new_len = new_nrows * new_ncols;
        if !preserve {
            self.store = E::store_zeroed(new_len);
        } else if new_ncols == self.ncols {
            if new_nrows < self.nrows {
                E::store_truncate(&mut self.store, new_len);
            } else {
                E::store_grow_zeroed(&mut self.store, new_len);
            }
        } else {
            #[cfg(feature = "perf-warn")]
            if crate::__perf_warn!(RESIZE_WARN) {
                log::warn!(
                    target: "trilin_perf",
                    "Preserving resize with a column-count change copies the whole matrix."
                );
            }
            let mut fresh = E::store_zeroed(new_len);
            let rows = Ord::min(self.nrows, new_nrows);
            let cols = Ord::min(self.ncols, new_ncols);
            for i in 0..rows {
                E::store_copy_range(&self.store, i * self.ncols, &mut fresh, i * new_ncols, cols);
            }
            self.store = fresh;
        }
        self.nrows = new_nrows;
        self.ncols = new_ncols;
    }

    /// Resizes the matrix to `(nrows, ncols)`, discarding its values. The
    /// surviving contents are unspecified; new entries are zero.
    #[inline]
    pub fn new_size(&mut self, nrows: usize, ncols: usize) {
        self.change_size(nrows, ncols, false);
    }

    /// Resizes the matrix to `(nrows, ncols)`, preserving the overlapping
    /// rectangle and zero-filling new entries.
    #[inline]
    pub fn resize(&mut self, nrows: usize, ncols: usize) {
        self.change_size(nrows, ncols, true);
    }

    /// Sets the number of rows, preserving values as in [`Mat::resize`].
    #[inline]
    pub fn set_nrows(&mut self, nrows: usize) {
        self.resize(nrows, self.ncols);
    }

    /// Sets the number of columns, preserving values as in [`Mat::resize`].
    #[inline]
    pub fn set_ncols(&mut self, ncols: usize) {
        self.resize(self.nrows, ncols);
    }

    /// Moves the backing storage out of `self`, leaving it `0×0`.
    ///
    /// Every receiver-involving algorithm that would otherwise read an
    /// operand cell after overwriting the corresponding receiver cell
    /// (matrix product, non-square transpose) detaches the receiver
    /// through this helper before recomputing into it.
    #[inline]
    pub(crate) fn detach(&mut self) -> Mat<E> {
        core::mem::take(self)
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

    /// Makes the matrix an identity at its current shape: zeros everywhere
    /// except ones on the main diagonal.
    pub fn set_identity(&mut self) {
        self.fill_zero();
        kernel::access::fill_diagonal::<E>(&mut self.store, self.nrows, self.ncols, E::ONE);
    }

    /// Fills all entries with samples from the standard distribution of the
    /// element domain.
    #[cfg(feature = "rand")]
    pub fn fill_random<R: rand::Rng + ?Sized>(&mut self, rng: &mut R)
    where
        Standard: Distribution<E>,
    {
        for i in 0..self.size() {
            E::store_write(&mut self.store, i, Standard.sample(rng));
        }
    }

    /// Returns a copy of row `row` as a vector.
    #[track_caller]
    pub fn row(&self, row: usize) -> Col<E> {
        self.check_row_index(row);
        let mut out = Col::zeros(self.ncols);
        kernel::access::copy_row::<E>(&mut out.store, &self.store, self.ncols, row);
        out
    }

    /// Overwrites row `row` with `v`, widening its elements if needed.
    ///
    /// # Panics
    /// Panics if `row` is out of bounds or `v.len() != ncols`.
    #[track_caller]
    pub fn set_row<A: Widen<E>>(&mut self, row: usize, v: &Col<A>) {
        self.check_row_index(row);
        assert!(v.len() == self.ncols);
        let lifted = A::lift_store(&v.store);
        kernel::access::write_row::<E>(&mut self.store, self.ncols, row, lifted.as_store());
    }

    /// Returns a copy of column `col` as a vector.
    #[track_caller]
    pub fn col(&self, col: usize) -> Col<E> {
        self.check_col_index(col);
        let mut out = Col::zeros(self.nrows);
        kernel::access::copy_col::<E>(&mut out.store, &self.store, self.nrows, self.ncols, col);
        out
    }

    /// Overwrites column `col` with `v`, widening its elements if needed.
    ///
    /// # Panics
    /// Panics if `col` is out of bounds or `v.len() != nrows`.
    #[track_caller]
    pub fn set_col<A: Widen<E>>(&mut self, col: usize, v: &Col<A>) {
        self.check_col_index(col);
        assert!(v.len() == self.nrows);
        let lifted = A::lift_store(&v.store);
        kernel::access::write_col::<E>(&mut self.store, self.nrows, self.ncols, col, lifted.as_store());
    }

    /// Returns a copy of the main diagonal, of length `min(nrows, ncols)`.
    pub fn diagonal(&self) -> Col<E> {
        let mut out = Col::zeros(Ord::min(self.nrows, self.ncols));
        kernel::access::copy_diagonal::<E>(&mut out.store, &self.store, self.nrows, self.ncols);
        out
    }

    /// Overwrites the main diagonal with `v`; off-diagonal entries are
    /// untouched.
    ///
    /// # Panics
    /// Panics unless `v.len() == min(nrows, ncols)`.
    #[track_caller]
    pub fn set_diagonal<A: Widen<E>>(&mut self, v: &Col<A>) {
        assert!(v.len() == Ord::min(self.nrows, self.ncols));
        let lifted = A::lift_store(&v.store);
        kernel::access::write_diagonal::<E>(&mut self.store, self.nrows, self.ncols, lifted.as_store());
    }

    /// Fills the main diagonal with `value`; off-diagonal entries are
    /// untouched.
    pub fn fill_diagonal(&mut self, value: E) {
        kernel::access::fill_diagonal::<E>(&mut self.store, self.nrows, self.ncols, value);
    }

    /// Returns a copy of the `(block_nrows, block_ncols)` rectangle
    /// anchored at `(row, col)`.
    ///
    /// # Panics
    /// Panics unless the rectangle lies within the matrix.
    #[track_caller]
    pub fn block(&self, row: usize, col: usize, block_nrows: usize, block_ncols: usize) -> Mat<E> {
        assert!(all(
            row + block_nrows <= self.nrows,
            col + block_ncols <= self.ncols
        ));
        let mut out = Mat::zeros(block_nrows, block_ncols);
        kernel::access::copy_block::<E>(
            &mut out.store,
            &self.store,
            self.ncols,
            row,
            col,
            block_nrows,
            block_ncols,
        );
        out
    }

    /// Overwrites the rectangle anchored at `(row, col)` with `m`, widening
    /// its elements if needed.
    ///
    /// # Panics
    /// Panics unless `m` lies within the matrix at that anchor.
    #[track_caller]
    pub fn set_block<A: Widen<E>>(&mut self, row: usize, col: usize, m: &Mat<A>) {
        assert!(all(row + m.nrows <= self.nrows, col + m.ncols <= self.ncols));
        let lifted = A::lift_store(&m.store);
        kernel::access::write_block::<E>(
            &mut self.store,
            self.ncols,
            row,
            col,
            lifted.as_store(),
            m.nrows,
            m.ncols,
        );
    }

    /// Returns the signed minor of `self` at `(row, col)`: the matrix with
    /// row `row` and column `col` dropped, negated when `row + col` is odd
    /// (the classical cofactor sign).
    #[track_caller]
    pub fn signed_minor(&self, row: usize, col: usize) -> Mat<E>
    where
        E: Widen<E>,
    {
        let mut out = Mat::new();
        out.assign_signed_minor(self, row, col);
        out
    }

    /// Stores the signed minor of `a` at `(row, col)` into `self`.
    #[track_caller]
    pub fn assign_signed_minor<A: Widen<E>>(&mut self, a: &Mat<A>, row: usize, col: usize) {
        a.check_row_index(row);
        a.check_col_index(col);
        self.new_size(a.nrows - 1, a.ncols - 1);
        let negate = (row + col) % 2 == 1;
        for i in 0..self.nrows {
            let src_i = if i < row { i } else { i + 1 };
            for j in 0..self.ncols {
                let src_j = if j < col { j } else { j + 1 };
                let mut x = A::store_read(&a.store, src_i * a.ncols + src_j).widen();
                if negate {
                    x = x.neg();
                }
                E::store_write(&mut self.store, i * self.ncols + j, x);
            }
        }
    }

    /// Returns the transpose of `self` as a new matrix.
    pub fn transposed(&self) -> Mat<E>
    where
        E: Widen<E>,
    {
        let mut out = Mat::new();
        out.assign_transpose(self);
        out
    }

    /// Stores the transpose of `a` into `self`.
    pub fn assign_transpose<A: Widen<E>>(&mut self, a: &Mat<A>) {
        let lifted = A::lift_store(&a.store);
        self.new_size(a.ncols, a.nrows);
        kernel::access::transpose::<E>(&mut self.store, lifted.as_store(), a.nrows, a.ncols);
    }

    /// Transposes `self` in place. Square matrices transpose by swapping
    /// entries; other shapes detach the storage and recompute.
    pub fn transpose_in_place(&mut self)
    where
        E: Widen<E>,
    {
        if self.is_square() {
            let n = self.ncols;
            for i in 0..n {
                for j in 0..i {
                    E::store_swap(&mut self.store, i * n + j, j * n + i);
                }
            }
        } else {
            let a = self.detach();
            self.assign_transpose(&a);
        }
    }

    /// Stores `a + b` into `self`, resizing it first.
    ///
    /// # Panics
    /// Panics unless `a` and `b` have the same shape.
    #[track_caller]
    pub fn assign_add<A: Widen<E>, B: Widen<E>>(&mut self, a: &Mat<A>, b: &Mat<B>) {
        a.check_same_shape(b);
        let lhs = A::lift_store(&a.store);
        let rhs = B::lift_store(&b.store);
        self.new_size(a.nrows, a.ncols);
        kernel::elementwise::add::<E>(&mut self.store, lhs.as_store(), rhs.as_store());
    }

    /// Stores `a - b` into `self`, resizing it first.
    ///
    /// # Panics
    /// Panics unless `a` and `b` have the same shape.
    #[track_caller]
    pub fn assign_sub<A: Widen<E>, B: Widen<E>>(&mut self, a: &Mat<A>, b: &Mat<B>) {
        a.check_same_shape(b);
        let lhs = A::lift_store(&a.store);
        let rhs = B::lift_store(&b.store);
        self.new_size(a.nrows, a.ncols);
        kernel::elementwise::sub::<E>(&mut self.store, lhs.as_store(), rhs.as_store());
    }

    /// Stores the matrix product `a · b` into `self`, resizing it first.
    ///
    /// # Panics
    /// Panics unless `a.ncols() == b.nrows()`.
    #[track_caller]
    pub fn assign_mul<A: Widen<E>, B: Widen<E>>(&mut self, a: &Mat<A>, b: &Mat<B>) {
        assert!(a.ncols == b.nrows);
        let (m, k, n) = (a.nrows, a.ncols, b.ncols);
        let lhs = A::lift_store(&a.store);
        let rhs = B::lift_store(&b.store);
        self.new_size(m, n);
        kernel::matmul::matmul::<E>(&mut self.store, lhs.as_store(), rhs.as_store(), m, k, n);
    }

    /// Stores `a * factor` into `self`, resizing it first.
    pub fn assign_scaled<A: Widen<E>, S: Widen<E>>(&mut self, a: &Mat<A>, factor: S) {
        let lifted = A::lift_store(&a.store);
        self.new_size(a.nrows, a.ncols);
        kernel::elementwise::scale::<E>(&mut self.store, lifted.as_store(), factor.widen());
    }

    /// Stores `a / divisor` into `self`, resizing it first.
    pub fn assign_div<A: Widen<E>, S: Widen<E>>(&mut self, a: &Mat<A>, divisor: S) {
        let lifted = A::lift_store(&a.store);
        self.new_size(a.nrows, a.ncols);
        kernel::elementwise::div::<E>(&mut self.store, lifted.as_store(), divisor.widen());
    }

    /// Stores the elementwise quotient `numerator / a` into `self`,
    /// resizing it first.
    pub fn assign_scalar_div<S: Widen<E>, A: Widen<E>>(&mut self, numerator: S, a: &Mat<A>) {
        let lifted = A::lift_store(&a.store);
        self.new_size(a.nrows, a.ncols);
        kernel::elementwise::scalar_div::<E>(&mut self.store, numerator.widen(), lifted.as_store());
    }

    /// Stores `-a` into `self`, resizing it first.
    pub fn assign_neg<A: Widen<E>>(&mut self, a: &Mat<A>) {
        let lifted = A::lift_store(&a.store);
        self.new_size(a.nrows, a.ncols);
        kernel::elementwise::neg::<E>(&mut self.store, lifted.as_store());
    }

    /// Stores the entrywise rounding of `a` into `self`, resizing it first.
    pub fn assign_round<A: Widen<E>>(&mut self, a: &Mat<A>) {
        let lifted = A::lift_store(&a.store);
        self.new_size(a.nrows, a.ncols);
        kernel::elementwise::round::<E>(&mut self.store, lifted.as_store());
    }

    /// Stores the entrywise floor of `a` into `self`, resizing it first.
    pub fn assign_floor<A: Widen<E>>(&mut self, a: &Mat<A>) {
        let lifted = A::lift_store(&a.store);
        self.new_size(a.nrows, a.ncols);
        kernel::elementwise::floor::<E>(&mut self.store, lifted.as_store());
    }

    /// Overwrites `self` with `a`, widening its elements if needed.
    pub fn copy_from<A: Widen<E>>(&mut self, a: &Mat<A>) {
        self.store = A::lift_store(&a.store).into_store();
        self.nrows = a.nrows;
        self.ncols = a.ncols;
    }

    /// Returns the entrywise rounding of `self`.
    pub fn rounded(&self) -> Mat<E>
    where
        E: Widen<E>,
    {
        let mut out = Mat::new();
        out.assign_round(self);
        out
    }

    /// Returns the entrywise floor of `self`.
    pub fn floored(&self) -> Mat<E>
    where
        E: Widen<E>,
    {
        let mut out = Mat::new();
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
        for i in 0..self.size() {
            acc += E::store_read(&self.store, i).abs2();
        }
        acc
    }

    /// Returns the Frobenius norm of the matrix.
    pub fn norm_l2(&self) -> f64 {
        self.squared_norm_l2().sqrt()
    }

    /// Returns `true` if all entries vanish within the default tolerance.
    pub fn is_zero(&self) -> bool {
        self.squared_norm_l2() <= self.size() as f64 * EPSILON
    }

    /// Returns `true` if `other` has the same shape and every entry is
    /// within the default tolerance: `|a - b|² <= EPSILON`.
    pub fn approx_eq(&self, other: &Mat<E>) -> bool {
        self.approx_eq_within(other, EPSILON)
    }

    /// Returns `true` if `other` has the same shape and every entry is
    /// within the given tolerance: `|a - b|² <= tol`.
    pub fn approx_eq_within(&self, other: &Mat<E>, tol: f64) -> bool {
        if !self.has_same_shape(other) {
            return false;
        }
        for i in 0..self.size() {
            let diff = E::store_read(&self.store, i).sub(E::store_read(&other.store, i));
            if diff.abs2() > tol {
                return false;
            }
        }
        true
    }

    /// Returns `true` if the matrix is square and symmetric within the
    /// default tolerance.
    pub fn is_symmetric(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.ncols;
        for i in 0..n {
            for j in 0..i {
                let diff = E::store_read(&self.store, i * n + j)
                    .sub(E::store_read(&self.store, j * n + i));
                if diff.abs2() > EPSILON {
                    return false;
                }
            }
        }
        true
    }
}

impl<E: Field> Mat<E> {
    /// Computes the determinant.
    ///
    /// # Panics
    /// Panics unless the matrix is square.
    #[track_caller]
    pub fn determinant(&self) -> E {
        self.check_square();
        let mut work = self.store.clone();
        kernel::lu::decompose::<E>(&mut work, self.nrows)
    }

    /// Computes and returns the inverse of `self`.
    ///
    /// # Panics
    /// Panics unless the matrix is square.
    #[track_caller]
    pub fn inverse(&self) -> Result<Mat<E>, InverseError> {
        let mut out = Mat::new();
        Mat::<E>::assign_inverse(&mut out, self)?;
        Ok(out)
    }

    /// Stores the inverse of `a` into `self`. On failure `self` is left
    /// unchanged.
    ///
    /// # Panics
    /// Panics unless `a` is square.
    #[track_caller]
    pub fn assign_inverse(&mut self, a: &Mat<E>) -> Result<(), InverseError> {
        a.check_square();
        let n = a.nrows;
        let mut inv = E::store_zeroed(n * n);
        if !kernel::solve::invert::<E>(&mut inv, &a.store, n) {
            return Err(InverseError::Singular);
        }
        self.nrows = n;
        self.ncols = n;
        self.store = inv;
        Ok(())
    }

    /// Inverts `self` in place. On failure `self` is left unchanged.
    ///
    /// # Panics
    /// Panics unless the matrix is square.
    #[track_caller]
    pub fn invert_in_place(&mut self) -> Result<(), InverseError> {
        let mut inv = Mat::new();
        Mat::<E>::assign_inverse(&mut inv, self)?;
        *self = inv;
        Ok(())
    }
}

impl Mat<i64> {
    /// Returns the entrywise rounding of a real matrix as an integer
    /// matrix.
    pub fn from_rounded(m: &Mat<f64>) -> Mat<i64> {
        Mat::from_fn(m.nrows, m.ncols, |i, j| m.store[i * m.ncols + j].round() as i64)
    }

    /// Computes the determinant through a real working copy, rounding the
    /// result to the nearest integer.
    ///
    /// # Panics
    /// Panics unless the matrix is square.
    #[track_caller]
    pub fn determinant(&self) -> i64 {
        self.check_square();
        let real = Mat::<f64>::from(self);
        real.determinant().round() as i64
    }

    /// Computes and returns the integer inverse of `self`.
    ///
    /// # Panics
    /// Panics unless the matrix is square.
    #[track_caller]
    pub fn inverse(&self) -> Result<Mat<i64>, InverseError> {
        let mut out = Mat::new();
        Mat::<i64>::assign_inverse(&mut out, self)?;
        Ok(out)
    }

    /// Stores the integer inverse of `a` into `self`. The real inverse is
    /// rounded and multiplied back against `a`; unless the product is
    /// exactly the identity the call fails with
    /// [`InverseError::Inconsistent`], guarding against a non-integer true
    /// inverse silently rounding to a wrong integer result. On failure
    /// `self` is left unchanged.
    ///
    /// # Panics
    /// Panics unless `a` is square.
    #[track_caller]
    pub fn assign_inverse(&mut self, a: &Mat<i64>) -> Result<(), InverseError> {
        a.check_square();
        let real_inv = Mat::<f64>::from(a).inverse()?;
        let inv = Mat::<i64>::from_rounded(&real_inv);
        let n = a.nrows;
        for i in 0..n {
            for j in 0..n {
                let mut sum = 0i64;
                for k in 0..n {
                    sum += inv.read(i, k) * a.read(k, j);
                }
                if sum != i64::from(i == j) {
                    return Err(InverseError::Inconsistent);
                }
            }
        }
        *self = inv;
        Ok(())
    }

    /// Inverts `self` in place. On failure `self` is left unchanged.
    ///
    /// # Panics
    /// Panics unless the matrix is square.
    #[track_caller]
    pub fn invert_in_place(&mut self) -> Result<(), InverseError> {
        let mut inv = Mat::new();
        Mat::<i64>::assign_inverse(&mut inv, self)?;
        *self = inv;
        Ok(())
    }
}

macro_rules! impl_single_plane_views {
    ($ty: ty) => {
        impl Mat<$ty> {
            /// Returns a matrix adopting `data` as its backing store,
            /// row-major. Ownership of the buffer transfers to the matrix;
            /// no copy is made.
            ///
            /// # Panics
            /// Panics unless `data.len() == nrows * ncols`.
            #[track_caller]
            pub fn from_vec(data: Vec<$ty>, nrows: usize, ncols: usize) -> Self {
                assert!(data.len() == nrows * ncols);
                Self {
                    nrows,
                    ncols,
                    store: data,
                }
            }

            /// Returns the backing store, consuming the matrix.
            #[inline]
            pub fn into_vec(self) -> Vec<$ty> {
                self.store
            }

            /// Returns the backing store as a row-major slice.
            ///
            /// This is a live alias of the matrix contents, intended for
            /// zero-copy interop.
            #[inline]
            pub fn as_slice(&self) -> &[$ty] {
                &self.store
            }

            /// Returns the backing store as a mutable row-major slice.
            ///
            /// This is a live alias: writes through it mutate the matrix
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

impl Mat<c64> {
    /// Returns a matrix adopting `re` and `im` as its real and imaginary
    /// planes, row-major. Ownership of both buffers transfers to the
    /// matrix; no copy is made.
    ///
    /// # Panics
    /// Panics unless both planes have length `nrows * ncols`.
    #[track_caller]
    pub fn from_planes(re: Vec<f64>, im: Vec<f64>, nrows: usize, ncols: usize) -> Self {
        assert!(all(re.len() == nrows * ncols, im.len() == nrows * ncols));
        Self {
            nrows,
            ncols,
            store: (re, im),
        }
    }

    /// Returns the real and imaginary planes, consuming the matrix.
    #[inline]
    pub fn into_planes(self) -> (Vec<f64>, Vec<f64>) {
        self.store
    }

    /// Returns the real plane as a row-major slice.
    ///
    /// This is a live alias of the matrix contents, intended for zero-copy
    /// interop.
    #[inline]
    pub fn re(&self) -> &[f64] {
        &self.store.0
    }

    /// Returns the imaginary plane as a row-major slice.
    ///
    /// This is a live alias of the matrix contents, intended for zero-copy
    /// interop.
    #[inline]
    pub fn im(&self) -> &[f64] {
        &self.store.1
    }

    /// Returns the real plane as a mutable row-major slice.
    ///
    /// This is a live alias: writes through it mutate the matrix directly.
    #[inline]
    pub fn re_mut(&mut self) -> &mut [f64] {
        &mut self.store.0
    }

    /// Returns the imaginary plane as a mutable row-major slice.
    ///
    /// This is a live alias: writes through it mutate the matrix directly.
    #[inline]
    pub fn im_mut(&mut self) -> &mut [f64] {
        &mut self.store.1
    }

    /// Returns copies of both planes.
    #[inline]
    pub fn to_planes(&self) -> (Vec<f64>, Vec<f64>) {
        self.store.clone()
    }

    /// Returns the real parts as a real matrix.
    pub fn real_part(&self) -> Mat<f64> {
        Mat {
            nrows: self.nrows,
            ncols: self.ncols,
            store: self.store.0.clone(),
        }
    }

    /// Returns the imaginary parts as a real matrix.
    pub fn imag_part(&self) -> Mat<f64> {
        Mat {
            nrows: self.nrows,
            ncols: self.ncols,
            store: self.store.1.clone(),
        }
    }

    /// Overwrites the real plane with `m`; the imaginary plane is
    /// untouched.
    ///
    /// # Panics
    /// Panics unless `m` has the same shape as `self`.
    #[track_caller]
    pub fn set_real_part(&mut self, m: &Mat<f64>) {
        self.check_same_shape(m);
        self.store.0.copy_from_slice(&m.store);
    }

    /// Overwrites the imaginary plane with `m`; the real plane is
    /// untouched.
    ///
    /// # Panics
    /// Panics unless `m` has the same shape as `self`.
    #[track_caller]
    pub fn set_imag_part(&mut self, m: &Mat<f64>) {
        self.check_same_shape(m);
        self.store.1.copy_from_slice(&m.store);
    }

    /// Returns the entrywise conjugate of `self`.
    pub fn conjugated(&self) -> Mat<c64> {
        let mut out = Mat::new();
        out.assign_conjugate(self);
        out
    }

    /// Stores the entrywise conjugate of `a` into `self`.
    pub fn assign_conjugate(&mut self, a: &Mat<c64>) {
        self.new_size(a.nrows, a.ncols);
        self.store.0.copy_from_slice(&a.store.0);
        for (dst, src) in self.store.1.iter_mut().zip(&a.store.1) {
            *dst = -src;
        }
    }

    /// Conjugates all entries in place by negating the imaginary plane.
    pub fn conjugate_in_place(&mut self) {
        for x in &mut self.store.1 {
            *x = -*x;
        }
    }
}

impl<E: Entity> fmt::Display for Mat<E> {
    /// Renders the matrix as row-grouped tuples, one row per line:
    /// `((a, b), (c, d))`. This is a diagnostic rendering, not a
    /// machine-readable format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for i in 0..self.nrows {
            write!(f, "(")?;
            for j in 0..self.ncols {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", E::store_read(&self.store, i * self.ncols + j))?;
            }
            write!(f, ")")?;
            if i + 1 < self.nrows {
                write!(f, ",\n")?;
            }
        }
        write!(f, ")")
    }
}

impl<E: Entity> fmt::Debug for Mat<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.nrows {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for j in 0..self.ncols {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:?}", E::store_read(&self.store, i * self.ncols + j))?;
            }
            write!(f, "]")?;
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
    fn shape_invariant_holds_across_resizes() {
        let mut A = Mat::<f64>::zeros(3, 4);
        assert!(A.size() == 12);

        A.resize(5, 4);
        assert!(all(A.nrows() == 5, A.ncols() == 4, A.size() == 20));

        A.resize(5, 2);
        assert!(A.size() == 10);

        A.new_size(2, 2);
        assert!(A.size() == 4);
    }

    #[test]
    fn resize_round_trip_preserves_overlap() {
        let A = mat![[1.0, 2.0], [3.0, 4.0]];

        let mut grown = A.clone();
        grown.resize(4, 3);
        for i in 0..2 {
            for j in 0..2 {
                assert!(grown.read(i, j) == A.read(i, j));
            }
        }
        // grown cells are zero
        assert!(grown.read(3, 2) == 0.0);
        assert!(grown.read(0, 2) == 0.0);
        assert!(grown.read(2, 0) == 0.0);

        grown.resize(2, 2);
        assert!(grown == A);
    }

    #[test]
    fn row_splice_keeps_rows_in_place() {
        let mut A = mat![[1i64, 2], [3, 4]];
        A.resize(3, 2);
        assert!(A == mat![[1i64, 2], [3, 4], [0, 0]]);
        A.resize(1, 2);
        assert!(A == mat![[1i64, 2]]);
    }

    #[test]
    fn complex_resize_keeps_planes_congruent() {
        let mut A = Mat::<c64>::full(2, 2, c64::new(1.0, -1.0));
        A.resize(3, 4);
        assert!(A.re().len() == 12);
        assert!(A.im().len() == 12);
        assert!(A.read(1, 1) == c64::new(1.0, -1.0));
        assert!(A.read(2, 3) == c64::new(0.0, 0.0));
    }

    #[test]
    #[should_panic]
    fn out_of_range_read_panics() {
        let A = Mat::<f64>::zeros(2, 2);
        let _ = A.read(2, 0);
    }

    #[test]
    #[should_panic]
    fn mismatched_assign_add_panics() {
        let A = Mat::<f64>::zeros(2, 2);
        let B = Mat::<f64>::zeros(2, 3);
        let mut C = Mat::<f64>::new();
        C.assign_add(&A, &B);
    }

    #[test]
    fn diagonal_round_trip() {
        let mut A = mat![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let d = col![9.0, 8.0];
        A.set_diagonal(&d);
        assert!(A.diagonal() == d);
        // off-diagonal entries untouched
        assert!(A.read(0, 1) == 2.0);
        assert!(A.read(1, 2) == 6.0);
    }

    #[test]
    fn block_and_row_col_round_trips() {
        let A = mat![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];

        let B = A.block(1, 0, 2, 2);
        assert!(B == mat![[4.0, 5.0], [7.0, 8.0]]);

        let mut C = Mat::<f64>::zeros(3, 3);
        C.set_block(1, 1, &B);
        assert!(C.read(2, 2) == 8.0);
        assert!(C.read(0, 0) == 0.0);

        assert!(A.row(1) == col![4.0, 5.0, 6.0]);
        assert!(A.col(2) == col![3.0, 6.0, 9.0]);

        let mut D = A.clone();
        D.set_row(0, &col![0.0, 0.0, 0.0]);
        D.set_col(2, &A.col(0));
        assert!(D.read(0, 0) == 0.0);
        assert!(D.read(2, 2) == 7.0);
    }

    #[test]
    fn signed_minor_applies_cofactor_sign() {
        let A = mat![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        // even position: plain minor
        assert!(A.signed_minor(0, 0) == mat![[5.0, 6.0], [8.0, 9.0]]);
        // odd position: negated
        assert!(A.signed_minor(0, 1) == mat![[-4.0, -6.0], [-7.0, -9.0]]);
    }

    #[test]
    fn transpose_in_place_matches_pure_transpose() {
        let A = mat![[1.0, 2.0], [3.0, 4.0]];
        let mut B = A.clone();
        B.transpose_in_place();
        assert!(B == A.transposed());

        // non-square goes through the detach path
        let C = mat![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let mut D = C.clone();
        D.transpose_in_place();
        assert!(D == C.transposed());
        assert!(all(D.nrows() == 3, D.ncols() == 2));
    }

    #[test]
    fn three_fold_consistency() {
        let A = mat![[2.8, -3.3], [-1.7, 5.2]];
        let B = mat![[-7.9, 8.3], [4.7, -3.2]];

        let pure = &A + &B;
        let mut two_op = Mat::<f64>::new();
        two_op.assign_add(&A, &B);
        let mut receiver = A.clone();
        receiver += &B;

        assert!(pure.approx_eq(&two_op));
        assert!(pure.approx_eq(&receiver));
    }

    #[test]
    fn two_operand_multiply_accepts_repeated_operand() {
        let A = mat![[1.0, 2.0], [3.0, 4.0]];
        let mut C = Mat::<f64>::new();
        C.assign_mul(&A, &A);
        assert!(C.approx_eq(&(&A * &A)));
    }

    #[test]
    fn determinant_and_inverse() {
        let M = mat![[2.0, 0.0], [0.0, 2.0]];
        assert_approx_eq!(M.determinant(), 4.0);

        let inv = M.inverse().unwrap();
        assert!(inv == mat![[0.5, 0.0], [0.0, 0.5]]);

        let id = &M * &inv;
        assert!(id.approx_eq(&Mat::identity(2)));
    }

    #[test]
    fn inverse_of_singular_fails() {
        let M = mat![[1.0, 2.0], [2.0, 4.0]];
        assert!(matches!(M.inverse(), Err(InverseError::Singular)));
    }

    #[test]
    fn integer_inverse_singular_and_inconsistent() {
        let S = mat![[1i64, 2], [2, 4]];
        assert!(matches!(S.inverse(), Err(InverseError::Singular)));

        // invertible over the reals, but the inverse is not integral
        let M = mat![[2i64, 0], [0, 1]];
        assert!(matches!(M.inverse(), Err(InverseError::Inconsistent)));

        let mut in_place = M.clone();
        assert!(in_place.invert_in_place().is_err());
        assert!(in_place == M);

        let U = mat![[1i64, 1], [0, 1]];
        let inv = U.inverse().unwrap();
        assert!(inv == mat![[1i64, -1], [0, 1]]);
        assert!(U.determinant() == 1);
    }

    #[test]
    fn complex_determinant_and_inverse() {
        let M = mat![[c64::i(), c64::new(0.0, 0.0)], [c64::new(0.0, 0.0), c64::i()]];
        let det = M.determinant();
        assert_approx_eq!(det.re, -1.0);
        assert_approx_eq!(det.im, 0.0);

        let inv = M.inverse().unwrap();
        let id = &M * &inv;
        assert!(id.approx_eq(&Mat::identity(2)));
    }

    #[test]
    fn conjugate_negates_imaginary_plane() {
        let M = Mat::<c64>::full(2, 2, c64::new(1.0, 2.0));
        let C = M.conjugated();
        assert!(C.read(0, 0) == c64::new(1.0, -2.0));
        assert!(C.real_part() == M.real_part());

        let mut D = M.clone();
        D.conjugate_in_place();
        assert!(D == C);
    }

    #[test]
    fn views_alias_backing_store() {
        let mut A = mat![[1.0, 2.0], [3.0, 4.0]];
        A.as_slice_mut()[3] = 9.0;
        assert!(A.read(1, 1) == 9.0);

        let mut Z = Mat::<c64>::zeros(1, 2);
        Z.im_mut()[1] = 5.0;
        assert!(Z.read(0, 1) == c64::new(0.0, 5.0));
    }

    #[test]
    fn adopting_constructor_transfers_buffer() {
        let A = Mat::<f64>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        assert!(A.read(1, 0) == 4.0);
        assert!(A.into_vec() == vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    #[should_panic]
    fn adopting_constructor_validates_shape() {
        let _ = Mat::<f64>::from_vec(vec![1.0, 2.0, 3.0], 2, 2);
    }

    #[test]
    fn display_is_row_grouped() {
        let A = mat![[1.0, 2.0], [3.0, 4.0]];
        assert!(A.to_string() == "((1, 2),\n(3, 4))");

        let Z = Mat::<c64>::full(1, 2, c64::new(1.0, -2.0));
        assert!(Z.to_string() == "((1-2i, 1-2i))");
    }

    #[test]
    fn symmetry_and_norms() {
        let A = mat![[1.0, 2.0], [2.0, 1.0]];
        assert!(A.is_symmetric());
        assert!(!mat![[1.0, 2.0], [3.0, 1.0]].is_symmetric());

        assert_approx_eq!(A.squared_norm_l2(), 10.0);
        assert_approx_eq!(mat![[3.0, 4.0]].norm_l2(), 5.0);
        assert!(Mat::<f64>::zeros(2, 2).is_zero());
        assert!(!A.is_zero());
    }

    #[test]
    fn identity_and_fills() {
        let I = Mat::<f64>::identity(3);
        assert!(all(I.read(0, 0) == 1.0, I.read(0, 1) == 0.0));

        let mut A = Mat::<f64>::full(2, 3, 7.0);
        A.set_identity();
        assert!(all(A.read(0, 0) == 1.0, A.read(1, 1) == 1.0, A.read(0, 2) == 0.0));

        A.fill_zero();
        assert!(A.is_zero());
    }

    #[test]
    fn vector_bridges() {
        let v = col![1.0, 2.0, 3.0];
        let row = Mat::from_row(&v);
        assert!(all(row.nrows() == 1, row.ncols() == 3));
        let column = Mat::from_col(&v);
        assert!(all(column.nrows() == 3, column.ncols() == 1));
        let diag = Mat::from_diagonal(&v);
        assert!(all(diag.read(1, 1) == 2.0, diag.read(0, 1) == 0.0));
        assert!(diag.diagonal() == v);
    }

    #[cfg(feature = "rand")]
    #[test]
    fn random_fill_is_deterministic_under_seed() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut A = Mat::<f64>::zeros(3, 3);
        let mut B = Mat::<f64>::zeros(3, 3);
        A.fill_random(&mut StdRng::seed_from_u64(17));
        B.fill_random(&mut StdRng::seed_from_u64(17));
        assert!(A == B);
        assert!(!A.is_zero());
    }
}
