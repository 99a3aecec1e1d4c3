//! Dense matrix and vector value types over integer, real and complex
//! elements.
//!
//! [`Mat`] and [`Col`] specialize over three element domains — `i64`,
//! `f64` and [`c64`] — that share one arithmetic contract. Every operation
//! comes in three forms:
//!
//! - **pure**: the `std::ops` operators allocate a new result and never
//!   mutate their inputs (`&a + &b`, `&a * &b`, `-&a`);
//! - **receiver-mutating**: the `*Assign` operators store the result back
//!   into the left operand (`a += &b`, `a *= &b`);
//! - **two-operand**: the `assign_*` methods store the result of an
//!   operation between their arguments into the receiver, resizing it
//!   first (`c.assign_add(&a, &b)`).
//!
//! Noncommutative operators are *right operations*: `a *= &b` assigns
//! `a · b` to `a`. To assign `b · a` instead, pass an explicit copy to the
//! two-operand form: `a.assign_mul(&b, &a.clone())`. The receiver of a
//! two-operand form can never alias an operand — the borrow rules reject
//! such calls — and the receiver-involving forms that would otherwise read
//! an operand after overwriting it (`*=` with a matrix, non-square
//! in-place transpose) detach the receiver's storage before recomputing.
//!
//! Mixed-domain operands promote to the wider domain under
//! Integer < Real < Complex; see [`Widen`] and [`Promote`]. Scalar factors
//! are wrapped with [`scale`] and widen relative to the matrix the same
//! way.
//!
//! ```
//! use trilin::{mat, scale, Mat};
//!
//! let a = mat![[1.0, 2.0], [3.0, 4.0]];
//! let b = &a * scale(2.0);
//!
//! let sum = &a + &b;
//!
//! let mut c = Mat::<f64>::new();
//! c.assign_add(&a, &b);
//! assert!(c.approx_eq(&sum));
//!
//! let mut d = a.clone();
//! d *= &b;
//! assert!(d.approx_eq(&(&a * &b)));
//! ```
//!
//! Cross-domain arithmetic needs no ceremony:
//!
//! ```
//! use trilin::{mat, Mat, c64};
//!
//! let i = mat![[1i64, 2], [3, 4]];
//! let r = mat![[0.5, 0.5], [0.5, 0.5]];
//! let sum = &i + &r; // Mat<f64>
//! assert!(sum == mat![[1.5, 2.5], [3.5, 4.5]]);
//!
//! let z = &sum + &Mat::<c64>::zeros(2, 2); // Mat<c64>
//! assert!(z.real_part() == sum);
//! ```
//!
//! # Errors
//!
//! Index and shape violations (out-of-range access, operand shape
//! disagreement, non-square input where a square matrix is required) are
//! contract violations and panic immediately with the offending values.
//! The recoverable failures of inversion are reported through
//! [`InverseError`]: [`Singular`](InverseError::Singular) when the matrix
//! is not invertible, and [`Inconsistent`](InverseError::Inconsistent)
//! when the integer domain's rounded inverse fails to reproduce the
//! identity. The floating domains never fail on overflow or division by
//! zero; IEEE-754 infinities and NaNs propagate.
//!
//! # Equality
//!
//! `==` is exact. The floating domains additionally offer tolerance-based
//! comparison: `a.approx_eq(&b)` holds when every entry satisfies
//! `|a - b|² <= EPSILON`, with a caller-supplied tolerance available
//! through `approx_eq_within`.
//!
//! # Views
//!
//! The slice accessors (`as_slice`, `as_slice_mut`, and `re`/`im` on the
//! complex types) hand out live aliases of the backing store for
//! zero-copy interop, and the adopting constructors (`from_vec`,
//! `from_planes`) take ownership of caller buffers without copying. These
//! are the deliberate exceptions to value semantics; everything else
//! copies.

pub mod col;
pub mod complex;
pub mod entity;
pub mod kernel;
pub mod mat;

mod ops;

#[cfg(feature = "rand")]
pub mod stats;

pub use col::Col;
pub use complex::c64;
pub use entity::{Entity, Field, Lifted, Promote, Widen};
pub use mat::Mat;

/// Default comparison tolerance: two entries are equal when the squared
/// modulus of their difference does not exceed this.
pub const EPSILON: f64 = 1e-28;

/// Errors that can occur when inverting a matrix.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[non_exhaustive]
pub enum InverseError {
    /// The matrix is not invertible.
    Singular,
    /// The rounded integer inverse does not reproduce the identity when
    /// multiplied back against the original matrix.
    Inconsistent,
}

impl core::fmt::Display for InverseError {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for InverseError {}

/// Scalar factor in a matrix or vector expression.
///
/// Multiplying by a plain scalar goes through this wrapper so that the
/// scalar's domain can be promoted independently of the matrix's:
/// `&m * scale(2.0)`, `scale(c64::i()) * &m`, `&m / scale(2.0)`, or
/// `scale(1.0) / &m` for the elementwise reciprocal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Scale<E: Entity>(pub E);

impl<E: Entity> Scale<E> {
    /// Returns the wrapped scalar.
    #[inline]
    pub fn value(self) -> E {
        self.0
    }
}

/// Wraps a scalar factor; see [`Scale`].
#[inline]
pub fn scale<E: Entity>(value: E) -> Scale<E> {
    Scale(value)
}

/// Creates a [`Mat`] containing the arguments, row by row.
///
/// All rows must have the same number of entries.
///
/// ```
/// use trilin::mat;
///
/// let m = mat![
///     [1.0, 2.0, 3.0],
///     [4.0, 5.0, 6.0],
/// ];
///
/// assert_eq!(m.nrows(), 2);
/// assert_eq!(m.ncols(), 3);
/// assert_eq!(m.read(1, 0), 4.0);
/// ```
#[macro_export]
macro_rules! mat {
    () => {
        compile_error!("number of columns in the matrix is ambiguous");
    };

    ($([$($v: expr),* $(,)?]),* $(,)?) => {{
        let data = [$([$($v),*]),*];
        let nrows = data.len();
        let ncols = if nrows == 0 { 0 } else { data[0].len() };
        $crate::Mat::from_fn(nrows, ncols, |i, j| data[i][j])
    }};
}

/// Creates a [`Col`] containing the arguments.
///
/// ```
/// use trilin::col;
///
/// let v = col![1.0, 2.0, 3.0];
/// assert_eq!(v.len(), 3);
/// assert_eq!(v.read(2), 3.0);
/// ```
#[macro_export]
macro_rules! col {
    () => {
        compile_error!("the element type of an empty vector is ambiguous");
    };

    ($($v: expr),+ $(,)?) => {{
        let data = [$($v),+];
        $crate::Col::from_fn(data.len(), |i| data[i])
    }};
}

#[cfg(feature = "perf-warn")]
#[macro_export]
#[doc(hidden)]
macro_rules! __perf_warn {
    ($name: ident) => {{
        #[inline(always)]
        #[allow(non_snake_case)]
        fn $name() -> &'static ::core::sync::atomic::AtomicBool {
            static $name: ::core::sync::atomic::AtomicBool =
                ::core::sync::atomic::AtomicBool::new(false);
            &$name
        }
        ::core::matches!(
            $name().compare_exchange(
                false,
                true,
                ::core::sync::atomic::Ordering::Relaxed,
                ::core::sync::atomic::Ordering::Relaxed,
            ),
            Ok(_)
        )
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_construction() {
        let m = mat![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(m.read(0, 1), 2.0);
        assert_eq!(m.read(1, 1), 4.0);

        let v = col![1i64, 2, 3];
        assert_eq!(v.read(0), 1);
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn inverse_error_renders() {
        assert_eq!(InverseError::Singular.to_string(), "Singular");
        assert_eq!(InverseError::Inconsistent.to_string(), "Inconsistent");
    }

    #[test]
    fn scale_wraps_value() {
        assert_eq!(scale(2.5).value(), 2.5);
        assert_eq!(scale(c64::i()).value(), c64::new(0.0, 1.0));
    }
}
