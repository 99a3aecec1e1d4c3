//! Operator implementations and cross-domain promotion adapters.
//!
//! The pure form of the arithmetic protocol is spelled with `std::ops`
//! operators, available in every owned/borrowed combination of the nine
//! ordered domain pairings; the result domain is the wider operand under
//! Integer < Real < Complex ([`Promote`]). The receiver-mutating form is
//! the corresponding `*Assign` operator, accepting any operand domain that
//! widens into the receiver's.
//!
//! Matrix multiplication is a right operation: `a *= &b` assigns `a · b`
//! to `a`. Scalar factors go through the [`Scale`](crate::Scale) wrapper:
//! `&a * scale(2.0)`, `scale(c64::i()) * &a`, `&a / scale(2.0)`, and
//! `scale(1.0) / &a` for the elementwise reciprocal form.

use crate::col::Col;
use crate::complex::c64;
use crate::entity::{Entity, Promote, Widen};
use crate::kernel;
use crate::mat::Mat;
use crate::Scale;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

impl<L: Entity, R: Entity> Add<&Mat<R>> for &Mat<L>
where
    L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
    R: Widen<<L as Promote<R>>::Wider>,
{
    type Output = Mat<<L as Promote<R>>::Wider>;
    #[track_caller]
    fn add(self, rhs: &Mat<R>) -> Self::Output {
        let mut out = Mat::new();
        out.assign_add(self, rhs);
        out
    }
}

impl<L: Entity, R: Entity> Sub<&Mat<R>> for &Mat<L>
where
    L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
    R: Widen<<L as Promote<R>>::Wider>,
{
    type Output = Mat<<L as Promote<R>>::Wider>;
    #[track_caller]
    fn sub(self, rhs: &Mat<R>) -> Self::Output {
        let mut out = Mat::new();
        out.assign_sub(self, rhs);
        out
    }
}

impl<L: Entity, R: Entity> Mul<&Mat<R>> for &Mat<L>
where
    L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
    R: Widen<<L as Promote<R>>::Wider>,
{
    type Output = Mat<<L as Promote<R>>::Wider>;
    #[track_caller]
    fn mul(self, rhs: &Mat<R>) -> Self::Output {
        let mut out = Mat::new();
        out.assign_mul(self, rhs);
        out
    }
}

impl<L: Entity, R: Entity> Mul<&Col<R>> for &Mat<L>
where
    L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
    R: Widen<<L as Promote<R>>::Wider>,
{
    type Output = Col<<L as Promote<R>>::Wider>;
    #[track_caller]
    fn mul(self, rhs: &Col<R>) -> Self::Output {
        let mut out = Col::new();
        out.assign_mul(self, rhs);
        out
    }
}

impl<L: Entity, R: Entity> Add<&Col<R>> for &Col<L>
where
    L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
    R: Widen<<L as Promote<R>>::Wider>,
{
    type Output = Col<<L as Promote<R>>::Wider>;
    #[track_caller]
    fn add(self, rhs: &Col<R>) -> Self::Output {
        let mut out = Col::new();
        out.assign_add(self, rhs);
        out
    }
}

impl<L: Entity, R: Entity> Sub<&Col<R>> for &Col<L>
where
    L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
    R: Widen<<L as Promote<R>>::Wider>,
{
    type Output = Col<<L as Promote<R>>::Wider>;
    #[track_caller]
    fn sub(self, rhs: &Col<R>) -> Self::Output {
        let mut out = Col::new();
        out.assign_sub(self, rhs);
        out
    }
}

macro_rules! impl_owned_variants {
    ($op: ident, $method: ident, $Lhs: ident, $Rhs: ident, $Out: ident) => {
        impl<L: Entity, R: Entity> $op<$Rhs<R>> for $Lhs<L>
        where
            L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
            R: Widen<<L as Promote<R>>::Wider>,
        {
            type Output = $Out<<L as Promote<R>>::Wider>;
            #[track_caller]
            fn $method(self, rhs: $Rhs<R>) -> Self::Output {
                (&self).$method(&rhs)
            }
        }

        impl<L: Entity, R: Entity> $op<&$Rhs<R>> for $Lhs<L>
        where
            L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
            R: Widen<<L as Promote<R>>::Wider>,
        {
            type Output = $Out<<L as Promote<R>>::Wider>;
            #[track_caller]
            fn $method(self, rhs: &$Rhs<R>) -> Self::Output {
                (&self).$method(rhs)
            }
        }

        impl<L: Entity, R: Entity> $op<$Rhs<R>> for &$Lhs<L>
        where
            L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
            R: Widen<<L as Promote<R>>::Wider>,
        {
            type Output = $Out<<L as Promote<R>>::Wider>;
            #[track_caller]
            fn $method(self, rhs: $Rhs<R>) -> Self::Output {
                self.$method(&rhs)
            }
        }
    };
}

impl_owned_variants!(Add, add, Mat, Mat, Mat);
impl_owned_variants!(Sub, sub, Mat, Mat, Mat);
impl_owned_variants!(Mul, mul, Mat, Mat, Mat);
impl_owned_variants!(Mul, mul, Mat, Col, Col);
impl_owned_variants!(Add, add, Col, Col, Col);
impl_owned_variants!(Sub, sub, Col, Col, Col);

impl<E: Entity> Neg for &Mat<E> {
    type Output = Mat<E>;
    fn neg(self) -> Mat<E> {
        let mut out = Mat::zeros(self.nrows(), self.ncols());
        kernel::elementwise::neg::<E>(&mut out.store, &self.store);
        out
    }
}

impl<E: Entity> Neg for Mat<E> {
    type Output = Mat<E>;
    fn neg(self) -> Mat<E> {
        -&self
    }
}

impl<E: Entity> Neg for &Col<E> {
    type Output = Col<E>;
    fn neg(self) -> Col<E> {
        let mut out = Col::zeros(self.len());
        kernel::elementwise::neg::<E>(&mut out.store, &self.store);
        out
    }
}

impl<E: Entity> Neg for Col<E> {
    type Output = Col<E>;
    fn neg(self) -> Col<E> {
        -&self
    }
}

impl<L: Entity, R: Widen<L>> AddAssign<&Mat<R>> for Mat<L> {
    #[track_caller]
    fn add_assign(&mut self, rhs: &Mat<R>) {
        self.check_same_shape(rhs);
        let lifted = R::lift_store(&rhs.store);
        kernel::elementwise::add_assign::<L>(&mut self.store, lifted.as_store());
    }
}

impl<L: Entity, R: Widen<L>> SubAssign<&Mat<R>> for Mat<L> {
    #[track_caller]
    fn sub_assign(&mut self, rhs: &Mat<R>) {
        self.check_same_shape(rhs);
        let lifted = R::lift_store(&rhs.store);
        kernel::elementwise::sub_assign::<L>(&mut self.store, lifted.as_store());
    }
}

/// Right multiplication: `a *= &b` assigns `a · b` to `a`. The receiver's
/// storage is detached before the product is computed, so the operand is
/// never read after a receiver cell has been written.
impl<L: Entity, R: Widen<L>> MulAssign<&Mat<R>> for Mat<L>
where
    L: Widen<L>,
{
    #[track_caller]
    fn mul_assign(&mut self, rhs: &Mat<R>) {
        #[cfg(feature = "perf-warn")]
        if crate::__perf_warn!(MUL_ASSIGN_WARN) {
            log::warn!(
                target: "trilin_perf",
                "In-place matrix multiplication detaches the receiver's storage and reallocates."
            );
        }
        let lhs = self.detach();
        self.assign_mul(&lhs, rhs);
    }
}

impl<L: Entity, R: Widen<L>> AddAssign<&Col<R>> for Col<L> {
    #[track_caller]
    fn add_assign(&mut self, rhs: &Col<R>) {
        self.check_same_len(rhs);
        let lifted = R::lift_store(&rhs.store);
        kernel::elementwise::add_assign::<L>(&mut self.store, lifted.as_store());
    }
}

impl<L: Entity, R: Widen<L>> SubAssign<&Col<R>> for Col<L> {
    #[track_caller]
    fn sub_assign(&mut self, rhs: &Col<R>) {
        self.check_same_len(rhs);
        let lifted = R::lift_store(&rhs.store);
        kernel::elementwise::sub_assign::<L>(&mut self.store, lifted.as_store());
    }
}

macro_rules! impl_assign_owned_variants {
    ($op: ident, $method: ident, $Lhs: ident, $Rhs: ident) => {
        impl<L: Entity, R: Widen<L>> $op<$Rhs<R>> for $Lhs<L>
        where
            $Lhs<L>: for<'a> $op<&'a $Rhs<R>>,
        {
            #[track_caller]
            fn $method(&mut self, rhs: $Rhs<R>) {
                self.$method(&rhs);
            }
        }
    };
}

impl_assign_owned_variants!(AddAssign, add_assign, Mat, Mat);
impl_assign_owned_variants!(SubAssign, sub_assign, Mat, Mat);
impl_assign_owned_variants!(MulAssign, mul_assign, Mat, Mat);
impl_assign_owned_variants!(AddAssign, add_assign, Col, Col);
impl_assign_owned_variants!(SubAssign, sub_assign, Col, Col);

impl<L: Entity, R: Entity> Mul<Scale<R>> for &Mat<L>
where
    L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
    R: Widen<<L as Promote<R>>::Wider>,
{
    type Output = Mat<<L as Promote<R>>::Wider>;
    fn mul(self, rhs: Scale<R>) -> Self::Output {
        let mut out = Mat::new();
        out.assign_scaled(self, rhs.0);
        out
    }
}

impl<L: Entity, R: Entity> Mul<&Mat<R>> for Scale<L>
where
    L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
    R: Widen<<L as Promote<R>>::Wider>,
{
    type Output = Mat<<L as Promote<R>>::Wider>;
    fn mul(self, rhs: &Mat<R>) -> Self::Output {
        let mut out = Mat::new();
        out.assign_scaled(rhs, self.0);
        out
    }
}

impl<L: Entity, R: Entity> Div<Scale<R>> for &Mat<L>
where
    L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
    R: Widen<<L as Promote<R>>::Wider>,
{
    type Output = Mat<<L as Promote<R>>::Wider>;
    fn div(self, rhs: Scale<R>) -> Self::Output {
        let mut out = Mat::new();
        out.assign_div(self, rhs.0);
        out
    }
}

impl<L: Entity, R: Entity> Div<&Mat<R>> for Scale<L>
where
    L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
    R: Widen<<L as Promote<R>>::Wider>,
{
    type Output = Mat<<L as Promote<R>>::Wider>;
    fn div(self, rhs: &Mat<R>) -> Self::Output {
        let mut out = Mat::new();
        out.assign_scalar_div(self.0, rhs);
        out
    }
}

impl<L: Entity, R: Entity> Mul<Scale<R>> for &Col<L>
where
    L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
    R: Widen<<L as Promote<R>>::Wider>,
{
    type Output = Col<<L as Promote<R>>::Wider>;
    fn mul(self, rhs: Scale<R>) -> Self::Output {
        let mut out = Col::new();
        out.assign_scaled(self, rhs.0);
        out
    }
}

impl<L: Entity, R: Entity> Mul<&Col<R>> for Scale<L>
where
    L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
    R: Widen<<L as Promote<R>>::Wider>,
{
    type Output = Col<<L as Promote<R>>::Wider>;
    fn mul(self, rhs: &Col<R>) -> Self::Output {
        let mut out = Col::new();
        out.assign_scaled(rhs, self.0);
        out
    }
}

impl<L: Entity, R: Entity> Div<Scale<R>> for &Col<L>
where
    L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
    R: Widen<<L as Promote<R>>::Wider>,
{
    type Output = Col<<L as Promote<R>>::Wider>;
    fn div(self, rhs: Scale<R>) -> Self::Output {
        let mut out = Col::new();
        out.assign_div(self, rhs.0);
        out
    }
}

impl<L: Entity, R: Entity> Div<&Col<R>> for Scale<L>
where
    L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
    R: Widen<<L as Promote<R>>::Wider>,
{
    type Output = Col<<L as Promote<R>>::Wider>;
    fn div(self, rhs: &Col<R>) -> Self::Output {
        let mut out = Col::new();
        out.assign_scalar_div(self.0, rhs);
        out
    }
}

macro_rules! impl_scale_owned_variants {
    ($Container: ident) => {
        impl<L: Entity, R: Entity> Mul<Scale<R>> for $Container<L>
        where
            L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
            R: Widen<<L as Promote<R>>::Wider>,
        {
            type Output = $Container<<L as Promote<R>>::Wider>;
            fn mul(self, rhs: Scale<R>) -> Self::Output {
                (&self).mul(rhs)
            }
        }

        impl<L: Entity, R: Entity> Mul<$Container<R>> for Scale<L>
        where
            L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
            R: Widen<<L as Promote<R>>::Wider>,
        {
            type Output = $Container<<L as Promote<R>>::Wider>;
            fn mul(self, rhs: $Container<R>) -> Self::Output {
                self.mul(&rhs)
            }
        }

        impl<L: Entity, R: Entity> Div<Scale<R>> for $Container<L>
        where
            L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
            R: Widen<<L as Promote<R>>::Wider>,
        {
            type Output = $Container<<L as Promote<R>>::Wider>;
            fn div(self, rhs: Scale<R>) -> Self::Output {
                (&self).div(rhs)
            }
        }

        impl<L: Entity, R: Entity> Div<$Container<R>> for Scale<L>
        where
            L: Promote<R> + Widen<<L as Promote<R>>::Wider>,
            R: Widen<<L as Promote<R>>::Wider>,
        {
            type Output = $Container<<L as Promote<R>>::Wider>;
            fn div(self, rhs: $Container<R>) -> Self::Output {
                self.div(&rhs)
            }
        }

        impl<L: Entity, R: Widen<L>> MulAssign<Scale<R>> for $Container<L> {
            fn mul_assign(&mut self, rhs: Scale<R>) {
                kernel::elementwise::scale_assign::<L>(&mut self.store, rhs.0.widen());
            }
        }

        impl<L: Entity, R: Widen<L>> DivAssign<Scale<R>> for $Container<L> {
            fn div_assign(&mut self, rhs: Scale<R>) {
                kernel::elementwise::div_assign::<L>(&mut self.store, rhs.0.widen());
            }
        }
    };
}

impl_scale_owned_variants!(Mat);
impl_scale_owned_variants!(Col);

macro_rules! impl_from_widening {
    ($src: ty => $dst: ty) => {
        impl From<&Mat<$src>> for Mat<$dst> {
            fn from(src: &Mat<$src>) -> Self {
                let mut out = Mat::new();
                out.copy_from(src);
                out
            }
        }

        impl From<&Col<$src>> for Col<$dst> {
            fn from(src: &Col<$src>) -> Self {
                let mut out = Col::new();
                out.copy_from(src);
                out
            }
        }
    };
}

impl_from_widening!(i64 => f64);
impl_from_widening!(i64 => c64);
impl_from_widening!(f64 => c64);

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::{col, mat, scale};
    use equator::assert;

    #[test]
    fn promotion_chain() {
        let I = mat![[1i64, 2], [3, 4]];
        let R = mat![[0.5, 0.5], [0.5, 0.5]];

        let sum = &I + &R;
        assert!(sum == mat![[1.5, 2.5], [3.5, 4.5]]);

        let Z = Mat::<c64>::zeros(2, 2);
        let promoted = &sum + &Z;
        assert!(promoted.real_part() == sum);
        assert!(promoted.imag_part().is_zero());
    }

    #[test]
    fn ordered_pairings_commute_through_widening() {
        let I = mat![[1i64, 2], [3, 4]];
        let R = mat![[0.5, 0.5], [0.5, 0.5]];
        assert!(&I + &R == &R + &I);

        let Z = Mat::<c64>::full(2, 2, c64::i());
        assert!((&I + &Z) == (&Z + &I));
    }

    #[test]
    fn owned_and_borrowed_combinations_agree() {
        let A = mat![[2.8, -3.3], [-1.7, 5.2]];
        let B = mat![[-7.9, 8.3], [4.7, -3.2]];
        let expected = &A + &B;

        assert!(A.clone() + B.clone() == expected);
        assert!(A.clone() + &B == expected);
        assert!(&A + B.clone() == expected);
    }

    #[test]
    fn matrix_product_is_noncommutative() {
        let A = Mat::<c64>::from_fn(2, 3, |i, j| c64::new((i + j) as f64, 1.0));
        let B = Mat::<c64>::from_fn(3, 2, |i, j| c64::new(1.0, (i * j) as f64));

        let AB = &A * &B;
        let BA = &B * &A;
        assert!(all(AB.nrows() == 2, AB.ncols() == 2));
        assert!(all(BA.nrows() == 3, BA.ncols() == 3));
    }

    #[test]
    fn right_operation_convention() {
        let A = mat![[1.0, 2.0], [3.0, 4.0]];
        let B = mat![[0.0, 1.0], [1.0, 0.0]];

        let mut M = A.clone();
        M *= &B;
        assert!(M == &A * &B);
        assert!(M != &B * &A);

        // b * a into a requires spelling the copy explicitly
        let mut N = A.clone();
        let copy = N.clone();
        N.assign_mul(&B, &copy);
        assert!(N == &B * &A);
    }

    #[test]
    fn in_place_product_matches_pure_product() {
        let A = mat![[1.0, 2.0], [3.0, 4.0]];
        let mut M = A.clone();
        M *= &A.clone();
        assert!(M.approx_eq(&(&A * &A)));
    }

    #[test]
    fn scalar_forms() {
        let A = mat![[1.0, 2.0], [4.0, 8.0]];

        assert!(&A * scale(2.0) == mat![[2.0, 4.0], [8.0, 16.0]]);
        assert!(scale(2.0) * &A == &A * scale(2.0));
        assert!(&A / scale(2.0) == mat![[0.5, 1.0], [2.0, 4.0]]);
        assert!(scale(8.0) / &A == mat![[8.0, 4.0], [2.0, 1.0]]);

        let mut B = A.clone();
        B *= scale(2.0);
        B /= scale(4.0);
        assert!(B == &A / scale(2.0));

        // integer matrix by a real scalar promotes
        let I = mat![[1i64, 2], [3, 4]];
        assert!(&I * scale(0.5) == mat![[0.5, 1.0], [1.5, 2.0]]);

        // complex scale of a real matrix
        let Z = &A * scale(c64::i());
        assert!(Z.read(0, 1) == c64::new(0.0, 2.0));
    }

    #[test]
    fn complex_division_by_zero_scalar_propagates() {
        let Z = Mat::<c64>::full(1, 2, c64::new(1.0, -1.0));
        let Q = &Z / scale(c64::new(0.0, 0.0));
        assert!(Q.read(0, 0).re.is_infinite());
        assert!(Q.read(0, 0).im.is_infinite());
    }

    #[test]
    fn negation() {
        let A = mat![[1.0, -2.0]];
        assert!(-&A == mat![[-1.0, 2.0]]);
        let v = col![1i64, -2];
        assert!(-v == col![-1i64, 2]);
    }

    #[test]
    fn widening_conversions() {
        let I = mat![[1i64, 2], [3, 4]];
        let R = Mat::<f64>::from(&I);
        assert!(R == mat![[1.0, 2.0], [3.0, 4.0]]);

        let Z = Mat::<c64>::from(&R);
        assert!(Z.real_part() == R);
        assert!(Z.imag_part().is_zero());

        let v = Col::<c64>::from(&col![1i64, -1]);
        assert!(v.read(1) == c64::new(-1.0, 0.0));
    }

    #[test]
    fn cross_domain_receiver_accumulation() {
        let mut R = mat![[1.0, 1.0]];
        R += &mat![[1i64, 2]];
        assert!(R == mat![[2.0, 3.0]]);

        let mut Z = Mat::<c64>::zeros(1, 2);
        Z -= &R;
        assert!(Z.read(0, 1) == c64::new(-3.0, 0.0));
    }
}
