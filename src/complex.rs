//! Native complex floating point type with real and imaginary parts stored
//! side by side.

use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

#[cfg(feature = "rand")]
use rand::distributions::{Distribution, Standard};
#[cfg(feature = "rand")]
use rand_distr::StandardNormal;

/// 64-bit complex floating point type.
///
/// Arithmetic follows IEEE-754 componentwise: overflow and division by zero
/// never fail, they produce infinities and NaNs that propagate through
/// subsequent operations.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, PartialEq, Default)]
#[repr(C)]
pub struct c64 {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl c64 {
    /// Create a new complex number.
    #[inline(always)]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Construct the imaginary unit.
    #[inline(always)]
    pub const fn i() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Create a complex number with a zero imaginary part.
    #[inline(always)]
    pub const fn from_real(re: f64) -> Self {
        Self::new(re, 0.0)
    }

    /// Returns the complex conjugate of `self`.
    #[inline(always)]
    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// Returns the squared modulus of `self`.
    #[inline(always)]
    pub fn abs2(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Returns the modulus of `self`.
    #[inline(always)]
    pub fn abs(self) -> f64 {
        self.abs2().sqrt()
    }

    /// Returns the multiplicative inverse of `self`.
    #[inline(always)]
    pub fn recip(self) -> Self {
        Self::from_real(1.0) / self
    }

    /// Rounds both components to the nearest integer value.
    #[inline(always)]
    pub fn round(self) -> Self {
        Self::new(self.re.round(), self.im.round())
    }

    /// Takes the floor of both components.
    #[inline(always)]
    pub fn floor(self) -> Self {
        Self::new(self.re.floor(), self.im.floor())
    }
}

impl Add for c64 {
    type Output = c64;
    #[inline(always)]
    fn add(self, rhs: c64) -> c64 {
        c64::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for c64 {
    type Output = c64;
    #[inline(always)]
    fn sub(self, rhs: c64) -> c64 {
        c64::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for c64 {
    type Output = c64;
    #[inline(always)]
    fn mul(self, rhs: c64) -> c64 {
        c64::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div for c64 {
    type Output = c64;
    #[inline(always)]
    fn div(self, rhs: c64) -> c64 {
        let denom = rhs.re * rhs.re + rhs.im * rhs.im;
        if denom == 0.0 {
            // Division by zero does not fail: the components are divided by
            // zero and the resulting infinities/NaNs propagate.
            return c64::new(self.re / denom, self.im / denom);
        }
        c64::new(
            (self.re * rhs.re + self.im * rhs.im) / denom,
            (self.im * rhs.re - self.re * rhs.im) / denom,
        )
    }
}

impl Neg for c64 {
    type Output = c64;
    #[inline(always)]
    fn neg(self) -> c64 {
        c64::new(-self.re, -self.im)
    }
}

impl AddAssign for c64 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: c64) {
        *self = *self + rhs;
    }
}

impl SubAssign for c64 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: c64) {
        *self = *self - rhs;
    }
}

impl MulAssign for c64 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: c64) {
        *self = *self * rhs;
    }
}

impl DivAssign for c64 {
    #[inline(always)]
    fn div_assign(&mut self, rhs: c64) {
        *self = *self / rhs;
    }
}

impl From<f64> for c64 {
    #[inline(always)]
    fn from(re: f64) -> Self {
        Self::from_real(re)
    }
}

impl fmt::Display for c64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:+}i", self.re, self.im)
    }
}

impl fmt::Debug for c64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(feature = "rand")]
impl Distribution<c64> for Standard {
    #[inline]
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> c64 {
        c64::new(rng.gen::<f64>(), rng.gen::<f64>())
    }
}

#[cfg(feature = "rand")]
impl Distribution<c64> for StandardNormal {
    #[inline]
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> c64 {
        let re: f64 = StandardNormal.sample(rng);
        let im: f64 = StandardNormal.sample(rng);
        c64::new(re, im)
    }
}

#[cfg(test)]
mod tests {
    use super::c64;

    #[test]
    fn arithmetic() {
        let a = c64::new(1.0, 2.0);
        let b = c64::new(3.0, -1.0);

        assert_eq!(a + b, c64::new(4.0, 1.0));
        assert_eq!(a - b, c64::new(-2.0, 3.0));
        assert_eq!(a * b, c64::new(5.0, 5.0));
        assert_eq!(-a, c64::new(-1.0, -2.0));
        assert_eq!(a * b / b, a);
    }

    #[test]
    fn conj_and_modulus() {
        let a = c64::new(3.0, 4.0);
        assert_eq!(a.conj(), c64::new(3.0, -4.0));
        assert_eq!(a.abs2(), 25.0);
        assert_eq!(a.abs(), 5.0);
        assert_eq!((a * a.recip()).re, 1.0);
    }

    #[test]
    fn division_by_zero_propagates() {
        let a = c64::new(1.0, -1.0);
        let q = a / c64::new(0.0, 0.0);
        assert!(q.re.is_infinite());
        assert!(q.im.is_infinite());

        let z = c64::new(0.0, 0.0) / c64::new(0.0, 0.0);
        assert!(z.re.is_nan());
        assert!(z.im.is_nan());
    }

    #[test]
    fn display() {
        assert_eq!(c64::new(1.5, 2.0).to_string(), "1.5+2i");
        assert_eq!(c64::new(0.0, -1.0).to_string(), "0-1i");
    }
}
