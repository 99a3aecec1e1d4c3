//! Random matrix and vector sampling.

use crate::entity::{Entity, Field, Widen};
use crate::{Col, Mat};
use rand::distributions::{Distribution, Standard};
use rand_distr::StandardNormal;

/// The normal distribution, `N(mean, std_dev**2)`.
pub struct Normal<E: Field> {
    mean: E,
    std_dev: f64,
}

impl<E: Field> Normal<E> {
    /// Construct from mean and standard deviation (must be finite).
    pub fn new(mean: E, std_dev: f64) -> Result<Self, rand_distr::NormalError> {
        if !std_dev.is_finite() {
            return Err(rand_distr::NormalError::BadVariance);
        }
        Ok(Self { mean, std_dev })
    }
}

/// The normal distribution, `N(mean, std_dev**2)` for `0 <= i < nrows`,
/// `0 <= j < ncols`.
pub struct NormalMat<E: Field> {
    /// Number of rows of the sampled matrix.
    pub nrows: usize,
    /// Number of columns of the sampled matrix.
    pub ncols: usize,
    /// Normal distribution parameters for a single scalar.
    pub normal: Normal<E>,
}

/// The standard normal distribution, `N(0, 1)` for `0 <= i < nrows`,
/// `0 <= j < ncols`.
pub struct StandardNormalMat {
    /// Number of rows of the sampled matrix.
    pub nrows: usize,
    /// Number of columns of the sampled matrix.
    pub ncols: usize,
}

/// The standard distribution. Samples uniformly distributed values for
/// `0 <= i < nrows`, `0 <= j < ncols`.
pub struct StandardMat {
    /// Number of rows of the sampled matrix.
    pub nrows: usize,
    /// Number of columns of the sampled matrix.
    pub ncols: usize,
}

/// The normal distribution, `N(mean, std_dev**2)` for `0 <= i < len`.
pub struct NormalCol<E: Field> {
    /// Length of the sampled vector.
    pub len: usize,
    /// Normal distribution parameters for a single scalar.
    pub normal: Normal<E>,
}

/// The standard normal distribution, `N(0, 1)` for `0 <= i < len`.
pub struct StandardNormalCol {
    /// Length of the sampled vector.
    pub len: usize,
}

/// The standard distribution. Samples uniformly distributed values for
/// `0 <= i < len`.
pub struct StandardCol {
    /// Length of the sampled vector.
    pub len: usize,
}

impl<E: Field> Distribution<Mat<E>> for NormalMat<E>
where
    StandardNormal: Distribution<E>,
    f64: Widen<E>,
{
    fn sample<R: rand::prelude::Rng + ?Sized>(&self, rng: &mut R) -> Mat<E> {
        Mat::from_fn(self.nrows, self.ncols, |_, _| {
            let z: E = StandardNormal.sample(rng);
            self.normal
                .mean
                .add(z.mul(Widen::<E>::widen(self.normal.std_dev)))
        })
    }
}

impl<E: Field> Distribution<Mat<E>> for StandardNormalMat
where
    StandardNormal: Distribution<E>,
{
    fn sample<R: rand::prelude::Rng + ?Sized>(&self, rng: &mut R) -> Mat<E> {
        Mat::from_fn(self.nrows, self.ncols, |_, _| StandardNormal.sample(rng))
    }
}

impl<E: Entity> Distribution<Mat<E>> for StandardMat
where
    Standard: Distribution<E>,
{
    fn sample<R: rand::prelude::Rng + ?Sized>(&self, rng: &mut R) -> Mat<E> {
        Mat::from_fn(self.nrows, self.ncols, |_, _| Standard.sample(rng))
    }
}

impl<E: Field> Distribution<Col<E>> for NormalCol<E>
where
    StandardNormal: Distribution<E>,
    f64: Widen<E>,
{
    fn sample<R: rand::prelude::Rng + ?Sized>(&self, rng: &mut R) -> Col<E> {
        Col::from_fn(self.len, |_| {
            let z: E = StandardNormal.sample(rng);
            self.normal
                .mean
                .add(z.mul(Widen::<E>::widen(self.normal.std_dev)))
        })
    }
}

impl<E: Field> Distribution<Col<E>> for StandardNormalCol
where
    StandardNormal: Distribution<E>,
{
    fn sample<R: rand::prelude::Rng + ?Sized>(&self, rng: &mut R) -> Col<E> {
        Col::from_fn(self.len, |_| StandardNormal.sample(rng))
    }
}

impl<E: Entity> Distribution<Col<E>> for StandardCol
where
    Standard: Distribution<E>,
{
    fn sample<R: rand::prelude::Rng + ?Sized>(&self, rng: &mut R) -> Col<E> {
        Col::from_fn(self.len, |_| Standard.sample(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c64;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sampling_is_deterministic_under_seed() {
        let dist = StandardMat { nrows: 2, ncols: 3 };
        let a: Mat<f64> = dist.sample(&mut StdRng::seed_from_u64(42));
        let b: Mat<f64> = dist.sample(&mut StdRng::seed_from_u64(42));
        assert!(a == b);
        assert!(a.size() == 6);
    }

    #[test]
    fn complex_samples_fill_both_planes() {
        let dist = StandardNormalMat { nrows: 4, ncols: 4 };
        let z: Mat<c64> = dist.sample(&mut StdRng::seed_from_u64(7));
        assert!(!z.real_part().is_zero());
        assert!(!z.imag_part().is_zero());
    }

    #[test]
    fn normal_rejects_non_finite_std_dev() {
        assert!(Normal::<f64>::new(0.0, f64::INFINITY).is_err());
        assert!(Normal::<f64>::new(0.0, 1.0).is_ok());
    }

    #[test]
    fn normal_col_shifts_mean() {
        let normal = Normal::new(100.0, 0.0).unwrap();
        let dist = NormalCol { len: 3, normal };
        let v: Col<f64> = dist.sample(&mut StdRng::seed_from_u64(1));
        assert!(v.read(0) == 100.0);
        assert!(v.read(2) == 100.0);
    }
}
