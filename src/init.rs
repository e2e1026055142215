//! Seeded parameter initializers
//!
//! Values are drawn on the host into ndarray buffers and uploaded once, so a
//! given seed reproduces the same cell on every backend.

use crate::config::InitRange;
use crate::error::{LtsError, LtsResult};
use burn::module::Param;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_distr::Normal;

pub(crate) struct ParamInitializer {
    rng: StdRng,
}

impl ParamInitializer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn uniform_matrix(&mut self, rows: usize, cols: usize, range: InitRange) -> Array2<f32> {
        Array2::from_shape_simple_fn((rows, cols), || self.sample_uniform(range))
    }

    pub fn uniform_vector(&mut self, len: usize, range: InitRange) -> Array1<f32> {
        Array1::from_shape_simple_fn(len, || self.sample_uniform(range))
    }

    /// Reversal potentials: each synapse is excitatory (+factor) or inhibitory
    /// (-factor) with equal probability
    pub fn polarity_matrix(&mut self, rows: usize, cols: usize, factor: f64) -> Array2<f32> {
        Array2::from_shape_simple_fn((rows, cols), || {
            let sign = if self.rng.gen::<bool>() { 1.0 } else { -1.0 };
            (sign * factor) as f32
        })
    }

    pub fn normal_vector(&mut self, len: usize, std_dev: f64) -> LtsResult<Array1<f32>> {
        if !(std_dev.is_finite() && std_dev >= 0.0) {
            return Err(LtsError::config(format!(
                "noise std must be finite and non-negative, got {std_dev}"
            )));
        }
        let dist = Normal::new(0.0, std_dev)
            .map_err(|e| LtsError::config(format!("invalid noise std {std_dev}: {e}")))?;
        Ok(Array1::from_shape_simple_fn(len, || dist.sample(&mut self.rng) as f32))
    }

    fn sample_uniform(&mut self, range: InitRange) -> f32 {
        if range.max > range.min {
            self.rng.gen_range(range.min..=range.max) as f32
        } else {
            range.min as f32
        }
    }
}

/// Upload a host matrix as a parameter
pub(crate) fn param_from_matrix<B: Backend>(
    arr: &Array2<f32>,
    device: &B::Device,
) -> Param<Tensor<B, 2>> {
    let (rows, cols) = arr.dim();
    let data: Vec<f32> = arr.iter().copied().collect();
    let tensor: Tensor<B, 2> =
        Tensor::<B, 1>::from_floats(data.as_slice(), device).reshape([rows, cols]);
    Param::from_tensor(tensor)
}

/// Upload a host vector as a parameter
pub(crate) fn param_from_vector<B: Backend>(
    arr: &Array1<f32>,
    device: &B::Device,
) -> Param<Tensor<B, 1>> {
    let data: Vec<f32> = arr.iter().copied().collect();
    Param::from_tensor(Tensor::<B, 1>::from_floats(data.as_slice(), device))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_reproducible() {
        let mut a = ParamInitializer::new(Some(42));
        let mut b = ParamInitializer::new(Some(42));
        let range = InitRange::new(0.3, 0.8);
        assert_eq!(a.uniform_matrix(3, 4, range), b.uniform_matrix(3, 4, range));
        assert_eq!(a.normal_vector(4, 1.0).unwrap(), b.normal_vector(4, 1.0).unwrap());
    }

    #[test]
    fn test_uniform_in_range() {
        let mut init = ParamInitializer::new(Some(1));
        let m = init.uniform_matrix(10, 10, InitRange::new(3.0, 8.0));
        assert!(m.iter().all(|&x| (3.0..=8.0).contains(&x)));
    }

    #[test]
    fn test_degenerate_range_is_constant() {
        let mut init = ParamInitializer::new(Some(1));
        let v = init.uniform_vector(5, InitRange::new(0.5, 0.5));
        assert!(v.iter().all(|&x| x == 0.5));
    }

    #[test]
    fn test_polarity_values() {
        let mut init = ParamInitializer::new(Some(3));
        let m = init.polarity_matrix(8, 8, 2.0);
        assert!(m.iter().all(|&x| x == 2.0 || x == -2.0));
        assert!(m.iter().any(|&x| x > 0.0));
        assert!(m.iter().any(|&x| x < 0.0));
    }

    #[test]
    fn test_invalid_noise_std() {
        let mut init = ParamInitializer::new(Some(3));
        assert!(init.normal_vector(4, -1.0).is_err());
        assert!(init.normal_vector(4, f64::NAN).is_err());
        assert!(init.normal_vector(4, f64::INFINITY).is_err());

        let zero = init.normal_vector(4, 0.0).unwrap();
        assert!(zero.iter().all(|&x| x == 0.0));
    }
}
