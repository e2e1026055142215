//! Synaptic gating functions
//!
//! Both the sensory and the recurrent conductance paths of the cell pass their
//! presynaptic activity through the same gate before weighting it.

use burn::tensor::activation;
use burn::tensor::{backend::Backend, Tensor};

/// Strategy for mapping presynaptic activity to per-synapse gate values.
///
/// `v` has shape `[batch, presyn]`, `mu` and `sigma` have shape
/// `[presyn, units]`, and the result has shape `[batch, presyn, units]`.
pub trait GatingFunction {
    fn gate<B: Backend>(&self, v: &Tensor<B, 2>, mu: &Tensor<B, 2>, sigma: &Tensor<B, 2>)
        -> Tensor<B, 3>;
}

/// Sigmoidal synapse gate.
///
/// This gate is defined as:
/// `g(v) = sigmoid(sigma * (v - mu))`
///
/// with `v` broadcast across the postsynaptic (`units`) axis. There is no
/// clamping; very large `|sigma * (v - mu)|` simply saturates the sigmoid.
///
/// # Example
///
/// ```rust
/// use burn::backend::NdArray;
/// use burn::tensor::Tensor;
/// use lts::activation::{GatingFunction, SigmoidGate};
///
/// type Backend = NdArray<f32>;
/// let device = Default::default();
///
/// let v = Tensor::<Backend, 2>::from_floats([[0.1, 0.2, 0.3]], &device);
/// let mu = Tensor::<Backend, 2>::full([3, 4], 0.5, &device);
/// let sigma = Tensor::<Backend, 2>::full([3, 4], 5.0, &device);
/// let g = SigmoidGate.gate(&v, &mu, &sigma);
/// assert_eq!(g.dims(), [1, 3, 4]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SigmoidGate;

impl GatingFunction for SigmoidGate {
    fn gate<B: Backend>(
        &self,
        v: &Tensor<B, 2>,
        mu: &Tensor<B, 2>,
        sigma: &Tensor<B, 2>,
    ) -> Tensor<B, 3> {
        let [batch, presyn] = v.dims();
        let [_, units] = mu.dims();

        // v: [batch, presyn] -> [batch, presyn, 1]
        // mu, sigma: [presyn, units] -> [1, presyn, units]
        let v_expanded = v.clone().reshape([batch, presyn, 1]);
        let mu_expanded = mu.clone().reshape([1, presyn, units]);
        let sigma_expanded = sigma.clone().reshape([1, presyn, units]);

        let scaled = sigma_expanded.mul(v_expanded.sub(mu_expanded));
        activation::sigmoid(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type Backend = NdArray<f32>;

    fn sigmoid(x: f32) -> f32 {
        1.0 / (1.0 + (-x).exp())
    }

    #[test]
    fn test_gate_shape() {
        let device = Default::default();
        let v = Tensor::<Backend, 2>::zeros([2, 3], &device);
        let mu = Tensor::<Backend, 2>::zeros([3, 5], &device);
        let sigma = Tensor::<Backend, 2>::ones([3, 5], &device);

        let g = SigmoidGate.gate(&v, &mu, &sigma);
        assert_eq!(g.dims(), [2, 3, 5]);
    }

    #[test]
    fn test_gate_at_midpoint_is_half() {
        let device = Default::default();
        let v = Tensor::<Backend, 2>::full([1, 4], 0.5, &device);
        let mu = Tensor::<Backend, 2>::full([4, 3], 0.5, &device);
        let sigma = Tensor::<Backend, 2>::full([4, 3], 7.0, &device);

        let g = SigmoidGate.gate(&v, &mu, &sigma);
        let values = g.into_data().to_vec::<f32>().unwrap();
        for val in values {
            assert!((val - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_gate_broadcasts_presynaptic_value() {
        let device = Default::default();
        // Two presynaptic values, three postsynaptic units with distinct mu
        let v = Tensor::<Backend, 2>::from_floats([[0.0, 1.0]], &device);
        let mu = Tensor::<Backend, 2>::from_floats([[0.3, 0.5, 0.8], [0.3, 0.5, 0.8]], &device);
        let sigma = Tensor::<Backend, 2>::from_floats([[3.0, 4.0, 5.0], [6.0, 7.0, 8.0]], &device);

        let g = SigmoidGate.gate(&v, &mu, &sigma);
        let values = g.into_data().to_vec::<f32>().unwrap();

        let v_host = [0.0f32, 1.0];
        let mu_host = [[0.3f32, 0.5, 0.8], [0.3, 0.5, 0.8]];
        let sigma_host = [[3.0f32, 4.0, 5.0], [6.0, 7.0, 8.0]];
        for i in 0..2 {
            for j in 0..3 {
                let expected = sigmoid(sigma_host[i][j] * (v_host[i] - mu_host[i][j]));
                let got = values[i * 3 + j];
                assert!(
                    (got - expected).abs() < 1e-6,
                    "Element [{}, {}] incorrect: got {}, expected {}",
                    i,
                    j,
                    got,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_gate_open_interval() {
        let device = Default::default();
        let v = Tensor::<Backend, 2>::random([4, 6], Distribution::Uniform(-1.0, 1.0), &device);
        let mu = Tensor::<Backend, 2>::random([6, 5], Distribution::Uniform(0.3, 0.8), &device);
        let sigma = Tensor::<Backend, 2>::random([6, 5], Distribution::Uniform(3.0, 8.0), &device);

        let g = SigmoidGate.gate(&v, &mu, &sigma);
        for val in g.into_data().to_vec::<f32>().unwrap() {
            assert!(val > 0.0 && val < 1.0, "Gate value out of range: {}", val);
        }
    }
}
