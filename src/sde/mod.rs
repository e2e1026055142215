//! # Stochastic Integration
//!
//! The cell update is the SDE
//!
//! ```text
//! dx = f(x, I) dt + g(x, I) dW
//! ```
//!
//! discretized with a fixed number of Euler–Maruyama sub-steps. Each piece is a
//! strategy trait so alternative drifts, diffusions or schemes can be plugged
//! into the stepping loop:
//!
//! | Trait | Implementation | Role |
//! |-------|----------------|------|
//! | [`DriftTerm`] | [`ConductanceDrift`] | LTC conductance-balance fixed point |
//! | [`DiffusionTerm`] | [`ConstantDiffusion`] | noise scale (default 1.0) |
//! | [`SdeSolver`] | [`EulerMaruyama`] | outer stepping loop |
//!
//! The Brownian driver `dW` is a single vector sampled when the cell is
//! configured (see [`noise`]). It is **not** resampled between sub-steps or
//! between calls.
//!
//! ## Tensor Shapes
//!
//! | Tensor | Shape |
//! |--------|-------|
//! | `inputs` (already mapped) | `[batch, input_size]` |
//! | `state` | `[batch, units]` |
//! | `noise` | `[units]` |

pub mod diffusion;
pub mod drift;
pub mod euler_maruyama;
pub mod noise;

pub use diffusion::ConstantDiffusion;
pub use drift::ConductanceDrift;
pub use euler_maruyama::EulerMaruyama;

use crate::error::LtsResult;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Deterministic part of the update
pub trait DriftTerm<B: Backend> {
    fn drift(&self, inputs: &Tensor<B, 2>, state: &Tensor<B, 2>) -> LtsResult<Tensor<B, 2>>;
}

/// Noise scaling; the result must broadcast against `[batch, units]`
pub trait DiffusionTerm<B: Backend> {
    fn diffusion(&self, inputs: &Tensor<B, 2>, state: &Tensor<B, 2>) -> Tensor<B, 2>;
}

/// Discretization scheme advancing the state over one cell call
pub trait SdeSolver<B: Backend> {
    fn integrate<D, G>(
        &self,
        drift: &D,
        diffusion: &G,
        noise: &Tensor<B, 1>,
        inputs: &Tensor<B, 2>,
        state: Tensor<B, 2>,
    ) -> LtsResult<Tensor<B, 2>>
    where
        D: DriftTerm<B>,
        G: DiffusionTerm<B>;
}
