use super::{DiffusionTerm, DriftTerm, SdeSolver};
use crate::error::LtsResult;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use tracing::trace;

/// Euler–Maruyama stepping
///
/// ```text
/// x ← x + f(x, I)·Δt + g(x, I)·dW      (repeated `steps` times)
/// ```
///
/// `Δt` is only the integration step size. The leading dimension of the state
/// is whatever the caller passes in and is preserved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerMaruyama {
    steps: usize,
    time_step: f64,
}

impl EulerMaruyama {
    pub fn new(steps: usize, time_step: f64) -> Self {
        Self { steps, time_step }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }
}

impl<B: Backend> SdeSolver<B> for EulerMaruyama {
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
        G: DiffusionTerm<B>,
    {
        let noise = noise.clone().unsqueeze::<2>(); // [1, units]
        let mut state = state;

        for step in 0..self.steps {
            let f = drift.drift(inputs, &state)?;
            let g = diffusion.diffusion(inputs, &state);

            state = state
                .add(f.mul_scalar(self.time_step))
                .add(g.mul(noise.clone()));
            trace!(step, "euler-maruyama sub-step");
        }

        Ok(state)
    }
}
