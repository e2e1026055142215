use super::DiffusionTerm;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// State-independent diffusion coefficient (additive noise)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantDiffusion {
    scale: f64,
}

impl ConstantDiffusion {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Default for ConstantDiffusion {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl<B: Backend> DiffusionTerm<B> for ConstantDiffusion {
    fn diffusion(&self, _inputs: &Tensor<B, 2>, state: &Tensor<B, 2>) -> Tensor<B, 2> {
        Tensor::full(state.dims(), self.scale, &state.device())
    }
}
