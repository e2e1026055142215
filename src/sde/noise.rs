//! Pre-sampled Brownian driver
//!
//! One Gaussian increment `dW ~ N(0, Δt)` per unit, drawn when the cell is
//! configured and reused for every sub-step of every call.

use crate::config::NoiseType;
use crate::error::LtsResult;
use crate::init::{param_from_vector, ParamInitializer};
use burn::module::Param;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

pub(crate) fn sample_brownian<B: Backend>(
    init: &mut ParamInitializer,
    noise_type: NoiseType,
    units: usize,
    time_step: f64,
    device: &B::Device,
) -> LtsResult<Param<Tensor<B, 1>>> {
    let increments = match noise_type {
        NoiseType::Diagonal => init.normal_vector(units, time_step.sqrt())?,
    };
    Ok(param_from_vector(&increments, device).set_require_grad(false))
}
