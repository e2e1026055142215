//! # LTS - Liquid Time-Stochastic networks (Rust)
//!
//! A recurrent cell whose hidden state evolves by a stochastic differential
//! equation, built on the Burn framework.
//!
//! ## Features
//!
//! - **Conductance-balance drift**: the LTC fixed-point solver as the SDE drift
//! - **Euler–Maruyama stepping** with a pre-sampled Brownian driver
//! - **Swappable strategies**: gating, drift, diffusion and solver are traits
//! - **Two-phase construction**: `new(config)` then `configure(input_size)`
//! - **Input Mapping**: Affine, Linear, or pass-through modes
//! - **Serde configuration** with documented defaults
//!
//! ## Quick Start
//!
//! ```rust
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//! use lts::prelude::*;
//!
//! type Backend = NdArray<f32>;
//! let device = Default::default();
//!
//! let config = LtsConfig::new(4).with_seed(22222);
//! let mut cell = LTSCell::<Backend>::new(config).unwrap();
//! cell.configure(3, &device).unwrap();
//!
//! let input = Tensor::<Backend, 2>::from_floats([[0.1, 0.2, 0.3]], &device);
//! let state = Tensor::<Backend, 2>::zeros([1, 4], &device);
//! let (output, next_state) = cell.step(input, state).unwrap();
//!
//! assert_eq!(output.dims(), [1, 4]);
//! assert_eq!(next_state.dims(), [1, 4]);
//! ```

pub mod activation;
pub mod cells;
pub mod config;
pub mod error;
mod init;
pub mod rnn;
pub mod sde;

pub mod prelude {
    pub use crate::activation::{GatingFunction, SigmoidGate};
    pub use crate::cells::{LTSCell, LtsParams, MappingMode};
    pub use crate::config::{InitRange, LtsConfig, NoiseType, SdeSolverKind};
    pub use crate::error::{LtsError, LtsResult};
    pub use crate::rnn::LTS;
    pub use crate::sde::{
        ConductanceDrift, ConstantDiffusion, DiffusionTerm, DriftTerm, EulerMaruyama, SdeSolver,
    };
}
