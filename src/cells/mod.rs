//! # RNN Cell Implementations
//!
//! Single-timestep cells. [`LTSCell`] processes one timestep at a time and is
//! wrapped by the [`LTS`](crate::rnn::LTS) layer for sequence processing.
//!
//! ## Update Rule
//!
//! Each call runs `sde_unfolds` Euler–Maruyama sub-steps:
//!
//! ```text
//! x ← x + f(x, I)·Δt + g·dW
//! ```
//!
//! where `f` is the LTC conductance balance iterated `drift_unfolds` times,
//! `g` the constant diffusion scale and `dW` the noise vector sampled at
//! configuration.
//!
//! ## Tensor Shapes
//!
//! | Tensor | Shape | Description |
//! |--------|-------|-------------|
//! | `input` | `[batch, input_size]` | Input features |
//! | `hidden_state` | `[batch, units]` | Previous hidden state |
//! | `output` | `[batch, units]` | Cell output (equal to the new state) |
//! | `new_state` | `[batch, units]` | Updated hidden state |
//!
//! A single unbatched sequence uses `batch = 1`, so its state is `[1, units]`.
//!
//! ## Example: Using LTSCell Directly
//!
//! ```rust
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//! use lts::cells::LTSCell;
//! use lts::config::LtsConfig;
//!
//! type Backend = NdArray<f32>;
//! let device = Default::default();
//!
//! let mut cell = LTSCell::<Backend>::new(LtsConfig::new(4).with_seed(7)).unwrap();
//! cell.configure(3, &device).unwrap();
//!
//! let input = Tensor::<Backend, 2>::from_floats([[0.1, 0.2, 0.3]], &device);
//! let state = Tensor::<Backend, 2>::zeros([1, 4], &device);
//! let (_output, next_state) = cell.step(input, state).unwrap();
//! assert_eq!(next_state.dims(), [1, 4]);
//! ```
//!
//! ## Input Mapping Modes
//!
//! [`MappingMode`] selects how raw inputs are scaled before the sensory synapses:
//!
//! - **Affine**: per-feature weight and bias (default)
//! - **Linear**: per-feature weight only
//! - **None**: direct pass-through

pub mod lts_cell;

pub use lts_cell::{LTSCell, LtsParams, MappingMode};
