//! # RNN Layers for Sequence Processing
//!
//! [`LTS`] drives an [`LTSCell`](crate::cells::LTSCell) over a whole sequence,
//! handling batching and hidden state.
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
//! let lts = LTS::<Backend>::new(16, LtsConfig::new(32).with_seed(42), &device).unwrap();
//!
//! // Process sequence: [batch=4, seq_len=10, features=16]
//! let input: Tensor<Backend, 3> = Tensor::zeros([4, 10, 16], &device);
//! let (output, final_state) = lts.forward(input, None).unwrap();
//!
//! assert_eq!(output.dims(), [4, 10, 32]);
//! assert_eq!(final_state.dims(), [4, 32]);
//! ```
//!
//! ## Tensor Shapes
//!
//! | Format | Shape | Default |
//! |--------|-------|---------|
//! | Batch-first | `[batch, seq_len, features]` | ✓ Yes |
//! | Sequence-first | `[seq_len, batch, features]` | No |
//!
//! | Setting | Output shape |
//! |---------|--------------|
//! | `return_sequences=true` (default) | `[batch, seq_len, units]` |
//! | `return_sequences=false` | `[batch, 1, units]` |
//!
//! The hidden state is `[batch, units]` and can be passed back in to continue
//! a sequence across calls.

pub mod lts;

pub use lts::LTS;
