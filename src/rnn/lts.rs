//! Liquid Time-Stochastic (LTS) RNN Layer
//!
//! Full RNN layer that handles sequence processing, batching, and state management
//! for LTS cells.

use crate::cells::LTSCell;
use crate::config::LtsConfig;
use crate::error::{LtsError, LtsResult};
use burn::module::Module;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// LTS RNN Layer
///
/// Processes sequences by stepping an [`LTSCell`] once per timestep.
///
/// # Type Parameters
/// * `B` - The backend type
#[derive(Module, Debug)]
pub struct LTS<B: Backend> {
    /// The LTS cell for processing individual timesteps
    cell: LTSCell<B>,
    /// Input size (number of features)
    #[module(skip)]
    input_size: usize,
    /// Whether input is batch-first (batch, seq, features) vs (seq, batch, features)
    #[module(skip)]
    batch_first: bool,
    /// Whether to return full sequence or just last timestep
    #[module(skip)]
    return_sequences: bool,
}

impl<B: Backend> LTS<B> {
    /// Create a new LTS RNN layer
    ///
    /// # Arguments
    /// * `input_size` - Number of input features
    /// * `config` - Cell configuration
    /// * `device` - Device to create the module on
    pub fn new(input_size: usize, config: LtsConfig, device: &B::Device) -> LtsResult<Self> {
        let cell = LTSCell::new(config)?.configured(input_size, device)?;

        Ok(Self {
            cell,
            input_size,
            batch_first: true,
            return_sequences: true,
        })
    }

    /// Set whether input is batch-first (default: true)
    ///
    /// When true: input shape is [batch, seq, features]
    /// When false: input shape is [seq, batch, features]
    pub fn with_batch_first(mut self, batch_first: bool) -> Self {
        self.batch_first = batch_first;
        self
    }

    /// Set whether to return full sequences (default: true)
    ///
    /// When true: returns all timesteps [batch, seq, units]
    /// When false: returns only last timestep [batch, 1, units]
    pub fn with_return_sequences(mut self, return_sequences: bool) -> Self {
        self.return_sequences = return_sequences;
        self
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn state_size(&self) -> usize {
        self.cell.units()
    }

    pub fn cell(&self) -> &LTSCell<B> {
        &self.cell
    }

    pub fn cell_mut(&mut self) -> &mut LTSCell<B> {
        &mut self.cell
    }

    /// Forward pass through the LTS RNN layer
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape:
    ///   - [batch, seq, features] if batch_first=true
    ///   - [seq, batch, features] if batch_first=false
    /// * `state` - Optional initial state tensor of shape [batch, units]
    ///
    /// # Returns
    /// Tuple of (output, final_state) where:
    /// - output: [batch, seq, units], or [batch, 1, units] when return_sequences=false
    /// - final_state: [batch, units]
    pub fn forward(
        &self,
        input: Tensor<B, 3>,
        state: Option<Tensor<B, 2>>,
    ) -> LtsResult<(Tensor<B, 3>, Tensor<B, 2>)> {
        let device = input.device();
        let dims = input.dims();
        let (batch_size, seq_len) = if self.batch_first {
            (dims[0], dims[1])
        } else {
            (dims[1], dims[0])
        };

        if seq_len == 0 {
            return Err(LtsError::dimension_mismatch("sequence length", 1, 0));
        }

        let mut current_state = state
            .unwrap_or_else(|| Tensor::<B, 2>::zeros([batch_size, self.state_size()], &device));

        let mut outputs: Vec<Tensor<B, 2>> = Vec::with_capacity(seq_len);

        for t in 0..seq_len {
            let step_input = if self.batch_first {
                // input[batch, t, features] -> [batch, features]
                input.clone().narrow(1, t, 1).reshape([batch_size, dims[2]])
            } else {
                // input[t, batch, features] -> [batch, features]
                input.clone().narrow(0, t, 1).reshape([batch_size, dims[2]])
            };

            let (output, new_state) = self.cell.step(step_input, current_state)?;
            current_state = new_state;

            if self.return_sequences || t == seq_len - 1 {
                outputs.push(output);
            }
        }

        let output = Tensor::stack(outputs, 1); // [batch, seq, units]
        Ok((output, current_state))
    }
}
