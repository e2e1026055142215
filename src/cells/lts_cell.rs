//! Liquid Time-Stochastic (LTS) Cell Implementation
//!
//! An LTC cell whose hidden state follows an SDE: the LTC conductance-balance
//! solver provides the drift and a pre-sampled Brownian vector the noise.
//!
//! Reference: Raneez & Wirasingha, "Liquid Time-Stochasticity networks",
//! CCWC 2023, doi:10.1109/CCWC57344.2023.10099071

use crate::config::{InitRange, LtsConfig, SdeSolverKind};
use crate::error::{LtsError, LtsResult};
use crate::init::{param_from_matrix, param_from_vector, ParamInitializer};
use crate::sde::noise::sample_brownian;
use crate::sde::{ConductanceDrift, ConstantDiffusion, DriftTerm, EulerMaruyama, SdeSolver};
use burn::module::{Ignored, Module, Param};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Input mapping modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMode {
    /// Affine mapping: y = w * x + b
    #[default]
    Affine,
    /// Linear mapping: y = w * x
    Linear,
    /// No mapping (pass-through)
    None,
}

/// Learnable state of a configured cell
#[derive(Debug, Module)]
pub struct LtsParams<B: Backend> {
    /// Leak conductance (must be positive)
    pub gleak: Param<Tensor<B, 1>>,
    /// Leak reversal potential
    pub vleak: Param<Tensor<B, 1>>,
    /// Membrane capacitance (must be positive)
    pub cm: Param<Tensor<B, 1>>,
    /// Sigmoid steepness for internal synapses
    pub sigma: Param<Tensor<B, 2>>,
    /// Sigmoid center for internal synapses
    pub mu: Param<Tensor<B, 2>>,
    /// Synaptic weights for internal synapses
    pub w: Param<Tensor<B, 2>>,
    /// Reversal potentials for internal synapses
    pub erev: Param<Tensor<B, 2>>,
    /// Sigmoid steepness for sensory synapses
    pub sensory_sigma: Param<Tensor<B, 2>>,
    /// Sigmoid center for sensory synapses
    pub sensory_mu: Param<Tensor<B, 2>>,
    /// Synaptic weights for sensory synapses
    pub sensory_w: Param<Tensor<B, 2>>,
    /// Reversal potentials for sensory synapses
    pub sensory_erev: Param<Tensor<B, 2>>,
    /// Input weight for mapping
    pub input_w: Option<Param<Tensor<B, 1>>>,
    /// Input bias for mapping
    pub input_b: Option<Param<Tensor<B, 1>>>,
    /// Brownian increments, sampled once (non-trainable)
    pub noise: Param<Tensor<B, 1>>,
}

impl<B: Backend> LtsParams<B> {
    /// Draw every parameter for `input_size` sensory features
    pub fn init(config: &LtsConfig, input_size: usize, device: &B::Device) -> LtsResult<Self> {
        let units = config.units;
        let mut init = ParamInitializer::new(config.seed);

        let sensory_mu = init.uniform_matrix(input_size, units, config.mu_init);
        let sensory_sigma = init.uniform_matrix(input_size, units, config.sigma_init);
        let sensory_w = init.uniform_matrix(input_size, units, config.w_init);
        let sensory_erev = init.polarity_matrix(input_size, units, config.erev_init_factor);

        let mu = init.uniform_matrix(units, units, config.mu_init);
        let sigma = init.uniform_matrix(units, units, config.sigma_init);
        let w = init.uniform_matrix(units, units, config.w_init);
        let erev = init.polarity_matrix(units, units, config.erev_init_factor);

        let noise =
            sample_brownian(&mut init, config.noise_type, units, config.time_step, device)?;

        let vleak = Self::leak_param(&mut init, config.fix_vleak, units, config.vleak_init, device);
        let gleak =
            Self::leak_param(&mut init, config.fix_gleak, units, config.gleak_init, device);
        let cm = Self::leak_param(&mut init, config.fix_cm, units, config.cm_init, device);

        let (input_w, input_b) = match config.input_mapping {
            MappingMode::Affine => (
                Some(Param::from_tensor(Tensor::ones([input_size], device))),
                Some(Param::from_tensor(Tensor::zeros([input_size], device))),
            ),
            MappingMode::Linear => (
                Some(Param::from_tensor(Tensor::ones([input_size], device))),
                None,
            ),
            MappingMode::None => (None, None),
        };

        Ok(Self {
            gleak,
            vleak,
            cm,
            sigma: param_from_matrix(&sigma, device),
            mu: param_from_matrix(&mu, device),
            w: param_from_matrix(&w, device),
            erev: param_from_matrix(&erev, device),
            sensory_sigma: param_from_matrix(&sensory_sigma, device),
            sensory_mu: param_from_matrix(&sensory_mu, device),
            sensory_w: param_from_matrix(&sensory_w, device),
            sensory_erev: param_from_matrix(&sensory_erev, device),
            input_w,
            input_b,
            noise,
        })
    }

    /// Trainable uniform vector, or a frozen constant when `fixed` is set
    fn leak_param(
        init: &mut ParamInitializer,
        fixed: Option<f64>,
        units: usize,
        range: InitRange,
        device: &B::Device,
    ) -> Param<Tensor<B, 1>> {
        match fixed {
            Some(value) => {
                param_from_vector(&Array1::from_elem(units, value as f32), device)
                    .set_require_grad(false)
            }
            None => param_from_vector(&init.uniform_vector(units, range), device),
        }
    }

    pub fn input_size(&self) -> usize {
        self.sensory_w.val().dims()[0]
    }

    pub fn units(&self) -> usize {
        self.w.val().dims()[0]
    }
}

/// Liquid Time-Stochastic (LTS) Cell
///
/// Construction is two-phase: [`LTSCell::new`] validates the configuration,
/// [`LTSCell::configure`] allocates parameters for a given input width. Calling
/// [`LTSCell::step`] before `configure` fails with [`LtsError::NotConfigured`].
///
/// The noise vector is drawn once in `configure` and the same realization is
/// added at every Euler–Maruyama sub-step of every call, so `step` is fully
/// deterministic.
#[derive(Debug, Module)]
pub struct LTSCell<B: Backend> {
    /// Parameters, present once configured
    pub params: Option<LtsParams<B>>,
    config: Ignored<LtsConfig>,
}

impl<B: Backend> LTSCell<B> {
    /// Creates an unconfigured cell
    pub fn new(config: LtsConfig) -> LtsResult<Self> {
        config.validate()?;
        Ok(Self {
            params: None,
            config: Ignored(config),
        })
    }

    /// Allocates parameters for `input_size` features.
    ///
    /// Calling it again with the same size is a no-op; a different size is
    /// rejected because parameter shapes never change after allocation.
    pub fn configure(&mut self, input_size: usize, device: &B::Device) -> LtsResult<()> {
        if input_size == 0 {
            return Err(LtsError::config("input_size must be positive"));
        }
        if let Some(ref params) = self.params {
            let existing = params.input_size();
            if existing != input_size {
                return Err(LtsError::dimension_mismatch(
                    "input features",
                    existing,
                    input_size,
                ));
            }
            debug!(input_size, "cell already configured");
            return Ok(());
        }

        self.params = Some(LtsParams::init(&self.config.0, input_size, device)?);
        info!(
            units = self.config.0.units,
            input_size,
            seed = ?self.config.0.seed,
            "configured LTS cell"
        );
        Ok(())
    }

    /// Consuming variant of [`configure`](Self::configure)
    pub fn configured(mut self, input_size: usize, device: &B::Device) -> LtsResult<Self> {
        self.configure(input_size, device)?;
        Ok(self)
    }

    pub fn config(&self) -> &LtsConfig {
        &self.config.0
    }

    pub fn units(&self) -> usize {
        self.config.0.units
    }

    pub fn is_configured(&self) -> bool {
        self.params.is_some()
    }

    pub fn input_size(&self) -> Option<usize> {
        self.params.as_ref().map(LtsParams::input_size)
    }

    pub fn synapse_count(&self) -> usize {
        self.config.0.units * self.config.0.units
    }

    pub fn sensory_synapse_count(&self) -> usize {
        self.input_size().unwrap_or(0) * self.config.0.units
    }

    pub fn params(&self) -> LtsResult<&LtsParams<B>> {
        self.params.as_ref().ok_or(LtsError::NotConfigured)
    }

    pub fn params_mut(&mut self) -> LtsResult<&mut LtsParams<B>> {
        self.params.as_mut().ok_or(LtsError::NotConfigured)
    }

    /// The fixed Brownian increments, `[units]`
    pub fn noise(&self) -> LtsResult<Tensor<B, 1>> {
        Ok(self.params()?.noise.val())
    }

    /// Apply input mapping
    pub fn map_inputs(&self, inputs: Tensor<B, 2>) -> LtsResult<Tensor<B, 2>> {
        let params = self.params()?;
        let mut result = inputs;
        if let Some(ref w) = params.input_w {
            result = result.mul(w.val().unsqueeze::<2>());
        }
        if let Some(ref b) = params.input_b {
            result = result.add(b.val().unsqueeze::<2>());
        }
        Ok(result)
    }

    /// Drift solver bound to this cell's parameters
    pub fn drift_term(&self) -> LtsResult<ConductanceDrift<'_, B>> {
        let config = self.config();
        let guard = config.check_numerics.then_some(config.min_denominator);
        Ok(ConductanceDrift::new(self.params()?, config.drift_unfolds)
            .with_denominator_guard(guard))
    }

    /// One drift evaluation on already-mapped inputs
    pub fn drift(
        &self,
        mapped_inputs: &Tensor<B, 2>,
        state: &Tensor<B, 2>,
    ) -> LtsResult<Tensor<B, 2>> {
        self.check_shapes(mapped_inputs, state)?;
        self.drift_term()?.drift(mapped_inputs, state)
    }

    fn check_shapes(&self, inputs: &Tensor<B, 2>, state: &Tensor<B, 2>) -> LtsResult<()> {
        let expected_features = self.input_size().ok_or(LtsError::NotConfigured)?;
        let [batch, features] = inputs.dims();
        let [state_batch, state_units] = state.dims();

        if features != expected_features {
            return Err(LtsError::dimension_mismatch(
                "input features",
                expected_features,
                features,
            ));
        }
        if state_units != self.config.0.units {
            return Err(LtsError::dimension_mismatch(
                "state width",
                self.config.0.units,
                state_units,
            ));
        }
        if state_batch != batch {
            return Err(LtsError::dimension_mismatch("batch size", batch, state_batch));
        }
        if batch == 0 {
            return Err(LtsError::dimension_mismatch("batch size", 1, 0));
        }
        Ok(())
    }

    /// Runs one cell step: `(output, next_state) = step(input, state)`.
    ///
    /// `inputs` is `[batch, input_size]`, `states` is `[batch, units]`; the
    /// output is the new state and has the same shape as `states`.
    pub fn step(
        &self,
        inputs: Tensor<B, 2>,
        states: Tensor<B, 2>,
    ) -> LtsResult<(Tensor<B, 2>, Tensor<B, 2>)> {
        self.check_shapes(&inputs, &states)?;
        debug!(batch = states.dims()[0], "LTS step");

        let mapped_inputs = self.map_inputs(inputs)?;
        let drift = self.drift_term()?;
        let diffusion = ConstantDiffusion::new(self.config.0.diffusion_scale);
        let noise = self.noise()?;

        let next_state = match self.config.0.solver {
            SdeSolverKind::EulerMaruyama => {
                EulerMaruyama::new(self.config.0.sde_unfolds, self.config.0.time_step)
                    .integrate(&drift, &diffusion, &noise, &mapped_inputs, states)?
            }
        };

        Ok((next_state.clone(), next_state))
    }

    /// Clamp weights, conductances and capacitances into their configured bounds.
    ///
    /// Meant to be called by the training harness after each optimizer update;
    /// `step` never enforces the bounds itself. Frozen leak parameters are left
    /// untouched.
    pub fn apply_weight_constraints(&mut self) -> LtsResult<()> {
        let w_bounds = self.config.0.w_bounds;
        let gleak_bounds = self.config.0.gleak_bounds;
        let cm_bounds = self.config.0.cm_bounds;
        let fix_gleak = self.config.0.fix_gleak.is_some();
        let fix_cm = self.config.0.fix_cm.is_some();

        let params = self.params_mut()?;
        params.w = params.w.clone().map(|t| t.clamp(w_bounds.min, w_bounds.max));
        params.sensory_w = params
            .sensory_w
            .clone()
            .map(|t| t.clamp(w_bounds.min, w_bounds.max));
        if !fix_gleak {
            params.gleak = params
                .gleak
                .clone()
                .map(|t| t.clamp(gleak_bounds.min, gleak_bounds.max));
        }
        if !fix_cm {
            params.cm = params.cm.clone().map(|t| t.clamp(cm_bounds.min, cm_bounds.max));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    type Backend = NdArray<f32>;

    fn create_test_cell() -> LTSCell<Backend> {
        let device = Default::default();
        LTSCell::new(LtsConfig::new(10).with_seed(1234))
            .unwrap()
            .configured(8, &device)
            .unwrap()
    }

    #[test]
    fn test_lts_cell_creation() {
        let cell = create_test_cell();

        assert_eq!(cell.units(), 10);
        assert_eq!(cell.input_size(), Some(8));
        assert_eq!(cell.synapse_count(), 100);
        assert_eq!(cell.sensory_synapse_count(), 80);
    }

    #[test]
    fn test_lts_cell_step() {
        let device = Default::default();
        let cell = create_test_cell();

        let batch_size = 4;
        let inputs = Tensor::<Backend, 2>::zeros([batch_size, 8], &device);
        let states = Tensor::<Backend, 2>::zeros([batch_size, 10], &device);

        let (output, new_state) = cell.step(inputs, states).unwrap();

        assert_eq!(output.dims(), [batch_size, 10]);
        assert_eq!(new_state.dims(), [batch_size, 10]);
    }

    #[test]
    fn test_lts_state_change() {
        let device = Default::default();
        let cell = create_test_cell();

        let inputs =
            Tensor::<Backend, 2>::random([2, 8], Distribution::Uniform(-1.0, 1.0), &device);
        let states = Tensor::<Backend, 2>::zeros([2, 10], &device);

        let (_, new_state) = cell.step(inputs, states).unwrap();

        let state_diff = new_state.abs().mean().into_scalar();
        assert!(state_diff > 0.0, "State should change after a step");
    }

    #[test]
    fn test_step_before_configure() {
        let device = Default::default();
        let cell = LTSCell::<Backend>::new(LtsConfig::new(4)).unwrap();
        assert!(!cell.is_configured());

        let inputs = Tensor::<Backend, 2>::zeros([1, 3], &device);
        let states = Tensor::<Backend, 2>::zeros([1, 4], &device);
        assert!(matches!(cell.step(inputs, states), Err(LtsError::NotConfigured)));
    }

    #[test]
    fn test_reconfigure() {
        let device = Default::default();
        let mut cell = create_test_cell();

        assert!(cell.configure(8, &device).is_ok());
        let err = cell.configure(5, &device).unwrap_err();
        assert!(matches!(
            err,
            LtsError::DimensionMismatch {
                expected: 8,
                actual: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_fixed_leak_parameters() {
        let device = Default::default();
        let config = LtsConfig::new(3)
            .with_seed(2)
            .with_fixed_leak(Some(0.75), Some(2.0), Some(-0.1));
        let cell = LTSCell::<Backend>::new(config)
            .unwrap()
            .configured(2, &device)
            .unwrap();
        let params = cell.params().unwrap();

        let cm = params.cm.val().into_data().to_vec::<f32>().unwrap();
        let gleak = params.gleak.val().into_data().to_vec::<f32>().unwrap();
        let vleak = params.vleak.val().into_data().to_vec::<f32>().unwrap();
        assert!(cm.iter().all(|&x| x == 0.75));
        assert!(gleak.iter().all(|&x| x == 2.0));
        assert!(vleak.iter().all(|&x| (x + 0.1).abs() < 1e-7));
    }

    #[test]
    fn test_weight_constraints_clamp() {
        let device = Default::default();
        let mut cell = create_test_cell();
        {
            let params = cell.params_mut().unwrap();
            params.w = Param::from_tensor(Tensor::full([10, 10], -3.0, &device));
            params.cm = Param::from_tensor(Tensor::full([10], 5000.0, &device));
        }

        cell.apply_weight_constraints().unwrap();
        let params = cell.params().unwrap();

        let w_min = params.w.val().min().into_scalar();
        let cm_max = params.cm.val().max().into_scalar();
        assert!((w_min - 0.00001).abs() < 1e-9);
        assert_eq!(cm_max, 1000.0);
    }

    #[test]
    fn test_weight_constraints_skip_fixed_leak() {
        let device = Default::default();
        let config = LtsConfig::new(3)
            .with_seed(5)
            .with_fixed_leak(Some(0.5), Some(1.5), None);
        let mut cell = LTSCell::<Backend>::new(config)
            .unwrap()
            .configured(2, &device)
            .unwrap();
        {
            let params = cell.params_mut().unwrap();
            params.w = Param::from_tensor(Tensor::full([3, 3], 2000.0, &device));
            params.cm = Param::from_tensor(Tensor::full([3], 5000.0, &device));
            params.gleak = Param::from_tensor(Tensor::full([3], 0.0, &device));
        }

        cell.apply_weight_constraints().unwrap();
        let params = cell.params().unwrap();

        assert_eq!(params.w.val().max().into_scalar(), 1000.0);
        assert_eq!(params.cm.val().min().into_scalar(), 5000.0);
        assert_eq!(params.gleak.val().max().into_scalar(), 0.0);
    }
}
