//! Conductance-balance drift, the deterministic LTC solver reused as the SDE drift.
//!
//! Reference: Hasani et al., "Liquid time-constant networks", AAAI 2021

use super::DriftTerm;
use crate::activation::{GatingFunction, SigmoidGate};
use crate::cells::LtsParams;
use crate::error::{LtsError, LtsResult};
use burn::tensor::backend::Backend;
use burn::tensor::{ElementConversion, Tensor};
use tracing::warn;

/// Fixed-point conductance balance.
///
/// Each inner iteration computes
///
/// ```text
/// v = (cm·v + gleak·vleak + Σ w·g(v)·erev + Σ sw·g(I)·serev)
///   / (cm + gleak + Σ w·g(v) + Σ sw·g(I))
/// ```
///
/// where the sums run over the presynaptic axis. The sensory sums do not depend
/// on `v` and are computed once per evaluation.
pub struct ConductanceDrift<'a, B: Backend, G: GatingFunction = SigmoidGate> {
    params: &'a LtsParams<B>,
    gate: G,
    unfolds: usize,
    min_denominator: Option<f64>,
}

impl<'a, B: Backend> ConductanceDrift<'a, B, SigmoidGate> {
    pub fn new(params: &'a LtsParams<B>, unfolds: usize) -> Self {
        Self {
            params,
            gate: SigmoidGate,
            unfolds,
            min_denominator: None,
        }
    }
}

impl<'a, B: Backend, G: GatingFunction> ConductanceDrift<'a, B, G> {
    /// Swap the synapse gate
    pub fn with_gate<H: GatingFunction>(self, gate: H) -> ConductanceDrift<'a, B, H> {
        ConductanceDrift {
            params: self.params,
            gate,
            unfolds: self.unfolds,
            min_denominator: self.min_denominator,
        }
    }

    /// Fail with `NumericalInstability` when a denominator magnitude drops to `floor`
    pub fn with_denominator_guard(mut self, floor: Option<f64>) -> Self {
        self.min_denominator = floor;
        self
    }

    pub fn unfolds(&self) -> usize {
        self.unfolds
    }

    /// Sensory numerator and denominator contributions, `[batch, units]` each
    pub fn sensory_drive(&self, inputs: &Tensor<B, 2>) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let [batch, _] = inputs.dims();
        let [_, units] = self.params.sensory_w.val().dims();

        let sensory_gate = self.gate.gate(
            inputs,
            &self.params.sensory_mu.val(),
            &self.params.sensory_sigma.val(),
        );
        let sensory_w_activation = self.params.sensory_w.val().unsqueeze::<3>().mul(sensory_gate);
        let sensory_rev_activation = sensory_w_activation
            .clone()
            .mul(self.params.sensory_erev.val().unsqueeze::<3>());

        let numerator = sensory_rev_activation.sum_dim(1).reshape([batch, units]);
        let denominator = sensory_w_activation.sum_dim(1).reshape([batch, units]);
        (numerator, denominator)
    }

    fn check_denominator(&self, denominator: &Tensor<B, 2>, iteration: usize) -> LtsResult<()> {
        let Some(floor) = self.min_denominator else {
            return Ok(());
        };
        if denominator.dims()[0] == 0 {
            return Ok(());
        }

        // A NaN or Inf anywhere poisons the sum
        let total: f64 = denominator.clone().sum().into_scalar().elem();
        let min_abs: f64 = denominator.clone().abs().min().into_scalar().elem();

        if !total.is_finite() || !min_abs.is_finite() || min_abs <= floor {
            warn!(iteration, min_abs, floor, "conductance balance denominator collapsed");
            return Err(LtsError::NumericalInstability {
                iteration,
                min_abs,
                floor,
            });
        }
        Ok(())
    }
}

impl<'a, B: Backend, G: GatingFunction> DriftTerm<B> for ConductanceDrift<'a, B, G> {
    fn drift(&self, inputs: &Tensor<B, 2>, state: &Tensor<B, 2>) -> LtsResult<Tensor<B, 2>> {
        let [batch, units] = state.dims();
        let params = self.params;

        let (w_numerator_sensory, w_denominator_sensory) = self.sensory_drive(inputs);

        let cm = params.cm.val().unsqueeze::<2>(); // [1, units]
        let gleak = params.gleak.val().unsqueeze::<2>();
        let leak_current = gleak.clone().mul(params.vleak.val().unsqueeze::<2>());

        let w = params.w.val().unsqueeze::<3>(); // [1, units, units]
        let erev = params.erev.val().unsqueeze::<3>();
        let mu = params.mu.val();
        let sigma = params.sigma.val();

        let mut v_pre = state.clone();
        for iteration in 0..self.unfolds {
            let w_activation = w.clone().mul(self.gate.gate(&v_pre, &mu, &sigma));
            let rev_activation = w_activation.clone().mul(erev.clone());

            let w_numerator = rev_activation
                .sum_dim(1)
                .reshape([batch, units])
                .add(w_numerator_sensory.clone());
            let w_denominator = w_activation
                .sum_dim(1)
                .reshape([batch, units])
                .add(w_denominator_sensory.clone());

            let numerator = cm
                .clone()
                .mul(v_pre)
                .add(leak_current.clone())
                .add(w_numerator);
            let denominator = cm.clone().add(gleak.clone()).add(w_denominator);

            self.check_denominator(&denominator, iteration)?;
            v_pre = numerator.div(denominator);
        }

        Ok(v_pre)
    }
}
