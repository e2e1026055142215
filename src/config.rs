//! Cell configuration
//!
//! `units` is the only required value. Everything else (solver unfold counts,
//! initialization ranges, clamping bounds) has a default matching the
//! reference LTS cell and can be overridden with the `with_*` builders or by
//! deserializing a JSON document.

use crate::cells::MappingMode;
use crate::error::{LtsError, LtsResult};
use serde::{Deserialize, Serialize};

/// SDE integration scheme used by the cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SdeSolverKind {
    /// First-order Euler–Maruyama stepping
    #[default]
    EulerMaruyama,
}

/// Structure of the diffusion noise
///
/// The noise vector is sampled once when the cell is configured and the same
/// realization is reused at every sub-step of every call. A textbook
/// Euler–Maruyama scheme would resample it each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseType {
    /// One independent Gaussian driver per unit
    #[default]
    Diagonal,
}

/// Inclusive uniform initialization range, `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitRange {
    pub min: f64,
    pub max: f64,
}

impl InitRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &str) -> LtsResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(LtsError::config(format!("{name} range must be finite")));
        }
        if self.min > self.max {
            return Err(LtsError::config(format!(
                "{name} range is inverted: min {} > max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Configuration for [`LTSCell`](crate::cells::LTSCell)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LtsConfig {
    /// Number of units (state size)
    pub units: usize,
    /// Euler–Maruyama sub-steps per call
    #[serde(default = "default_unfolds")]
    pub sde_unfolds: usize,
    /// Conductance-balance iterations per drift evaluation
    #[serde(default = "default_unfolds")]
    pub drift_unfolds: usize,
    /// Integration step size Δt, also the variance of the noise vector
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    /// Constant diffusion coefficient
    #[serde(default = "default_diffusion_scale")]
    pub diffusion_scale: f64,
    #[serde(default)]
    pub solver: SdeSolverKind,
    #[serde(default)]
    pub noise_type: NoiseType,
    #[serde(default)]
    pub input_mapping: MappingMode,

    /// Magnitude of the ±1 reversal potentials
    #[serde(default = "default_erev_init_factor")]
    pub erev_init_factor: f64,
    #[serde(default = "default_w_init")]
    pub w_init: InitRange,
    #[serde(default = "default_mu_init")]
    pub mu_init: InitRange,
    #[serde(default = "default_sigma_init")]
    pub sigma_init: InitRange,
    #[serde(default = "default_vleak_init")]
    pub vleak_init: InitRange,
    #[serde(default = "default_gleak_init")]
    pub gleak_init: InitRange,
    #[serde(default = "default_cm_init")]
    pub cm_init: InitRange,

    /// Clamp bounds applied by `apply_weight_constraints`
    #[serde(default = "default_w_bounds")]
    pub w_bounds: InitRange,
    #[serde(default = "default_gleak_bounds")]
    pub gleak_bounds: InitRange,
    #[serde(default = "default_cm_bounds")]
    pub cm_bounds: InitRange,

    /// Fixed (non-trainable) capacitance
    #[serde(default)]
    pub fix_cm: Option<f64>,
    /// Fixed (non-trainable) leak conductance
    #[serde(default)]
    pub fix_gleak: Option<f64>,
    /// Fixed (non-trainable) leak potential
    #[serde(default)]
    pub fix_vleak: Option<f64>,

    /// Reject denominators whose magnitude is at or below this floor
    #[serde(default = "default_min_denominator")]
    pub min_denominator: f64,
    /// Run the denominator guard during the drift solve
    #[serde(default = "default_check_numerics")]
    pub check_numerics: bool,

    /// Seed for parameter and noise initialization; `None` draws from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_unfolds() -> usize {
    6
}

fn default_time_step() -> f64 {
    1.0
}

fn default_diffusion_scale() -> f64 {
    1.0
}

fn default_erev_init_factor() -> f64 {
    1.0
}

fn default_w_init() -> InitRange {
    InitRange::new(0.01, 1.0)
}

fn default_mu_init() -> InitRange {
    InitRange::new(0.3, 0.8)
}

fn default_sigma_init() -> InitRange {
    InitRange::new(3.0, 8.0)
}

fn default_vleak_init() -> InitRange {
    InitRange::new(-0.2, 0.2)
}

fn default_gleak_init() -> InitRange {
    InitRange::new(1.0, 1.0)
}

fn default_cm_init() -> InitRange {
    InitRange::new(0.5, 0.5)
}

fn default_w_bounds() -> InitRange {
    InitRange::new(0.00001, 1000.0)
}

fn default_gleak_bounds() -> InitRange {
    InitRange::new(0.00001, 1000.0)
}

fn default_cm_bounds() -> InitRange {
    InitRange::new(0.000001, 1000.0)
}

fn default_min_denominator() -> f64 {
    1e-8
}

fn default_check_numerics() -> bool {
    true
}

impl LtsConfig {
    /// Default configuration for `units` neurons
    pub fn new(units: usize) -> Self {
        Self {
            units,
            sde_unfolds: default_unfolds(),
            drift_unfolds: default_unfolds(),
            time_step: default_time_step(),
            diffusion_scale: default_diffusion_scale(),
            solver: SdeSolverKind::default(),
            noise_type: NoiseType::default(),
            input_mapping: MappingMode::default(),
            erev_init_factor: default_erev_init_factor(),
            w_init: default_w_init(),
            mu_init: default_mu_init(),
            sigma_init: default_sigma_init(),
            vleak_init: default_vleak_init(),
            gleak_init: default_gleak_init(),
            cm_init: default_cm_init(),
            w_bounds: default_w_bounds(),
            gleak_bounds: default_gleak_bounds(),
            cm_bounds: default_cm_bounds(),
            fix_cm: None,
            fix_gleak: None,
            fix_vleak: None,
            min_denominator: default_min_denominator(),
            check_numerics: default_check_numerics(),
            seed: None,
        }
    }

    /// Set both the outer SDE and inner drift iteration counts
    pub fn with_unfolds(mut self, unfolds: usize) -> Self {
        self.sde_unfolds = unfolds;
        self.drift_unfolds = unfolds;
        self
    }

    pub fn with_sde_unfolds(mut self, unfolds: usize) -> Self {
        self.sde_unfolds = unfolds;
        self
    }

    pub fn with_drift_unfolds(mut self, unfolds: usize) -> Self {
        self.drift_unfolds = unfolds;
        self
    }

    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    pub fn with_diffusion_scale(mut self, scale: f64) -> Self {
        self.diffusion_scale = scale;
        self
    }

    pub fn with_input_mapping(mut self, mode: MappingMode) -> Self {
        self.input_mapping = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Freeze capacitance, leak conductance and leak potential to constants
    pub fn with_fixed_leak(
        mut self,
        cm: Option<f64>,
        gleak: Option<f64>,
        vleak: Option<f64>,
    ) -> Self {
        self.fix_cm = cm;
        self.fix_gleak = gleak;
        self.fix_vleak = vleak;
        self
    }

    pub fn with_min_denominator(mut self, floor: f64) -> Self {
        self.min_denominator = floor;
        self
    }

    pub fn with_check_numerics(mut self, enabled: bool) -> Self {
        self.check_numerics = enabled;
        self
    }

    /// Validate every value the cell depends on
    pub fn validate(&self) -> LtsResult<()> {
        if self.units == 0 {
            return Err(LtsError::config("units must be positive"));
        }
        if self.sde_unfolds == 0 {
            return Err(LtsError::config("sde_unfolds must be positive"));
        }
        if self.drift_unfolds == 0 {
            return Err(LtsError::config("drift_unfolds must be positive"));
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(LtsError::config(format!(
                "time_step must be positive and finite, got {}",
                self.time_step
            )));
        }
        if !self.diffusion_scale.is_finite() {
            return Err(LtsError::config("diffusion_scale must be finite"));
        }
        if !self.erev_init_factor.is_finite() {
            return Err(LtsError::config("erev_init_factor must be finite"));
        }
        if !self.min_denominator.is_finite() || self.min_denominator < 0.0 {
            return Err(LtsError::config("min_denominator must be finite and non-negative"));
        }

        self.w_init.validate("w_init")?;
        self.mu_init.validate("mu_init")?;
        self.sigma_init.validate("sigma_init")?;
        self.vleak_init.validate("vleak_init")?;
        self.gleak_init.validate("gleak_init")?;
        self.cm_init.validate("cm_init")?;
        self.w_bounds.validate("w_bounds")?;
        self.gleak_bounds.validate("gleak_bounds")?;
        self.cm_bounds.validate("cm_bounds")?;

        for (name, value) in [("fix_cm", self.fix_cm), ("fix_gleak", self.fix_gleak)] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(LtsError::config(format!(
                        "{name} must be positive and finite, got {v}"
                    )));
                }
            }
        }
        if let Some(v) = self.fix_vleak {
            if !v.is_finite() {
                return Err(LtsError::config("fix_vleak must be finite"));
            }
        }

        Ok(())
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> LtsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON and validate
    pub fn from_json(json: &str) -> LtsResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LtsConfig::new(8);
        assert_eq!(config.units, 8);
        assert_eq!(config.sde_unfolds, 6);
        assert_eq!(config.drift_unfolds, 6);
        assert_eq!(config.time_step, 1.0);
        assert_eq!(config.diffusion_scale, 1.0);
        assert_eq!(config.solver, SdeSolverKind::EulerMaruyama);
        assert_eq!(config.noise_type, NoiseType::Diagonal);
        assert_eq!(config.input_mapping, MappingMode::Affine);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_unfolds_sets_both() {
        let config = LtsConfig::new(4).with_unfolds(3);
        assert_eq!(config.sde_unfolds, 3);
        assert_eq!(config.drift_unfolds, 3);

        let config = LtsConfig::new(4).with_drift_unfolds(1);
        assert_eq!(config.sde_unfolds, 6);
        assert_eq!(config.drift_unfolds, 1);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(LtsConfig::new(0).validate().is_err());
        assert!(LtsConfig::new(4).with_unfolds(0).validate().is_err());
        assert!(LtsConfig::new(4).with_time_step(0.0).validate().is_err());
        assert!(LtsConfig::new(4).with_time_step(f64::NAN).validate().is_err());
        assert!(LtsConfig::new(4)
            .with_fixed_leak(Some(0.0), None, None)
            .validate()
            .is_err());

        let mut config = LtsConfig::new(4);
        config.w_init = InitRange::new(1.0, 0.5);
        assert!(matches!(config.validate(), Err(LtsError::InvalidConfig(_))));
    }

    #[test]
    fn test_json_only_units_required() {
        let config = LtsConfig::from_json(r#"{ "units": 12 }"#).unwrap();
        assert_eq!(config, LtsConfig::new(12));
    }

    #[test]
    fn test_json_preserves_overrides() {
        let config = LtsConfig::new(5)
            .with_sde_unfolds(2)
            .with_time_step(0.25)
            .with_seed(7)
            .with_input_mapping(MappingMode::Linear);
        let json = config.to_json().unwrap();
        assert!(json.contains("\"input_mapping\": \"linear\""));

        let restored = LtsConfig::from_json(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_json_rejects_invalid() {
        let err = LtsConfig::from_json(r#"{ "units": 0 }"#).unwrap_err();
        assert!(matches!(err, LtsError::InvalidConfig(_)));

        let err = LtsConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LtsError::Serialization(_)));
    }
}
