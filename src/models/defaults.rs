//! Default model parameters and request parameter resolution.
//!
//! Defaults come from, in order of precedence:
//!
//! 1. an explicit JSON file (`--defaults`)
//! 2. the file named by `LEVELS_DEFAULTS` (environment or `.env`)
//! 3. the built-in table below
//!
//! The JSON layout mirrors the parameter table the charting front end ships with:
//! `{"LAR": [18 floats], "DELTA": f, "XMU": f, "L2": [6 floats]}`.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{Membership, ModelKind, ModelSpec, Parameters};
use crate::error::{AppError, LevelError};

/// Environment variable naming a defaults JSON file.
pub const DEFAULTS_ENV: &str = "LEVELS_DEFAULTS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultParameters {
    #[serde(rename = "LAR")]
    pub lar: Vec<f64>,
    #[serde(rename = "DELTA")]
    pub delta: f64,
    #[serde(rename = "XMU")]
    pub xmu: f64,
    #[serde(rename = "L2")]
    pub l2: Vec<f64>,
}

impl Default for DefaultParameters {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DefaultParameters {
    /// Built-in parameters: a peaked surface whose level sets for values in
    /// the low thousands are closed curves inside the default grid.
    pub fn builtin() -> Self {
        Self {
            lar: vec![
                8.0, 0.3, -0.2, -2.0, 0.5, -2.0, // polynomial part
                0.4, 0.1, 0.0, -0.2, 0.0, 0.0, // mu1 part
                0.3, 0.0, 0.1, 0.0, 0.0, -0.2, // mu2 part
            ],
            delta: 4.0,
            xmu: 0.0,
            l2: vec![8.0, 0.3, -0.2, -2.0, 0.5, -2.0],
        }
    }

    /// Load defaults from an explicit path, the environment, or the built-in table.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        dotenvy::dotenv().ok();
        match std::env::var(DEFAULTS_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                log::debug!("loading default parameters from ${DEFAULTS_ENV}={path}");
                Self::from_path(&PathBuf::from(path.trim()))
            }
            _ => Ok(Self::builtin()),
        }
    }

    /// Read a defaults JSON file.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::new(2, format!("Failed to open defaults JSON '{}': {e}", path.display()))
        })?;
        let defaults: DefaultParameters = serde_json::from_reader(file)
            .map_err(|e| AppError::new(2, format!("Invalid defaults JSON: {e}")))?;
        defaults.validate()?;
        Ok(defaults)
    }

    /// Check table lengths so a bad file fails at load time, not per request.
    pub fn validate(&self) -> Result<(), LevelError> {
        for kind in [ModelKind::Lar, ModelKind::L2] {
            let n = self.coefficients(kind).len();
            if n != kind.coefficient_len() {
                return Err(LevelError::ModelConfiguration(format!(
                    "default {kind} table has {n} coefficients, expected {}.",
                    kind.coefficient_len()
                )));
            }
        }
        Ok(())
    }

    fn coefficients(&self, kind: ModelKind) -> &[f64] {
        match kind {
            ModelKind::Lar => &self.lar,
            ModelKind::L2 => &self.l2,
        }
    }

    /// Model spec built purely from the defaults.
    pub fn model_spec(&self, kind: ModelKind) -> ModelSpec {
        ModelSpec {
            kind,
            coefficients: self.coefficients(kind).to_vec(),
            membership: match kind {
                ModelKind::Lar => Some(Membership {
                    delta: self.delta,
                    xmu: self.xmu,
                }),
                ModelKind::L2 => None,
            },
        }
    }
}

/// Turn request parameters into a `ModelSpec`.
///
/// - `"default"` takes the defaults table for `kind`
/// - an L2 list is the 6 coefficients
/// - a LAR list is the 18 coefficients followed by `delta` and `xmu`
pub fn resolve_spec(
    kind: ModelKind,
    parameters: &Parameters,
    defaults: &DefaultParameters,
) -> Result<ModelSpec, LevelError> {
    match parameters {
        Parameters::Named(name) if name == Parameters::DEFAULT => Ok(defaults.model_spec(kind)),
        Parameters::Named(name) => Err(LevelError::ModelConfiguration(format!(
            "unknown parameter set '{name}' (expected \"default\" or a list of numbers)."
        ))),
        Parameters::Values(values) => {
            if values.len() != kind.parameter_len() {
                return Err(LevelError::ModelConfiguration(format!(
                    "{kind} expects {} parameters, got {}.",
                    kind.parameter_len(),
                    values.len()
                )));
            }
            let n = kind.coefficient_len();
            let membership = match kind {
                ModelKind::Lar => Some(Membership {
                    delta: values[n],
                    xmu: values[n + 1],
                }),
                ModelKind::L2 => None,
            };
            Ok(ModelSpec {
                kind,
                coefficients: values[..n].to_vec(),
                membership,
            })
        }
    }
}
