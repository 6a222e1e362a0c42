use super::traits::ConfigSection;
use crate::engines::platforms::transform::TransformFn;
use crate::error::{BspyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Evaluation modality declared by a platform configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    /// Physical boron-doped silicon chip behind DAC/ADC converters.
    SingleChip,
    /// Neural-network surrogate of a single chip.
    SingleChipSimulationNn,
    /// Kinetic Monte Carlo simulation of a single chip.
    SingleChipSimulationKmc,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::SingleChip => "single_chip",
            Modality::SingleChipSimulationNn => "single_chip_simulation_nn",
            Modality::SingleChipSimulationKmc => "single_chip_simulation_kmc",
        }
    }
}

impl FromStr for Modality {
    type Err = BspyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single_chip" => Ok(Modality::SingleChip),
            "single_chip_simulation_nn" => Ok(Modality::SingleChipSimulationNn),
            "single_chip_simulation_kmc" => Ok(Modality::SingleChipSimulationKmc),
            other => Err(BspyError::UnsupportedBackend(other.to_string())),
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration subtree a platform is built from.
///
/// `modality` stays a plain string so that an unknown value surfaces as
/// [`BspyError::UnsupportedBackend`] at selection time rather than as a
/// deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub modality: String,
    #[serde(default)]
    pub torch_model_path: Option<PathBuf>,
    /// Model input columns fed the input waveform.
    #[serde(default)]
    pub input_indices: Vec<usize>,
    /// Genome positions feeding the remaining model columns, in ascending column order.
    #[serde(default)]
    pub control_indices: Vec<usize>,
    /// Genome positions consumed by `trafo`.
    #[serde(default)]
    pub trafo_indx: Option<Vec<usize>>,
    #[serde(skip)]
    pub trafo: Option<TransformFn>,
}

impl PlatformConfig {
    pub fn new(modality: impl Into<String>) -> Self {
        Self {
            modality: modality.into(),
            torch_model_path: None,
            input_indices: Vec::new(),
            control_indices: Vec::new(),
            trafo_indx: None,
            trafo: None,
        }
    }

    /// Deserialize a resolved configuration subtree.
    pub fn from_value(value: &serde_yaml::Value) -> Result<Self> {
        let config: PlatformConfig = serde_yaml::from_value(value.clone())?;
        Ok(config)
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.torch_model_path = Some(path.into());
        self
    }

    pub fn with_indices(mut self, input_indices: Vec<usize>, control_indices: Vec<usize>) -> Self {
        self.input_indices = input_indices;
        self.control_indices = control_indices;
        self
    }

    /// Attach an input transform together with the genome positions it consumes.
    pub fn with_transform(mut self, trafo_indx: Vec<usize>, trafo: TransformFn) -> Self {
        self.trafo_indx = Some(trafo_indx);
        self.trafo = Some(trafo);
        self
    }

    pub fn modality(&self) -> Result<Modality> {
        self.modality.parse()
    }
}

impl ConfigSection for PlatformConfig {
    fn section_name() -> &'static str {
        "ga_evaluation_configs"
    }

    fn validate(&self) -> Result<()> {
        match (&self.trafo_indx, &self.trafo) {
            (Some(_), None) => Err(BspyError::Configuration(
                "trafo_indx is declared but no trafo function was supplied".to_string(),
            )),
            (None, Some(_)) => Err(BspyError::Configuration(
                "a trafo function was supplied without trafo_indx".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
