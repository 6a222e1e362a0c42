use super::Evaluate;
use crate::config::{Modality, PlatformConfig};
use crate::error::{BspyError, Result};
use crate::types::{GenePool, PopulationOutput, TargetWaveform, Waveform};

/// Platform which simulates a single boron-doped silicon chip using kinetic Monte Carlo.
#[derive(Debug, Clone, Default)]
pub struct SimulationKmc;

impl SimulationKmc {
    pub fn new(_config: &PlatformConfig) -> Self {
        SimulationKmc
    }
}

impl Evaluate for SimulationKmc {
    fn evaluate(
        &self,
        _inputs_wfm: &Waveform,
        _gene_pool: &GenePool,
        _target_wfm: &TargetWaveform,
    ) -> Result<PopulationOutput> {
        Err(BspyError::NotImplemented(Modality::SingleChipSimulationKmc.as_str()))
    }
}
