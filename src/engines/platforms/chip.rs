use super::Evaluate;
use crate::config::{Modality, PlatformConfig};
use crate::error::{BspyError, Result};
use crate::types::{GenePool, PopulationOutput, TargetWaveform, Waveform};

/// Platform which connects to a single boron-doped silicon chip through
/// digital-to-analog and analog-to-digital converters.
#[derive(Debug, Clone, Default)]
pub struct SingleChip;

impl SingleChip {
    pub fn new(_config: &PlatformConfig) -> Self {
        SingleChip
    }
}

impl Evaluate for SingleChip {
    fn evaluate(
        &self,
        _inputs_wfm: &Waveform,
        _gene_pool: &GenePool,
        _target_wfm: &TargetWaveform,
    ) -> Result<PopulationOutput> {
        Err(BspyError::NotImplemented(Modality::SingleChip.as_str()))
    }
}
