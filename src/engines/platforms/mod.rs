//! Platforms a population of genomes can be evaluated on.
//!
//! Every platform returns one output waveform per genome, shaped
//! (population × time-steps), where the time-step count comes from the
//! target waveform.

pub mod chip;
pub mod partition;
pub mod simulation_kmc;
pub mod simulation_nn;
pub mod transform;

pub use chip::SingleChip;
pub use partition::IndexPartition;
pub use simulation_kmc::SimulationKmc;
pub use simulation_nn::SimulationNn;
pub use transform::{InputTransform, TransformFn};

use crate::config::{Modality, PlatformConfig};
use crate::error::Result;
use crate::types::{GenePool, PopulationOutput, TargetWaveform, Waveform};

pub trait Evaluate {
    fn evaluate(
        &self,
        inputs_wfm: &Waveform,
        gene_pool: &GenePool,
        target_wfm: &TargetWaveform,
    ) -> Result<PopulationOutput>;
}

#[derive(Debug)]
pub enum Platform {
    SingleChip(SingleChip),
    SimulationNn(SimulationNn),
    SimulationKmc(SimulationKmc),
}

impl Platform {
    pub fn modality(&self) -> Modality {
        match self {
            Platform::SingleChip(_) => Modality::SingleChip,
            Platform::SimulationNn(_) => Modality::SingleChipSimulationNn,
            Platform::SimulationKmc(_) => Modality::SingleChipSimulationKmc,
        }
    }
}

impl Evaluate for Platform {
    fn evaluate(
        &self,
        inputs_wfm: &Waveform,
        gene_pool: &GenePool,
        target_wfm: &TargetWaveform,
    ) -> Result<PopulationOutput> {
        match self {
            Platform::SingleChip(p) => p.evaluate(inputs_wfm, gene_pool, target_wfm),
            Platform::SimulationNn(p) => p.evaluate(inputs_wfm, gene_pool, target_wfm),
            Platform::SimulationKmc(p) => p.evaluate(inputs_wfm, gene_pool, target_wfm),
        }
    }
}

/// Build the platform named by `config.modality`.
///
/// The modality is checked before anything else, so an unsupported value
/// never touches the filesystem.
pub fn get_platform(config: &PlatformConfig) -> Result<Platform> {
    let platform = match config.modality()? {
        Modality::SingleChip => Platform::SingleChip(SingleChip::new(config)),
        Modality::SingleChipSimulationNn => Platform::SimulationNn(SimulationNn::new(config)?),
        Modality::SingleChipSimulationKmc => Platform::SimulationKmc(SimulationKmc::new(config)),
    };
    log::debug!("Selected platform {}", platform.modality());
    Ok(platform)
}
