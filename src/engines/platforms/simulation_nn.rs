use super::partition::IndexPartition;
use super::transform::InputTransform;
use super::Evaluate;
use crate::config::{ConfigSection, PlatformConfig};
use crate::error::{BspyError, Result};
use crate::models::{NetworkCheckpoint, SurrogateModel};
use crate::types::{GenePool, PopulationOutput, TargetWaveform, Waveform};
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

/// Platform which simulates a single boron-doped silicon chip with a trained
/// neural-network surrogate.
pub struct SimulationNn {
    model: Arc<dyn SurrogateModel>,
    partition: IndexPartition,
    transform: InputTransform,
}

impl SimulationNn {
    /// Load the checkpoint at `torch_model_path` and build the platform around it.
    pub fn new(config: &PlatformConfig) -> Result<Self> {
        config.validate()?;
        let path = config.torch_model_path.as_ref().ok_or_else(|| {
            BspyError::Configuration(
                "torch_model_path is required for single_chip_simulation_nn".to_string(),
            )
        })?;
        let model = NetworkCheckpoint::load(path)?;
        Self::with_model(config, Arc::new(model))
    }

    /// Build the platform around an already loaded surrogate.
    pub fn with_model(config: &PlatformConfig, model: Arc<dyn SurrogateModel>) -> Result<Self> {
        config.validate()?;
        let transform = InputTransform::from_config(config);
        let partition = IndexPartition::new(
            model.input_dim(),
            &config.input_indices,
            &config.control_indices,
            transform.gene_indices(),
        )?;

        log::info!(
            "Initializing NN platform with {} control genes",
            partition.control_columns().len()
        );

        Ok(Self {
            model,
            partition,
            transform,
        })
    }

    pub fn partition(&self) -> &IndexPartition {
        &self.partition
    }

    pub fn amplification(&self) -> f64 {
        self.model.info().amplification
    }

    /// Model input (time-steps × input_dim) for one genome.
    pub fn assemble_inputs(
        &self,
        inputs_wfm: &Waveform,
        genome: ArrayView1<f64>,
        time_steps: usize,
    ) -> Result<Array2<f64>> {
        let controls = self.partition.broadcast_controls(genome, time_steps);
        let data = self.transform.apply(inputs_wfm, genome)?;
        self.partition.assemble(data.t(), controls.view())
    }

    fn evaluate_genome(
        &self,
        inputs_wfm: &Waveform,
        genome: ArrayView1<f64>,
        time_steps: usize,
    ) -> Result<Array1<f64>> {
        let x = self.assemble_inputs(inputs_wfm, genome, time_steps)?;
        let output = self.model.inference_in_nanoamperes(&x)?;
        if output.nrows() != time_steps || output.ncols() == 0 {
            return Err(BspyError::shape(
                "surrogate output",
                format!("({}, >=1)", time_steps),
                format!("{:?}", output.dim()),
            ));
        }
        Ok(output.column(0).to_owned())
    }

    fn check_shapes(&self, inputs_wfm: &Waveform, gene_pool: &GenePool, time_steps: usize) -> Result<()> {
        let nr_inputs = self.partition.input_indices().len();
        if inputs_wfm.dim() != (nr_inputs, time_steps) {
            return Err(BspyError::shape(
                "input waveform",
                format!("({}, {})", nr_inputs, time_steps),
                format!("{:?}", inputs_wfm.dim()),
            ));
        }
        if gene_pool.ncols() != self.partition.gene_count() {
            return Err(BspyError::shape(
                "gene pool",
                format!("{} genes per genome", self.partition.gene_count()),
                format!("{} genes per genome", gene_pool.ncols()),
            ));
        }
        Ok(())
    }
}

impl Evaluate for SimulationNn {
    fn evaluate(
        &self,
        inputs_wfm: &Waveform,
        gene_pool: &GenePool,
        target_wfm: &TargetWaveform,
    ) -> Result<PopulationOutput> {
        let time_steps = target_wfm.len();
        self.check_shapes(inputs_wfm, gene_pool, time_steps)?;

        let rows = (0..gene_pool.nrows())
            .into_par_iter()
            .map(|j| self.evaluate_genome(inputs_wfm, gene_pool.row(j), time_steps))
            .collect::<Result<Vec<_>>>()?;

        let mut output_popul = Array2::zeros((gene_pool.nrows(), time_steps));
        for (mut out, row) in output_popul.rows_mut().into_iter().zip(&rows) {
            out.assign(row);
        }
        Ok(output_popul)
    }
}

impl fmt::Debug for SimulationNn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationNn")
            .field("partition", &self.partition)
            .field("transform", &self.transform)
            .field("amplification", &self.amplification())
            .finish()
    }
}
