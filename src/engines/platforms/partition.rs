use crate::error::{BspyError, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};
use std::collections::HashSet;

/// Fixed assignment of surrogate input columns and genome positions.
///
/// Model columns listed in `input_indices` receive the input waveform; every
/// other column is a control column, fed (in ascending column order) by the
/// genes at `control_genes`. Genes at `trafo_genes` never reach the model
/// directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPartition {
    input_dim: usize,
    input_indices: Vec<usize>,
    control_columns: Vec<usize>,
    control_genes: Vec<usize>,
    trafo_genes: Vec<usize>,
}

impl IndexPartition {
    pub fn new(
        input_dim: usize,
        input_indices: &[usize],
        control_indices: &[usize],
        trafo_indices: &[usize],
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for &column in input_indices {
            if column >= input_dim {
                return Err(BspyError::InvalidPartition(format!(
                    "input index {} is out of range for a model with {} inputs",
                    column, input_dim
                )));
            }
            if !seen.insert(column) {
                return Err(BspyError::InvalidPartition(format!(
                    "input index {} is listed twice",
                    column
                )));
            }
        }

        let nr_control_genes = input_dim - input_indices.len();
        if control_indices.len() != nr_control_genes {
            return Err(BspyError::PartitionMismatch {
                expected: nr_control_genes,
                actual: control_indices.len(),
            });
        }

        let gene_count = control_indices.len() + trafo_indices.len();
        let mut genes = HashSet::new();
        for &gene in control_indices.iter().chain(trafo_indices) {
            if gene >= gene_count {
                return Err(BspyError::InvalidPartition(format!(
                    "gene index {} is out of range for genomes of {} genes",
                    gene, gene_count
                )));
            }
            if !genes.insert(gene) {
                return Err(BspyError::InvalidPartition(format!(
                    "gene index {} is shared between control and transform genes",
                    gene
                )));
            }
        }

        let control_columns = (0..input_dim).filter(|c| !seen.contains(c)).collect();

        Ok(Self {
            input_dim,
            input_indices: input_indices.to_vec(),
            control_columns,
            control_genes: control_indices.to_vec(),
            trafo_genes: trafo_indices.to_vec(),
        })
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn input_indices(&self) -> &[usize] {
        &self.input_indices
    }

    pub fn control_columns(&self) -> &[usize] {
        &self.control_columns
    }

    pub fn control_genes(&self) -> &[usize] {
        &self.control_genes
    }

    pub fn trafo_genes(&self) -> &[usize] {
        &self.trafo_genes
    }

    /// Number of genes a genome must carry.
    pub fn gene_count(&self) -> usize {
        self.control_genes.len() + self.trafo_genes.len()
    }

    /// Repeat the genome's control genes on every time-step
    /// (time-steps × control channels).
    pub fn broadcast_controls(&self, genome: ArrayView1<f64>, time_steps: usize) -> Array2<f64> {
        let controls: Vec<f64> = self.control_genes.iter().map(|&g| genome[g]).collect();
        Array2::from_shape_fn((time_steps, controls.len()), |(_, k)| controls[k])
    }

    /// Scatter a (time-steps × inputs) data block and a (time-steps × controls)
    /// control block into one (time-steps × input_dim) model input.
    pub fn assemble(&self, data: ArrayView2<f64>, controls: ArrayView2<f64>) -> Result<Array2<f64>> {
        let time_steps = data.nrows();
        if data.ncols() != self.input_indices.len() {
            return Err(BspyError::shape(
                "data-input block",
                format!("{} channels", self.input_indices.len()),
                format!("{} channels", data.ncols()),
            ));
        }
        if controls.dim() != (time_steps, self.control_columns.len()) {
            return Err(BspyError::shape(
                "control block",
                format!("{:?}", (time_steps, self.control_columns.len())),
                format!("{:?}", controls.dim()),
            ));
        }

        let mut assembled = Array2::zeros((time_steps, self.input_dim));
        for (k, &column) in self.input_indices.iter().enumerate() {
            assembled.column_mut(column).assign(&data.column(k));
        }
        for (k, &column) in self.control_columns.iter().enumerate() {
            assembled.column_mut(column).assign(&controls.column(k));
        }
        Ok(assembled)
    }
}
