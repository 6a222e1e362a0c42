pub mod checkpoint;

pub use checkpoint::{Activation, DenseLayer, NetworkCheckpoint};

use crate::error::Result;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Static metadata shipped with a surrogate model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Declared amplitude range, one entry per model input channel.
    pub amplitude: Vec<f64>,
    /// Per-channel offset of the input range. Defaults to zeros.
    #[serde(default)]
    pub offset: Vec<f64>,
    /// Factor converting raw network output into nanoamperes.
    pub amplification: f64,
}

impl ModelInfo {
    pub fn input_dim(&self) -> usize {
        self.amplitude.len()
    }
}

/// Conversion of raw network output into physical current units.
///
/// Amplification scales outputs only. Genes and input waveforms reach the
/// model unscaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputScaling {
    pub amplification: f64,
}

impl OutputScaling {
    pub fn new(amplification: f64) -> Self {
        Self { amplification }
    }

    pub fn apply(&self, mut raw: Array2<f64>) -> Array2<f64> {
        raw.mapv_inplace(|v| v * self.amplification);
        raw
    }
}

/// Batched inference over a trained surrogate of the device.
///
/// Implementations are read-only once loaded and are shared across every
/// evaluation call of a platform.
pub trait SurrogateModel: Send + Sync {
    fn info(&self) -> &ModelInfo;

    fn output_dim(&self) -> usize;

    /// Raw forward pass: (time-steps × input_dim) -> (time-steps × output_dim).
    fn inference(&self, inputs: &Array2<f64>) -> Result<Array2<f64>>;

    fn input_dim(&self) -> usize {
        self.info().input_dim()
    }

    fn scaling(&self) -> OutputScaling {
        OutputScaling::new(self.info().amplification)
    }

    /// Forward pass followed by the amplification step.
    fn inference_in_nanoamperes(&self, inputs: &Array2<f64>) -> Result<Array2<f64>> {
        let raw = self.inference(inputs)?;
        Ok(self.scaling().apply(raw))
    }
}
