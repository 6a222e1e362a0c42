use super::{ModelInfo, SurrogateModel};
use crate::error::{BspyError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Tanh,
    Sigmoid,
    #[default]
    Linear,
}

impl Activation {
    fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Linear => x,
        }
    }
}

/// Serialized dense layer. `weights` is laid out input × output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

#[derive(Debug, Deserialize)]
struct CheckpointFile {
    info: ModelInfo,
    layers: Vec<DenseLayer>,
}

#[derive(Debug, Clone)]
struct Dense {
    weights: Array2<f64>,
    bias: Array1<f64>,
    activation: Activation,
}

/// Feed-forward surrogate restored from a JSON checkpoint.
#[derive(Debug, Clone)]
pub struct NetworkCheckpoint {
    info: ModelInfo,
    layers: Vec<Dense>,
}

impl NetworkCheckpoint {
    /// Load a checkpoint from disk. The file is read fully and released
    /// before this returns.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let fail = |reason: String| BspyError::ModelLoad {
            path: path.to_path_buf(),
            reason,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
        let file: CheckpointFile =
            serde_json::from_str(&contents).map_err(|e| fail(format!("corrupt checkpoint: {}", e)))?;

        let model = Self::from_layers(file.info, file.layers).map_err(|e| match e {
            BspyError::ModelLoad { reason, .. } => fail(reason),
            other => other,
        })?;

        log::info!(
            "Loaded surrogate model from {} ({} -> {}, amplification {})",
            path.display(),
            model.input_dim(),
            model.output_dim(),
            model.info.amplification
        );
        Ok(model)
    }

    /// Build a checkpoint from in-memory layers, checking that the network is
    /// structurally consistent with its metadata.
    pub fn from_layers(mut info: ModelInfo, layers: Vec<DenseLayer>) -> Result<Self> {
        let fail = |reason: String| BspyError::ModelLoad {
            path: PathBuf::from("<memory>"),
            reason,
        };

        if layers.is_empty() {
            return Err(fail("checkpoint has no layers".to_string()));
        }
        if info.amplitude.is_empty() {
            return Err(fail("model info declares no input channels".to_string()));
        }
        if !info.amplification.is_finite() {
            return Err(fail(format!("amplification {} is not finite", info.amplification)));
        }
        if info.offset.is_empty() {
            info.offset = vec![0.0; info.amplitude.len()];
        } else if info.offset.len() != info.amplitude.len() {
            return Err(fail(format!(
                "offset has {} channels but amplitude has {}",
                info.offset.len(),
                info.amplitude.len()
            )));
        }

        let mut expected_in = info.amplitude.len();
        let mut dense = Vec::with_capacity(layers.len());
        for (i, layer) in layers.into_iter().enumerate() {
            let rows = layer.weights.len();
            if rows != expected_in {
                return Err(fail(format!(
                    "layer {} expects {} inputs but previous stage provides {}",
                    i, rows, expected_in
                )));
            }
            let cols = layer.bias.len();
            if cols == 0 {
                return Err(fail(format!("layer {} has no outputs", i)));
            }
            if let Some(bad) = layer.weights.iter().position(|row| row.len() != cols) {
                return Err(fail(format!(
                    "layer {} weight row {} has {} columns, bias has {}",
                    i,
                    bad,
                    layer.weights[bad].len(),
                    cols
                )));
            }

            let flat: Vec<f64> = layer.weights.into_iter().flatten().collect();
            let weights = Array2::from_shape_vec((rows, cols), flat)
                .map_err(|e| fail(format!("layer {}: {}", i, e)))?;
            dense.push(Dense {
                weights,
                bias: Array1::from(layer.bias),
                activation: layer.activation,
            });
            expected_in = cols;
        }

        Ok(Self { info, layers: dense })
    }
}

impl SurrogateModel for NetworkCheckpoint {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn output_dim(&self) -> usize {
        self.layers.last().map(|l| l.bias.len()).unwrap_or(0)
    }

    fn inference(&self, inputs: &Array2<f64>) -> Result<Array2<f64>> {
        if inputs.ncols() != self.input_dim() {
            return Err(BspyError::shape(
                "surrogate inference input",
                format!("{} columns", self.input_dim()),
                format!("{} columns", inputs.ncols()),
            ));
        }

        let mut x = inputs.to_owned();
        for layer in &self.layers {
            x = x.dot(&layer.weights) + &layer.bias;
            let activation = layer.activation;
            x.mapv_inplace(|v| activation.apply(v));
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    fn info(dim: usize, amplification: f64) -> ModelInfo {
        ModelInfo {
            amplitude: vec![1.0; dim],
            offset: vec![],
            amplification,
        }
    }

    #[test]
    fn test_linear_network_forward() {
        let model = NetworkCheckpoint::from_layers(
            info(2, 1.0),
            vec![DenseLayer {
                weights: vec![vec![1.0], vec![2.0]],
                bias: vec![0.5],
                activation: Activation::Linear,
            }],
        )
        .unwrap();

        let out = model.inference(&array![[1.0, 1.0], [0.0, -1.0]]).unwrap();
        assert_eq!(out, array![[3.5], [-1.5]]);
        assert_eq!(model.info().offset, vec![0.0, 0.0]);
    }

    #[test]
    fn test_relu_hidden_layer_and_amplification() {
        let model = NetworkCheckpoint::from_layers(
            info(1, 10.0),
            vec![
                DenseLayer {
                    weights: vec![vec![1.0, -1.0]],
                    bias: vec![0.0, 0.0],
                    activation: Activation::Relu,
                },
                DenseLayer {
                    weights: vec![vec![1.0], vec![1.0]],
                    bias: vec![0.0],
                    activation: Activation::Linear,
                },
            ],
        )
        .unwrap();

        // |x| through relu(x) + relu(-x)
        let out = model.inference_in_nanoamperes(&array![[2.0], [-3.0]]).unwrap();
        assert_eq!(out, array![[20.0], [30.0]]);
    }

    #[test]
    fn test_missing_activation_defaults_to_linear() {
        let layer: DenseLayer =
            serde_json::from_str(r#"{"weights": [[1.0]], "bias": [0.0]}"#).unwrap();
        assert_eq!(layer.activation, Activation::Linear);
        assert_eq!(Activation::default(), Activation::Linear);
    }

    #[test]
    fn test_rejects_mismatched_layer_dims() {
        let err = NetworkCheckpoint::from_layers(
            info(3, 1.0),
            vec![DenseLayer {
                weights: vec![vec![1.0], vec![1.0]],
                bias: vec![0.0],
                activation: Activation::Linear,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, BspyError::ModelLoad { .. }));
    }

    #[test]
    fn test_inference_rejects_wrong_input_width() {
        let model = NetworkCheckpoint::from_layers(
            info(2, 1.0),
            vec![DenseLayer {
                weights: vec![vec![1.0], vec![1.0]],
                bias: vec![0.0],
                activation: Activation::Linear,
            }],
        )
        .unwrap();
        let err = model.inference(&array![[1.0, 2.0, 3.0]]).unwrap_err();
        assert!(matches!(err, BspyError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = NetworkCheckpoint::load("does/not/exist.json").unwrap_err();
        match err {
            BspyError::ModelLoad { path, .. } => assert_eq!(path, PathBuf::from("does/not/exist.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_corrupt_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = NetworkCheckpoint::load(file.path()).unwrap_err();
        assert!(matches!(err, BspyError::ModelLoad { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "info": {{"amplitude": [0.9, 0.9], "amplification": 2.0}},
                "layers": [{{"weights": [[1.0], [1.0]], "bias": [0.0], "activation": "tanh"}}]
            }}"#
        )
        .unwrap();

        let model = NetworkCheckpoint::load(file.path()).unwrap();
        assert_eq!(model.input_dim(), 2);
        assert_eq!(model.output_dim(), 1);
        let out = model.inference(&array![[0.0, 0.0]]).unwrap();
        assert_eq!(out, array![[0.0]]);
    }
}
