use crate::config::PlatformConfig;
use crate::error::{BspyError, Result};
use crate::types::Waveform;
use ndarray::ArrayView1;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type TransformFunc = dyn Fn(&Waveform, &[f64]) -> anyhow::Result<Waveform> + Send + Sync;

/// User-supplied transform of the input waveform, parametrised by genes.
///
/// Receives the full input waveform (channels × time-steps) and the genome's
/// transform-parameter genes, and must return a waveform of the same shape.
#[derive(Clone)]
pub struct TransformFn(Arc<TransformFunc>);

impl TransformFn {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Waveform, &[f64]) -> anyhow::Result<Waveform> + Send + Sync + 'static,
    {
        Self(Arc::new(func))
    }

    pub fn call(&self, input: &Waveform, params: &[f64]) -> anyhow::Result<Waveform> {
        (self.0)(input, params)
    }
}

impl fmt::Debug for TransformFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TransformFn(..)")
    }
}

/// How the input waveform is prepared before it is scattered into the model input.
#[derive(Debug, Clone)]
pub enum InputTransform {
    /// Input passed through unchanged. Consumes no genes.
    Identity,
    /// `func` applied with the genes found at `gene_indices`.
    Parametric {
        gene_indices: Vec<usize>,
        func: TransformFn,
    },
}

impl InputTransform {
    /// Expects a config that already passed `validate`.
    pub fn from_config(config: &PlatformConfig) -> Self {
        match (&config.trafo_indx, &config.trafo) {
            (Some(gene_indices), Some(func)) => InputTransform::Parametric {
                gene_indices: gene_indices.clone(),
                func: func.clone(),
            },
            _ => InputTransform::Identity,
        }
    }

    pub fn gene_indices(&self) -> &[usize] {
        match self {
            InputTransform::Identity => &[],
            InputTransform::Parametric { gene_indices, .. } => gene_indices,
        }
    }

    pub fn apply<'a>(&self, input: &'a Waveform, genome: ArrayView1<f64>) -> Result<Cow<'a, Waveform>> {
        match self {
            InputTransform::Identity => Ok(Cow::Borrowed(input)),
            InputTransform::Parametric { gene_indices, func } => {
                let params: Vec<f64> = gene_indices.iter().map(|&g| genome[g]).collect();
                let transformed = func.call(input, &params).map_err(BspyError::Transform)?;
                if transformed.dim() != input.dim() {
                    return Err(BspyError::shape(
                        "input transform output",
                        format!("{:?}", input.dim()),
                        format!("{:?}", transformed.dim()),
                    ));
                }
                Ok(Cow::Owned(transformed))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_identity_borrows_input() {
        let input = array![[0.3, 0.5, 0.0]];
        let genome = array![1.0, 2.0];
        let out = InputTransform::Identity.apply(&input, genome.view()).unwrap();
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(*out, input);
    }

    #[test]
    fn test_parametric_reads_its_genes() {
        let transform = InputTransform::Parametric {
            gene_indices: vec![2],
            func: TransformFn::new(|x, p| Ok(x.mapv(|v| v * p[0]))),
        };
        let input = array![[1.0, -1.0]];
        let genome = array![9.0, 9.0, 0.5];
        let out = transform.apply(&input, genome.view()).unwrap();
        assert_eq!(*out, array![[0.5, -0.5]]);
    }

    #[test]
    fn test_parametric_shape_change_is_rejected() {
        let transform = InputTransform::Parametric {
            gene_indices: vec![0],
            func: TransformFn::new(|x, _| Ok(x.t().to_owned())),
        };
        let input = array![[1.0, 2.0, 3.0]];
        let genome = array![0.0];
        let err = transform.apply(&input, genome.view()).unwrap_err();
        assert!(matches!(err, BspyError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_failing_transform_surfaces_error() {
        let transform = InputTransform::Parametric {
            gene_indices: vec![0],
            func: TransformFn::new(|_, _| anyhow::bail!("scale out of range")),
        };
        let input = array![[1.0]];
        let genome = array![0.0];
        let err = transform.apply(&input, genome.view()).unwrap_err();
        assert!(matches!(err, BspyError::Transform(_)));
    }
}
