use ndarray::{Array1, Array2};

/// Population of genomes, one genome per row (population × genes).
///
/// Row `i` of a [`PopulationOutput`] always belongs to row `i` of the pool.
pub type GenePool = Array2<f64>;

/// Multi-channel waveform laid out as channels × time-steps.
pub type Waveform = Array2<f64>;

/// Target waveform. Only its length (the time-step count) is read by the platforms.
pub type TargetWaveform = Array1<f64>;

/// One output waveform per genome (population × time-steps).
pub type PopulationOutput = Array2<f64>;
