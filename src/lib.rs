//! Evaluation platforms for genetic optimisation of dopant-network devices.
//!
//! A configuration document (YAML with `!include` support) names a platform
//! modality; [`get_platform`] builds it, and [`Evaluate::evaluate`] maps a
//! gene pool to one output waveform per genome.

pub mod config;
pub mod engines;
pub mod error;
pub mod models;
pub mod types;
pub mod utils;

pub use config::{load_configs, PlatformConfig};
pub use engines::{get_platform, Evaluate, Platform};
pub use error::{BspyError, Result};
