use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Write a random two-layer checkpoint with `input_dim` inputs and 2 outputs.
pub fn write_checkpoint(dir: &Path, input_dim: usize, amplification: f64, seed: u64) -> PathBuf {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut matrix = |rows: usize, cols: usize| -> Vec<Vec<f64>> {
        (0..rows)
            .map(|_| (0..cols).map(|_| rng.gen_range(-1.0..1.0)).collect())
            .collect()
    };
    let hidden = matrix(input_dim, 8);
    let output = matrix(8, 2);

    let checkpoint = json!({
        "info": {
            "amplitude": vec![1.5; input_dim],
            "amplification": amplification,
        },
        "layers": [
            { "weights": hidden, "bias": vec![0.1; 8], "activation": "relu" },
            { "weights": output, "bias": [0.0, 0.0], "activation": "linear" },
        ],
    });

    let path = dir.join("checkpoint.json");
    std::fs::write(&path, serde_json::to_string_pretty(&checkpoint).unwrap()).unwrap();
    path
}
