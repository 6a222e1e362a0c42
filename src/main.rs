use bspyalgo::config::ConfigSection;
use bspyalgo::{get_platform, load_configs, Evaluate, PlatformConfig};
use ndarray::{Array1, Array2};
use rand::Rng;
use serde_yaml::Value;
use std::f64::consts::PI;

const DEFAULT_GENE_RANGE: [f64; 2] = [-1.2, 0.6];
const DEFAULT_POPULATION: usize = 25;
const DEFAULT_LENGTH: usize = 80;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: bspyalgo <config.yml> [section]"))?;
    let section = args.next();

    let configs = load_configs(&config_path)?;
    let platform_value = platform_section(&configs, section.as_deref())?;
    let platform_config = PlatformConfig::from_value(platform_value)?;
    let platform = get_platform(&platform_config)?;

    let nr_genes = platform_config.control_indices.len()
        + platform_config.trafo_indx.as_ref().map_or(0, Vec::len);
    let population = population_size(&configs);
    let time_steps = waveform_length(&configs);
    let gene_ranges = gene_ranges(&configs, nr_genes)?;

    let mut rng = rand::thread_rng();
    let gene_pool = Array2::from_shape_fn((population, nr_genes), |(_, g)| {
        let [low, high] = gene_ranges[g];
        rng.gen_range(low..=high)
    });
    let inputs_wfm = Array2::from_shape_fn(
        (platform_config.input_indices.len(), time_steps),
        |(c, t)| (2.0 * PI * (c + 1) as f64 * t as f64 / time_steps as f64).sin(),
    );
    let target_wfm = Array1::<f64>::zeros(time_steps);

    let output = platform.evaluate(&inputs_wfm, &gene_pool, &target_wfm)?;
    log::info!(
        "{} produced output of shape {:?}",
        platform.modality(),
        output.dim()
    );
    for (j, row) in output.rows().into_iter().enumerate() {
        log::info!("genome {}: {}", j, row);
    }
    Ok(())
}

/// The platform subtree. Without an explicit section the default section is
/// used when present, else the whole document.
fn platform_section<'a>(configs: &'a Value, section: Option<&str>) -> anyhow::Result<&'a Value> {
    match section {
        Some(name) => configs
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("section '{}' not found in configuration", name)),
        None => Ok(configs
            .get(PlatformConfig::section_name())
            .unwrap_or(configs)),
    }
}

fn hyperparameter<'a>(configs: &'a Value, key: &str) -> Option<&'a Value> {
    configs.get("hyperparameters").and_then(|h| h.get(key))
}

fn population_size(configs: &Value) -> usize {
    hyperparameter(configs, "partition")
        .and_then(Value::as_sequence)
        .map(|parts| parts.iter().filter_map(Value::as_u64).sum::<u64>() as usize)
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_POPULATION)
}

fn waveform_length(configs: &Value) -> usize {
    configs
        .get("waveform_configs")
        .and_then(|w| w.get("lengths"))
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .unwrap_or(DEFAULT_LENGTH)
}

fn gene_ranges(configs: &Value, nr_genes: usize) -> anyhow::Result<Vec<[f64; 2]>> {
    let declared: Vec<[f64; 2]> = hyperparameter(configs, "generange")
        .and_then(Value::as_sequence)
        .map(|ranges| {
            ranges
                .iter()
                .filter_map(|r| {
                    let bounds = r.as_sequence()?;
                    Some([bounds.first()?.as_f64()?, bounds.get(1)?.as_f64()?])
                })
                .collect()
        })
        .unwrap_or_default();

    if let Some((g, [low, high])) = declared
        .iter()
        .enumerate()
        .find(|(_, [low, high])| !(low.is_finite() && high.is_finite() && low <= high))
    {
        anyhow::bail!("generange entry {} is invalid: [{}, {}]", g, low, high);
    }

    Ok((0..nr_genes)
        .map(|g| declared.get(g).copied().unwrap_or(DEFAULT_GENE_RANGE))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_gene_ranges_fill_missing_with_default() {
        let configs = yaml("hyperparameters:\n  generange: [[-0.7, 0.3]]\n");
        let ranges = gene_ranges(&configs, 2).unwrap();
        assert_eq!(ranges, vec![[-0.7, 0.3], DEFAULT_GENE_RANGE]);
    }

    #[test]
    fn test_reversed_gene_range_is_rejected() {
        let configs = yaml("hyperparameters:\n  generange: [[-1.2, 0.6], [0.6, -1.2]]\n");
        let err = gene_ranges(&configs, 2).unwrap_err();
        assert!(err.to_string().contains("entry 1"));
    }

    #[test]
    fn test_nan_gene_range_is_rejected() {
        let configs = yaml("hyperparameters:\n  generange: [[.nan, 0.6]]\n");
        assert!(gene_ranges(&configs, 1).is_err());
    }

    #[test]
    fn test_named_section_must_exist() {
        let configs = yaml("modality: single_chip\n");
        let err = platform_section(&configs, Some("platform")).unwrap_err();
        assert!(err.to_string().contains("platform"));
    }

    #[test]
    fn test_default_section_falls_back_to_document() {
        let configs = yaml("modality: single_chip\n");
        assert_eq!(platform_section(&configs, None).unwrap(), &configs);

        let nested = yaml("ga_evaluation_configs:\n  modality: single_chip\n");
        assert_eq!(
            platform_section(&nested, None).unwrap(),
            &nested["ga_evaluation_configs"]
        );
    }
}
