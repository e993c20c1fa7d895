use anyhow::Context;
use puckcore::prelude::DecoderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::generator::profile::GeneratorConfig;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub decoder: DecoderConfig,
    pub generator: GeneratorConfig,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .decoder
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(min_range: f64, max_range: f64, frequency: f64, packets: usize) -> Self {
        Self {
            decoder: DecoderConfig {
                min_range,
                max_range,
                frequency,
            },
            generator: GeneratorConfig {
                packets,
                frequency,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_shares_frequency() {
        let cfg = WorkflowConfig::from_args(1.0, 50.0, 5.0, 100);
        assert_eq!(cfg.decoder.max_range, 50.0);
        assert_eq!(cfg.decoder.frequency, 5.0);
        assert_eq!(cfg.generator.frequency, 5.0);
        assert_eq!(cfg.generator.packets, 100);
    }

    #[test]
    fn config_load_reads_yaml_with_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"decoder:\n  max_range: 60.0\ngenerator:\n  packets: 10\n  seed: 3\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.decoder.max_range, 60.0);
        assert_eq!(cfg.decoder.min_range, 0.5);
        assert_eq!(cfg.generator.packets, 10);
        assert_eq!(cfg.generator.seed, 3);
    }

    #[test]
    fn config_load_rejects_invalid_ranges() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"decoder:\n  min_range: 20.0\n  max_range: 10.0\n")
            .unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }
}
