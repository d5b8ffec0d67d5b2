//! Trainer configuration via TOML files.
//!
//! Missing sections and keys fall back to defaults, so a partial file (or no
//! file at all) always yields a usable configuration.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use toml::Value;

/// Encoder construction parameters, from the `[encoder]` table.
#[derive(Debug, Clone, Serialize)]
pub struct EncoderConfig {
    /// Output dimension of the encoder.
    pub dim: usize,
    /// Seed for randomized weight initialization and pair sampling.
    pub seed: u64,
    /// Hidden layer widths between the input and output layers. Empty means
    /// the harness picks a ramp itself.
    pub hidden_layers: Vec<usize>,
}

impl EncoderConfig {
    fn from_value(value: &Value) -> Self {
        let table = value
            .get("encoder")
            .and_then(|v| v.as_table())
            .cloned()
            .unwrap_or_default();

        let dim = table
            .get("dim")
            .and_then(|v| v.as_integer())
            .map(|v| v.max(1) as usize)
            .unwrap_or(10);

        let seed = table
            .get("seed")
            .and_then(|v| v.as_integer())
            .map(|v| v as u64)
            .unwrap_or(42);

        let hidden_layers = table
            .get("hidden_layers")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_integer())
                    .filter(|&width| width > 0)
                    .map(|width| width as usize)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            dim,
            seed,
            hidden_layers,
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            dim: 10,
            seed: 42,
            hidden_layers: Vec::new(),
        }
    }
}

/// Which training step the harness runs each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrainingMode {
    /// Exhaustive mean over every ordered pair of distinct dataset entries.
    All,
    /// Mean over randomly sampled dataset pairs.
    Random,
}

impl FromStr for TrainingMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TrainingMode::All),
            "random" => Ok(TrainingMode::Random),
            _ => Err(()),
        }
    }
}

/// Training loop parameters, from the `[training]` table.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingConfig {
    /// Number of hill-climbing iterations to run.
    pub iterations: usize,
    /// Pairs sampled per step in random mode.
    pub pairs_per_step: usize,
    /// Step variant to run.
    pub mode: TrainingMode,
    /// Log every n-th iteration.
    pub log_every: usize,
    /// JSONL log destination; none disables file logging.
    pub log_path: Option<String>,
    /// Upper bound on dataset lines read from file.
    pub max_dataset_lines: usize,
}

impl TrainingConfig {
    fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let table = value
            .get("training")
            .and_then(|v| v.as_table())
            .cloned()
            .unwrap_or_default();

        let iterations = table
            .get("iterations")
            .and_then(|v| v.as_integer())
            .map(|v| v.max(1) as usize)
            .unwrap_or(10_000);

        let pairs_per_step = table
            .get("pairs_per_step")
            .and_then(|v| v.as_integer())
            .map(|v| v.max(1) as usize)
            .unwrap_or(5);

        let mode = match table.get("mode").and_then(|v| v.as_str()) {
            Some(name) => name
                .parse::<TrainingMode>()
                .map_err(|_| ConfigError::Parse(format!("unknown training mode: {}", name)))?,
            None => TrainingMode::All,
        };

        let log_every = table
            .get("log_every")
            .and_then(|v| v.as_integer())
            .map(|v| v.max(1) as usize)
            .unwrap_or(1);

        let log_path = table
            .get("log_path")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let max_dataset_lines = table
            .get("max_dataset_lines")
            .and_then(|v| v.as_integer())
            .map(|v| v.max(1) as usize)
            .unwrap_or(10);

        Ok(Self {
            iterations,
            pairs_per_step,
            mode,
            log_every,
            log_path,
            max_dataset_lines,
        })
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            pairs_per_step: 5,
            mode: TrainingMode::All,
            log_every: 1,
            log_path: None,
            max_dataset_lines: 10,
        }
    }
}

/// Combined configuration for the training harness.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrainerConfig {
    pub encoder: EncoderConfig,
    pub training: TrainingConfig,
}

impl TrainerConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let value: Value =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;

        Ok(Self {
            encoder: EncoderConfig::from_value(&value),
            training: TrainingConfig::from_value(&value)?,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {}", err),
            ConfigError::Parse(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_sections_missing() {
        let config = TrainerConfig::from_str("").unwrap();
        assert_eq!(config.encoder.dim, 10);
        assert_eq!(config.encoder.seed, 42);
        assert!(config.encoder.hidden_layers.is_empty());
        assert_eq!(config.training.iterations, 10_000);
        assert_eq!(config.training.pairs_per_step, 5);
        assert_eq!(config.training.mode, TrainingMode::All);
        assert_eq!(config.training.max_dataset_lines, 10);
    }

    #[test]
    fn parses_custom_values() {
        let toml = "[encoder]\n\
                    dim = 16\n\
                    seed = 7\n\
                    hidden_layers = [24, 20]\n\
                    \n\
                    [training]\n\
                    iterations = 250\n\
                    pairs_per_step = 8\n\
                    mode = \"random\"\n\
                    log_every = 5\n\
                    log_path = \"run.jsonl\"\n\
                    max_dataset_lines = 100";
        let config = TrainerConfig::from_str(toml).unwrap();

        assert_eq!(config.encoder.dim, 16);
        assert_eq!(config.encoder.seed, 7);
        assert_eq!(config.encoder.hidden_layers, vec![24, 20]);
        assert_eq!(config.training.iterations, 250);
        assert_eq!(config.training.pairs_per_step, 8);
        assert_eq!(config.training.mode, TrainingMode::Random);
        assert_eq!(config.training.log_every, 5);
        assert_eq!(config.training.log_path.as_deref(), Some("run.jsonl"));
        assert_eq!(config.training.max_dataset_lines, 100);
    }

    #[test]
    fn unknown_mode_is_a_parse_error() {
        let err = TrainerConfig::from_str("[training]\nmode = \"exhaustive\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn non_positive_widths_are_dropped() {
        let config = TrainerConfig::from_str("[encoder]\nhidden_layers = [12, 0, -3]").unwrap();
        assert_eq!(config.encoder.hidden_layers, vec![12]);
    }
}
