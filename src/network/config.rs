use serde::{Serialize, Deserialize};

use crate::error::ConfigError;
use crate::neuron::MAX_INPUTS;

pub const DEFAULT_LEARNING_RATE: f64 = 0.02;
pub const DEFAULT_MOMENTUM: f64 = 0.02;
pub const DEFAULT_SLOPE: f64 = -3.0;

/// Per-layer neuron cap.
pub const MAX_LAYER_SIZE: usize = 512;

/// Every neuron's arity equals its own layer's size, so a layer can never
/// outgrow a single neuron's input capacity.
pub const EFFECTIVE_LAYER_LIMIT: usize = if MAX_INPUTS < MAX_LAYER_SIZE { MAX_INPUTS } else { MAX_LAYER_SIZE };

/// Layer sizes and hyperparameters for a `Network`.
///
/// A hyperparameter left at `0.0` falls back to its default when the
/// network is built. Omitted JSON fields deserialize to zero, so a config
/// file only needs the three sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub input_count: usize,
    pub hidden_count: usize,
    pub output_count: usize,
    #[serde(default)]
    pub learning_rate: f64,
    /// Momentum coefficient applied to the previous step's delta.
    #[serde(default, alias = "accel_rate")]
    pub momentum: f64,
    #[serde(default)]
    pub slope: f64,
    /// Seed for the network's random source; `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkConfig {
    pub fn new(input_count: usize, hidden_count: usize, output_count: usize) -> NetworkConfig {
        NetworkConfig {
            input_count,
            hidden_count,
            output_count,
            learning_rate: 0.0,
            momentum: 0.0,
            slope: 0.0,
            seed: None,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    pub fn with_slope(mut self, slope: f64) -> Self {
        self.slope = slope;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the sizes and hyperparameters and substitutes defaults for zeros.
    pub fn resolve(&self) -> Result<NetworkConfig, ConfigError> {
        for (layer, size) in [
            ("input", self.input_count),
            ("hidden", self.hidden_count),
            ("output", self.output_count),
        ] {
            if size == 0 {
                return Err(ConfigError::EmptyLayer { layer });
            }
            if size > EFFECTIVE_LAYER_LIMIT {
                return Err(ConfigError::LayerTooLarge { layer, size, max: EFFECTIVE_LAYER_LIMIT });
            }
        }

        Ok(NetworkConfig {
            learning_rate: or_default("learning_rate", self.learning_rate, DEFAULT_LEARNING_RATE)?,
            momentum: or_default("momentum", self.momentum, DEFAULT_MOMENTUM)?,
            slope: or_default("slope", self.slope, DEFAULT_SLOPE)?,
            ..self.clone()
        })
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file. The result is not yet resolved.
    pub fn load_json(path: &str) -> Result<NetworkConfig, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

fn or_default(name: &'static str, value: f64, default: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidHyperparameter { name, value });
    }
    Ok(if value == 0.0 { default } else { value })
}
