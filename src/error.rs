use thiserror::Error;

/// Rejections raised while building a network from its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{layer} layer has {size} neurons, limit is {max}")]
    LayerTooLarge { layer: &'static str, size: usize, max: usize },

    #[error("neuron needs {inputs} inputs, limit is {max}")]
    TooManyInputs { inputs: usize, max: usize },

    #[error("{layer} layer must contain at least one neuron")]
    EmptyLayer { layer: &'static str },

    #[error("hyperparameter `{name}` must be finite, got {value}")]
    InvalidHyperparameter { name: &'static str, value: f64 },

    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by a constructed network.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("target has {got} values but the output layer has {expected} neurons")]
    TargetLength { expected: usize, got: usize },

    #[error("unknown layer `{0}` (expected input, hidden or output)")]
    UnknownLayer(String),

    #[error("{patterns} patterns but {targets} targets")]
    DatasetMismatch { patterns: usize, targets: usize },

    #[error("training set is empty")]
    EmptyDataset,
}
