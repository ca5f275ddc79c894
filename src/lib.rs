pub mod activation;
pub mod error;
pub mod neuron;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::sigmoid::Sigmoid;
pub use error::{ConfigError, NetworkError};
pub use neuron::neuron::{Neuron, ErrorSignal, Rates};
pub use network::{Network, NetworkConfig, LayerKind};
pub use train::{train_loop, TrainConfig, EpochStats};
