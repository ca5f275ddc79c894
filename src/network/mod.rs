pub mod config;
pub mod layer;
pub mod network;

pub use config::NetworkConfig;
pub use layer::LayerKind;
pub use network::Network;
