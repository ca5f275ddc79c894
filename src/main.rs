// Thin driver: build the reference 5-7-5 network, run one training cycle
// and print the result. All network logic lives in the library.
// Set RUST_LOG=debug to see per-cycle logging.
use std::process::ExitCode;

use tri_layer_nn::{Network, NetworkConfig};

fn main() -> ExitCode {
    env_logger::init();

    let config = NetworkConfig::new(5, 7, 5)
        .with_learning_rate(0.5)
        .with_momentum(0.3)
        .with_slope(-3.0);

    let mut network = match Network::new(config) {
        Ok(network) => network,
        Err(e) => {
            eprintln!("tri-layer-nn: {e}");
            return ExitCode::FAILURE;
        }
    };
    println!("{network}");

    match network.train(&[1.0; 5], &[0.9; 5]) {
        Ok(output) => {
            println!("output    = {:.4?}", output);
            println!("rms error = {:.6}", network.rms_error());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("tri-layer-nn: {e}");
            ExitCode::FAILURE
        }
    }
}
