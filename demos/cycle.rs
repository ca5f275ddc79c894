use tri_layer_nn::{train_loop, LayerKind, Network, NetworkConfig, TrainConfig};

fn main() {
    env_logger::init();

    let mut network = Network::new(
        NetworkConfig::new(4, 4, 2)
            .with_learning_rate(0.5)
            .with_momentum(0.3)
            .with_seed(2015),
    ).expect("valid config");

    let patterns = vec![
        vec![1.0, 0.2, 0.2, 1.0],
        vec![0.2, 1.0, 1.0, 0.2],
    ];
    let targets = vec![
        vec![0.9, 0.1],
        vec![0.1, 0.9],
    ];

    let (tx, rx) = std::sync::mpsc::channel();
    let mut config = TrainConfig::new(2000);
    config.progress_tx = Some(tx);

    let last = train_loop(&mut network, &patterns, &targets, &config).expect("training failed");
    drop(config);

    for stats in rx.iter().filter(|s| s.epoch % 500 == 0) {
        println!("Epoch {}: mean rms = {:.6}", stats.epoch, stats.mean_rms_error);
    }
    println!("final mean rms = {last:.6}");

    for pattern in &patterns {
        println!("Input: {:?} -> Output: {:.4?}", pattern, network.infer(pattern));
    }
    println!("hidden activations: {:.4?}", network.activations(LayerKind::Hidden));
}
