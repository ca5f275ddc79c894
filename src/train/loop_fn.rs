use std::sync::atomic::Ordering;
use std::time::Instant;

use log::{debug, info};

use crate::error::NetworkError;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Trains `network` online for `config.epochs` epochs and returns the mean
/// rms error of the last completed epoch.
///
/// Each epoch runs one training cycle per pattern, in the order given, so
/// weights move after every sample. Patterns whose target is all zeros run
/// forward only and are left out of the epoch mean.
///
/// # Early termination
/// The loop stops when `config.stop_flag` is set or when the
/// `progress_tx` receiver has been dropped.
pub fn train_loop(
    network: &mut Network,
    patterns: &[Vec<f64>],
    targets: &[Vec<f64>],
    config: &TrainConfig,
) -> Result<f64, NetworkError> {
    if patterns.is_empty() {
        return Err(NetworkError::EmptyDataset);
    }
    if patterns.len() != targets.len() {
        return Err(NetworkError::DatasetMismatch {
            patterns: patterns.len(),
            targets: targets.len(),
        });
    }

    let mut last_rms = 0.0;

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            info!("stop requested before epoch {epoch}");
            break;
        }

        let t_start = Instant::now();
        let mut total = 0.0;
        let mut trained = 0;
        for (pattern, target) in patterns.iter().zip(targets) {
            if let Some(rms) = network.train_step(pattern, target)? {
                total += rms;
                trained += 1;
            }
        }
        last_rms = if trained > 0 { total / trained as f64 } else { 0.0 };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            mean_rms_error: last_rms,
            trained_patterns: trained,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!("epoch {}/{}: mean rms {:.6}", epoch, config.epochs, last_rms);

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats).is_err() {
                info!("progress receiver dropped; stopping after epoch {epoch}");
                break;
            }
        }
    }

    Ok(last_rms)
}

fn stop_requested(config: &TrainConfig) -> bool {
    config.stop_flag
        .as_ref()
        .map_or(false, |flag| flag.load(Ordering::Relaxed))
}
