use serde::{Serialize, Deserialize};

/// Per-epoch statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, one value is
/// sent at the end of every completed epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Mean of the per-cycle rms error over the trained patterns of this epoch.
    pub mean_rms_error: f64,
    /// Patterns that ran a backward pass; all-zero targets are not counted.
    pub trained_patterns: usize,
    /// Wall-clock duration of this epoch in milliseconds.
    pub elapsed_ms: u64,
}
