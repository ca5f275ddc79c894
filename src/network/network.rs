use std::fmt;

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::error::{ConfigError, NetworkError};
use crate::network::config::NetworkConfig;
use crate::network::layer::LayerKind;
use crate::neuron::{ErrorSignal, Neuron, Rates};

/// Three fixed layers of sigmoid neurons trained online with momentum.
///
/// Two wiring rules differ from a textbook perceptron and are kept on purpose:
/// - each neuron has as many inputs as its *own* layer has neurons;
/// - every layer reads the caller's pattern directly instead of the
///   previous layer's activations.
pub struct Network {
    config: NetworkConfig,
    input_layer: Vec<Neuron>,
    hidden_layer: Vec<Neuron>,
    output_layer: Vec<Neuron>,
    net_error: f64,
    rms_error: f64,
    rng: StdRng,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    config: &'a NetworkConfig,
    net_error: f64,
    rms_error: f64,
    input_layer: &'a [Neuron],
    hidden_layer: &'a [Neuron],
    output_layer: &'a [Neuron],
}

impl Network {
    /// Resolves `config` and builds every neuron. Ids run from 1 across
    /// the input, hidden and output layers in that order.
    pub fn new(config: NetworkConfig) -> Result<Network, ConfigError> {
        let config = config.resolve()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut next_id = 1;
        let mut build = |count: usize, rng: &mut StdRng| -> Result<Vec<Neuron>, ConfigError> {
            (0..count)
                .map(|_| {
                    let neuron = Neuron::new(next_id, count, config.slope, &mut *rng);
                    next_id += 1;
                    neuron
                })
                .collect()
        };
        let input_layer = build(config.input_count, &mut rng)?;
        let hidden_layer = build(config.hidden_count, &mut rng)?;
        let output_layer = build(config.output_count, &mut rng)?;

        info!(
            "network built: {}-{}-{} lr={} momentum={} slope={}",
            config.input_count, config.hidden_count, config.output_count,
            config.learning_rate, config.momentum, config.slope,
        );

        Ok(Network {
            config,
            input_layer,
            hidden_layer,
            output_layer,
            net_error: 0.0,
            rms_error: 0.0,
            rng,
        })
    }

    /// One feed-forward pass, plus a backward and update pass when a target
    /// is given. Returns the output layer's activations.
    ///
    /// A target made entirely of zeros counts as no target.
    pub fn run_cycle(&mut self, pattern: &[f64], target: Option<&[f64]>) -> Result<Vec<f64>, NetworkError> {
        self.cycle(pattern, target)?;
        Ok(self.activations(LayerKind::Output))
    }

    pub fn train(&mut self, pattern: &[f64], target: &[f64]) -> Result<Vec<f64>, NetworkError> {
        self.run_cycle(pattern, Some(target))
    }

    /// Like `train`, but returns this cycle's rms error, or `None` when the
    /// target was all zeros and no backward pass ran.
    pub fn train_step(&mut self, pattern: &[f64], target: &[f64]) -> Result<Option<f64>, NetworkError> {
        self.cycle(pattern, Some(target))
    }

    fn cycle(&mut self, pattern: &[f64], target: Option<&[f64]>) -> Result<Option<f64>, NetworkError> {
        if let Some(target) = target {
            if target.len() != self.output_layer.len() {
                return Err(NetworkError::TargetLength {
                    expected: self.output_layer.len(),
                    got: target.len(),
                });
            }
        }

        self.feed_forward(pattern);

        match target {
            Some(target) if target.iter().any(|&t| t != 0.0) => {
                self.back_propagate(target);
                debug!("training cycle: rms_error={:.6}", self.rms_error);
                Ok(Some(self.rms_error))
            }
            Some(_) => {
                warn!("target is all zeros; running inference only");
                Ok(None)
            }
            None => {
                debug!("inference cycle");
                Ok(None)
            }
        }
    }

    pub fn infer(&mut self, pattern: &[f64]) -> Vec<f64> {
        self.feed_forward(pattern);
        self.activations(LayerKind::Output)
    }

    fn feed_forward(&mut self, pattern: &[f64]) {
        let neurons = self.input_layer.iter_mut()
            .chain(self.hidden_layer.iter_mut())
            .chain(self.output_layer.iter_mut());
        for neuron in neurons {
            neuron.set_inputs(pattern, &mut self.rng);
            neuron.compute_output();
        }
    }

    fn back_propagate(&mut self, target: &[f64]) {
        // Output layer errors restart the cycle's accumulator.
        self.net_error = 0.0;
        for (neuron, &t) in self.output_layer.iter_mut().zip(target) {
            let error = neuron.compute_error(ErrorSignal::select(t, 0.0));
            self.net_error += error * error;
        }

        // Hidden layer: the squared *sum* is accumulated, not the squared error.
        for (i, neuron) in self.hidden_layer.iter_mut().enumerate() {
            let sum = hidden_weighted_sum(&self.output_layer, i);
            trace!("hidden[{i}] weighted sum {sum:.6}");
            neuron.compute_error(ErrorSignal::WeightedSum(sum));
            self.net_error += sum * sum;
        }

        for (i, neuron) in self.input_layer.iter_mut().enumerate() {
            let sum = input_weighted_sum(&self.hidden_layer, i);
            trace!("input[{i}] weighted sum {sum:.6}");
            let error = neuron.compute_error(ErrorSignal::WeightedSum(sum));
            self.net_error += error * error;
        }
        self.rms_error = self.net_error.sqrt();

        let rates = Rates {
            learning_rate: self.config.learning_rate,
            momentum: self.config.momentum,
        };
        for kind in LayerKind::BACKWARD {
            for neuron in self.layer_mut(kind) {
                neuron.adjust_weights(rates);
                neuron.adjust_threshold(rates);
            }
        }
    }

    pub fn layer(&self, kind: LayerKind) -> &[Neuron] {
        match kind {
            LayerKind::Input => &self.input_layer,
            LayerKind::Hidden => &self.hidden_layer,
            LayerKind::Output => &self.output_layer,
        }
    }

    fn layer_mut(&mut self, kind: LayerKind) -> &mut [Neuron] {
        match kind {
            LayerKind::Input => &mut self.input_layer,
            LayerKind::Hidden => &mut self.hidden_layer,
            LayerKind::Output => &mut self.output_layer,
        }
    }

    /// Activation of every neuron in `kind`, in layer order.
    pub fn activations(&self, kind: LayerKind) -> Vec<f64> {
        self.layer(kind).iter().map(Neuron::active).collect()
    }

    /// Name-based accessor. An unknown name is logged and yields `None`.
    pub fn get(&self, name: &str) -> Option<Vec<f64>> {
        match name.parse::<LayerKind>() {
            Ok(kind) => Some(self.activations(kind)),
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }

    pub fn config(&self) -> &NetworkConfig { &self.config }
    pub fn input_count(&self) -> usize { self.input_layer.len() }
    pub fn hidden_count(&self) -> usize { self.hidden_layer.len() }
    pub fn output_count(&self) -> usize { self.output_layer.len() }

    /// Sum of squared error terms from the last training cycle. Inference
    /// cycles leave it untouched.
    pub fn net_error(&self) -> f64 { self.net_error }
    pub fn rms_error(&self) -> f64 { self.rms_error }

    /// Header line followed by the full state of every neuron.
    pub fn dump(&self) -> String {
        let mut out = self.to_string();
        for kind in LayerKind::FORWARD {
            out.push_str(&format!("\n[{kind}]"));
            for neuron in self.layer(kind) {
                out.push('\n');
                out.push_str(&neuron.to_string());
            }
        }
        out
    }

    /// JSON snapshot of every neuron for diagnostics. There is no loader.
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Snapshot {
            config: &self.config,
            net_error: self.net_error,
            rms_error: self.rms_error,
            input_layer: &self.input_layer,
            hidden_layer: &self.hidden_layer,
            output_layer: &self.output_layer,
        })
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Input = {} Hidden = {} Output = {}",
            self.input_layer.len(), self.hidden_layer.len(), self.output_layer.len(),
        )
    }
}

/// `Σⱼ output[j].error · output[j].weights[i]`.
///
/// Output neurons only have as many weights as the output layer has
/// neurons, so hidden neurons past that index get no contribution.
fn hidden_weighted_sum(output_layer: &[Neuron], i: usize) -> f64 {
    output_layer.iter()
        .map(|n| n.error() * n.weights().get(i).copied().unwrap_or(0.0))
        .sum()
}

/// Adds `hidden[i].error · hidden[i].weights[i]` once per hidden neuron.
///
/// Both lookups use the input neuron's own index rather than walking the
/// hidden layer, so the result is `hidden_count` copies of one term. An
/// index with no matching hidden neuron contributes nothing.
fn input_weighted_sum(hidden_layer: &[Neuron], i: usize) -> f64 {
    let term = hidden_layer.get(i)
        .map(|h| h.error() * h.weights().get(i).copied().unwrap_or(0.0))
        .unwrap_or(0.0);
    term * hidden_layer.len() as f64
}
