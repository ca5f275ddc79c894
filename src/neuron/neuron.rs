use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::activation::sigmoid::Sigmoid;
use crate::error::ConfigError;

/// Hard cap on the number of incoming connections of a single neuron.
pub const MAX_INPUTS: usize = 10;

/// Upper bound (exclusive) of the noise substituted for zero or missing inputs.
pub const INPUT_NOISE: f64 = 0.1;

/// What a neuron's local error is computed against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorSignal {
    /// Output layer: the desired activation.
    Target(f64),
    /// Hidden and input layers: the downstream weighted error sum.
    WeightedSum(f64),
}

impl ErrorSignal {
    /// Picks the mode the way the cycle does: a nonzero target wins,
    /// otherwise the weighted sum is used.
    pub fn select(target: f64, weighted_sum: f64) -> ErrorSignal {
        if target != 0.0 {
            ErrorSignal::Target(target)
        } else {
            ErrorSignal::WeightedSum(weighted_sum)
        }
    }
}

/// Step size and momentum handed to the update operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    pub learning_rate: f64,
    pub momentum: f64,
}

/// A sigmoid unit that owns its weights, threshold and momentum terms.
///
/// A neuron keeps the inputs, activation and error of the last cycle so the
/// update step can run after the whole network has computed its errors.
#[derive(Debug, Clone, Serialize)]
pub struct Neuron {
    id: usize,
    input_count: usize,
    activator: Sigmoid,
    threshold: f64,
    weights: Vec<f64>,
    inputs: Vec<f64>,
    wchange: Vec<f64>,
    tchange: f64,
    output: f64,
    active: f64,
    error: f64,
    desired: f64,
}

impl Neuron {
    /// Threshold is drawn from [0, 1] and each weight from [0, 0.5];
    /// inputs and momentum terms start at zero.
    pub fn new<R: Rng + ?Sized>(
        id: usize,
        input_count: usize,
        slope: f64,
        rng: &mut R,
    ) -> Result<Neuron, ConfigError> {
        if input_count > MAX_INPUTS {
            return Err(ConfigError::TooManyInputs { inputs: input_count, max: MAX_INPUTS });
        }
        let threshold = rng.gen_range(0.0..=1.0);
        let weights = (0..input_count).map(|_| rng.gen_range(0.0..=0.5)).collect();

        Ok(Neuron {
            id,
            input_count,
            activator: Sigmoid::new(slope),
            threshold,
            weights,
            inputs: vec![0.0; input_count],
            wchange: vec![0.0; input_count],
            tchange: 0.0,
            output: 0.0,
            active: 0.0,
            error: 0.0,
            desired: 0.0,
        })
    }

    /// Copies the first `input_count` entries of `pattern`.
    ///
    /// Zero entries, and entries past the end of `pattern`, are replaced with
    /// noise from [0, 0.1) so no connection ever sees an exact zero.
    pub fn set_inputs<R: Rng + ?Sized>(&mut self, pattern: &[f64], rng: &mut R) {
        for (i, slot) in self.inputs.iter_mut().enumerate() {
            let value = pattern.get(i).copied().unwrap_or(0.0);
            *slot = if value != 0.0 { value } else { rng.gen_range(0.0..INPUT_NOISE) };
        }
    }

    /// `output = Σ wᵢ·xᵢ − threshold`, `active = sigmoid(output)`.
    pub fn compute_output(&mut self) -> f64 {
        let sum: f64 = self.weights.iter()
            .zip(self.inputs.iter())
            .map(|(w, x)| w * x)
            .sum();
        self.output = sum - self.threshold;
        self.active = self.activator.function(self.output);
        self.active
    }

    /// Stores and returns the local error term.
    pub fn compute_error(&mut self, signal: ErrorSignal) -> f64 {
        let gain = Sigmoid::derivative_from_active(self.active);
        self.error = match signal {
            ErrorSignal::Target(target) => {
                self.desired = target;
                (target - self.active) * gain
            }
            ErrorSignal::WeightedSum(sum) => gain * sum,
        };
        self.error
    }

    /// `Δwᵢ = lr·error·xᵢ + momentum·Δwᵢ(prev)`, then `wᵢ += Δwᵢ`.
    pub fn adjust_weights(&mut self, rates: Rates) {
        let step = rates.learning_rate * self.error;
        for ((w, dw), x) in self.weights.iter_mut()
            .zip(self.wchange.iter_mut())
            .zip(self.inputs.iter())
        {
            *dw = step * x + rates.momentum * *dw;
            *w += *dw;
        }
    }

    /// Bias update with a fixed input of 1; the threshold moves against the delta.
    pub fn adjust_threshold(&mut self, rates: Rates) {
        self.tchange = rates.learning_rate * self.error + rates.momentum * self.tchange;
        self.threshold -= self.tchange;
    }

    pub fn set_slope(&mut self, slope: f64) {
        self.activator = Sigmoid::new(slope);
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    /// Records a target for diagnostics; `compute_error` overwrites it in
    /// target mode.
    pub fn set_desired(&mut self, desired: f64) {
        self.desired = desired;
    }

    pub fn id(&self) -> usize { self.id }
    pub fn input_count(&self) -> usize { self.input_count }
    pub fn slope(&self) -> f64 { self.activator.slope }
    pub fn threshold(&self) -> f64 { self.threshold }
    pub fn weights(&self) -> &[f64] { &self.weights }
    pub fn inputs(&self) -> &[f64] { &self.inputs }
    pub fn wchange(&self) -> &[f64] { &self.wchange }
    pub fn tchange(&self) -> f64 { self.tchange }
    pub fn output(&self) -> f64 { self.output }
    pub fn active(&self) -> f64 { self.active }
    pub fn error(&self) -> f64 { self.error }
    pub fn desired(&self) -> f64 { self.desired }
}

impl fmt::Display for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "id = {} Slope = {:.6} Active = {:.6} Desired = {:.6} Error = {:.6} InputCnt = {} Output = {:.6}",
            self.id, self.activator.slope, self.active, self.desired, self.error,
            self.input_count, self.output,
        )?;
        write!(f, " tchange = {:.6} Threshold = {:.6}", self.tchange, self.threshold)?;
        for ((x, w), dw) in self.inputs.iter().zip(self.weights.iter()).zip(self.wchange.iter()) {
            write!(f, "\ninputs {:.6}, weights {:.6}, wchange {:.6}", x, w, dw)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn construction_draws_parameters_in_range() {
        let mut rng = rng();
        for id in 0..50 {
            let n = Neuron::new(id, 6, -3.0, &mut rng).unwrap();
            assert_eq!(n.weights().len(), 6);
            assert_eq!(n.wchange().len(), 6);
            assert_eq!(n.inputs().len(), 6);
            assert!((0.0..=1.0).contains(&n.threshold()));
            assert!(n.weights().iter().all(|w| (0.0..=0.5).contains(w)));
            assert!(n.wchange().iter().all(|&d| d == 0.0));
            assert!(n.inputs().iter().all(|&x| x == 0.0));
            assert_eq!(n.tchange(), 0.0);
        }
    }

    #[test]
    fn rejects_arity_above_limit() {
        let err = Neuron::new(1, MAX_INPUTS + 1, -3.0, &mut rng()).unwrap_err();
        assert!(matches!(err, ConfigError::TooManyInputs { inputs: 11, max: MAX_INPUTS }));
        assert!(Neuron::new(1, MAX_INPUTS, -3.0, &mut rng()).is_ok());
    }

    #[test]
    fn zero_and_missing_inputs_become_small_noise() {
        let mut rng = rng();
        let mut n = Neuron::new(1, 5, -3.0, &mut rng).unwrap();
        n.set_inputs(&[2.0, 0.0, -1.5], &mut rng);

        assert_eq!(n.inputs()[0], 2.0);
        assert_eq!(n.inputs()[2], -1.5);
        for &x in [n.inputs()[1], n.inputs()[3], n.inputs()[4]].iter() {
            assert!((0.0..INPUT_NOISE).contains(&x), "noise {x} out of range");
        }
    }

    #[test]
    fn extra_pattern_entries_are_ignored() {
        let mut rng = rng();
        let mut n = Neuron::new(1, 2, -3.0, &mut rng).unwrap();
        n.set_inputs(&[1.0, 2.0, 3.0, 4.0], &mut rng);
        assert_eq!(n.inputs(), &[1.0, 2.0]);
    }

    #[test]
    fn output_is_weighted_sum_minus_threshold() {
        let mut rng = rng();
        let mut n = Neuron::new(1, 3, -3.0, &mut rng).unwrap();
        n.weights = vec![0.1, 0.2, 0.3];
        n.threshold = 0.4;
        n.set_inputs(&[1.0, 2.0, 3.0], &mut rng);

        n.compute_output();
        assert!((n.output() - (1.4 - 0.4)).abs() < 1e-12);
        assert!((n.active() - Sigmoid::new(-3.0).function(1.0)).abs() < 1e-12);
    }

    #[test]
    fn output_error_follows_residual_sign() {
        let mut n = Neuron::new(1, 1, -3.0, &mut rng()).unwrap();
        n.active = 0.3;

        let up = n.compute_error(ErrorSignal::Target(0.9));
        assert!(up > 0.0);
        assert!((up - 0.6 * 0.3 * 0.7).abs() < 1e-12);
        assert_eq!(n.desired(), 0.9);

        let down = n.compute_error(ErrorSignal::Target(0.1));
        assert!(down < 0.0);
    }

    #[test]
    fn hidden_error_scales_weighted_sum() {
        let mut n = Neuron::new(1, 1, -3.0, &mut rng()).unwrap();
        n.active = 0.8;
        let e = n.compute_error(ErrorSignal::WeightedSum(0.5));
        assert!((e - 0.8 * 0.2 * 0.5).abs() < 1e-12);
        assert_eq!(n.desired(), 0.0);
    }

    #[test]
    fn zero_target_selects_weighted_sum_mode() {
        assert_eq!(ErrorSignal::select(0.0, 0.25), ErrorSignal::WeightedSum(0.25));
        assert_eq!(ErrorSignal::select(0.7, 0.25), ErrorSignal::Target(0.7));
    }

    #[test]
    fn weight_update_carries_momentum() {
        let mut n = Neuron::new(1, 3, -3.0, &mut rng()).unwrap();
        n.inputs = vec![1.0, 0.5, 2.0];
        n.wchange = vec![0.1, -0.2, 0.05];
        n.error = 0.3;
        let before = n.weights.clone();
        let prior = n.wchange.clone();
        let rates = Rates { learning_rate: 0.5, momentum: 0.3 };

        n.adjust_weights(rates);

        for i in 0..3 {
            let expected = 0.5 * 0.3 * n.inputs[i] + 0.3 * prior[i];
            assert!((n.wchange()[i] - expected).abs() < 1e-12);
            assert!((n.weights()[i] - (before[i] + expected)).abs() < 1e-12);
        }
    }

    #[test]
    fn threshold_moves_against_its_delta() {
        let mut n = Neuron::new(1, 1, -3.0, &mut rng()).unwrap();
        n.error = 0.2;
        n.tchange = 0.1;
        let before = n.threshold();
        n.adjust_threshold(Rates { learning_rate: 0.5, momentum: 0.3 });

        let delta = 0.5 * 0.2 + 0.3 * 0.1;
        assert!((n.tchange() - delta).abs() < 1e-12);
        assert!((n.threshold() - (before - delta)).abs() < 1e-12);
    }

    #[test]
    fn setters_change_slope_threshold_and_desired() {
        let mut rng = rng();
        let mut n = Neuron::new(1, 2, -3.0, &mut rng).unwrap();
        n.set_threshold(0.25);
        n.set_slope(-1.0);
        n.set_desired(0.6);
        assert_eq!(n.threshold(), 0.25);
        assert_eq!(n.slope(), -1.0);
        assert_eq!(n.desired(), 0.6);

        n.weights = vec![0.5, 0.5];
        n.set_inputs(&[1.0, 1.0], &mut rng);
        n.compute_output();
        assert!((n.output() - 0.75).abs() < 1e-12);
        assert!((n.active() - Sigmoid::new(-1.0).function(0.75)).abs() < 1e-12);
    }

    #[test]
    fn display_lists_every_connection() {
        let n = Neuron::new(4, 3, -3.0, &mut rng()).unwrap();
        let text = n.to_string();
        assert!(text.starts_with("id = 4 "));
        assert_eq!(text.matches("inputs ").count(), 3);
    }
}
