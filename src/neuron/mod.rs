pub mod neuron;

pub use neuron::{Neuron, ErrorSignal, Rates, MAX_INPUTS, INPUT_NOISE};
