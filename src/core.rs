// src/core.rs
pub mod activations;
pub mod layers;
pub mod neuron;
pub mod random;
pub mod records;

// Re-export commonly used items
pub use activations::{Activation, ActivationFunction};
pub use layers::Layer;
pub use neuron::{Neuron, NeuronParameters};
pub use random::{RandomSource, UniformSource};
pub use records::{LayerRecord, NetworkRecord, NeuronRecord};
