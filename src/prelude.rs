pub use serde::{Serialize, Deserialize};

pub use ndarray::*;
pub use ndarray_rand::RandomExt;
pub use ndarray_rand::rand_distr::Uniform;

pub use crate::models::{Network, NetworkBuilder};
pub use crate::config::{LayerConfig, NetworkConfig};
pub use crate::linalg::LdltDecomposition;
pub use crate::error::*;

// Internal re-exports
pub use crate::core::{
    Activation,
    ActivationFunction,
    Layer,
    Neuron,
    NeuronParameters,
    RandomSource,
    UniformSource,
    LayerRecord,
    NetworkRecord,
    NeuronRecord,
};
