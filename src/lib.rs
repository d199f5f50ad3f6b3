pub mod config;
pub mod core;
pub mod error;
pub mod linalg;
pub mod models;
pub mod prelude;
pub mod utils;

// Re-export types
pub use crate::core::{Activation, ActivationFunction, Layer, Neuron, RandomSource, UniformSource};
pub use crate::error::{NNError, Result};
pub use crate::linalg::LdltDecomposition;
pub use crate::models::{Network, NetworkBuilder};
