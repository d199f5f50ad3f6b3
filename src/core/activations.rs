use crate::prelude::*;
use std::fmt::Debug;
use std::sync::Arc;

/// Scalar activation function used by neurons.
///
/// `derivative_from_output(function(x))` must equal `derivative(x)` (within
/// floating point tolerance), so callers that already hold the output can skip
/// recomputing the function.
pub trait ActivationFunction: Send + Sync + Debug {
    fn function(&self, x: f64) -> f64;

    fn derivative(&self, x: f64) -> f64;

    fn derivative_from_output(&self, y: f64) -> f64;
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Linear,
    Sigmoid,
    Tanh,
    Relu,
}

impl Activation {
    /// Wrap the activation so it can be shared between neurons.
    pub fn shared(self) -> Arc<dyn ActivationFunction> {
        Arc::new(self)
    }
}

impl ActivationFunction for Activation {
    fn function(&self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::Sigmoid => sigmoid(x),
            Self::Tanh => x.tanh(),
            Self::Relu => x.max(0.0),
        }
    }

    fn derivative(&self, x: f64) -> f64 {
        match self {
            Self::Linear => 1.0,
            Self::Sigmoid => {
                let s = sigmoid(x);
                s * (1.0 - s)
            }
            Self::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            Self::Relu => relu_slope(x),
        }
    }

    fn derivative_from_output(&self, y: f64) -> f64 {
        match self {
            Self::Linear => 1.0,
            Self::Sigmoid => y * (1.0 - y),
            Self::Tanh => 1.0 - y * y,
            // relu(x) > 0 exactly when x > 0
            Self::Relu => relu_slope(y),
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn relu_slope(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else {
        0.0
    }
}
