use crate::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of real values used to (re)initialize trainable parameters.
///
/// Generators are always passed in explicitly; nothing in the crate keeps a
/// process-wide instance.
pub trait RandomSource {
    fn generate(&mut self) -> f64;

    fn generate_batch(&mut self, samples: usize) -> Array1<f64> {
        Array1::from_shape_fn(samples, |_| self.generate())
    }
}

// Any `rand` generator samples from [0, 1).
impl<R: Rng + ?Sized> RandomSource for R {
    fn generate(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Seedable generator drawing from a uniform `[low, high)` range.
#[derive(Debug, Clone)]
pub struct UniformSource {
    rng: StdRng,
    range: Uniform<f64>,
}

impl UniformSource {
    pub fn new(low: f64, high: f64, seed: u64) -> Result<Self> {
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            range: uniform_range(low, high)?,
        })
    }

    pub fn from_entropy(low: f64, high: f64) -> Result<Self> {
        Ok(Self {
            rng: StdRng::from_entropy(),
            range: uniform_range(low, high)?,
        })
    }
}

impl Default for UniformSource {
    fn default() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            range: Uniform::new(0.0, 1.0),
        }
    }
}

impl RandomSource for UniformSource {
    fn generate(&mut self) -> f64 {
        self.rng.sample(self.range)
    }

    fn generate_batch(&mut self, samples: usize) -> Array1<f64> {
        Array1::random_using(samples, self.range, &mut self.rng)
    }
}

fn uniform_range(low: f64, high: f64) -> Result<Uniform<f64>> {
    if !(low.is_finite() && high.is_finite()) || low >= high {
        return Err(NNError::InvalidArgument(format!(
            "Uniform range [{}, {}) is empty or not finite",
            low, high
        )));
    }
    Ok(Uniform::new(low, high))
}
