use crate::prelude::*;
use std::sync::Arc;

/// Weighted-sum neuron with a threshold (bias) and an activation function.
///
/// `compute` also stores the result in an advisory cache readable through
/// `last_output`; `evaluate` leaves the neuron untouched and is the path to
/// use when several threads share one neuron.
#[derive(Debug, Clone)]
pub struct Neuron {
    weights: Array1<f64>,
    threshold: f64,
    activation: Arc<dyn ActivationFunction>,
    last_output: f64,
}

impl Neuron {
    /// Neuron with `inputs_count` zero weights and a zero threshold.
    pub fn new(inputs_count: usize, activation: Arc<dyn ActivationFunction>) -> Self {
        Self::with_parameters(Array1::zeros(inputs_count), 0.0, activation)
    }

    pub fn with_parameters(
        weights: Array1<f64>,
        threshold: f64,
        activation: Arc<dyn ActivationFunction>,
    ) -> Self {
        Self {
            weights,
            threshold,
            activation,
            last_output: 0.0,
        }
    }

    pub fn inputs_count(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    /// Mutable view of the weights; the neuron's width cannot change through it.
    pub fn weights_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.weights.view_mut()
    }

    pub fn set_weights(&mut self, weights: &[f64]) -> Result<()> {
        if weights.len() != self.inputs_count() {
            return Err(NNError::InvalidArgument(format!(
                "Expected {} weights, got {}",
                self.inputs_count(),
                weights.len()
            )));
        }
        self.weights.assign(&ArrayView1::from(weights));
        Ok(())
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    pub fn activation_function(&self) -> &Arc<dyn ActivationFunction> {
        &self.activation
    }

    pub fn set_activation_function(&mut self, activation: Arc<dyn ActivationFunction>) {
        self.activation = activation;
    }

    /// Output of the most recent `compute` call (0 before the first one).
    pub fn last_output(&self) -> f64 {
        self.last_output
    }

    pub fn evaluate(&self, input: ArrayView1<f64>) -> Result<f64> {
        if input.len() != self.inputs_count() {
            return Err(NNError::InvalidArgument(format!(
                "Wrong length of the input vector: expected {}, got {}",
                self.inputs_count(),
                input.len()
            )));
        }
        let sum = self.weights.dot(&input) + self.threshold;
        Ok(self.activation.function(sum))
    }

    pub fn compute(&mut self, input: ArrayView1<f64>) -> Result<f64> {
        let output = self.evaluate(input)?;
        self.last_output = output;
        Ok(output)
    }

    /// Replace every weight and the threshold with fresh draws from `rng`.
    pub fn randomize<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.weights = rng.generate_batch(self.inputs_count());
        self.threshold = rng.generate();
    }

    pub fn to_record(&self) -> NeuronRecord {
        NeuronRecord {
            threshold: self.threshold,
            inputs_count: self.inputs_count(),
            weights: self.weights.to_vec(),
        }
    }

    pub fn from_record(record: &NeuronRecord, activation: Arc<dyn ActivationFunction>) -> Result<Self> {
        if record.weights.len() != record.inputs_count {
            return Err(NNError::InvalidLayerConfiguration(format!(
                "Neuron declares {} inputs but stores {} weights",
                record.inputs_count,
                record.weights.len()
            )));
        }
        Ok(Self::with_parameters(
            Array1::from(record.weights.clone()),
            record.threshold,
            activation,
        ))
    }
}

/// Mutable access to a neuron that already belongs to a layer.
///
/// Weights, threshold and activation can be edited; the neuron itself cannot
/// be replaced, so its input width stays what the layer expects.
#[derive(Debug)]
pub struct NeuronParameters<'a> {
    neuron: &'a mut Neuron,
}

impl<'a> NeuronParameters<'a> {
    pub(crate) fn new(neuron: &'a mut Neuron) -> Self {
        Self { neuron }
    }

    pub fn inputs_count(&self) -> usize {
        self.neuron.inputs_count()
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.neuron.weights()
    }

    pub fn weights_mut(&mut self) -> ArrayViewMut1<'_, f64> {
        self.neuron.weights_mut()
    }

    pub fn set_weights(&mut self, weights: &[f64]) -> Result<()> {
        self.neuron.set_weights(weights)
    }

    pub fn threshold(&self) -> f64 {
        self.neuron.threshold()
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.neuron.set_threshold(threshold);
    }

    pub fn set_activation_function(&mut self, activation: Arc<dyn ActivationFunction>) {
        self.neuron.set_activation_function(activation);
    }
}
