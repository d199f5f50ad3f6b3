use crate::prelude::*;
use std::sync::Arc;

/// Fixed-size group of neurons that all read the same input vector.
#[derive(Debug, Clone)]
pub struct Layer {
    inputs_count: usize,
    neurons: Vec<Neuron>,
    last_output: Array1<f64>,
}

impl Layer {
    /// Layer of zero-initialized neurons; call `randomize` to draw parameters.
    pub fn new(
        neurons_count: usize,
        inputs_count: usize,
        activation: Arc<dyn ActivationFunction>,
    ) -> Result<Self> {
        if neurons_count == 0 || inputs_count == 0 {
            return Err(NNError::InvalidLayerConfiguration(
                "Layer dimensions must be greater than 0".to_string(),
            ));
        }
        let neurons = (0..neurons_count)
            .map(|_| Neuron::new(inputs_count, Arc::clone(&activation)))
            .collect();
        Ok(Self {
            inputs_count,
            neurons,
            last_output: Array1::zeros(neurons_count),
        })
    }

    /// Build a layer from existing neurons, which must share one input width.
    pub fn from_neurons(neurons: Vec<Neuron>) -> Result<Self> {
        let inputs_count = match neurons.first() {
            Some(neuron) => neuron.inputs_count(),
            None => {
                return Err(NNError::InvalidLayerConfiguration(
                    "Layer must contain at least one neuron".to_string(),
                ))
            }
        };
        if inputs_count == 0 {
            return Err(NNError::InvalidLayerConfiguration(
                "Layer dimensions must be greater than 0".to_string(),
            ));
        }
        if let Some((i, neuron)) = neurons
            .iter()
            .enumerate()
            .find(|(_, neuron)| neuron.inputs_count() != inputs_count)
        {
            return Err(NNError::InvalidLayerConfiguration(format!(
                "Neuron {} has {} inputs, layer expects {}",
                i,
                neuron.inputs_count(),
                inputs_count
            )));
        }
        let last_output = Array1::zeros(neurons.len());
        Ok(Self {
            inputs_count,
            neurons,
            last_output,
        })
    }

    pub fn inputs_count(&self) -> usize {
        self.inputs_count
    }

    pub fn neurons_count(&self) -> usize {
        self.neurons.len()
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn neuron_mut(&mut self, index: usize) -> Option<NeuronParameters<'_>> {
        self.neurons.get_mut(index).map(NeuronParameters::new)
    }

    /// Parameter handles for every neuron, in order.
    pub fn parameters_mut(&mut self) -> impl Iterator<Item = NeuronParameters<'_>> + '_ {
        self.neurons.iter_mut().map(NeuronParameters::new)
    }

    pub fn last_output(&self) -> ArrayView1<'_, f64> {
        self.last_output.view()
    }

    pub fn evaluate(&self, input: ArrayView1<f64>) -> Result<Array1<f64>> {
        self.check_input(&input)?;
        self.neurons
            .iter()
            .map(|neuron| neuron.evaluate(input))
            .collect::<Result<Vec<f64>>>()
            .map(Array1::from)
    }

    pub fn compute(&mut self, input: ArrayView1<f64>) -> Result<Array1<f64>> {
        self.check_input(&input)?;
        let output = self
            .neurons
            .iter_mut()
            .map(|neuron| neuron.compute(input))
            .collect::<Result<Vec<f64>>>()
            .map(Array1::from)?;
        self.last_output.assign(&output);
        Ok(output)
    }

    pub fn randomize<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        for neuron in self.neurons.iter_mut() {
            neuron.randomize(rng);
        }
    }

    pub fn set_activation_function(&mut self, activation: Arc<dyn ActivationFunction>) {
        for neuron in self.neurons.iter_mut() {
            neuron.set_activation_function(Arc::clone(&activation));
        }
    }

    pub fn to_record(&self) -> LayerRecord {
        LayerRecord {
            inputs_count: self.inputs_count,
            neurons_count: self.neurons.len(),
            neurons: self.neurons.iter().map(Neuron::to_record).collect(),
        }
    }

    pub fn from_record(record: &LayerRecord, activation: Arc<dyn ActivationFunction>) -> Result<Self> {
        if record.neurons.len() != record.neurons_count {
            return Err(NNError::InvalidLayerConfiguration(format!(
                "Layer declares {} neurons but stores {}",
                record.neurons_count,
                record.neurons.len()
            )));
        }
        let neurons = record
            .neurons
            .iter()
            .map(|neuron| Neuron::from_record(neuron, Arc::clone(&activation)))
            .collect::<Result<Vec<_>>>()?;
        let layer = Self::from_neurons(neurons)?;
        if layer.inputs_count != record.inputs_count {
            return Err(NNError::InvalidLayerConfiguration(format!(
                "Layer declares {} inputs but its neurons have {}",
                record.inputs_count, layer.inputs_count
            )));
        }
        Ok(layer)
    }

    fn check_input(&self, input: &ArrayView1<f64>) -> Result<()> {
        if input.len() != self.inputs_count {
            return Err(NNError::InvalidArgument(format!(
                "Wrong length of the input vector: expected {}, got {}",
                self.inputs_count,
                input.len()
            )));
        }
        Ok(())
    }
}
