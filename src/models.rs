use crate::prelude::*;
use ndarray::parallel::prelude::*;
use std::fs::File;
use std::io::{Read, Write};
use std::sync::Arc;
use tracing::debug;

/// Feed-forward network: each layer consumes the previous layer's output.
///
/// Topology is fixed once the network exists; only neuron parameters change.
#[derive(Debug, Clone)]
pub struct Network {
    inputs_count: usize,
    layers: Vec<Layer>,
    last_output: Option<Array1<f64>>,
}

impl Network {
    pub fn builder(inputs_count: usize) -> NetworkBuilder {
        NetworkBuilder {
            inputs_count,
            layers: vec![],
        }
    }

    /// Assemble a network, checking that every layer reads exactly as many
    /// values as the stage before it produces.
    pub fn from_layers(inputs_count: usize, layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(NNError::EmptyModel);
        }
        let mut width = inputs_count;
        for (i, layer) in layers.iter().enumerate() {
            if layer.inputs_count() != width {
                return Err(NNError::LayerShapeMismatch(format!(
                    "Layer {} expects {} inputs but receives {}",
                    i,
                    layer.inputs_count(),
                    width
                )));
            }
            width = layer.neurons_count();
        }
        let network = Self {
            inputs_count,
            layers,
            last_output: None,
        };
        debug!(
            inputs = network.inputs_count,
            layers = network.layers.len(),
            parameters = network.parameter_count(),
            "network assembled"
        );
        Ok(network)
    }

    pub fn inputs_count(&self) -> usize {
        self.inputs_count
    }

    pub fn outputs_count(&self) -> usize {
        self.layers.last().map_or(0, Layer::neurons_count)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Parameter handle for one neuron; `None` when either index is out of range.
    pub fn neuron_mut(&mut self, layer: usize, neuron: usize) -> Option<NeuronParameters<'_>> {
        self.layers.get_mut(layer)?.neuron_mut(neuron)
    }

    /// Parameter handles for every neuron, layer by layer.
    pub fn parameters_mut(&mut self) -> impl Iterator<Item = NeuronParameters<'_>> + '_ {
        self.layers.iter_mut().flat_map(|layer| layer.parameters_mut())
    }

    /// Output of the most recent `compute` call.
    pub fn last_output(&self) -> Option<ArrayView1<'_, f64>> {
        self.last_output.as_ref().map(|output| output.view())
    }

    /// Forward pass without touching any cached outputs; safe to share
    /// between threads.
    pub fn evaluate(&self, input: ArrayView1<f64>) -> Result<Array1<f64>> {
        let (first, rest) = self.layers.split_first().ok_or(NNError::EmptyModel)?;
        let mut output = first.evaluate(input)?;
        for layer in rest {
            output = layer.evaluate(output.view())?;
        }
        Ok(output)
    }

    /// Forward pass that also refreshes the cached outputs of every neuron,
    /// layer and the network itself.
    pub fn compute(&mut self, input: ArrayView1<f64>) -> Result<Array1<f64>> {
        let (first, rest) = self.layers.split_first_mut().ok_or(NNError::EmptyModel)?;
        let mut output = first.compute(input)?;
        for layer in rest {
            output = layer.compute(output.view())?;
        }
        self.last_output = Some(output.clone());
        Ok(output)
    }

    /// Evaluate one sample per row. Rows are processed in parallel.
    pub fn evaluate_batch(&self, inputs: ArrayView2<f64>) -> Result<Array2<f64>> {
        if inputs.ncols() != self.inputs_count {
            return Err(NNError::InvalidArgument(format!(
                "Expected samples with {} features, got {}",
                self.inputs_count,
                inputs.ncols()
            )));
        }
        let rows = inputs
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|sample| self.evaluate(sample))
            .collect::<Result<Vec<_>>>()?;

        let mut outputs = Array2::zeros((inputs.nrows(), self.outputs_count()));
        for (mut target, row) in outputs.axis_iter_mut(Axis(0)).zip(rows.iter()) {
            target.assign(row);
        }
        Ok(outputs)
    }

    pub fn randomize<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        for layer in self.layers.iter_mut() {
            layer.randomize(rng);
        }
    }

    /// Number of trainable values: every weight plus one threshold per neuron.
    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| layer.neurons_count() * (layer.inputs_count() + 1))
            .sum()
    }

    /// Flatten all parameters, layer by layer and neuron by neuron, as the
    /// neuron's weights followed by its threshold.
    pub fn parameters(&self) -> Array1<f64> {
        let mut parameters = Vec::with_capacity(self.parameter_count());
        for neuron in self.layers.iter().flat_map(|layer| layer.neurons()) {
            parameters.extend(neuron.weights().iter());
            parameters.push(neuron.threshold());
        }
        Array1::from(parameters)
    }

    /// Inverse of `parameters`.
    pub fn set_parameters(&mut self, parameters: ArrayView1<f64>) -> Result<()> {
        let expected = self.parameter_count();
        if parameters.len() != expected {
            return Err(NNError::InvalidArgument(format!(
                "Expected {} parameters, got {}",
                expected,
                parameters.len()
            )));
        }
        let mut values = parameters.iter().copied();
        for mut neuron in self.parameters_mut() {
            for weight in neuron.weights_mut().iter_mut() {
                *weight = values.next().ok_or_else(|| {
                    NNError::InvalidArgument("Parameter vector ended early".to_string())
                })?;
            }
            let threshold = values.next().ok_or_else(|| {
                NNError::InvalidArgument("Parameter vector ended early".to_string())
            })?;
            neuron.set_threshold(threshold);
        }
        Ok(())
    }

    pub fn summary(&self) -> String {
        let mut res = "\nModel Network\n".to_string();
        res.push_str("-------------------------------------------------------------\n");
        res.push_str("Layer\t\t Input shape\t\t Output shape\t\t No.of params\n");
        for (i, layer) in self.layers.iter().enumerate() {
            let params = layer.neurons_count() * (layer.inputs_count() + 1);
            res.push_str(&format!(
                "{}\t\t (None, {})\t\t (None, {})\t\t {}\n",
                i,
                layer.inputs_count(),
                layer.neurons_count(),
                params
            ));
        }
        res.push_str("-------------------------------------------------------------\n");
        res.push_str(&format!("Total params: {}\n", self.parameter_count()));
        res
    }

    pub fn to_record(&self) -> NetworkRecord {
        NetworkRecord {
            inputs_count: self.inputs_count,
            layers: self.layers.iter().map(Layer::to_record).collect(),
        }
    }

    /// Rebuild a network from its record. Records carry no activation
    /// function, so every neuron gets `activation`.
    pub fn from_record(record: &NetworkRecord, activation: Arc<dyn ActivationFunction>) -> Result<Self> {
        let layers = record
            .layers
            .iter()
            .map(|layer| Layer::from_record(layer, Arc::clone(&activation)))
            .collect::<Result<Vec<_>>>()?;
        Self::from_layers(record.inputs_count, layers)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_record())?)
    }

    pub fn from_json(json: &str, activation: Arc<dyn ActivationFunction>) -> Result<Self> {
        let record: NetworkRecord = serde_json::from_str(json)?;
        Self::from_record(&record, activation)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let encoded: Vec<u8> = bincode::serialize(&self.to_record())?;
        File::create(path)?.write_all(&encoded)?;
        Ok(())
    }

    pub fn load(path: &str, activation: Arc<dyn ActivationFunction>) -> Result<Self> {
        let mut buffer = Vec::new();
        File::open(path)?.read_to_end(&mut buffer)?;
        let record: NetworkRecord = bincode::deserialize(&buffer)?;
        Self::from_record(&record, activation)
    }
}

/// Collects layer sizes and produces a randomized network.
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    inputs_count: usize,
    layers: Vec<(usize, Arc<dyn ActivationFunction>)>,
}

impl NetworkBuilder {
    pub fn add_layer(mut self, neurons_count: usize, activation: Arc<dyn ActivationFunction>) -> Self {
        self.layers.push((neurons_count, activation));
        self
    }

    pub fn build<R: RandomSource + ?Sized>(self, rng: &mut R) -> Result<Network> {
        let mut width = self.inputs_count;
        let mut layers = Vec::with_capacity(self.layers.len());
        for (neurons_count, activation) in self.layers {
            let mut layer = Layer::new(neurons_count, width, activation)?;
            layer.randomize(rng);
            width = neurons_count;
            layers.push(layer);
        }
        Network::from_layers(self.inputs_count, layers)
    }
}
