use crate::prelude::*;
use std::fs::File;
use std::io::BufReader;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LayerConfig {
    pub neurons: usize,
    pub activation: Activation,
}

/// Serializable description of a network to build.
///
/// ```json
/// {
///   "inputs_count": 2,
///   "layers": [
///     { "neurons": 4, "activation": "Tanh" },
///     { "neurons": 1, "activation": "Linear" }
///   ],
///   "weight_range": [-1.0, 1.0],
///   "seed": 42
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    pub inputs_count: usize,
    pub layers: Vec<LayerConfig>,
    /// Range the initial weights and thresholds are drawn from.
    #[serde(default = "default_weight_range")]
    pub weight_range: (f64, f64),
    /// Seed for reproducible initialization; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_weight_range() -> (f64, f64) {
    (0.0, 1.0)
}

impl NetworkConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &str) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(NNError::EmptyModel);
        }
        if self.inputs_count == 0 || self.layers.iter().any(|layer| layer.neurons == 0) {
            return Err(NNError::InvalidLayerConfiguration(
                "Layer dimensions must be greater than 0".to_string(),
            ));
        }
        let (low, high) = self.weight_range;
        if !(low.is_finite() && high.is_finite()) || low >= high {
            return Err(NNError::InvalidLayerConfiguration(format!(
                "Weight range [{}, {}) is empty or not finite",
                low, high
            )));
        }
        Ok(())
    }

    /// Build the network and draw its initial parameters.
    pub fn build(&self) -> Result<Network> {
        self.validate()?;
        let (low, high) = self.weight_range;
        let mut rng = match self.seed {
            Some(seed) => UniformSource::new(low, high, seed)?,
            None => UniformSource::from_entropy(low, high)?,
        };
        self.layers
            .iter()
            .fold(Network::builder(self.inputs_count), |builder, layer| {
                builder.add_layer(layer.neurons, layer.activation.shared())
            })
            .build(&mut rng)
    }
}
