//! Plain record shapes exchanged with persistence adapters.
//!
//! Field names and order follow the established on-disk layout, so JSON
//! written by earlier tools loads unchanged. Activation functions and cached
//! outputs are never part of a record.

use crate::prelude::*;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NeuronRecord {
    #[serde(rename = "Threshold")]
    pub threshold: f64,
    #[serde(rename = "InputsCount")]
    pub inputs_count: usize,
    #[serde(rename = "Weights")]
    pub weights: Vec<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LayerRecord {
    #[serde(rename = "InputsCount")]
    pub inputs_count: usize,
    #[serde(rename = "NeuronsCount")]
    pub neurons_count: usize,
    #[serde(rename = "Neurons")]
    pub neurons: Vec<NeuronRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NetworkRecord {
    #[serde(rename = "InputsCount")]
    pub inputs_count: usize,
    #[serde(rename = "Layers")]
    pub layers: Vec<LayerRecord>,
}
