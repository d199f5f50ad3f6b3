// src/linalg.rs
pub mod ldlt;

pub use ldlt::LdltDecomposition;
