use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum NNError {
    // Contract violations
    InvalidArgument(String),

    // Solver related errors
    ShapeError(String),
    UndefinedDecomposition,
    NotPositiveDefinite,

    // Topology related errors
    InvalidLayerConfiguration(String),
    LayerShapeMismatch(String),
    EmptyModel,

    // File operations
    IoError(std::io::Error),
    SerializationError(Box<bincode::ErrorKind>),
    JsonError(serde_json::Error),
}

impl fmt::Display for NNError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NNError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            NNError::ShapeError(msg) => write!(f, "Shape error: {}", msg),
            NNError::UndefinedDecomposition => {
                write!(f, "The decomposition is undefined (zero in diagonal)")
            }
            NNError::NotPositiveDefinite => write!(f, "Decomposed matrix is not positive definite"),
            NNError::InvalidLayerConfiguration(msg) => write!(f, "Invalid layer configuration: {}", msg),
            NNError::LayerShapeMismatch(msg) => write!(f, "Layer shape mismatch: {}", msg),
            NNError::EmptyModel => write!(f, "Model has no layers"),
            NNError::IoError(err) => write!(f, "I/O error: {}", err),
            NNError::SerializationError(err) => write!(f, "Serialization error: {}", err),
            NNError::JsonError(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl From<std::io::Error> for NNError {
    fn from(err: std::io::Error) -> NNError {
        NNError::IoError(err)
    }
}

impl From<Box<bincode::ErrorKind>> for NNError {
    fn from(err: Box<bincode::ErrorKind>) -> NNError {
        NNError::SerializationError(err)
    }
}

impl From<serde_json::Error> for NNError {
    fn from(err: serde_json::Error) -> NNError {
        NNError::JsonError(err)
    }
}

impl From<ndarray::ShapeError> for NNError {
    fn from(err: ndarray::ShapeError) -> NNError {
        NNError::ShapeError(err.to_string())
    }
}

impl Error for NNError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NNError::IoError(err) => Some(err),
            NNError::SerializationError(err) => Some(err),
            NNError::JsonError(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NNError>;
