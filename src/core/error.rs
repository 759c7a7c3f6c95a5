use thiserror::Error;

use crate::core::types::Shape;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Map image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("River map is {river} but fertility map is {fertility}")]
    ShapeMismatch { river: Shape, fertility: Shape },

    #[error("Map has no cells")]
    EmptyMap,

    #[error("No land cell found after {attempts} attempts; the river map covers (almost) the whole field")]
    DegenerateField { attempts: usize },
}

pub type Result<T> = std::result::Result<T, SimError>;
