pub mod analyzer;
pub mod config;
pub mod preprocess;

use thiserror::Error;

/// Everything that can go wrong between receiving an upload and scoring it.
/// The HTTP layer collapses these into a single 500 response carrying the
/// display text.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse model config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid model config: {0}")]
    Config(String),
}
