use serde::{Deserialize, Serialize};

use super::AnalysisError;

/// Preprocessing parameters, loaded from `config/model.yaml` at the workspace
/// root. The defaults mirror the pipeline the placeholder network was built
/// around and are used whenever the file is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub version: f32,
    pub image: ImageConfig,
    pub normalization: NormalizationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub size: [u32; 2],
    pub channels: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationConfig {
    pub mean: f32,
    pub std: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            version: 1.0,
            image: ImageConfig {
                size: [224, 224],
                channels: 1,
            },
            normalization: NormalizationConfig {
                mean: 0.485,
                std: 0.229,
            },
        }
    }
}

impl ModelConfig {
    pub fn load() -> Result<Self, AnalysisError> {
        let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
            .map_err(|_| AnalysisError::Config("CARGO_MANIFEST_DIR is not set".into()))?;
        let config_path = format!("{}/../config/model.yaml", manifest_dir);
        let config_str = std::fs::read_to_string(config_path)?;
        let config: ModelConfig = serde_yaml::from_str(&config_str)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        let [width, height] = self.image.size;
        if width == 0 || height == 0 {
            return Err(AnalysisError::Config(format!(
                "image size must be non-zero, got {width}x{height}"
            )));
        }
        if self.image.channels != 1 {
            return Err(AnalysisError::Config(format!(
                "pipeline is single-channel, got {} channels",
                self.image.channels
            )));
        }
        if self.normalization.std <= 0.0 {
            return Err(AnalysisError::Config(format!(
                "normalization std must be positive, got {}",
                self.normalization.std
            )));
        }
        Ok(())
    }
}
