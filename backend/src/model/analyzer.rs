use std::collections::BTreeMap;
use std::path::Path;

use ndarray::{arr1, Array1, Array2, Array4};
use rand_distr::{Dirichlet, Distribution};
use shared::{AnalysisResponse, DiseaseClass};

use super::config::ModelConfig;
use super::preprocess::Preprocessor;
use super::AnalysisError;

const CLASS_COUNT: usize = 3;

/// Stand-in for the classifier this demo ships without. The forward pass
/// pools the input tensor into a handful of features and pushes them through
/// a fixed linear layer; its output is never surfaced.
struct DummyMedicalNet {
    fc: Array2<f32>,
}

impl DummyMedicalNet {
    fn new() -> Self {
        // Fixed pseudo-weights, 3 pooled features into 3 logits.
        let fc = Array2::from_shape_fn((CLASS_COUNT, 3), |(i, j)| ((i * 3 + j) as f32 * 0.37).sin());
        Self { fc }
    }

    fn forward(&self, input: &Array4<f32>) -> Array1<f32> {
        let mean = input.mean().unwrap_or(0.0);
        let max = input.fold(f32::MIN, |acc, &v| acc.max(v));
        let min = input.fold(f32::MAX, |acc, &v| acc.min(v));
        let features = arr1(&[mean, max, min]);
        softmax(self.fc.dot(&features))
    }
}

fn softmax(logits: Array1<f32>) -> Array1<f32> {
    let max = logits.fold(f32::MIN, |acc, &v| acc.max(v));
    let exp = logits.mapv(|v| (v - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Runs the preprocessing pipeline and the placeholder network over one
/// uploaded image and produces a confidence distribution over the three
/// disease classes.
pub struct MedicalImageAnalyzer {
    net: DummyMedicalNet,
    preprocessor: Preprocessor,
    prior: Dirichlet<f32, CLASS_COUNT>,
}

impl MedicalImageAnalyzer {
    pub fn new(config: ModelConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let prior = Dirichlet::new([1.0; CLASS_COUNT])
            .map_err(|e| AnalysisError::Config(format!("dirichlet prior: {e}")))?;
        Ok(Self {
            net: DummyMedicalNet::new(),
            preprocessor: Preprocessor::new(&config),
            prior,
        })
    }

    pub fn predict(&self, path: &Path) -> Result<AnalysisResponse, AnalysisError> {
        let tensor = self.preprocessor.run(path)?;
        // The network output is decorative: confidence scores are sampled
        // fresh per call until real inference lands here.
        let _probabilities = self.net.forward(&tensor);
        Ok(self.score())
    }

    fn score(&self) -> AnalysisResponse {
        let sample: [f32; CLASS_COUNT] = self.prior.sample(&mut rand::rng());

        let mut all_scores = BTreeMap::new();
        let mut prediction = DiseaseClass::Normal;
        let mut confidence = f32::MIN;
        for (class, &score) in DiseaseClass::all().zip(sample.iter()) {
            if score > confidence {
                confidence = score;
                prediction = class;
            }
            all_scores.insert(class, score);
        }

        AnalysisResponse {
            prediction,
            confidence,
            all_scores,
        }
    }
}
