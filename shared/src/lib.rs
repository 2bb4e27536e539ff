use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// The fixed label set of the demo classifier. Exactly these three classes,
/// in this order, serialized with the spellings clients render.
#[derive(
    Serialize, Deserialize, Display, EnumIter, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord,
)]
pub enum DiseaseClass {
    Normal,
    Pneumonia,
    #[serde(rename = "COVID-19")]
    #[strum(serialize = "COVID-19")]
    Covid19,
}

impl DiseaseClass {
    /// The labels in declaration order.
    pub fn all() -> impl Iterator<Item = DiseaseClass> {
        <DiseaseClass as strum::IntoEnumIterator>::iter()
    }
}

/// Result of one analyze call.
///
/// `all_scores` always carries all three labels with values in [0, 1] summing
/// to 1; `confidence` is the maximum score and `prediction` the label that
/// attains it.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AnalysisResponse {
    pub prediction: DiseaseClass,
    pub confidence: f32,
    pub all_scores: BTreeMap<DiseaseClass, f32>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".into(),
        }
    }
}
