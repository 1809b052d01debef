use std::{collections::BTreeMap, path::Path};

use chrono::{DateTime, Utc};
use evotris_evaluator::{
    board_feature::{BoardFeature, FEATURE_COUNT},
    linear_evaluator::LinearEvaluator,
};
use serde::{Deserialize, Serialize};

use crate::output;

/// Trained weights together with how they were produced.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrainedModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub seed: u64,
    pub generations: usize,
    pub final_fitness: f32,
    /// Weights keyed by [`BoardFeature::id`].
    pub weights: BTreeMap<String, f32>,
}

impl TrainedModel {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        output::read_json_file("model", path)
    }

    pub fn weights_by_feature(weights: &[f32; FEATURE_COUNT]) -> BTreeMap<String, f32> {
        BoardFeature::ALL
            .iter()
            .zip(weights)
            .map(|(feature, weight)| (feature.id().to_owned(), *weight))
            .collect()
    }

    pub fn to_evaluator(&self) -> anyhow::Result<LinearEvaluator> {
        if let Some(unknown) = self
            .weights
            .keys()
            .find(|id| BoardFeature::ALL.iter().all(|f| f.id() != id.as_str()))
        {
            anyhow::bail!("Feature ID {unknown} in model not found");
        }

        let mut weights = [0.0; FEATURE_COUNT];
        for (weight, feature) in weights.iter_mut().zip(BoardFeature::ALL) {
            *weight = *self
                .weights
                .get(feature.id())
                .ok_or_else(|| anyhow::anyhow!("Model has no weight for feature {}", feature.id()))?;
        }
        Ok(LinearEvaluator::from_weights(weights))
    }
}
