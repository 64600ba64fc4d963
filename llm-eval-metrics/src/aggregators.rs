use llm_eval_core::{MetricError, Result};
use serde::{Deserialize, Serialize};

/// Distribution of per-sample scores for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

pub struct ScoreAggregator;

impl ScoreAggregator {
    /// Arithmetic mean. There is no meaningful score for zero samples.
    pub fn mean(values: &[f64]) -> Result<f64> {
        if values.is_empty() {
            return Err(MetricError::EmptyAccumulator);
        }
        Ok(values.iter().sum::<f64>() / values.len() as f64)
    }

    pub fn summarize(values: &[f64]) -> Result<ScoreSummary> {
        let mean = Self::mean(values)?;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64;

        Ok(ScoreSummary {
            mean,
            median: Self::median(&sorted),
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            count: values.len(),
        })
    }

    fn median(sorted: &[f64]) -> f64 {
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }
}
