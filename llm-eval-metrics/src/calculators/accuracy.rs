use llm_eval_core::{PairScorer, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    #[default]
    ExactMatch,
    CaseInsensitive,
}

#[derive(Debug, Clone, Default)]
pub struct AccuracyCalculator {
    pub mode: ComparisonMode,
}

impl AccuracyCalculator {
    pub fn new(mode: ComparisonMode) -> Self {
        Self { mode }
    }

    pub fn is_match(&self, predicted: &str, reference: &str) -> bool {
        match self.mode {
            ComparisonMode::ExactMatch => predicted.trim() == reference.trim(),
            ComparisonMode::CaseInsensitive => {
                predicted.trim().to_lowercase() == reference.trim().to_lowercase()
            }
        }
    }
}

impl PairScorer for AccuracyCalculator {
    fn score(&self, hypothesis: &str, reference: &str) -> Result<f64> {
        Ok(if self.is_match(hypothesis, reference) { 1.0 } else { 0.0 })
    }
}
