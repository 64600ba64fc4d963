use llm_eval_core::{Metric, MetricBatch, MetricKeys, MetricScores, PairScorer, Result};

use crate::aggregators::ScoreAggregator;
use crate::calculators::{AccuracyCalculator, ComparisonMode};

/// Accuracy over accumulated predicted and gold labels.
#[derive(Debug, Clone, Default)]
pub struct AccuracyMetric {
    preds: Vec<String>,
    labels: Vec<String>,
    calculator: AccuracyCalculator,
}

impl AccuracyMetric {
    pub fn new(mode: ComparisonMode) -> Self {
        Self {
            preds: Vec::new(),
            labels: Vec::new(),
            calculator: AccuracyCalculator::new(mode),
        }
    }

    pub fn mode(&self) -> ComparisonMode {
        self.calculator.mode
    }
}

impl Metric for AccuracyMetric {
    fn add(&mut self, outputs: &MetricBatch, _inputs: Option<&serde_json::Value>) -> Result<()> {
        if let Err(err) = outputs.validate() {
            tracing::warn!(error = %err, "Rejecting classification batch");
            return Err(err);
        }

        self.preds.extend(outputs.preds.iter().cloned());
        self.labels.extend(outputs.tgts.iter().cloned());

        tracing::debug!(
            batch_size = outputs.len(),
            total = self.preds.len(),
            "Accumulated classification batch"
        );
        Ok(())
    }

    fn evaluate(&self) -> Result<MetricScores> {
        let matches = self
            .preds
            .iter()
            .zip(self.labels.iter())
            .map(|(pred, label)| self.calculator.score(pred, label))
            .collect::<Result<Vec<f64>>>()?;

        let accuracy = ScoreAggregator::mean(&matches)?;
        tracing::info!(samples = matches.len(), accuracy, "Evaluated classification metric");

        let mut scores = MetricScores::new();
        scores.insert(MetricKeys::ACCURACY, accuracy);
        Ok(scores)
    }

    fn len(&self) -> usize {
        self.preds.len()
    }
}
