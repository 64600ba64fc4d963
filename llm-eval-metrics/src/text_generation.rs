//! ROUGE/BLEU metric for text-generation tasks.

use llm_eval_core::{Metric, MetricBatch, MetricKeys, MetricScores, PairScorer, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregators::{ScoreAggregator, ScoreSummary};
use crate::calculators::{BleuCalculator, RougeCalculator};
use crate::config::TextGenerationConfig;
use crate::normalize::rebuild_str;

/// Scores of a single prediction/target pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairScores {
    pub rouge_1: f64,
    pub rouge_l: f64,
    pub bleu_1: f64,
    pub bleu_4: f64,
}

/// Accumulates normalized predictions and targets over an evaluation pass and
/// reports mean ROUGE-1 F1, ROUGE-L F1, BLEU-1 and BLEU-4.
///
/// Predictions and targets are paired by position: the i-th prediction added
/// is scored against the i-th target added.
#[derive(Debug, Clone)]
pub struct TextGenerationMetric {
    preds: Vec<String>,
    tgts: Vec<String>,
    config: TextGenerationConfig,
    rouge_1: RougeCalculator,
    rouge_l: RougeCalculator,
    bleu_1: BleuCalculator,
    bleu_4: BleuCalculator,
}

impl TextGenerationMetric {
    pub fn new() -> Self {
        Self::with_config(TextGenerationConfig::default())
    }

    pub fn with_config(config: TextGenerationConfig) -> Self {
        Self {
            preds: Vec::new(),
            tgts: Vec::new(),
            rouge_1: RougeCalculator::rouge_1().with_exclusive(config.rouge_exclusive),
            rouge_l: RougeCalculator::rouge_l().with_exclusive(config.rouge_exclusive),
            bleu_1: BleuCalculator::bleu_1().with_smoothing(config.bleu_smoothing),
            bleu_4: BleuCalculator::bleu_4().with_smoothing(config.bleu_smoothing),
            config,
        }
    }

    pub fn config(&self) -> &TextGenerationConfig {
        &self.config
    }

    /// Normalized predictions in insertion order.
    pub fn preds(&self) -> &[String] {
        &self.preds
    }

    /// Normalized targets in insertion order.
    pub fn tgts(&self) -> &[String] {
        &self.tgts
    }

    fn rebuild(&self, text: &str) -> String {
        let rebuilt = rebuild_str(text);
        if self.config.lowercase {
            rebuilt.to_lowercase()
        } else {
            rebuilt
        }
    }

    /// Append another accumulator's pairs after this one's.
    ///
    /// The other side's strings were normalized with its own configuration and
    /// are taken as they are.
    pub fn merge(&mut self, other: TextGenerationMetric) {
        tracing::debug!(
            merged = other.preds.len(),
            total = self.preds.len() + other.preds.len(),
            "Merging text generation accumulators"
        );
        self.preds.extend(other.preds);
        self.tgts.extend(other.tgts);
    }

    /// Score every accumulated pair. Scorer failures abort the whole pass.
    pub fn pair_scores(&self) -> Result<Vec<PairScores>> {
        self.preds
            .iter()
            .zip(self.tgts.iter())
            .map(|(pred, tgt)| {
                Ok(PairScores {
                    rouge_1: self.rouge_1.score(pred, tgt)?,
                    rouge_l: self.rouge_l.score(pred, tgt)?,
                    bleu_1: self.bleu_1.score(pred, tgt)?,
                    bleu_4: self.bleu_4.score(pred, tgt)?,
                })
            })
            .collect()
    }

    /// Per-metric distribution of the pair scores.
    pub fn summary(&self) -> Result<BTreeMap<String, ScoreSummary>> {
        let columns = Self::columns(&self.pair_scores()?);
        columns
            .into_iter()
            .map(|(key, values)| Ok((key.to_string(), ScoreAggregator::summarize(&values)?)))
            .collect()
    }

    fn columns(scores: &[PairScores]) -> [(&'static str, Vec<f64>); 4] {
        [
            (MetricKeys::ROUGE_1, scores.iter().map(|s| s.rouge_1).collect()),
            (MetricKeys::ROUGE_L, scores.iter().map(|s| s.rouge_l).collect()),
            (MetricKeys::BLEU_1, scores.iter().map(|s| s.bleu_1).collect()),
            (MetricKeys::BLEU_4, scores.iter().map(|s| s.bleu_4).collect()),
        ]
    }
}

impl Default for TextGenerationMetric {
    fn default() -> Self {
        Self::new()
    }
}

impl Metric for TextGenerationMetric {
    fn add(&mut self, outputs: &MetricBatch, _inputs: Option<&serde_json::Value>) -> Result<()> {
        if let Err(err) = outputs.validate() {
            tracing::warn!(error = %err, "Rejecting text generation batch");
            return Err(err);
        }

        let tgts: Vec<String> = outputs.tgts.iter().map(|t| self.rebuild(t)).collect();
        let preds: Vec<String> = outputs.preds.iter().map(|p| self.rebuild(p)).collect();
        self.tgts.extend(tgts);
        self.preds.extend(preds);

        tracing::debug!(
            batch_size = outputs.len(),
            total = self.preds.len(),
            "Accumulated text generation batch"
        );
        Ok(())
    }

    fn evaluate(&self) -> Result<MetricScores> {
        let pair_scores = self.pair_scores()?;

        let mut scores = MetricScores::new();
        for (key, values) in Self::columns(&pair_scores) {
            scores.insert(key, ScoreAggregator::mean(&values)?);
        }

        tracing::info!(
            pairs = pair_scores.len(),
            rouge_1 = scores.get(MetricKeys::ROUGE_1),
            rouge_l = scores.get(MetricKeys::ROUGE_L),
            bleu_1 = scores.get(MetricKeys::BLEU_1),
            bleu_4 = scores.get(MetricKeys::BLEU_4),
            "Evaluated text generation metric"
        );
        Ok(scores)
    }

    fn len(&self) -> usize {
        self.preds.len()
    }
}
