use crate::domain::{MetricBatch, MetricScores};
use crate::error::Result;

/// Stateful accumulate-then-reduce metric.
///
/// An evaluation loop calls [`Metric::add`] once per batch and
/// [`Metric::evaluate`] when the pass is over. `evaluate` never clears the
/// accumulated state, so calling it again without an intervening `add`
/// yields the same scores.
pub trait Metric: Send {
    /// Append one batch. `inputs` carries the raw model inputs and may be ignored.
    fn add(&mut self, outputs: &MetricBatch, inputs: Option<&serde_json::Value>) -> Result<()>;

    /// Reduce everything accumulated so far into named scores.
    fn evaluate(&self) -> Result<MetricScores>;

    /// Number of accumulated samples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scores a single hypothesis against a single reference.
pub trait PairScorer {
    fn score(&self, hypothesis: &str, reference: &str) -> Result<f64>;
}
