use llm_eval_core::{MetricError, PairScorer, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMethod {
    #[default]
    None,
    Add1,
    Add01,
}

impl SmoothingMethod {
    fn apply(self, clipped: usize, total: usize) -> f64 {
        let (clipped, total) = (clipped as f64, total as f64);
        match self {
            SmoothingMethod::None => clipped / total,
            SmoothingMethod::Add1 => (clipped + 1.0) / (total + 1.0),
            SmoothingMethod::Add01 => (clipped + 0.1) / (total + 0.1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BleuScore {
    pub score: f64,
    /// Modified precision per n-gram order, 0.0 where the hypothesis has no n-grams of that order.
    pub precisions: Vec<f64>,
    pub brevity_penalty: f64,
}

#[derive(Debug, Clone)]
pub struct BleuCalculator {
    /// Weight of each n-gram order, index 0 being unigrams.
    pub weights: Vec<f64>,
    pub smoothing: SmoothingMethod,
}

impl BleuCalculator {
    /// Uniform weights over orders 1..=max_n.
    pub fn new(max_n: usize) -> Self {
        let weight = if max_n == 0 { 0.0 } else { 1.0 / max_n as f64 };
        Self::with_weights(vec![weight; max_n])
    }

    pub fn with_weights(weights: Vec<f64>) -> Self {
        Self {
            weights,
            smoothing: SmoothingMethod::None,
        }
    }

    /// All mass on unigrams.
    pub fn bleu_1() -> Self {
        Self::with_weights(vec![1.0, 0.0, 0.0, 0.0])
    }

    pub fn bleu_4() -> Self {
        Self::new(4)
    }

    pub fn with_smoothing(mut self, smoothing: SmoothingMethod) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn max_n(&self) -> usize {
        self.weights.len()
    }

    fn validate_weights(&self) -> Result<()> {
        if self.weights.is_empty() {
            return Err(MetricError::InvalidWeights("at least one n-gram order is required".to_string()));
        }
        if self.weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(MetricError::InvalidWeights(format!(
                "weights must be finite and non-negative: {:?}",
                self.weights
            )));
        }
        if self.weights.iter().sum::<f64>() <= 0.0 {
            return Err(MetricError::InvalidWeights("weights sum to zero".to_string()));
        }
        Ok(())
    }

    /// Count n-grams
    fn count_ngrams<'t, 'a>(tokens: &'t [&'a str], n: usize) -> HashMap<&'t [&'a str], usize> {
        let mut counts = HashMap::new();
        for window in tokens.windows(n) {
            *counts.entry(window).or_insert(0) += 1;
        }
        counts
    }

    /// Clipped n-gram matches and total hypothesis n-grams for order `n`
    fn modified_precision(hypothesis: &[&str], reference: &[&str], n: usize) -> (usize, usize) {
        let hyp_counts = Self::count_ngrams(hypothesis, n);
        let ref_counts = Self::count_ngrams(reference, n);

        let mut clipped_count = 0;
        let mut total_count = 0;

        for (ngram, hyp_count) in hyp_counts.iter() {
            let ref_count = ref_counts.get(ngram).copied().unwrap_or(0);
            clipped_count += (*hyp_count).min(ref_count);
            total_count += hyp_count;
        }

        (clipped_count, total_count)
    }

    /// Calculate brevity penalty
    fn brevity_penalty(hypothesis_len: usize, reference_len: usize) -> f64 {
        if hypothesis_len > reference_len {
            1.0
        } else if hypothesis_len == 0 {
            0.0
        } else {
            (1.0 - reference_len as f64 / hypothesis_len as f64).exp()
        }
    }

    /// Sentence-level BLEU of pre-tokenized `hypothesis` against a single `reference`.
    ///
    /// Orders the hypothesis is too short to contain are left out of the
    /// geometric mean and the remaining weights renormalized. Without
    /// smoothing, any counted order with no match yields 0.0.
    pub fn calculate(&self, hypothesis: &[&str], reference: &[&str]) -> Result<BleuScore> {
        self.validate_weights()?;

        if hypothesis.is_empty() {
            return Ok(BleuScore {
                score: 0.0,
                precisions: vec![0.0; self.max_n()],
                brevity_penalty: 0.0,
            });
        }

        let brevity_penalty = Self::brevity_penalty(hypothesis.len(), reference.len());
        let mut precisions = Vec::with_capacity(self.max_n());
        let mut log_precision_sum = 0.0;
        let mut weight_sum = 0.0;
        let mut zero_match = false;

        for (i, &weight) in self.weights.iter().enumerate() {
            let (clipped, total) = Self::modified_precision(hypothesis, reference, i + 1);
            let precision = if total == 0 {
                0.0
            } else {
                self.smoothing.apply(clipped, total)
            };
            precisions.push(precision);

            if weight == 0.0 || total == 0 {
                continue;
            }
            if precision == 0.0 {
                zero_match = true;
                continue;
            }
            log_precision_sum += weight * precision.ln();
            weight_sum += weight;
        }

        let score = if zero_match || weight_sum == 0.0 {
            0.0
        } else {
            brevity_penalty * (log_precision_sum / weight_sum).exp()
        };

        Ok(BleuScore {
            score,
            precisions,
            brevity_penalty,
        })
    }

    /// Tokenize both texts on single spaces and score them.
    pub fn calculate_str(&self, hypothesis: &str, reference: &str) -> Result<BleuScore> {
        let hyp_tokens: Vec<&str> = hypothesis.split(' ').collect();
        let ref_tokens: Vec<&str> = reference.split(' ').collect();
        self.calculate(&hyp_tokens, &ref_tokens)
    }
}

impl Default for BleuCalculator {
    fn default() -> Self {
        Self::bleu_4()
    }
}

impl PairScorer for BleuCalculator {
    fn score(&self, hypothesis: &str, reference: &str) -> Result<f64> {
        Ok(self.calculate_str(hypothesis, reference)?.score)
    }
}
