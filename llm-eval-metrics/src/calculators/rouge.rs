use llm_eval_core::{MetricError, PairScorer, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RougeVariant {
    RougeN { n: usize },
    RougeL,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RougeScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl RougeScore {
    fn from_counts(hits: usize, hypothesis_total: usize, reference_total: usize) -> Self {
        let precision = if hypothesis_total == 0 {
            0.0
        } else {
            hits as f64 / hypothesis_total as f64
        };

        let recall = if reference_total == 0 {
            0.0
        } else {
            hits as f64 / reference_total as f64
        };

        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            precision,
            recall,
            f1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RougeCalculator {
    pub variant: RougeVariant,
    /// Count each distinct n-gram (or LCS word) once. When off, repeated
    /// n-grams are clipped against the other side's occurrences instead.
    pub exclusive: bool,
}

impl RougeCalculator {
    pub fn new(variant: RougeVariant) -> Self {
        Self {
            variant,
            exclusive: true,
        }
    }

    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn rouge_1() -> Self {
        Self::new(RougeVariant::RougeN { n: 1 })
    }

    pub fn rouge_2() -> Self {
        Self::new(RougeVariant::RougeN { n: 2 })
    }

    pub fn rouge_l() -> Self {
        Self::new(RougeVariant::RougeL)
    }

    /// Score `hypothesis` against `reference`.
    ///
    /// Both texts are split into sentences on `.` and each sentence into
    /// whitespace-separated tokens. Text without any token is rejected.
    pub fn calculate(&self, hypothesis: &str, reference: &str) -> Result<RougeScore> {
        let hyp_sentences = split_sentences(hypothesis);
        if hyp_sentences.is_empty() {
            return Err(MetricError::EmptyHypothesis);
        }
        let ref_sentences = split_sentences(reference);
        if ref_sentences.is_empty() {
            return Err(MetricError::EmptyReference);
        }

        match self.variant {
            RougeVariant::RougeN { n } => self.rouge_n(&hyp_sentences, &ref_sentences, n),
            RougeVariant::RougeL if self.exclusive => {
                Ok(Self::rouge_l_distinct(&hyp_sentences, &ref_sentences))
            }
            RougeVariant::RougeL => Ok(Self::rouge_l_clipped(&hyp_sentences, &ref_sentences)),
        }
    }

    /// Count n-grams over the concatenation of all sentences, capping each at 1 when exclusive
    fn count_ngrams<'a>(
        sentences: &[Vec<&'a str>],
        n: usize,
        exclusive: bool,
    ) -> (HashMap<Vec<&'a str>, usize>, usize) {
        let words: Vec<&str> = sentences.iter().flatten().copied().collect();
        let mut counts = HashMap::new();
        for window in words.windows(n) {
            let count = counts.entry(window.to_vec()).or_insert(0);
            *count = if exclusive { 1 } else { *count + 1 };
        }
        let total = counts.values().sum();
        (counts, total)
    }

    /// Calculate ROUGE-N score
    fn rouge_n(&self, hypothesis: &[Vec<&str>], reference: &[Vec<&str>], n: usize) -> Result<RougeScore> {
        if n == 0 {
            return Err(MetricError::Validation("ROUGE-N order must be at least 1".to_string()));
        }

        let (hyp_counts, hyp_total) = Self::count_ngrams(hypothesis, n, self.exclusive);
        let (ref_counts, ref_total) = Self::count_ngrams(reference, n, self.exclusive);

        let mut overlap = 0;
        for (ngram, ref_count) in ref_counts.iter() {
            if let Some(hyp_count) = hyp_counts.get(ngram) {
                overlap += (*hyp_count).min(*ref_count);
            }
        }

        Ok(RougeScore::from_counts(overlap, hyp_total, ref_total))
    }

    /// Summary-level ROUGE-L over distinct words.
    ///
    /// Hits are the distinct words found in any reference sentence's LCS
    /// union; precision and recall divide by the distinct words on each side.
    fn rouge_l_distinct(hypothesis: &[Vec<&str>], reference: &[Vec<&str>]) -> RougeScore {
        let hyp_words: HashSet<&str> = hypothesis.iter().flatten().copied().collect();
        let ref_words: HashSet<&str> = reference.iter().flatten().copied().collect();
        let hits: HashSet<&str> = reference
            .iter()
            .flat_map(|ref_sentence| union_lcs(ref_sentence, hypothesis))
            .collect();

        RougeScore::from_counts(hits.len(), hyp_words.len(), ref_words.len())
    }

    /// Summary-level ROUGE-L over token occurrences.
    ///
    /// For every reference sentence the LCS hits against each hypothesis
    /// sentence are unioned; a hit only counts while the token still has
    /// unconsumed occurrences on both sides.
    fn rouge_l_clipped(hypothesis: &[Vec<&str>], reference: &[Vec<&str>]) -> RougeScore {
        let mut hyp_counts = token_counts(hypothesis);
        let mut ref_counts = token_counts(reference);
        let hyp_total: usize = hypothesis.iter().map(Vec::len).sum();
        let ref_total: usize = reference.iter().map(Vec::len).sum();

        let mut hits = 0;
        for ref_sentence in reference {
            for token in union_lcs(ref_sentence, hypothesis) {
                let (Some(h), Some(r)) = (hyp_counts.get_mut(token), ref_counts.get_mut(token)) else {
                    continue;
                };
                if *h > 0 && *r > 0 {
                    hits += 1;
                    *h -= 1;
                    *r -= 1;
                }
            }
        }

        RougeScore::from_counts(hits, hyp_total, ref_total)
    }
}

impl Default for RougeCalculator {
    fn default() -> Self {
        Self::rouge_l()
    }
}

impl PairScorer for RougeCalculator {
    fn score(&self, hypothesis: &str, reference: &str) -> Result<f64> {
        Ok(self.calculate(hypothesis, reference)?.f1)
    }
}

fn split_sentences(text: &str) -> Vec<Vec<&str>> {
    text.split('.')
        .map(|sentence| sentence.split_whitespace().collect::<Vec<_>>())
        .filter(|tokens| !tokens.is_empty())
        .collect()
}

fn token_counts<'a>(sentences: &[Vec<&'a str>]) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for token in sentences.iter().flatten() {
        *counts.entry(*token).or_insert(0) += 1;
    }
    counts
}

/// Tokens of `reference` that take part in an LCS with at least one candidate, in order.
fn union_lcs<'a>(reference: &[&'a str], candidates: &[Vec<&str>]) -> Vec<&'a str> {
    let mut hit_indices = BTreeSet::new();
    for candidate in candidates {
        hit_indices.extend(lcs_indices(reference, candidate));
    }
    hit_indices.into_iter().map(|i| reference[i]).collect()
}

/// Indices into `a` of one longest common subsequence of `a` and `b`.
///
/// On ties the backtrack steps along `b` first.
fn lcs_indices(a: &[&str], b: &[&str]) -> Vec<usize> {
    let m = a.len();
    let n = b.len();

    if m == 0 || n == 0 {
        return vec![];
    }

    let mut dp = vec![vec![0usize; n + 1]; m + 1];

    for i in 1..=m {
        for j in 1..=n {
            if a[i - 1] == b[j - 1] {
                dp[i][j] = dp[i - 1][j - 1] + 1;
            } else {
                dp[i][j] = dp[i - 1][j].max(dp[i][j - 1]);
            }
        }
    }

    let mut indices = Vec::with_capacity(dp[m][n]);
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            indices.push(i - 1);
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] > dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    indices.reverse();
    indices
}
