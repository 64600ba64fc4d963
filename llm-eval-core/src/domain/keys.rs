//! Well-known names shared between metrics and the orchestration layer.

/// Keys of the score map returned by `Metric::evaluate`.
pub struct MetricKeys;

impl MetricKeys {
    pub const ROUGE_1: &'static str = "rouge-1";
    pub const ROUGE_L: &'static str = "rouge-l";
    pub const BLEU_1: &'static str = "bleu-1";
    pub const BLEU_4: &'static str = "bleu-4";
    pub const ACCURACY: &'static str = "accuracy";
}

/// Names under which metrics are registered.
pub struct MetricNames;

impl MetricNames {
    pub const TEXT_GEN: &'static str = "text-gen-metric";
    pub const SEQ_CLS: &'static str = "seq-cls-metric";
}
