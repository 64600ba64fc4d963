use approx::assert_relative_eq;
use llm_eval_core::{Metric, MetricBatch, MetricError, MetricKeys};
use llm_eval_metrics::{SmoothingMethod, TextGenerationConfig, TextGenerationMetric};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn metric_with(preds: &[&str], tgts: &[&str]) -> TextGenerationMetric {
    let mut metric = TextGenerationMetric::new();
    metric
        .add(&MetricBatch::new(preds.iter().copied(), tgts.iter().copied()), None)
        .unwrap();
    metric
}

fn assert_all_scores(metric: &TextGenerationMetric, expected: f64) {
    let scores = metric.evaluate().unwrap();
    for key in [
        MetricKeys::ROUGE_1,
        MetricKeys::ROUGE_L,
        MetricKeys::BLEU_1,
        MetricKeys::BLEU_4,
    ] {
        let value = scores.get(key).unwrap();
        assert_relative_eq!(value, expected, epsilon = 1e-12);
    }
}

// ===== Scenarios =====

#[test]
fn test_identical_latin_pair_scores_one() {
    let metric = metric_with(&["the cat sat"], &["the cat sat"]);
    assert_all_scores(&metric, 1.0);
}

#[test]
fn test_identical_cjk_pair_scores_one() {
    let metric = metric_with(&["你好世界"], &["你好世界"]);

    assert_eq!(metric.preds(), &["你 好 世 界".to_string()]);
    assert_eq!(metric.tgts(), &["你 好 世 界".to_string()]);
    assert_all_scores(&metric, 1.0);
}

#[test]
fn test_mixed_script_pair_scores_one() {
    let metric = metric_with(&["我爱Rust编程"], &["我爱 Rust编程"]);

    assert_eq!(metric.preds()[0], "我 爱 Rust 编 程");
    assert_eq!(metric.preds(), metric.tgts());
    assert_all_scores(&metric, 1.0);
}

#[test]
fn test_disjoint_pairs_score_zero() {
    let metric = metric_with(&["apple banana", "red blue"], &["car truck", "green yellow"]);
    assert_all_scores(&metric, 0.0);
}

#[test]
fn test_scores_are_means_over_pairs() {
    let metric = metric_with(&["the cat sat", "apple banana"], &["the cat sat", "car truck"]);
    assert_all_scores(&metric, 0.5);
}

#[test]
fn test_pairing_is_positional() {
    let metric = metric_with(&["a b", "c d"], &["c d", "a b"]);
    assert_all_scores(&metric, 0.0);
}

#[test]
fn test_evaluate_returns_exactly_four_keys() {
    let metric = metric_with(&["the cat sat"], &["the cat"]);

    let scores = metric.evaluate().unwrap();
    let keys: Vec<&str> = scores.keys().collect();
    assert_eq!(keys, vec!["bleu-1", "bleu-4", "rouge-1", "rouge-l"]);
}

#[test]
fn test_scores_stay_in_unit_range() {
    let metric = metric_with(
        &["the cat sat on a mat", "天气很好", "a b c"],
        &["the cat sat on the mat", "今天天气很好", "c b a d"],
    );

    let scores = metric.evaluate().unwrap();
    for (_, value) in scores.iter() {
        assert!((0.0..=1.0).contains(&value), "score out of range: {value}");
    }
}

// ===== Accumulation =====

#[test]
fn test_add_grows_both_sequences_by_batch_size() {
    let mut metric = TextGenerationMetric::new();

    metric
        .add(&MetricBatch::new(["a", "b", "c"], ["x", "y", "z"]), None)
        .unwrap();
    assert_eq!(metric.len(), 3);
    assert_eq!(metric.preds().len(), metric.tgts().len());

    metric.add(&MetricBatch::new(["d", "e"], ["u", "v"]), None).unwrap();
    assert_eq!(metric.len(), 5);
    assert_eq!(metric.tgts().len(), 5);
    assert_eq!(metric.preds()[3], "d");
    assert_eq!(metric.tgts()[4], "v");
}

#[test]
fn test_add_normalizes_whitespace() {
    let metric = metric_with(&["  the   cat \n sat "], &["the cat sat"]);
    assert_eq!(metric.preds()[0], "the cat sat");
}

#[test]
fn test_empty_batch_is_accepted() {
    let mut metric = TextGenerationMetric::new();
    metric.add(&MetricBatch::default(), None).unwrap();
    assert!(metric.is_empty());
}

#[rstest]
#[case(&["a", "b"], &["a"])]
#[case(&[], &["a"])]
#[case(&["a"], &[])]
fn test_mismatched_batch_is_rejected(#[case] preds: &[&str], #[case] tgts: &[&str]) {
    let mut metric = metric_with(&["kept"], &["kept"]);

    let result = metric.add(&MetricBatch::new(preds.iter().copied(), tgts.iter().copied()), None);

    assert_eq!(
        result,
        Err(MetricError::BatchLengthMismatch {
            preds: preds.len(),
            tgts: tgts.len(),
        })
    );
    // Nothing from the rejected batch was appended
    assert_eq!(metric.len(), 1);
    assert_eq!(metric.tgts().len(), 1);
}

#[test]
fn test_raw_inputs_are_ignored() {
    let batch = MetricBatch::new(["the cat sat"], ["the cat"]);

    let mut with_inputs = TextGenerationMetric::new();
    with_inputs
        .add(&batch, Some(&json!({"src_txt": ["ignored"]})))
        .unwrap();
    let mut without_inputs = TextGenerationMetric::new();
    without_inputs.add(&batch, None).unwrap();

    assert_eq!(with_inputs.evaluate().unwrap(), without_inputs.evaluate().unwrap());
}

// ===== Evaluation =====

#[test]
fn test_evaluate_empty_accumulator_is_error() {
    let metric = TextGenerationMetric::new();
    assert_eq!(metric.evaluate(), Err(MetricError::EmptyAccumulator));
}

#[test]
fn test_evaluate_is_idempotent() {
    let metric = metric_with(
        &["the cat sat on a mat", "你好"],
        &["the cat sat on the mat", "你们好"],
    );

    let first = metric.evaluate().unwrap();
    let second = metric.evaluate().unwrap();
    assert_eq!(first, second);
    assert_eq!(metric.len(), 2);
}

#[test]
fn test_evaluate_reflects_later_adds() {
    let mut metric = metric_with(&["the cat sat"], &["the cat sat"]);
    let before = metric.evaluate().unwrap();

    metric
        .add(&MetricBatch::new(["apple banana"], ["car truck"]), None)
        .unwrap();
    let after = metric.evaluate().unwrap();

    assert_eq!(before.get(MetricKeys::ROUGE_1), Some(1.0));
    assert_eq!(after.get(MetricKeys::ROUGE_1), Some(0.5));
}

#[test]
fn test_empty_prediction_propagates_scorer_error() {
    let metric = metric_with(&["   "], &["the cat sat"]);
    assert_eq!(metric.evaluate(), Err(MetricError::EmptyHypothesis));
}

#[test]
fn test_empty_target_propagates_scorer_error() {
    let metric = metric_with(&["the cat sat"], &[""]);
    assert_eq!(metric.evaluate(), Err(MetricError::EmptyReference));
}

// ===== Configuration =====

#[test]
fn test_case_sensitive_by_default() {
    let metric = metric_with(&["The Cat Sat"], &["the cat sat"]);

    let scores = metric.evaluate().unwrap();
    assert_eq!(scores.get(MetricKeys::ROUGE_1), Some(0.0));
}

#[test]
fn test_lowercase_config() {
    let mut metric = TextGenerationMetric::with_config(TextGenerationConfig {
        lowercase: true,
        ..Default::default()
    });
    metric
        .add(&MetricBatch::new(["The Cat Sat"], ["the cat sat"]), None)
        .unwrap();

    assert_eq!(metric.preds()[0], "the cat sat");
    assert_all_scores(&metric, 1.0);
}

#[test]
fn test_smoothing_config_reaches_bleu() {
    let config = TextGenerationConfig {
        bleu_smoothing: SmoothingMethod::Add1,
        ..Default::default()
    };

    let mut smoothed = TextGenerationMetric::with_config(config);
    smoothed.add(&MetricBatch::new(["a b c d"], ["a c b d"]), None).unwrap();
    let plain = metric_with(&["a b c d"], &["a c b d"]);

    let smoothed_bleu4 = smoothed.evaluate().unwrap().get(MetricKeys::BLEU_4).unwrap();
    let plain_bleu4 = plain.evaluate().unwrap().get(MetricKeys::BLEU_4).unwrap();
    assert_eq!(plain_bleu4, 0.0);
    assert!(smoothed_bleu4 > 0.0);
    assert_eq!(smoothed.config().bleu_smoothing, SmoothingMethod::Add1);
}

#[rstest]
#[case(true, 1.0)]
#[case(false, 2.0 / 3.0)]
fn test_rouge_exclusive_config_on_repeated_characters(
    #[case] rouge_exclusive: bool,
    #[case] expected: f64,
) {
    let mut metric = TextGenerationMetric::with_config(TextGenerationConfig {
        rouge_exclusive,
        ..Default::default()
    });
    metric.add(&MetricBatch::new(["好好好人"], ["好人"]), None).unwrap();

    assert_eq!(metric.preds()[0], "好 好 好 人");
    let scores = metric.evaluate().unwrap();
    assert_relative_eq!(scores.get(MetricKeys::ROUGE_1).unwrap(), expected, epsilon = 1e-12);
    assert_relative_eq!(scores.get(MetricKeys::ROUGE_L).unwrap(), expected, epsilon = 1e-12);
}

// ===== Merge / per-pair detail =====

#[test]
fn test_merge_concatenates_in_order() {
    let mut first = metric_with(&["the cat sat"], &["the cat sat"]);
    let second = metric_with(&["apple banana"], &["car truck"]);

    first.merge(second);

    assert_eq!(first.len(), 2);
    assert_eq!(first.preds(), &["the cat sat".to_string(), "apple banana".to_string()]);
    assert_eq!(first.tgts(), &["the cat sat".to_string(), "car truck".to_string()]);

    let combined = metric_with(&["the cat sat", "apple banana"], &["the cat sat", "car truck"]);
    assert_eq!(first.evaluate().unwrap(), combined.evaluate().unwrap());
}

#[test]
fn test_pair_scores_follow_accumulation_order() {
    let metric = metric_with(&["the cat sat", "apple banana"], &["the cat sat", "car truck"]);

    let pairs = metric.pair_scores().unwrap();
    assert_eq!(pairs.len(), 2);
    assert_relative_eq!(pairs[0].rouge_1, 1.0);
    assert_relative_eq!(pairs[0].bleu_4, 1.0);
    assert_eq!(pairs[1].rouge_l, 0.0);
    assert_eq!(pairs[1].bleu_1, 0.0);
}

#[test]
fn test_summary_per_metric() {
    let metric = metric_with(&["the cat sat", "apple banana"], &["the cat sat", "car truck"]);

    let summary = metric.summary().unwrap();
    assert_eq!(summary.len(), 4);

    let rouge_1 = summary[MetricKeys::ROUGE_1];
    assert_eq!(rouge_1.count, 2);
    assert_relative_eq!(rouge_1.mean, 0.5);
    assert_relative_eq!(rouge_1.median, 0.5);
    assert_relative_eq!(rouge_1.std_dev, 0.5);
    assert_relative_eq!(rouge_1.min, 0.0);
    assert_relative_eq!(rouge_1.max, 1.0);
}

#[test]
fn test_summary_of_empty_accumulator_is_error() {
    let metric = TextGenerationMetric::default();
    assert_eq!(metric.summary(), Err(MetricError::EmptyAccumulator));
}

#[test]
fn test_usable_as_trait_object() {
    let mut metric: Box<dyn Metric> = Box::new(TextGenerationMetric::new());
    metric
        .add(&MetricBatch::new(["你好世界"], ["你好世界"]), None)
        .unwrap();

    assert_eq!(metric.len(), 1);
    assert_eq!(metric.evaluate().unwrap().get(MetricKeys::BLEU_4), Some(1.0));
}
