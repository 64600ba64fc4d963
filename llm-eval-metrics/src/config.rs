use config::{Config as ConfigLoader, Environment, File};
use llm_eval_core::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::calculators::{ComparisonMode, SmoothingMethod};

/// Settings handed to every metric built through the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub text_generation: TextGenerationConfig,
    pub classification: ClassificationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextGenerationConfig {
    /// Lowercase predictions and targets after CJK normalization.
    pub lowercase: bool,
    pub bleu_smoothing: SmoothingMethod,
    /// Score ROUGE over distinct n-grams rather than clipped occurrences.
    pub rouge_exclusive: bool,
}

impl Default for TextGenerationConfig {
    fn default() -> Self {
        Self {
            lowercase: false,
            bleu_smoothing: SmoothingMethod::None,
            rouge_exclusive: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub comparison_mode: ComparisonMode,
}

impl MetricsConfig {
    /// Layer `config/metrics.{toml,json,yaml}` (optional) under `LLM_EVAL__*` environment variables.
    pub fn load() -> Result<Self> {
        let config = ConfigLoader::builder()
            .add_source(File::with_name("config/metrics").required(false))
            .add_source(
                Environment::with_prefix("LLM_EVAL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Read a single configuration file; its format follows the extension.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
