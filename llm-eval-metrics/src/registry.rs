//! Name-addressable metric construction.
//!
//! Orchestration code owns one [`MetricRegistry`], fills it at startup and
//! builds a fresh accumulator per evaluation pass by name.

use llm_eval_core::{Metric, MetricError, MetricNames, Result};
use std::collections::BTreeMap;
use std::fmt;

use crate::classification::AccuracyMetric;
use crate::config::MetricsConfig;
use crate::text_generation::TextGenerationMetric;

pub type MetricFactory = Box<dyn Fn(&MetricsConfig) -> Box<dyn Metric> + Send + Sync>;

pub struct MetricRegistry {
    config: MetricsConfig,
    factories: BTreeMap<String, MetricFactory>,
}

impl MetricRegistry {
    /// An empty registry.
    pub fn new(config: MetricsConfig) -> Self {
        Self {
            config,
            factories: BTreeMap::new(),
        }
    }

    /// A registry holding the text-generation and classification metrics.
    pub fn with_builtins(config: MetricsConfig) -> Self {
        let mut registry = Self::new(config);
        registry.factories.insert(
            MetricNames::TEXT_GEN.to_string(),
            Box::new(|config: &MetricsConfig| {
                Box::new(TextGenerationMetric::with_config(config.text_generation.clone())) as Box<dyn Metric>
            }),
        );
        registry.factories.insert(
            MetricNames::SEQ_CLS.to_string(),
            Box::new(|config: &MetricsConfig| {
                Box::new(AccuracyMetric::new(config.classification.comparison_mode)) as Box<dyn Metric>
            }),
        );
        registry
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn(&MetricsConfig) -> Box<dyn Metric> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(MetricError::AlreadyExists(name));
        }
        tracing::debug!(metric = %name, "Registered metric");
        self.factories.insert(name, Box::new(factory));
        Ok(())
    }

    pub fn build(&self, name: &str) -> Result<Box<dyn Metric>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| MetricError::NotFound(format!("metric '{name}'")))?;
        tracing::debug!(metric = %name, "Building metric");
        Ok(factory(&self.config))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::with_builtins(MetricsConfig::default())
    }
}

impl fmt::Debug for MetricRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricRegistry")
            .field("config", &self.config)
            .field("metrics", &self.names())
            .finish()
    }
}
