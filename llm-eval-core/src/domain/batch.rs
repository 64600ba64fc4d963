use serde::{Deserialize, Serialize};

use crate::error::{MetricError, Result};

/// One batch of model outputs: predictions and the matching ground truths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricBatch {
    pub preds: Vec<String>,
    pub tgts: Vec<String>,
}

impl MetricBatch {
    pub fn new<P, T>(preds: P, tgts: T) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            preds: preds.into_iter().map(Into::into).collect(),
            tgts: tgts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.preds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preds.is_empty()
    }

    /// Positional pairing requires both sides to have the same length.
    pub fn validate(&self) -> Result<()> {
        if self.preds.len() != self.tgts.len() {
            return Err(MetricError::BatchLengthMismatch {
                preds: self.preds.len(),
                tgts: self.tgts.len(),
            });
        }
        Ok(())
    }
}
