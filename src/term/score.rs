//! Similarity scores and connectivity partners
//!
//! Both records only index their target; the target term is deferred and
//! fetches its document the first time something reads it.

use super::vfb_term::VfbTerm;
use crate::backend::{Direction, Row, SimilarityMethod};
use serde::Serialize;
use tracing::warn;

/// One hit from a morphological similarity search.
#[derive(Debug, Clone)]
pub struct Score {
    pub method: SimilarityMethod,
    pub score: f64,
    target: VfbTerm,
}

impl Score {
    pub(crate) fn new(target: VfbTerm, score: f64, method: SimilarityMethod) -> Self {
        Self { method, score, target }
    }

    pub fn target_id(&self) -> &str {
        self.target.id()
    }

    /// The scored term; loads on first attribute access.
    pub fn target(&self) -> &VfbTerm {
        &self.target
    }

    pub fn record(&self) -> ScoreRecord {
        ScoreRecord {
            id: self.target_id().to_string(),
            score: self.score,
            method: self.method,
        }
    }
}

/// Plain record form of a [`Score`] for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub id: String,
    pub score: f64,
    pub method: SimilarityMethod,
}

/// A neuron connected to the owning neuron by synapses.
#[derive(Debug, Clone)]
pub struct Partner {
    pub direction: Direction,
    /// Number of synapses in the connection
    pub weight: i64,
    target: VfbTerm,
}

impl Partner {
    pub(crate) fn new(target: VfbTerm, weight: i64, direction: Direction) -> Self {
        Self { direction, weight, target }
    }

    pub fn target_id(&self) -> &str {
        self.target.id()
    }

    pub fn target(&self) -> &VfbTerm {
        &self.target
    }
}

/// `(id, score)` pairs from result rows, skipping rows that lack either column.
pub(crate) fn score_columns(rows: &[Row], value_column: &str) -> Vec<(String, f64)> {
    rows.iter()
        .filter_map(|row| {
            let id = row.get_str("id");
            let value = row.get_f64(value_column);
            if id.is_none() || value.is_none() {
                warn!(columns = ?row.columns, "skipping result row without id or {value_column}");
            }
            Some((id?.to_string(), value?))
        })
        .collect()
}
