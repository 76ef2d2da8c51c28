//! Database models
//!
//! `SentimentRow` mirrors the table with its three flattened probability
//! columns; `SentimentRecord` is what callers see, with the probabilities
//! nested back into one object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Provenance tag used when the caller does not send one
pub const DEFAULT_SOURCE: &str = "web_app";

/// Probability distribution over the three labels
///
/// The values are not required to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

/// One persisted classification result, as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub id: i64,
    pub text: String,
    pub predicted_class: String,
    pub confidence: f64,
    pub all_probabilities: Probabilities,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw table row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SentimentRow {
    pub id: i64,
    pub text: String,
    pub predicted_class: String,
    pub confidence: f64,
    pub positive_prob: f64,
    pub negative_prob: f64,
    pub neutral_prob: f64,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SentimentRow> for SentimentRecord {
    fn from(row: SentimentRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            predicted_class: row.predicted_class,
            confidence: row.confidence,
            all_probabilities: Probabilities {
                positive: row.positive_prob,
                negative: row.negative_prob,
                neutral: row.neutral_prob,
            },
            source: row.source,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Probability object as submitted; any component may be missing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbabilityInput {
    pub positive: Option<f64>,
    pub negative: Option<f64>,
    pub neutral: Option<f64>,
}

/// Unvalidated save request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentimentInput {
    pub text: Option<String>,
    pub predicted_class: Option<String>,
    pub confidence: Option<f64>,
    pub all_probabilities: Option<ProbabilityInput>,
    pub source: Option<String>,
}

/// Save request with every required field present
#[derive(Debug, Clone, PartialEq)]
pub struct NewSentiment {
    pub text: String,
    pub predicted_class: String,
    pub confidence: f64,
    pub probabilities: Probabilities,
    pub source: String,
}

impl SentimentInput {
    /// Names of required fields that are absent (empty strings count as absent)
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.text.as_deref().map_or(true, str::is_empty) {
            missing.push("text");
        }
        if self.predicted_class.as_deref().map_or(true, str::is_empty) {
            missing.push("predicted_class");
        }
        if self.confidence.is_none() {
            missing.push("confidence");
        }
        if self.complete_probabilities().is_none() {
            missing.push("all_probabilities");
        }
        missing
    }

    fn complete_probabilities(&self) -> Option<Probabilities> {
        let p = self.all_probabilities.as_ref()?;
        Some(Probabilities {
            positive: p.positive?,
            negative: p.negative?,
            neutral: p.neutral?,
        })
    }

    /// Check required fields and produce an insertable record
    pub fn validate(&self) -> Result<NewSentiment> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(Error::Validation { missing });
        }

        let (Some(text), Some(predicted_class), Some(confidence), Some(probabilities)) = (
            self.text.clone(),
            self.predicted_class.clone(),
            self.confidence,
            self.complete_probabilities(),
        ) else {
            return Err(Error::Validation {
                missing: vec!["all_probabilities"],
            });
        };

        Ok(NewSentiment {
            text,
            predicted_class,
            confidence,
            probabilities,
            source: self
                .source
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        })
    }
}
