//! Submission lifecycle shown by the prediction view.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current state of the most recent submission.
///
/// `Idle` only before the first submission. Every later submission passes
/// through `Pending` before settling on `Success` or `Failure`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PredictionOutcome {
    #[default]
    Idle,
    Pending,
    Success { prediction: f64 },
    Failure { message: String },
}

impl PredictionOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, PredictionOutcome::Pending)
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            PredictionOutcome::Success { .. } | PredictionOutcome::Failure { .. }
        )
    }

    pub fn prediction(&self) -> Option<f64> {
        match self {
            PredictionOutcome::Success { prediction } => Some(*prediction),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            PredictionOutcome::Failure { message } => Some(message),
            _ => None,
        }
    }
}

/// A single lifecycle transition, tagged with the submission that caused it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutcomeEvent {
    pub submission_id: Uuid,
    pub outcome: PredictionOutcome,
}
