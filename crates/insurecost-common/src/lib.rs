//! insurecost-common — Shared types and errors used across all insurecost crates.
//!
//! - `form`    — editable form state and its coercion into a typed request
//! - `outcome` — the submission lifecycle shown by the view

pub mod error;
pub mod form;
pub mod outcome;

// Re-export commonly used types
pub use error::{InsureCostError, Result};
pub use form::{FormData, FormField, PredictionRequest, Region, Sex, Smoker};
pub use outcome::{OutcomeEvent, PredictionOutcome};
