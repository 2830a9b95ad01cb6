//! insurecost-client — Talks to the external prediction service and tracks
//! the lifecycle of each submission.

pub mod controller;
pub mod error;
pub mod service;

pub use controller::PredictionController;
pub use error::{PredictError, SubmitError, FALLBACK_MESSAGE};
pub use service::{HttpPredictionService, PredictionService};
