//! insurecost-web — Single-page insurance cost predictor.
//! Provides:
//!   - The prediction form and result panel (server-rendered HTML)
//!   - A JSON API over the same form state and outcome
//!   - An SSE stream of outcome transitions

pub mod config;
pub mod currency;
pub mod error;
pub mod handlers;
pub mod render;
pub mod router;
pub mod sse;
pub mod state;
