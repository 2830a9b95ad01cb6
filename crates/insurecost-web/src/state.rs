//! Shared application state for the web server.

use std::sync::Arc;

use insurecost_client::{HttpPredictionService, PredictionController, PredictionService};
use insurecost_common::FormData;
use minijinja::Environment;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::render;

/// State of the single prediction view, injected into every Axum handler.
pub struct AppState {
    /// Form State Holder: the six fields exactly as last edited.
    pub form: RwLock<FormData>,
    pub controller: Arc<PredictionController>,
    pub templates: Environment<'static>,
}

impl AppState {
    pub fn new(service: Arc<dyn PredictionService>) -> anyhow::Result<Self> {
        Ok(Self {
            form: RwLock::new(FormData::default()),
            controller: Arc::new(PredictionController::new(service)),
            templates: render::environment()?,
        })
    }

    /// Build state backed by the HTTP prediction service named in `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let endpoint = config.predictor.endpoint()?;
        let service = HttpPredictionService::with_timeout(endpoint, config.predictor.timeout())?;
        Self::new(Arc::new(service))
    }
}

pub type SharedState = Arc<AppState>;
