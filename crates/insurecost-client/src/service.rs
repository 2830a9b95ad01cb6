//! Prediction service trait and the HTTP implementation.
//!
//! Wire contract:
//!   POST {endpoint}   Content-Type: application/json
//!   body      { age, bmi, children, smoker, sex, region }
//!   response  { "prediction": number } | { "error": any }

use std::time::Duration;

use async_trait::async_trait;
use insurecost_common::PredictionRequest;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::error::PredictError;

/// Anything that can turn a request into a cost estimate.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<f64, PredictError>;
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    prediction: Option<f64>,
    #[serde(default)]
    error: Value,
}

/// The message carried by an `error` field, or `None` when it is absent or
/// falsy (`null`, `false`, `0`, `""`). Non-string values are shown as JSON.
fn error_text(error: Value) -> Option<String> {
    match error {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Interpret a 2xx response body.
fn parse_response_body(body: &[u8]) -> Result<f64, PredictError> {
    let resp: PredictionResponse =
        serde_json::from_slice(body).map_err(|e| PredictError::Malformed(e.to_string()))?;

    if let Some(error) = error_text(resp.error) {
        return Err(PredictError::Service(error));
    }

    resp.prediction
        .ok_or_else(|| PredictError::Malformed("response has no prediction field".to_string()))
}

/// Calls a remote prediction endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    client: Client,
    endpoint: Url,
}

impl HttpPredictionService {
    /// No request timeout.
    pub fn new(endpoint: Url) -> Self {
        Self { client: Client::new(), endpoint }
    }

    pub fn with_timeout(endpoint: Url, timeout: Option<Duration>) -> Result<Self, PredictError> {
        let mut builder = ClientBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self { client: builder.build()?, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    #[instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn predict(&self, request: &PredictionRequest) -> Result<f64, PredictError> {
        let resp = self.client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Prediction service returned an error status");
            return Err(PredictError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        let prediction = parse_response_body(&body)?;
        debug!(prediction, "Prediction service returned a value");
        Ok(prediction)
    }
}
