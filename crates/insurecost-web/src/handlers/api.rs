//! JSON API over the form state and prediction outcome.

use axum::{extract::State, Json};
use insurecost_common::{FormData, FormField, PredictionOutcome};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub name: String,
    pub value: String,
}

/// GET /api/form
pub async fn api_form(State(state): State<SharedState>) -> Json<FormData> {
    Json(state.form.read().await.clone())
}

/// POST /api/form/field - replace one field, leaving the rest untouched
pub async fn api_update_field(
    State(state): State<SharedState>,
    Json(update): Json<FieldUpdate>,
) -> Result<Json<FormData>, ApiError> {
    let field: FormField = update.name.parse()?;
    let mut form = state.form.write().await;
    form.set(field, update.value);
    Ok(Json(form.clone()))
}

/// POST /api/predict - submit the current form and wait for the outcome
pub async fn api_predict(
    State(state): State<SharedState>,
) -> Result<Json<PredictionOutcome>, ApiError> {
    let form = state.form.read().await.clone();
    let outcome = state.controller.submit(&form).await?;
    Ok(Json(outcome))
}

/// GET /api/outcome
pub async fn api_outcome(State(state): State<SharedState>) -> Json<PredictionOutcome> {
    Json(state.controller.outcome().await)
}
