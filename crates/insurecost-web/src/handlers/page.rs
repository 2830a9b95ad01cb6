//! The prediction page: form on the left, outcome on the right.

use axum::{extract::State, response::{Html, Redirect}, Form};
use insurecost_common::FormData;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::render::render_page;
use crate::state::SharedState;

pub async fn prediction_page(State(state): State<SharedState>) -> Result<Html<String>, ApiError> {
    let form = state.form.read().await.clone();
    let outcome = state.controller.outcome().await;
    Ok(Html(render_page(&state.templates, &form, &outcome)?))
}

/// Store the submitted fields and start a prediction in the background.
///
/// Waits for the first lifecycle transition so the page it redirects to
/// already shows the submission as pending (or rejected).
pub async fn prediction_submit(
    State(state): State<SharedState>,
    Form(form): Form<FormData>,
) -> Redirect {
    *state.form.write().await = form.clone();

    if state.controller.is_pending() {
        info!("Submission ignored, a prediction is already in progress");
        return Redirect::to("/");
    }

    let controller = state.controller.clone();
    let mut events = controller.subscribe();
    let mut task = tokio::spawn(async move { controller.submit(&form).await });

    tokio::select! {
        _ = events.recv() => {}
        joined = &mut task => match joined {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => info!("Submission not started: {e}"),
            Err(e) => warn!("Submission task failed: {e}"),
        },
    }

    Redirect::to("/")
}
