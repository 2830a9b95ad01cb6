//! `GET /api/events`: outcome transitions as Server-Sent Events.
//!
//! Each frame is named `outcome` and carries an [`OutcomeEvent`] as JSON.
//! The stream ends when the controller shuts down, so an open subscriber
//! never holds up graceful shutdown.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::{future, Stream, StreamExt};
use insurecost_common::OutcomeEvent;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

use crate::state::SharedState;

pub const OUTCOME_EVENT: &str = "outcome";
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

fn outcome_frame(event: &OutcomeEvent) -> Option<Event> {
    match Event::default().event(OUTCOME_EVENT).json_data(event) {
        Ok(frame) => Some(frame),
        Err(e) => {
            warn!(submission_id = %event.submission_id, "Could not encode outcome event: {e}");
            None
        }
    }
}

pub async fn sse_handler(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let shutdown = state.controller.shutdown_token();
    debug!("Outcome subscriber connected");

    let frames = BroadcastStream::new(state.controller.subscribe())
        .filter_map(|received| {
            future::ready(match received {
                Ok(event) => outcome_frame(&event).map(Ok),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Outcome subscriber fell behind");
                    None
                }
            })
        })
        .take_until(shutdown.cancelled_owned());

    Sse::new(frames).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL).text("ping"))
}
