//! Prediction request controller.
//!
//! Owns the [`PredictionOutcome`] of one view and drives it through
//! `Idle -> Pending -> Success | Failure`, one submission at a time.
//! Every transition is broadcast as an [`OutcomeEvent`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use insurecost_common::{FormData, OutcomeEvent, PredictionOutcome};
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::SubmitError;
use crate::service::PredictionService;

/// Clears the pending flag when dropped. `submit` hands it to `settle` on
/// the normal paths; early returns clear it on the way out.
struct PendingGuard<'a>(&'a AtomicBool);

impl<'a> PendingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct PredictionController {
    service: Arc<dyn PredictionService>,
    outcome: RwLock<PredictionOutcome>,
    pending: AtomicBool,
    event_tx: broadcast::Sender<OutcomeEvent>,
    cancel: CancellationToken,
}

impl PredictionController {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            service,
            outcome: RwLock::new(PredictionOutcome::Idle),
            pending: AtomicBool::new(false),
            event_tx,
            cancel: CancellationToken::new(),
        }
    }

    pub async fn outcome(&self) -> PredictionOutcome {
        self.outcome.read().await.clone()
    }

    /// True while a submission is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OutcomeEvent> {
        self.event_tx.subscribe()
    }

    /// Tear down: the in-flight request (if any) is dropped and its result
    /// never reaches the outcome. Later submissions are refused.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A child of the controller's shutdown token, cancelled by [`Self::shutdown`].
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    async fn transition(&self, submission_id: Uuid, outcome: PredictionOutcome) {
        *self.outcome.write().await = outcome.clone();
        // No subscribers is fine
        let _ = self.event_tx.send(OutcomeEvent { submission_id, outcome });
    }

    /// Final transition of a submission. The pending flag is cleared under
    /// the outcome lock, before the settled event is sent.
    async fn settle(&self, guard: PendingGuard<'_>, submission_id: Uuid, outcome: PredictionOutcome) {
        let mut slot = self.outcome.write().await;
        *slot = outcome.clone();
        drop(guard);
        let _ = self.event_tx.send(OutcomeEvent { submission_id, outcome });
    }

    /// Submit the form and wait for the outcome to settle.
    ///
    /// Returns the settled outcome. Invalid numeric or categorical input
    /// settles straight to `Failure` without contacting the service.
    pub async fn submit(&self, form: &FormData) -> Result<PredictionOutcome, SubmitError> {
        if self.is_shut_down() {
            return Err(SubmitError::ShutDown);
        }
        let guard = PendingGuard::acquire(&self.pending).ok_or(SubmitError::AlreadyPending)?;
        let submission_id = Uuid::new_v4();

        let request = match form.to_request() {
            Ok(request) => request,
            Err(e) => {
                warn!(%submission_id, "Rejected form input: {e}");
                let outcome = PredictionOutcome::Failure { message: e.to_string() };
                self.settle(guard, submission_id, outcome.clone()).await;
                return Ok(outcome);
            }
        };

        info!(%submission_id, "Submitting prediction request");
        self.transition(submission_id, PredictionOutcome::Pending).await;

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                info!(%submission_id, "Controller shut down, discarding in-flight request");
                return Err(SubmitError::ShutDown);
            }
            result = self.service.predict(&request) => result,
        };

        let outcome = match result {
            Ok(prediction) => {
                info!(%submission_id, prediction, "Prediction received");
                PredictionOutcome::Success { prediction }
            }
            Err(e) => {
                warn!(%submission_id, "Prediction failed: {e}");
                PredictionOutcome::Failure { message: e.user_message() }
            }
        };
        self.settle(guard, submission_id, outcome.clone()).await;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PredictError, FALLBACK_MESSAGE};
    use async_trait::async_trait;
    use insurecost_common::{FormField, PredictionRequest};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Answers every call with a fixed result and counts calls.
    struct FixedService {
        result: fn() -> Result<f64, PredictError>,
        calls: AtomicUsize,
    }

    impl FixedService {
        fn new(result: fn() -> Result<f64, PredictError>) -> Arc<Self> {
            Arc::new(Self { result, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl PredictionService for FixedService {
        async fn predict(&self, _request: &PredictionRequest) -> Result<f64, PredictError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    /// Blocks until released, so a submission can be observed mid-flight.
    struct GatedService {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl PredictionService for GatedService {
        async fn predict(&self, _request: &PredictionRequest) -> Result<f64, PredictError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(100.0)
        }
    }

    fn drain(rx: &mut broadcast::Receiver<OutcomeEvent>) -> Vec<PredictionOutcome> {
        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(event.outcome);
        }
        seen
    }

    #[tokio::test]
    async fn test_success_passes_through_pending() {
        let controller = PredictionController::new(FixedService::new(|| Ok(7823.45)));
        let mut rx = controller.subscribe();
        assert_eq!(controller.outcome().await, PredictionOutcome::Idle);

        let settled = controller.submit(&FormData::default()).await.unwrap();

        assert_eq!(settled, PredictionOutcome::Success { prediction: 7823.45 });
        assert_eq!(controller.outcome().await, settled);
        assert_eq!(drain(&mut rx), vec![PredictionOutcome::Pending, settled]);
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn test_service_error_becomes_failure() {
        let controller = PredictionController::new(FixedService::new(|| {
            Err(PredictError::Service("invalid input".into()))
        }));
        let settled = controller.submit(&FormData::default()).await.unwrap();
        assert_eq!(settled, PredictionOutcome::Failure { message: "invalid input".into() });
    }

    #[tokio::test]
    async fn test_status_error_mentions_code() {
        let controller = PredictionController::new(FixedService::new(|| Err(PredictError::Status(500))));
        let settled = controller.submit(&FormData::default()).await.unwrap();
        assert!(settled.error_message().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_malformed_uses_fallback_message() {
        let controller = PredictionController::new(FixedService::new(|| {
            Err(PredictError::Malformed("bad json".into()))
        }));
        let settled = controller.submit(&FormData::default()).await.unwrap();
        assert_eq!(settled.error_message(), Some(FALLBACK_MESSAGE));
    }

    #[tokio::test]
    async fn test_invalid_input_fails_without_calling_service() {
        let service = FixedService::new(|| Ok(1.0));
        let controller = PredictionController::new(service.clone());
        let mut rx = controller.subscribe();

        let mut form = FormData::default();
        form.set(FormField::Age, "abc");
        let settled = controller.submit(&form).await.unwrap();

        assert!(settled.error_message().unwrap().contains("age"));
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert_eq!(drain(&mut rx), vec![settled]);
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn test_repeated_submissions_are_independent() {
        let service = FixedService::new(|| Ok(42.0));
        let controller = PredictionController::new(service.clone());
        let mut rx = controller.subscribe();
        let form = FormData::default();

        let first = controller.submit(&form).await.unwrap();
        let second = controller.submit(&form).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(service.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            drain(&mut rx),
            vec![
                PredictionOutcome::Pending,
                PredictionOutcome::Success { prediction: 42.0 },
                PredictionOutcome::Pending,
                PredictionOutcome::Success { prediction: 42.0 },
            ]
        );
    }

    #[tokio::test]
    async fn test_new_failure_overwrites_previous_error() {
        let failing = PredictionController::new(FixedService::new(|| Err(PredictError::Status(503))));
        failing.submit(&FormData::default()).await.unwrap();
        assert!(failing.outcome().await.error_message().is_some());

        let mut form = FormData::default();
        form.set(FormField::Bmi, "oops");
        let settled = failing.submit(&form).await.unwrap();
        assert!(settled.error_message().unwrap().contains("bmi"));
    }

    #[tokio::test]
    async fn test_reentrant_submit_is_refused() {
        let service = Arc::new(GatedService { entered: Notify::new(), release: Notify::new() });
        let controller = Arc::new(PredictionController::new(service.clone()));

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit(&FormData::default()).await })
        };
        service.entered.notified().await;

        assert!(controller.is_pending());
        assert_eq!(controller.outcome().await, PredictionOutcome::Pending);
        let second = controller.submit(&FormData::default()).await;
        assert_eq!(second, Err(SubmitError::AlreadyPending));

        service.release.notify_one();
        let settled = task.await.unwrap().unwrap();
        assert_eq!(settled, PredictionOutcome::Success { prediction: 100.0 });
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn test_pending_cleared_before_settled_event() {
        let service = Arc::new(GatedService { entered: Notify::new(), release: Notify::new() });
        let controller = Arc::new(PredictionController::new(service.clone()));
        let mut rx = controller.subscribe();

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit(&FormData::default()).await })
        };
        assert_eq!(rx.recv().await.unwrap().outcome, PredictionOutcome::Pending);
        service.entered.notified().await;
        service.release.notify_one();

        let settled = rx.recv().await.unwrap();
        assert!(settled.outcome.is_settled());
        assert!(!controller.is_pending());
        service.release.notify_one();
        let resubmit = controller.submit(&FormData::default()).await;
        assert!(resubmit.is_ok());

        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_cancels_child_tokens() {
        let controller = PredictionController::new(FixedService::new(|| Ok(1.0)));
        let token = controller.shutdown_token();
        assert!(!token.is_cancelled());

        controller.shutdown();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_shutdown_discards_in_flight_result() {
        let service = Arc::new(GatedService { entered: Notify::new(), release: Notify::new() });
        let controller = Arc::new(PredictionController::new(service.clone()));

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit(&FormData::default()).await })
        };
        service.entered.notified().await;

        controller.shutdown();
        assert_eq!(task.await.unwrap(), Err(SubmitError::ShutDown));
        assert_eq!(controller.outcome().await, PredictionOutcome::Pending);
        assert!(!controller.is_pending());

        let later = controller.submit(&FormData::default()).await;
        assert_eq!(later, Err(SubmitError::ShutDown));
    }
}
