use futures_util::future::join_all;
use triad_core::{Backend, BackendOutcome, OperationId, OperationKind, SummaryRequest};
use triad_logging::{triad_debug, triad_info, triad_warn};

use crate::client::encode_request;
use crate::{EngineError, EngineEvent, SummaryClient};

/// Sends the same payload to every backend concurrently and waits until all of
/// them have settled. Outcomes come back in backend priority order.
pub async fn fan_out(
    client: &dyn SummaryClient,
    request: &SummaryRequest,
) -> Result<Vec<BackendOutcome>, EngineError> {
    let body = encode_request(request)?;
    triad_debug!("fan-out payload_len={}", body.len());

    let calls = Backend::ALL.into_iter().map(|backend| {
        let body = body.clone();
        async move { (backend, client.summarize(backend, body).await) }
    });

    let outcomes = join_all(calls)
        .await
        .into_iter()
        .map(|(backend, result)| match result {
            Ok(reply) => BackendOutcome::success(backend, reply),
            Err(err) => {
                triad_warn!("{} request failed: {}", backend.display_name(), err);
                BackendOutcome::failure(backend, err.to_string())
            }
        })
        .collect();
    Ok(outcomes)
}

/// Runs one operation's fan-out and reports how it ended.
pub async fn run_fan_out(
    client: &dyn SummaryClient,
    operation: OperationId,
    kind: OperationKind,
    request: &SummaryRequest,
) -> EngineEvent {
    triad_info!("operation {} ({:?}) started", operation, kind);
    match fan_out(client, request).await {
        Ok(outcomes) => {
            let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
            triad_info!("operation {} settled, {} failed", operation, failed);
            EngineEvent::FanOutCompleted {
                operation,
                kind,
                outcomes,
            }
        }
        Err(err) => {
            triad_warn!("operation {} aborted: {}", operation, err);
            EngineEvent::FanOutFailed {
                operation,
                kind,
                message: err.to_string(),
            }
        }
    }
}
