use std::sync::{mpsc, Arc};
use std::time::Duration;

use bytes::Bytes;
use triad_core::{Backend, OperationKind, SummaryReply, SummaryRequest};
use triad_engine::{
    BackendError, ChannelEventSink, EngineEvent, EngineHandle, FailureKind, SummaryClient,
};

struct EchoClient;

#[async_trait::async_trait]
impl SummaryClient for EchoClient {
    async fn summarize(&self, backend: Backend, body: Bytes) -> Result<SummaryReply, BackendError> {
        if backend == Backend::Claude {
            return Err(BackendError {
                kind: FailureKind::HttpStatus(503),
                message: "Claude API key not configured.".into(),
            });
        }
        Ok(SummaryReply {
            summary: String::from_utf8_lossy(&body).into_owned(),
            article_text: None,
        })
    }
}

#[test]
fn handle_reports_completed_operations_through_sink() {
    let (tx, rx) = mpsc::channel();
    let handle = EngineHandle::with_client(Arc::new(EchoClient), Arc::new(ChannelEventSink::new(tx)))
        .expect("engine");

    handle.fan_out(
        4,
        OperationKind::Refine,
        SummaryRequest::refinement("body", "shorter"),
    );

    let event = rx.recv_timeout(Duration::from_secs(5)).expect("event");
    match event {
        EngineEvent::FanOutCompleted {
            operation,
            kind,
            outcomes,
        } => {
            assert_eq!(operation, 4);
            assert_eq!(kind, OperationKind::Refine);
            assert_eq!(outcomes.len(), 3);
            let gemini = outcomes[0].result.as_ref().expect("gemini ok");
            assert_eq!(gemini.summary, r#"{"text":"body","prompt":"shorter"}"#);
            assert_eq!(
                outcomes[2].result,
                Err("http status 503: Claude API key not configured.".to_string())
            );
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn overlapping_operations_all_settle() {
    let (tx, rx) = mpsc::channel();
    let handle = EngineHandle::with_client(Arc::new(EchoClient), Arc::new(ChannelEventSink::new(tx)))
        .expect("engine");

    handle.fan_out(1, OperationKind::Submit, SummaryRequest::refinement("a", "p"));
    handle.fan_out(2, OperationKind::Submit, SummaryRequest::refinement("b", "p"));

    let mut seen = Vec::new();
    for _ in 0..2 {
        match rx.recv_timeout(Duration::from_secs(5)).expect("event") {
            EngineEvent::FanOutCompleted { operation, .. } => seen.push(operation),
            other => panic!("unexpected event: {other:?}"),
        }
    }
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2]);
}
