use std::sync::Once;
use std::time::Duration;

use bytes::Bytes;
use pretty_assertions::assert_eq;
use serde_json::json;
use triad_core::{ArticleSource, Backend, InputMode, SummaryReply, ValidationNotice};
use triad_engine::{
    BackendError, ClientSettings, Completion, FailureKind, Orchestrator, ReqwestSummaryClient,
    SummaryClient,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(triad_logging::initialize_for_tests);
}

fn orchestrator_for(server: &MockServer) -> Orchestrator<ReqwestSummaryClient> {
    let settings = ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    };
    Orchestrator::new(ReqwestSummaryClient::new(&settings).expect("client"))
}

async fn mount(server: &MockServer, backend: &str, body: serde_json::Value, delay_ms: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/summarize/{backend}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(delay_ms))
                .set_body_json(body),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn submit_fills_every_slot_and_resolves_session_text_by_priority() {
    init_logging();
    let server = MockServer::start().await;
    mount(&server, "gemini", json!({"summary": "g", "article_text": "from gemini"}), 150).await;
    mount(&server, "chatgpt", json!({"summary": "c", "article_text": "from chatgpt"}), 0).await;
    mount(&server, "claude", json!({"summary": "a", "article_text": "from claude"}), 0).await;

    let mut session = orchestrator_for(&server);
    let completion = session
        .submit(ArticleSource::Url("https://example.com/post".into()), None)
        .await;

    assert_eq!(
        completion,
        Completion::Settled {
            operation: 1,
            failed: Vec::new()
        }
    );
    assert_eq!(session.session_text(), "from gemini");
    let view = session.view();
    let texts: Vec<_> = view.panels.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, vec!["g", "c", "a"]);
    assert!(view.follow_up_visible);
    assert!(!view.loading);
}

#[tokio::test]
async fn empty_submit_issues_no_requests() {
    init_logging();
    let server = MockServer::start().await;
    let mut session = orchestrator_for(&server);

    let completion = session.submit(ArticleSource::RawText(String::new()), None).await;

    assert_eq!(completion, Completion::Rejected(ValidationNotice::MissingText));
    assert_eq!(session.state().input_mode(), InputMode::Text);
    let received = server.received_requests().await.expect("recording on");
    assert!(received.is_empty());
}

#[tokio::test]
async fn failing_backend_is_reported_and_isolated() {
    init_logging();
    let server = MockServer::start().await;
    mount(&server, "gemini", json!({"summary": "g"}), 0).await;
    Mock::given(method("POST"))
        .and(path("/summarize/chatgpt"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;
    mount(&server, "claude", json!({"summary": "a"}), 0).await;

    let mut session = orchestrator_for(&server);
    let completion = session
        .submit(ArticleSource::RawText("Body".into()), Some("Be brief".into()))
        .await;

    assert_eq!(
        completion,
        Completion::Settled {
            operation: 1,
            failed: vec![Backend::ChatGpt]
        }
    );
    let results = session.state().results();
    assert_eq!(results.get(Backend::Gemini), "g");
    assert_eq!(results.get(Backend::ChatGpt), "Error loading ChatGPT summary");
    assert_eq!(results.get(Backend::Claude), "a");
    assert_eq!(session.session_text(), "");
}

#[tokio::test]
async fn refine_sends_session_text_and_keeps_it() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"url": "https://example.com/post"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"summary": "first", "article_text": "Resolved body"})),
        )
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!({"text": "Resolved body", "prompt": "Shorter"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"summary": "short", "article_text": "Other body"})),
        )
        .expect(3)
        .mount(&server)
        .await;

    let mut session = orchestrator_for(&server);
    session
        .submit(ArticleSource::Url("https://example.com/post".into()), None)
        .await;
    let completion = session.refine("Shorter").await;

    assert_eq!(
        completion,
        Completion::Settled {
            operation: 2,
            failed: Vec::new()
        }
    );
    assert_eq!(session.session_text(), "Resolved body");
    for (_, text) in session.state().results().iter() {
        assert_eq!(text, "short");
    }
}

#[tokio::test]
async fn empty_refine_is_rejected() {
    init_logging();
    let server = MockServer::start().await;
    let mut session = orchestrator_for(&server);

    assert_eq!(
        session.refine("").await,
        Completion::Rejected(ValidationNotice::MissingFollowUp)
    );
    assert!(server.received_requests().await.expect("recording on").is_empty());
}

struct ScriptedClient {
    fail: Option<Backend>,
}

#[async_trait::async_trait]
impl SummaryClient for ScriptedClient {
    async fn summarize(&self, backend: Backend, _body: Bytes) -> Result<SummaryReply, BackendError> {
        if self.fail == Some(backend) {
            return Err(BackendError {
                kind: FailureKind::Network,
                message: "connection reset".into(),
            });
        }
        Ok(SummaryReply {
            summary: format!("{} summary", backend.display_name()),
            article_text: Some(format!("{} text", backend.id())),
        })
    }
}

#[tokio::test]
async fn tab_selection_and_failure_with_scripted_client() {
    init_logging();
    let client = ScriptedClient {
        fail: Some(Backend::Gemini),
    };
    let mut session = Orchestrator::new(client);

    session
        .submit(ArticleSource::Url("https://example.com".into()), None)
        .await;
    assert_eq!(session.session_text(), "chatgpt text");

    session.select_tab(Backend::Claude);
    let view = session.view();
    let visible: Vec<_> = view.visible_panels().map(|p| p.text.clone()).collect();
    assert_eq!(visible, vec!["Claude summary".to_string()]);
    assert_eq!(
        view.panel(Backend::Gemini).map(|p| p.text.as_str()),
        Some("Error loading Gemini summary")
    );
}
