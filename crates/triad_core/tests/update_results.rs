use triad_core::{
    update, AppState, Backend, BackendOutcome, Effect, Msg, OperationId, OperationKind,
    SummaryReply, ValidationNotice,
};

fn reply(summary: &str, article_text: Option<&str>) -> SummaryReply {
    SummaryReply {
        summary: summary.to_string(),
        article_text: article_text.map(ToOwned::to_owned),
    }
}

fn submitted(url: &str) -> (AppState, OperationId) {
    let (state, _) = update(AppState::new(), Msg::UrlInputChanged(url.to_string()));
    let (state, effects) = update(state, Msg::SubmitClicked);
    let operation = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FanOut { operation, .. } => Some(*operation),
            _ => None,
        })
        .expect("fan-out effect");
    (state, operation)
}

fn arrive(
    state: AppState,
    operation: OperationId,
    kind: OperationKind,
    outcomes: Vec<BackendOutcome>,
) -> AppState {
    let (state, effects) = update(
        state,
        Msg::SummariesArrived {
            operation,
            kind,
            outcomes,
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn submit_populates_all_slots_and_shows_follow_up() {
    let (state, op) = submitted("https://example.com");
    let state = arrive(
        state,
        op,
        OperationKind::Submit,
        vec![
            BackendOutcome::success(Backend::Gemini, reply("g", Some("X"))),
            BackendOutcome::success(Backend::ChatGpt, reply("c", None)),
            BackendOutcome::success(Backend::Claude, reply("a", Some(""))),
        ],
    );

    assert_eq!(state.results().get(Backend::Gemini), "g");
    assert_eq!(state.results().get(Backend::ChatGpt), "c");
    assert_eq!(state.results().get(Backend::Claude), "a");
    assert_eq!(state.session_text(), "X");
    assert!(state.follow_up_visible());
    assert!(!state.is_loading());
}

#[test]
fn single_failure_is_isolated_to_its_slot() {
    let (state, op) = submitted("https://example.com");
    let state = arrive(
        state,
        op,
        OperationKind::Submit,
        vec![
            BackendOutcome::success(Backend::Gemini, reply("gemini says", None)),
            BackendOutcome::failure(Backend::ChatGpt, "http status 502"),
            BackendOutcome::success(Backend::Claude, reply("claude says", None)),
        ],
    );

    let texts: Vec<_> = state.results().iter().map(|(_, t)| t.to_string()).collect();
    assert_eq!(
        texts,
        vec![
            "gemini says".to_string(),
            "Error loading ChatGPT summary".to_string(),
            "claude says".to_string(),
        ]
    );
    let placeholders = texts.iter().filter(|t| t.starts_with("Error loading")).count();
    assert_eq!(placeholders, 1);
}

#[test]
fn follow_up_shown_even_when_every_backend_failed() {
    let (state, op) = submitted("https://example.com");
    let state = arrive(
        state,
        op,
        OperationKind::Submit,
        Backend::ALL
            .into_iter()
            .map(|b| BackendOutcome::failure(b, "network error"))
            .collect(),
    );

    assert!(state.follow_up_visible());
    assert_eq!(state.session_text(), "");
    assert_eq!(state.results().get(Backend::Claude), "Error loading Claude summary");
}

#[test]
fn session_text_uses_priority_when_later_backend_arrives_first() {
    let (state, op) = submitted("https://example.com");
    let state = arrive(
        state,
        op,
        OperationKind::Submit,
        vec![
            BackendOutcome::success(Backend::Claude, reply("a", Some("claude body"))),
            BackendOutcome::success(Backend::Gemini, reply("g", Some("gemini body"))),
            BackendOutcome::success(Backend::ChatGpt, reply("c", Some("chatgpt body"))),
        ],
    );
    assert_eq!(state.session_text(), "gemini body");
}

#[test]
fn refine_never_touches_session_text() {
    let (state, op) = submitted("https://example.com");
    let state = arrive(
        state,
        op,
        OperationKind::Submit,
        vec![BackendOutcome::success(Backend::Gemini, reply("g", Some("original")))],
    );

    let (state, _) = update(state, Msg::FollowUpInputChanged("Make it shorter".into()));
    let (state, effects) = update(state, Msg::RefineClicked);
    let refine_op = match &effects[..] {
        [Effect::FanOut {
            operation,
            kind: OperationKind::Refine,
            request,
        }] => {
            assert_eq!(request.text.as_deref(), Some("original"));
            assert_eq!(request.prompt.as_deref(), Some("Make it shorter"));
            *operation
        }
        other => panic!("unexpected effects: {other:?}"),
    };
    assert!(state.follow_up_visible());

    let state = arrive(
        state,
        refine_op,
        OperationKind::Refine,
        vec![
            BackendOutcome::success(Backend::Gemini, reply("short g", Some("rewritten"))),
            BackendOutcome::success(Backend::ChatGpt, reply("short c", Some("rewritten"))),
            BackendOutcome::failure(Backend::Claude, "timeout"),
        ],
    );

    assert_eq!(state.session_text(), "original");
    assert_eq!(state.results().get(Backend::Gemini), "short g");
    assert_eq!(state.results().get(Backend::Claude), "Error refining Claude summary");
}

#[test]
fn new_submit_overwrites_session_text() {
    let (state, op) = submitted("https://first.example.com");
    let state = arrive(
        state,
        op,
        OperationKind::Submit,
        vec![BackendOutcome::success(Backend::ChatGpt, reply("c", Some("first")))],
    );
    assert_eq!(state.session_text(), "first");

    let (state, _) = update(state, Msg::UrlInputChanged("https://second.example.com".into()));
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(!state.follow_up_visible());
    let op = match &effects[..] {
        [Effect::FanOut { operation, .. }] => *operation,
        other => panic!("unexpected effects: {other:?}"),
    };
    let state = arrive(
        state,
        op,
        OperationKind::Submit,
        vec![BackendOutcome::success(Backend::Claude, reply("a", Some("second")))],
    );
    assert_eq!(state.session_text(), "second");
}

#[test]
fn missing_outcome_gets_placeholder() {
    let (state, op) = submitted("https://example.com");
    let state = arrive(
        state,
        op,
        OperationKind::Submit,
        vec![BackendOutcome::success(Backend::Gemini, reply("g", None))],
    );
    assert_eq!(state.results().get(Backend::ChatGpt), "Error loading ChatGPT summary");
}

#[test]
fn total_failure_replaces_every_slot() {
    let (state, op) = submitted("https://example.com");
    let (state, _) = update(
        state,
        Msg::FanOutFailed {
            operation: op,
            kind: OperationKind::Submit,
            message: "payload could not be encoded".into(),
        },
    );

    for (_, text) in state.results().iter() {
        assert_eq!(text, "An error occurred: payload could not be encoded");
    }
    assert!(!state.is_loading());
    assert!(!state.follow_up_visible());
}

#[test]
fn stale_submit_still_lands_after_newer_one() {
    let (state, first) = submitted("https://first.example.com");
    let (state, _) = update(state, Msg::UrlInputChanged("https://second.example.com".into()));
    let (state, effects) = update(state, Msg::SubmitClicked);
    let second = match &effects[..] {
        [Effect::FanOut { operation, .. }] => *operation,
        other => panic!("unexpected effects: {other:?}"),
    };
    assert!(state.is_loading());

    let state = arrive(
        state,
        second,
        OperationKind::Submit,
        vec![BackendOutcome::success(Backend::Gemini, reply("new", Some("new body")))],
    );
    assert!(state.is_loading(), "older operation still in flight");

    let state = arrive(
        state,
        first,
        OperationKind::Submit,
        vec![BackendOutcome::success(Backend::Gemini, reply("old", Some("old body")))],
    );
    assert_eq!(state.results().get(Backend::Gemini), "old");
    assert_eq!(state.session_text(), "old body");
    assert!(!state.is_loading());
}

#[test]
fn panels_expose_formatted_html() {
    let (state, op) = submitted("https://example.com");
    let state = arrive(
        state,
        op,
        OperationKind::Submit,
        vec![BackendOutcome::success(Backend::Gemini, reply("**Key** ## point", None))],
    );
    let view = state.view();
    let panel = view.panel(Backend::Gemini).expect("gemini panel");
    assert_eq!(panel.text, "**Key** ## point");
    assert_eq!(panel.html, "<b>Key</b>  point");
}

#[test]
fn empty_resubmit_keeps_previous_results() {
    let (state, op) = submitted("https://example.com");
    let state = arrive(
        state,
        op,
        OperationKind::Submit,
        vec![
            BackendOutcome::success(Backend::Gemini, reply("x", Some("Article"))),
            BackendOutcome::success(Backend::ChatGpt, reply("x", None)),
            BackendOutcome::success(Backend::Claude, reply("x", None)),
        ],
    );
    let before = state.results().clone();

    let (state, _) = update(state, Msg::UrlInputChanged(String::new()));
    let (state, effects) = update(state, Msg::SubmitClicked);

    assert_eq!(effects, vec![Effect::ShowNotice(ValidationNotice::MissingUrl)]);
    assert_eq!(state.results(), &before);
    assert!(state.results().iter().all(|(_, text)| text == "x"));
    assert!(state.follow_up_visible());
    assert!(!state.is_loading());
    assert_eq!(state.session_text(), "Article");

    // The rejected click did not consume an operation id.
    let (state, _) = update(state, Msg::UrlInputChanged("https://example.com/b".into()));
    let (_state, effects) = update(state, Msg::SubmitClicked);
    assert!(matches!(
        effects.as_slice(),
        [Effect::FanOut { operation, .. }] if *operation == op + 1
    ));
}
