use crate::{
    AppState, Backend, BackendOutcome, Effect, InputMode, Msg, OperationKind, SummaryRequest,
    ValidationNotice,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputModeSelected(mode) => {
            state.set_input_mode(mode);
            Vec::new()
        }
        Msg::UrlInputChanged(value) => {
            state.set_url_input(value);
            Vec::new()
        }
        Msg::TextInputChanged(value) => {
            state.set_text_input(value);
            Vec::new()
        }
        Msg::PromptInputChanged(value) => {
            state.set_prompt_input(value);
            Vec::new()
        }
        Msg::FollowUpInputChanged(value) => {
            state.set_follow_up_input(value);
            Vec::new()
        }
        Msg::SubmitClicked => {
            // Validation runs before anything is cleared: an empty submission
            // leaves the previous results on screen.
            let Some(source) = state.article_source() else {
                let notice = match state.input_mode() {
                    InputMode::Url => ValidationNotice::MissingUrl,
                    InputMode::Text => ValidationNotice::MissingText,
                };
                state.set_notice(Some(notice));
                return (state, vec![Effect::ShowNotice(notice)]);
            };
            let request = SummaryRequest::for_source(&source, state.submit_prompt());
            let operation = state.begin_submit();
            vec![Effect::FanOut {
                operation,
                kind: OperationKind::Submit,
                request,
            }]
        }
        Msg::RefineClicked => {
            let Some(prompt) = state.follow_up_prompt() else {
                let notice = ValidationNotice::MissingFollowUp;
                state.set_notice(Some(notice));
                return (state, vec![Effect::ShowNotice(notice)]);
            };
            let request = SummaryRequest::refinement(state.session_text(), prompt);
            let operation = state.begin_refine();
            vec![Effect::FanOut {
                operation,
                kind: OperationKind::Refine,
                request,
            }]
        }
        Msg::TabSelected(backend) => {
            state.select_tab(backend);
            Vec::new()
        }
        Msg::NoticeDismissed => {
            state.set_notice(None);
            Vec::new()
        }
        Msg::SummariesArrived {
            operation: _,
            kind,
            outcomes,
        } => {
            // Stale operations are applied as well; a newer submission does not
            // cancel or mask an older one that settles later.
            for backend in Backend::ALL {
                let text = outcomes
                    .iter()
                    .find(|outcome| outcome.backend == backend)
                    .and_then(|outcome| outcome.result.as_ref().ok())
                    .map(|reply| reply.summary.clone())
                    .unwrap_or_else(|| placeholder_for(kind, backend));
                state.set_result(backend, text);
            }
            if kind == OperationKind::Submit {
                state.set_session_text(resolve_session_text(&outcomes));
                state.show_follow_up();
            }
            state.finish_operation();
            Vec::new()
        }
        Msg::FanOutFailed {
            operation: _,
            kind: _,
            message,
        } => {
            state.fill_results(&format!("An error occurred: {message}"));
            state.finish_operation();
            Vec::new()
        }
    };

    (state, effects)
}

/// Placeholder shown in a slot whose backend call failed.
pub fn placeholder_for(kind: OperationKind, backend: Backend) -> String {
    match kind {
        OperationKind::Submit => format!("Error loading {} summary", backend.display_name()),
        OperationKind::Refine => format!("Error refining {} summary", backend.display_name()),
    }
}

/// First non-empty `article_text` in backend priority order, regardless of arrival order.
pub fn resolve_session_text(outcomes: &[BackendOutcome]) -> String {
    Backend::ALL
        .into_iter()
        .find_map(|backend| {
            outcomes
                .iter()
                .filter(|outcome| outcome.backend == backend)
                .filter_map(|outcome| outcome.result.as_ref().ok())
                .filter_map(|reply| reply.article_text.as_deref())
                .find(|text| !text.is_empty())
        })
        .map(ToOwned::to_owned)
        .unwrap_or_default()
}
