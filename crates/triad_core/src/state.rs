use crate::view_model::{AppViewModel, PanelView};
use crate::{format_summary, ArticleSource, Backend, InputMode, OperationId, ValidationNotice};

pub const REFINING_PLACEHOLDER: &str = "Refining...";

/// Display string per backend. Slots are independent of each other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelResults {
    slots: [String; 3],
}

impl ModelResults {
    pub fn get(&self, backend: Backend) -> &str {
        &self.slots[backend.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Backend, &str)> + '_ {
        Backend::ALL
            .into_iter()
            .map(move |backend| (backend, self.get(backend)))
    }

    pub(crate) fn set(&mut self, backend: Backend, value: impl Into<String>) {
        self.slots[backend.index()] = value.into();
    }

    pub(crate) fn fill(&mut self, value: &str) {
        for slot in &mut self.slots {
            slot.clear();
            slot.push_str(value);
        }
    }
}

/// Session-scoped UI state. Created on page load, dropped on navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input_mode: InputMode,
    url_input: String,
    text_input: String,
    prompt_input: String,
    follow_up_input: String,
    session_text: String,
    results: ModelResults,
    active_tab: Backend,
    follow_up_visible: bool,
    in_flight: usize,
    notice: Option<ValidationNotice>,
    last_operation: OperationId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let panels = self
            .results
            .iter()
            .map(|(backend, text)| {
                let active = backend == self.active_tab;
                PanelView {
                    backend,
                    label: backend.display_name(),
                    selector_active: active,
                    visible: active,
                    text: text.to_string(),
                    html: format_summary(Some(text)),
                }
            })
            .collect();

        AppViewModel {
            input_mode: self.input_mode,
            url_section_visible: self.input_mode == InputMode::Url,
            text_section_visible: self.input_mode == InputMode::Text,
            url_input: self.url_input.clone(),
            text_input: self.text_input.clone(),
            prompt_input: self.prompt_input.clone(),
            follow_up_input: self.follow_up_input.clone(),
            loading: self.in_flight > 0,
            notice: self.notice,
            follow_up_visible: self.follow_up_visible,
            active_tab: self.active_tab,
            panels,
            session_text_chars: self.session_text.chars().count(),
            dirty: self.dirty,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn session_text(&self) -> &str {
        &self.session_text
    }

    pub fn results(&self) -> &ModelResults {
        &self.results
    }

    pub fn active_tab(&self) -> Backend {
        self.active_tab
    }

    pub fn notice(&self) -> Option<ValidationNotice> {
        self.notice
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn follow_up_visible(&self) -> bool {
        self.follow_up_visible
    }

    /// Returns and clears the render flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Active article source, or `None` when the active input is empty.
    pub(crate) fn article_source(&self) -> Option<ArticleSource> {
        let source = match self.input_mode {
            InputMode::Url => ArticleSource::Url(self.url_input.clone()),
            InputMode::Text => ArticleSource::RawText(self.text_input.clone()),
        };
        (!source.is_empty()).then_some(source)
    }

    pub(crate) fn submit_prompt(&self) -> Option<String> {
        (!self.prompt_input.is_empty()).then(|| self.prompt_input.clone())
    }

    pub(crate) fn follow_up_prompt(&self) -> Option<String> {
        (!self.follow_up_input.is_empty()).then(|| self.follow_up_input.clone())
    }

    pub(crate) fn set_input_mode(&mut self, mode: InputMode) {
        if self.input_mode != mode {
            self.input_mode = mode;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_url_input(&mut self, value: String) {
        if self.url_input != value {
            self.url_input = value;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_text_input(&mut self, value: String) {
        if self.text_input != value {
            self.text_input = value;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_prompt_input(&mut self, value: String) {
        if self.prompt_input != value {
            self.prompt_input = value;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_follow_up_input(&mut self, value: String) {
        if self.follow_up_input != value {
            self.follow_up_input = value;
            self.mark_dirty();
        }
    }

    pub(crate) fn select_tab(&mut self, backend: Backend) {
        if self.active_tab != backend {
            self.active_tab = backend;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_notice(&mut self, notice: Option<ValidationNotice>) {
        if self.notice != notice {
            self.notice = notice;
            self.mark_dirty();
        }
    }

    /// Clears the three slots, hides the follow-up form and opens a new operation.
    pub(crate) fn begin_submit(&mut self) -> OperationId {
        self.results.fill("");
        self.follow_up_visible = false;
        self.begin_operation()
    }

    /// Puts every slot into the transient refining state and opens a new operation.
    pub(crate) fn begin_refine(&mut self) -> OperationId {
        self.results.fill(REFINING_PLACEHOLDER);
        self.begin_operation()
    }

    fn begin_operation(&mut self) -> OperationId {
        self.notice = None;
        self.in_flight += 1;
        self.last_operation += 1;
        self.mark_dirty();
        self.last_operation
    }

    pub(crate) fn finish_operation(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.mark_dirty();
    }

    pub(crate) fn set_result(&mut self, backend: Backend, value: impl Into<String>) {
        self.results.set(backend, value);
    }

    pub(crate) fn fill_results(&mut self, value: &str) {
        self.results.fill(value);
    }

    pub(crate) fn set_session_text(&mut self, text: String) {
        self.session_text = text;
    }

    pub(crate) fn show_follow_up(&mut self) {
        self.follow_up_visible = true;
    }
}
