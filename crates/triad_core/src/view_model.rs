use crate::{Backend, InputMode, ValidationNotice};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input_mode: InputMode,
    pub url_section_visible: bool,
    pub text_section_visible: bool,
    pub url_input: String,
    pub text_input: String,
    pub prompt_input: String,
    pub follow_up_input: String,
    pub loading: bool,
    pub notice: Option<ValidationNotice>,
    pub follow_up_visible: bool,
    pub active_tab: Backend,
    pub panels: Vec<PanelView>,
    pub session_text_chars: usize,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn panel(&self, backend: Backend) -> Option<&PanelView> {
        self.panels.iter().find(|panel| panel.backend == backend)
    }

    pub fn visible_panels(&self) -> impl Iterator<Item = &PanelView> {
        self.panels.iter().filter(|panel| panel.visible)
    }
}

/// One result panel together with its tab selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub backend: Backend,
    pub label: &'static str,
    pub selector_active: bool,
    pub visible: bool,
    /// Raw display string as stored in the slot.
    pub text: String,
    /// `text` after [`crate::format_summary`].
    pub html: String,
}
