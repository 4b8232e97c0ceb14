use std::fmt;

/// One of the three summarization services, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Backend {
    #[default]
    Gemini,
    ChatGpt,
    Claude,
}

impl Backend {
    /// All backends in the fixed priority order used when picking the session text.
    pub const ALL: [Backend; 3] = [Backend::Gemini, Backend::ChatGpt, Backend::Claude];

    /// Path segment used on the wire, e.g. `/summarize/chatgpt`.
    pub fn id(self) -> &'static str {
        match self {
            Backend::Gemini => "gemini",
            Backend::ChatGpt => "chatgpt",
            Backend::Claude => "claude",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Backend::Gemini => "Gemini",
            Backend::ChatGpt => "ChatGPT",
            Backend::Claude => "Claude",
        }
    }

    pub fn from_id(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|backend| backend.id().eq_ignore_ascii_case(raw))
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Backend::Gemini => 0,
            Backend::ChatGpt => 1,
            Backend::Claude => 2,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Which input section is active on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Url,
    Text,
}

/// Article payload for a single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleSource {
    Url(String),
    RawText(String),
}

impl ArticleSource {
    pub fn mode(&self) -> InputMode {
        match self {
            ArticleSource::Url(_) => InputMode::Url,
            ArticleSource::RawText(_) => InputMode::Text,
        }
    }

    pub fn payload(&self) -> &str {
        match self {
            ArticleSource::Url(url) => url,
            ArticleSource::RawText(text) => text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.payload().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_and_ignore_case() {
        for backend in Backend::ALL {
            assert_eq!(Backend::from_id(backend.id()), Some(backend));
        }
        assert_eq!(Backend::from_id(" ChatGPT "), Some(Backend::ChatGpt));
        assert_eq!(Backend::from_id("mistral"), None);
    }

    #[test]
    fn priority_order_matches_index() {
        let indices: Vec<_> = Backend::ALL.iter().map(|b| b.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
