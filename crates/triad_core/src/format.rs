use std::sync::LazyLock;

use regex::Regex;

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("emphasis pattern is valid"));

// A `##` marker takes at most one trailing space with it.
static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## ?").expect("heading pattern is valid"));

/// Turns model output into display HTML: `**x**` becomes `<b>x</b>` and `##`
/// markers collapse to a single space. Emphasis never spans a line break and
/// unpaired markers are left as-is. No escaping is performed.
pub fn format_summary(text: Option<&str>) -> String {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return String::new();
    };
    let emphasized = EMPHASIS.replace_all(text, "<b>${1}</b>");
    HEADING_MARKER.replace_all(&emphasized, " ").into_owned()
}
