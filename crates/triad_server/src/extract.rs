use scraper::{Html, Selector};

/// Text of every `<p>` element in document order, joined by single spaces.
/// Nested markup contributes its text; pages without paragraphs give "".
pub fn extract_paragraph_text(html: &str) -> String {
    let Ok(selector) = Selector::parse("p") else {
        return String::new();
    };
    let doc = Html::parse_document(html);
    doc.select(&selector)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
