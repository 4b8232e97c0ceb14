use std::fmt::Write;

use triad_core::{AppViewModel, InputMode};

const BOLD_ON: &str = "\x1b[1m";
const BOLD_OFF: &str = "\x1b[22m";

/// Styling options for [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    /// Emit ANSI bold for `<b>` spans; otherwise the tags are dropped.
    pub ansi: bool,
}

pub fn render(view: &AppViewModel, style: RenderStyle) -> String {
    let mut out = String::new();
    let mode = match view.input_mode {
        InputMode::Url => "[url] text",
        InputMode::Text => "url [text]",
    };
    let _ = writeln!(out, "Input: {mode}");
    if view.url_section_visible {
        let _ = writeln!(out, "  URL: {}", or_dash(&view.url_input));
    }
    if view.text_section_visible {
        let lines = view.text_input.lines().count();
        let chars = view.text_input.chars().count();
        let _ = writeln!(out, "  Text: {lines} line(s), {chars} char(s)");
    }
    let prompt = if view.prompt_input.is_empty() {
        "(default)"
    } else {
        view.prompt_input.as_str()
    };
    let _ = writeln!(out, "  Prompt: {prompt}");

    if view.loading {
        let _ = writeln!(out, "Loading...");
    }
    if let Some(notice) = view.notice {
        let _ = writeln!(out, "! {}", notice.message());
    }

    let tabs = view
        .panels
        .iter()
        .map(|panel| {
            if panel.selector_active {
                format!("[{}]", panel.label)
            } else {
                panel.label.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "Tabs: {tabs}");

    for panel in view.visible_panels() {
        let _ = writeln!(out, "--- {} ---", panel.label);
        let _ = writeln!(out, "{}", html_to_terminal(&panel.html, style));
    }

    if view.follow_up_visible {
        let _ = writeln!(
            out,
            "Follow-up available on {} char(s) of article text: refine <instruction>",
            view.session_text_chars
        );
    }
    out
}

/// Maps the formatter's `<b>` spans onto the terminal.
pub fn html_to_terminal(html: &str, style: RenderStyle) -> String {
    let (on, off) = if style.ansi {
        (BOLD_ON, BOLD_OFF)
    } else {
        ("", "")
    };
    html.replace("<b>", on).replace("</b>", off)
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
