use triad_core::{AppViewModel, Backend, InputMode, Msg};

pub const HELP: &str = "\
Commands:
  mode url|text        switch the article input
  url <URL>            set the article URL
  text <TEXT>          append a line to the pasted article
  clear-text           empty the pasted article
  prompt <TEXT>        custom instruction for the next submit (empty resets)
  submit               summarize with all three models
  refine <TEXT>        follow-up instruction on the last article
  tab gemini|chatgpt|claude
  show                 redraw the screen
  help                 this text
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mode(InputMode),
    Url(String),
    Text(String),
    ClearText,
    Prompt(String),
    Submit,
    Refine(String),
    Tab(Backend),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("unknown input mode '{0}', expected url or text")]
    InvalidMode(String),
    #[error("unknown model '{0}', expected gemini, chatgpt or claude")]
    InvalidBackend(String),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(None);
    }
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };
    // Arguments keep their inner spacing; only the separator is dropped.
    let arg = rest.strip_prefix(' ').unwrap_or(rest);

    let command = match word.to_ascii_lowercase().as_str() {
        "mode" => match arg.trim().to_ascii_lowercase().as_str() {
            "url" => Command::Mode(InputMode::Url),
            "text" => Command::Mode(InputMode::Text),
            "" => return Err(CommandError::MissingArgument("mode")),
            other => return Err(CommandError::InvalidMode(other.to_string())),
        },
        "url" => Command::Url(arg.trim().to_string()),
        "text" => Command::Text(arg.to_string()),
        "clear-text" => Command::ClearText,
        "prompt" => Command::Prompt(arg.to_string()),
        "submit" => Command::Submit,
        "refine" => Command::Refine(arg.to_string()),
        "tab" => {
            let name = arg.trim();
            if name.is_empty() {
                return Err(CommandError::MissingArgument("tab"));
            }
            Command::Tab(
                Backend::from_id(name).ok_or_else(|| CommandError::InvalidBackend(name.into()))?,
            )
        }
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Messages a command feeds into the state machine; terminal-only commands map to none.
pub fn to_msgs(command: Command, view: &AppViewModel) -> Vec<Msg> {
    match command {
        Command::Mode(mode) => vec![Msg::InputModeSelected(mode)],
        Command::Url(url) => vec![Msg::UrlInputChanged(url)],
        Command::Text(line) => {
            let text = if view.text_input.is_empty() {
                line
            } else {
                format!("{}\n{}", view.text_input, line)
            };
            vec![Msg::TextInputChanged(text)]
        }
        Command::ClearText => vec![Msg::TextInputChanged(String::new())],
        Command::Prompt(prompt) => vec![Msg::PromptInputChanged(prompt)],
        Command::Submit => vec![Msg::NoticeDismissed, Msg::SubmitClicked],
        Command::Refine(prompt) => vec![
            Msg::NoticeDismissed,
            Msg::FollowUpInputChanged(prompt),
            Msg::RefineClicked,
        ],
        Command::Tab(backend) => vec![Msg::TabSelected(backend)],
        Command::Show | Command::Help | Command::Quit => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use triad_core::AppState;

    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            parse_command("url https://example.com/a \n"),
            Ok(Some(Command::Url("https://example.com/a".into())))
        );
        assert_eq!(
            parse_command("mode TEXT"),
            Ok(Some(Command::Mode(InputMode::Text)))
        );
        assert_eq!(
            parse_command("tab ChatGPT"),
            Ok(Some(Command::Tab(Backend::ChatGpt)))
        );
        assert_eq!(
            parse_command("refine Make it  shorter"),
            Ok(Some(Command::Refine("Make it  shorter".into())))
        );
    }

    #[test]
    fn bare_refine_is_an_empty_instruction() {
        assert_eq!(parse_command("refine"), Ok(Some(Command::Refine(String::new()))));
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_command("   \r\n"), Ok(None));
    }

    #[test]
    fn errors_name_the_problem() {
        assert_eq!(
            parse_command("fetch x"),
            Err(CommandError::Unknown("fetch".into()))
        );
        assert_eq!(
            parse_command("tab llama"),
            Err(CommandError::InvalidBackend("llama".into()))
        );
        assert_eq!(parse_command("mode"), Err(CommandError::MissingArgument("mode")));
    }

    #[test]
    fn text_lines_accumulate() {
        let mut view = AppState::new().view();
        let msgs = to_msgs(Command::Text("first".into()), &view);
        assert_eq!(msgs, vec![Msg::TextInputChanged("first".into())]);

        view.text_input = "first".into();
        let msgs = to_msgs(Command::Text("second".into()), &view);
        assert_eq!(msgs, vec![Msg::TextInputChanged("first\nsecond".into())]);
    }

    #[test]
    fn refine_sets_instruction_then_clicks() {
        let view = AppState::new().view();
        assert_eq!(
            to_msgs(Command::Refine("Shorter".into()), &view),
            vec![
                Msg::NoticeDismissed,
                Msg::FollowUpInputChanged("Shorter".into()),
                Msg::RefineClicked
            ]
        );
    }
}
