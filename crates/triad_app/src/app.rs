use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::mpsc;
use std::thread;

use triad_core::{update, AppState, AppViewModel, Msg};
use triad_logging::{triad_info, triad_warn};

use crate::command::{parse_command, to_msgs, Command, HELP};
use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::ui::render::{render, RenderStyle};

/// Everything the main loop reacts to, in arrival order.
pub enum Input {
    Line(String),
    Msg(Msg),
    StdinClosed,
}

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel::<Input>();
    let runner = EffectRunner::new(&config.client, tx.clone())?;
    spawn_stdin_reader(tx);

    let style = RenderStyle {
        ansi: io::stdout().is_terminal(),
    };
    let mut state = AppState::new();
    print_text(HELP)?;
    print_screen(&state.view(), style)?;

    let mut stdin_open = true;
    while let Ok(input) = rx.recv() {
        match input {
            Input::Line(line) => match parse_command(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => break,
                Ok(Some(Command::Help)) => print_text(HELP)?,
                Ok(Some(Command::Show)) => print_screen(&state.view(), style)?,
                Ok(Some(command)) => {
                    for msg in to_msgs(command, &state.view()) {
                        state = dispatch(state, msg, &runner);
                    }
                }
                Err(err) => print_text(&format!("error: {err}"))?,
            },
            Input::Msg(msg) => state = dispatch(state, msg, &runner),
            Input::StdinClosed => stdin_open = false,
        }

        if state.consume_dirty() {
            print_screen(&state.view(), style)?;
        }
        // Piped input: stay until the last operation has settled.
        if !stdin_open && !state.is_loading() {
            break;
        }
    }

    triad_info!("session finished");
    Ok(())
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (state, effects) = update(state, msg);
    runner.run(effects);
    state
}

fn spawn_stdin_reader(tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Input::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    triad_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(Input::StdinClosed);
    });
}

fn print_screen(view: &AppViewModel, style: RenderStyle) -> io::Result<()> {
    print_text(&render(view, style))
}

fn print_text(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}")?;
    stdout.flush()
}
