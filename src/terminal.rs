//! Line-oriented terminal front end.
//!
//! Plays the form, renderer and title-setter roles around the timer: reads
//! commands from stdin, prints the countdown, and sets the terminal window
//! title to `MM:SS` while a cycle is active.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc::UnboundedReceiver,
};

use crate::{
    error::CycleError,
    models::{Cycle, CycleStatus},
    timer::{commands, TimerEvent, TimerSnapshot},
    validation::CycleForm,
    AppState,
};

const IDLE_TITLE: &str = "focus-cycle";

const HELP: &str = "\
commands:
  start <minutes> <task>   start a cycle (minutes may be omitted)
  stop                     interrupt the active cycle
  status                   show the countdown
  history                  list every cycle of this session
  suggest [task]           list task suggestions, or remember a new one
  help                     show this message
  quit                     leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start(CycleForm),
    Stop,
    Status,
    History,
    Suggest(Option<String>),
    Help,
    Quit,
}

/// Parses one input line. `None` for blank lines.
pub fn parse_command(line: &str, default_minutes: u32) -> Option<Result<Command, String>> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => return None,
        "start" => Command::Start(parse_start(rest, default_minutes)),
        "stop" | "interrupt" => Command::Stop,
        "status" => Command::Status,
        "history" => Command::History,
        "suggest" => Command::Suggest((!rest.is_empty()).then(|| rest.to_string())),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Some(Err(format!("unknown command: {other} (try `help`)"))),
    };
    Some(Ok(command))
}

fn parse_start(args: &str, default_minutes: u32) -> CycleForm {
    let (first, rest) = match args.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (args, ""),
    };

    match first.parse::<i64>() {
        Ok(minutes_amount) => CycleForm {
            task: rest.to_string(),
            minutes_amount,
        },
        Err(_) => CycleForm {
            task: args.to_string(),
            minutes_amount: i64::from(default_minutes),
        },
    }
}

pub fn render_history(cycles: &[Cycle]) -> String {
    if cycles.is_empty() {
        return "no cycles yet".to_string();
    }

    cycles
        .iter()
        .enumerate()
        .map(|(index, cycle)| {
            let ended = match cycle.status() {
                CycleStatus::Active => String::new(),
                CycleStatus::Interrupted => cycle
                    .interrupted_at
                    .map(|at| format!(" at {}", at.format("%H:%M:%S")))
                    .unwrap_or_default(),
                CycleStatus::Finished => cycle
                    .finished_at
                    .map(|at| format!(" at {}", at.format("%H:%M:%S")))
                    .unwrap_or_default(),
            };
            format!(
                "{:>3}. {} ({} min) started {} - {}{}",
                index + 1,
                cycle.task,
                cycle.minutes_amount,
                cycle.started_at.format("%H:%M:%S"),
                cycle.status().as_str(),
                ended
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_snapshot(snapshot: &TimerSnapshot) -> String {
    match &snapshot.active_cycle {
        Some(cycle) => format!("{}  {}", snapshot.display.clock(), cycle.task),
        None => format!("{}  idle", snapshot.display.clock()),
    }
}

fn render_error(err: &CycleError) -> String {
    match err {
        CycleError::Validation(fields) => {
            let mut lines = Vec::new();
            if let Some(message) = &fields.task {
                lines.push(format!("task: {message}"));
            }
            if let Some(message) = &fields.minutes_amount {
                lines.push(format!("minutes: {message}"));
            }
            lines.join("\n")
        }
        CycleError::CycleAlreadyActive => {
            "a cycle is already running; `stop` it first".to_string()
        }
    }
}

struct Screen {
    set_title: bool,
}

impl Screen {
    fn title(&self, title: &str) {
        if self.set_title {
            print!("\x1b]0;{title}\x07");
        }
    }

    fn line(&self, text: &str) {
        println!("\r{text}");
    }

    fn countdown(&self, clock: &str) {
        print!("\r{clock} ");
        let _ = std::io::stdout().flush();
    }

    fn handle_event(&self, event: &TimerEvent) {
        match event {
            TimerEvent::Tick(display) => {
                if let Some(title) = display.title() {
                    self.title(&title);
                }
                self.countdown(&display.clock());
            }
            TimerEvent::StateChanged(snapshot) => match snapshot.display.title() {
                Some(title) => self.title(&title),
                None => self.title(IDLE_TITLE),
            },
            TimerEvent::CycleFinished(cycle) => {
                self.line(&format!("finished: {} ({} min)", cycle.task, cycle.minutes_amount));
            }
            TimerEvent::CycleInterrupted(cycle) => {
                self.line(&format!("interrupted: {}", cycle.task));
            }
        }
    }
}

/// Drives the terminal until `quit` or end of input. Interrupts any active
/// cycle on the way out.
pub async fn run_terminal(
    state: &AppState,
    mut events: UnboundedReceiver<TimerEvent>,
) -> Result<()> {
    let settings = state.settings.settings();
    let screen = Screen {
        set_title: settings.set_terminal_title,
    };

    screen.title(IDLE_TITLE);
    screen.line(HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(event) = events.recv() => screen.handle_event(&event),
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                let command = match parse_command(&line, settings.default_minutes_amount) {
                    None => continue,
                    Some(Err(message)) => {
                        screen.line(&message);
                        continue;
                    }
                    Some(Ok(command)) => command,
                };

                match command {
                    Command::Start(form) => match commands::submit(state, form).await {
                        Ok(snapshot) => screen.line(&format!("started: {}", render_snapshot(&snapshot))),
                        Err(err) => screen.line(&render_error(&err)),
                    },
                    Command::Stop => {
                        if commands::interrupt(state).await.is_none() {
                            screen.line("no active cycle");
                        }
                    }
                    Command::Status => {
                        let snapshot = commands::get_timer_state(state).await;
                        screen.line(&render_snapshot(&snapshot));
                    }
                    Command::History => {
                        screen.line(&render_history(&commands::list_cycles(state).await));
                    }
                    Command::Suggest(None) => {
                        screen.line(&commands::task_suggestions(state).join("\n"));
                    }
                    Command::Suggest(Some(task)) => match commands::add_task_suggestion(state, &task) {
                        Ok(suggestions) => screen.line(&suggestions.join("\n")),
                        Err(message) => screen.line(&message),
                    },
                    Command::Help => screen.line(HELP),
                    Command::Quit => break,
                }
            }
        }
    }

    commands::interrupt(state).await;
    screen.title(IDLE_TITLE);
    Ok(())
}
