//! Terminal input routing
//!
//! Single-letter commands are reserved and always win, so `v` can end a
//! listening session. Any other line is a transcript while a session is active.

use crate::recognizer::{ConsoleRecognizer, RecognizerEvent};

pub const HELP: &str = "Commands: [v] voice  [r] refresh  [q] quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    ToggleVoice,
    Refresh,
    Quit,
    Voice(Vec<RecognizerEvent>),
    Empty,
    Help,
}

pub fn route_line(line: &str, mic: Option<&ConsoleRecognizer>) -> ConsoleInput {
    match line.trim() {
        "v" => return ConsoleInput::ToggleVoice,
        "r" => return ConsoleInput::Refresh,
        "q" => return ConsoleInput::Quit,
        _ => {}
    }

    if let Some(events) = mic.and_then(|m| m.capture(line)) {
        return ConsoleInput::Voice(events);
    }
    if line.trim().is_empty() {
        ConsoleInput::Empty
    } else {
        ConsoleInput::Help
    }
}
