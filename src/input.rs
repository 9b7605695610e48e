//! Key bindings: crossterm key events → logical game commands.

use crate::game::{Command, Status};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press: a session command, quit the app, or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Game(Command),
    Quit,
    None,
}

/// Map a key event to an action. Bindings depend on the session status:
/// Up rotates while playing but moves the menu highlight while paused.
/// Supports arrows and vim-style hjkl.
pub fn key_to_action(key: KeyEvent, status: Status) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    let in_menu = matches!(status, Status::Paused | Status::GameOver);
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p') => Action::Game(Command::TogglePause),
        KeyCode::Enter | KeyCode::Char(' ') if in_menu => Action::Game(Command::MenuSelect),
        KeyCode::Up | KeyCode::Char('k') if in_menu => Action::Game(Command::MenuUp),
        KeyCode::Down | KeyCode::Char('j') if in_menu => Action::Game(Command::MenuDown),
        KeyCode::Left | KeyCode::Char('h') => Action::Game(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Action::Game(Command::MoveRight),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('x') | KeyCode::Char(' ') => {
            Action::Game(Command::RotateCw)
        }
        KeyCode::Char('z') => Action::Game(Command::RotateCcw),
        KeyCode::Down | KeyCode::Char('j') => Action::Game(Command::SoftDrop),
        _ => Action::None,
    }
}
