//! Key bindings: arrows and vim-style letters.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use voxtris::{Axis, Direction};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Rotate(Axis),
    /// Throw away the current piece and deal the next one.
    Skip,
    Restart,
    Quit,
    None,
}

/// Map key event to game action.
///
/// Forward (-z) is "up" on screen, so Up/k move forward and Down/j move backward.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Left | KeyCode::Char('h') => Action::Move(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => Action::Move(Direction::Right),
        KeyCode::Up | KeyCode::Char('k') => Action::Move(Direction::Forward),
        KeyCode::Down | KeyCode::Char('j') => Action::Move(Direction::Backward),
        KeyCode::Char(' ') | KeyCode::Enter => Action::Move(Direction::Down),
        KeyCode::Char('x' | 'X') => Action::Rotate(Axis::X),
        KeyCode::Char('y' | 'Y') => Action::Rotate(Axis::Y),
        KeyCode::Char('z' | 'Z') => Action::Rotate(Axis::Z),
        KeyCode::Char('n') => Action::Skip,
        KeyCode::Char('r' | 'R') => Action::Restart,
        _ => Action::None,
    }
}
