use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::Result;
use crate::snake::Direction::{self, *};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Input {
    Turn(Direction),
    Quit,
    Other,
}

/// Source of player intent.
pub trait InputSource {
    /// Everything that arrived since the last call. Blocks for at most one frame.
    fn poll_inputs(&mut self) -> Result<Vec<Input>>;

    /// Blocks until a key is pressed.
    fn wait_input(&mut self) -> Result<Input>;
}

pub fn map_key(ev: &KeyEvent) -> Input {
    if is_ctrl_c(ev) {
        return Input::Quit;
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Input::Turn(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Input::Turn(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Input::Turn(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Input::Turn(Right),
        KeyCode::Esc | KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Input::Quit
        }
        _ => Input::Other,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers } if modifiers.contains(KeyModifiers::CONTROL))
}
