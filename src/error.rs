use std::io;

use thiserror::Error;

/// Failures of the terminal front end. The game rules themselves never fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),

    #[error("Terminal is {cols}x{rows} but the board needs at least {need_cols}x{need_rows}")]
    TerminalTooSmall {
        cols: u16,
        rows: u16,
        need_cols: u16,
        need_rows: u16,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
