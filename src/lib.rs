//! Snake on a fixed grid.
//!
//! The game rules (`grid`, `snake`, `game::Session`) are plain state transitions with
//! no I/O. Time, input and drawing come in through the `clock::Clock`,
//! `input::InputSource` and `render::Renderer` traits; `term` implements the last two
//! on a crossterm terminal.

pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod render;
pub mod snake;
pub mod term;
