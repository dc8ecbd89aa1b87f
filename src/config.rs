//! Build-time game constants. There is no runtime gameplay configuration.

use std::time::Duration;

pub const SCREEN_WIDTH_PX: u16 = 1200;
pub const SCREEN_HEIGHT_PX: u16 = 800;
pub const CELL_SIZE_PX: u16 = 40;

pub const INIT_SNAKE_LENGTH: usize = 3;
/// Capacity of the body buffers. Reaching it wins the game.
pub const MAX_SNAKE_LENGTH: usize = 20;

/// The snake advances once the time since the last advance exceeds this.
pub const TICK_RATE: Duration = Duration::from_millis(75);

pub const DEFAULT_LOG_FILE: &str = "gridsnake.log";
