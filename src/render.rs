use crate::error::Result;
use crate::grid::{Cell, Grid};
use crate::snake::Snake;

/// Read-only view of the game. Implementations draw a snapshot and never touch state.
pub trait Renderer {
    /// Draws the grid, then the food, then every body cell on top.
    fn draw(&mut self, grid: &Grid, snake: &Snake, food: Cell) -> Result<()>;

    fn show_score(&mut self, score: usize) -> Result<()>;
}

pub fn score_title(score: usize) -> String {
    format!("Snake! Score: {}", score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_title() {
        assert_eq!(score_title(3), "Snake! Score: 3");
    }
}
