use std::fmt;

use rand::Rng;

use crate::config::{INIT_SNAKE_LENGTH, MAX_SNAKE_LENGTH};
use crate::grid::{Cell, Grid};
use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// Pixel delta of one step, moving a full cell along a single axis.
    pub fn delta(self, cell_size: u16) -> (i16, i16) {
        let step = cell_size as i16;
        match self {
            Up => (0, -step),
            Down => (0, step),
            Left => (-step, 0),
            Right => (step, 0),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfCollision,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collision::Wall => f.write_str("hit the wall"),
            Collision::SelfCollision => f.write_str("ran into itself"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Advance {
    Continue,
    GameOver(Collision),
}

/// The snake's body, head first, held in two fixed-capacity buffers.
///
/// `current` is what is on screen. `next` is where every segment goes on the
/// following advance: it is filled at the end of one tick and committed at the
/// start of the next, so the whole body shifts without overwriting a cell that
/// another segment still needs. Collisions are checked against the pending head
/// in `next`, so a turn takes effect one tick after it is requested.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    direction: Direction,
    current: [Cell; MAX_SNAKE_LENGTH],
    next: [Cell; MAX_SNAKE_LENGTH],
    len: usize,
}

impl Snake {
    /// Lays out `length` segments in a straight line trailing behind `head`, with
    /// every segment already pending one step along `direction`.
    pub fn new(head: Cell, direction: Direction, length: usize, grid: &Grid) -> Self {
        let len = length.max(1).min(MAX_SNAKE_LENGTH);
        let (dx, dy) = direction.delta(grid.cell_size());

        let mut current = [Cell::default(); MAX_SNAKE_LENGTH];
        let mut next = [Cell::default(); MAX_SNAKE_LENGTH];

        current[0] = head;
        next[0] = head.offset(dx, dy);
        for i in 1..len {
            current[i] = current[i - 1].offset(-dx, -dy);
            next[i] = current[i - 1];
        }

        Snake { direction, current, next, len }
    }

    /// The snake every session starts with: centred, heading left.
    pub fn starting(grid: &Grid) -> Self {
        Snake::new(grid.center(), Left, INIT_SNAKE_LENGTH, grid)
    }

    pub fn body(&self) -> &[Cell] {
        &self.current[..self.len]
    }

    pub fn head(&self) -> Cell {
        self.current[0]
    }

    /// Where the head lands on the next advance.
    pub fn pending_head(&self) -> Cell {
        self.next[0]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Changes heading unless `new_direction` is a reversal. Returns whether the
    /// heading now equals `new_direction`.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() {
            return false;
        }
        self.direction = new_direction;
        true
    }

    /// Runs one tick: collision checks on the pending head, growth if the head sits
    /// on `food`, then the committed shift and the next pending move along
    /// `direction`.
    ///
    /// Nothing is mutated when a collision is reported. Growth stops at
    /// `MAX_SNAKE_LENGTH`; detecting that length is up to the caller.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        direction: Direction,
        food: &mut Cell,
        grid: &Grid,
        rng: &mut R,
    ) -> Advance {
        let (dx, dy) = direction.delta(grid.cell_size());
        let next_head = self.next[0];

        if !grid.contains(next_head) {
            return Advance::GameOver(Collision::Wall);
        }

        if self.current[1..self.len].contains(&next_head) {
            return Advance::GameOver(Collision::SelfCollision);
        }

        if self.current[0] == *food {
            if self.len < MAX_SNAKE_LENGTH {
                self.len += 1;
                // The new tail stays put for a tick while the rest moves up.
                self.next[self.len - 1] = self.current[self.len - 2];
            }
            *food = grid.place_food(rng);
            tracing::debug!(length = self.len, food = %food, "food eaten");
        }

        let len = self.len;
        self.current[..len].copy_from_slice(&self.next[..len]);

        self.next[0] = self.next[0].offset(dx, dy);
        for i in 1..len {
            self.next[i] = self.current[i - 1];
        }

        Advance::Continue
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }

    #[cfg(test)]
    pub(crate) fn from_buffers(direction: Direction, current: &[Cell], next: &[Cell]) -> Self {
        assert_eq!(current.len(), next.len());
        let mut snake = Snake {
            direction,
            current: [Cell::default(); MAX_SNAKE_LENGTH],
            next: [Cell::default(); MAX_SNAKE_LENGTH],
            len: current.len(),
        };
        snake.current[..current.len()].copy_from_slice(current);
        snake.next[..next.len()].copy_from_slice(next);
        snake
    }
}
