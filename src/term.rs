use std::fmt;
use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use crossterm::event::{poll, read, Event};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::game::Outcome;
use crate::grid::{Cell, Grid};
use crate::input::{map_key, Input, InputSource};
use crate::render::{score_title, Renderer};
use crate::snake::Snake;

/// How long one frame waits for the first key event.
const FRAME_POLL_MS: u64 = 5;

const SNAKE_BODY_CHAR: char = '█';
const APPLE_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';
const EMPTY_CHAR: char = '·';

/// What one grid cell looks like. Each cell is two terminal columns wide so the
/// board comes out roughly square.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Glyph {
    Empty,
    Food,
    Body,
    Head(char),
    Dead,
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Glyph::Empty => write!(f, " {}", EMPTY_CHAR),
            Glyph::Food => write!(f, "{}{}", APPLE_CHAR, APPLE_CHAR),
            Glyph::Body => write!(f, "{}{}", SNAKE_BODY_CHAR, SNAKE_BODY_CHAR),
            Glyph::Head(ch) => write!(f, "{}{}", ch, ch),
            Glyph::Dead => write!(f, "{}{}", DEAD_SNAKE_CHAR, DEAD_SNAKE_CHAR),
        }
    }
}

/// Glyph for every cell of `grid`, row-major: the grid first, food over it, the
/// snake over both with its head last.
pub fn compose_frame(grid: &Grid, snake: &Snake, food: Cell) -> Vec<Glyph> {
    let mut frame = vec![Glyph::Empty; grid.columns() as usize * grid.rows() as usize];

    if let Some(i) = grid.index_of(food) {
        frame[i] = Glyph::Food;
    }

    for (n, cell) in snake.body().iter().enumerate().rev() {
        if let Some(i) = grid.index_of(*cell) {
            frame[i] = if n == 0 { Glyph::Head(snake.head_char()) } else { Glyph::Body };
        }
    }

    frame
}

/// Where the board sits on the terminal. The status line goes right above the top border.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    origin: (u16, u16),
    columns: u16,
    rows: u16,
}

impl BoardLayout {
    /// Centres a `grid` sized board in a `cols` x `rows` terminal.
    pub fn fit(grid: &Grid, cols: u16, rows: u16) -> Result<Self> {
        let (columns, grid_rows) = (grid.columns(), grid.rows());
        let need_cols = columns * 2 + 2;
        let need_rows = grid_rows + 3;

        if cols < need_cols || rows < need_rows {
            return Err(Error::TerminalTooSmall { cols, rows, need_cols, need_rows });
        }

        let origin = ((cols - need_cols) / 2, (rows - need_rows) / 2 + 1);
        Ok(BoardLayout { origin, columns, rows: grid_rows })
    }

    pub fn cells(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Terminal position of the cell with row-major index `i`.
    pub fn cell_position(&self, i: usize) -> (u16, u16) {
        let col = (i % self.columns as usize) as u16;
        let row = (i / self.columns as usize) as u16;
        (self.origin.0 + 1 + col * 2, self.origin.1 + 1 + row)
    }

    fn inner_width(&self) -> u16 {
        self.columns * 2
    }
}

pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    grid: Grid,
    layout: BoardLayout,
    frame: Vec<Option<Glyph>>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: (u16, u16),
    width: u16,
    height: u16,
}

impl TermManager {
    pub fn new(grid: &Grid) -> Result<Self> {
        let (width, height) = terminal::size()?;
        let layout = BoardLayout::fit(grid, width, height)?;

        Ok(TermManager {
            width,
            height,
            stdout: stdout(),
            grid: *grid,
            layout,
            frame: vec![None; layout.cells()],
            current_msg: None,
        })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Wipes the screen and draws an empty frame around the board.
    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.frame = vec![None; self.layout.cells()];
        self.current_msg = None;
        self.draw_borders()
    }

    /// Shows the controls and waits for a key.
    pub fn show_intro(&mut self) -> Result<Input> {
        self.clear()?;
        self.show_message(&[
            "Arrow keys or WASD to move",
            "Esc or Q to quit",
            "",
            "Press any key to begin",
        ])?;

        let input = self.wait_input()?;
        self.hide_message()?;
        Ok(input)
    }

    pub fn show_outcome(&mut self, snake: &Snake, outcome: &Outcome) -> Result<()> {
        let (title, score) = match outcome {
            Outcome::Lost { score, .. } => {
                self.mark_dead(snake)?;
                ("Game over!", *score)
            }
            Outcome::Won { length } => ("You won!", *length),
            Outcome::Quit { score } => ("Bye!", *score),
        };

        self.show_message(&[
            title,
            &*format!("Score: {}", score),
            "",
            "Press any key to play again,",
            "or Esc to quit.",
        ])
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.current_msg.is_some() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        let blank = " ".repeat(msg_width as usize);
        queue!(self.stdout, cursor::MoveTo(top_left.0, top_left.1), style::Print(&blank))?;
        queue!(
            self.stdout,
            cursor::MoveTo(top_left.0, top_left.1 + msg_height - 1),
            style::Print(&blank)
        )?;

        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), style::Print(padded))?;
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    /// Removes the message box. The cells it covered are repainted on the next draw.
    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        let blank = " ".repeat(msg.width as usize);
        for y in msg.top_left.1..msg.top_left.1 + msg.height {
            queue!(self.stdout, cursor::MoveTo(msg.top_left.0, y), style::Print(&blank))?;
        }

        for slot in self.frame.iter_mut() {
            *slot = None;
        }
        self.draw_borders()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn mark_dead(&mut self, snake: &Snake) -> Result<()> {
        let dead: Vec<usize> = snake.body().iter().filter_map(|c| self.grid.index_of(*c)).collect();
        for i in dead {
            self.paint_cell(i, Glyph::Dead)?;
        }
        self.flush()
    }

    fn draw_borders(&mut self) -> Result<()> {
        let (x0, y0) = self.layout.origin;
        let end_x = x0 + self.layout.inner_width() + 1;
        let end_y = y0 + self.layout.rows + 1;

        let horizontal = format!("+{}+", "-".repeat(self.layout.inner_width() as usize));
        queue!(self.stdout, cursor::MoveTo(x0, y0), style::Print(&horizontal))?;
        queue!(self.stdout, cursor::MoveTo(x0, end_y), style::Print(&horizontal))?;

        for y in y0 + 1..end_y {
            queue!(self.stdout, cursor::MoveTo(x0, y), style::Print('|'))?;
            queue!(self.stdout, cursor::MoveTo(end_x, y), style::Print('|'))?;
        }

        self.flush()
    }

    fn paint_cell(&mut self, i: usize, glyph: Glyph) -> Result<()> {
        if i >= self.frame.len() || self.frame[i] == Some(glyph) {
            return Ok(());
        }

        let (x, y) = self.layout.cell_position(i);
        queue!(self.stdout, cursor::MoveTo(x, y), style::Print(glyph))?;
        self.frame[i] = Some(glyph);
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        match BoardLayout::fit(&self.grid, width, height) {
            Ok(layout) => {
                debug!(width, height, "terminal resized");
                self.width = width;
                self.height = height;
                self.layout = layout;
                self.clear()
            }
            Err(err) => {
                warn!(%err, "terminal resized below board size; keeping the old layout");
                Ok(())
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }
}

impl Renderer for TermManager {
    fn draw(&mut self, grid: &Grid, snake: &Snake, food: Cell) -> Result<()> {
        for (i, glyph) in compose_frame(grid, snake, food).into_iter().enumerate() {
            self.paint_cell(i, glyph)?;
        }
        self.flush()
    }

    fn show_score(&mut self, score: usize) -> Result<()> {
        let title = score_title(score);
        let (x0, y0) = self.layout.origin;
        let status = format!("{:<width$}", title, width = self.layout.inner_width() as usize + 2);

        queue!(
            self.stdout,
            terminal::SetTitle(title.as_str()),
            cursor::MoveTo(x0, y0 - 1),
            style::Print(status)
        )?;
        self.flush()
    }
}

impl InputSource for TermManager {
    fn poll_inputs(&mut self) -> Result<Vec<Input>> {
        let mut inputs = vec![];
        let mut wait = Duration::from_millis(FRAME_POLL_MS);

        while poll(wait)? {
            match read()? {
                Event::Key(ev) => inputs.push(map_key(&ev)),
                Event::Resize(w, h) => self.resize(w, h)?,
                _ => {}
            }
            wait = Duration::from_millis(0);
        }

        Ok(inputs)
    }

    fn wait_input(&mut self) -> Result<Input> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(map_key(&ev));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction;

    #[test]
    fn test_layout_fits_default_board() {
        let grid = Grid::default();
        let layout = BoardLayout::fit(&grid, 80, 24).unwrap();

        assert_eq!(layout.cells(), 600);
        // 62 columns wide centred in 80, status line on row 0, border on row 1.
        assert_eq!(layout.origin, (9, 1));
        assert_eq!(layout.cell_position(0), (10, 2));
        assert_eq!(layout.cell_position(31), (12, 3));
    }

    #[test]
    fn test_layout_rejects_small_terminal() {
        let grid = Grid::default();
        let err = BoardLayout::fit(&grid, 60, 24).unwrap_err();
        assert!(matches!(
            err,
            Error::TerminalTooSmall { cols: 60, rows: 24, need_cols: 62, need_rows: 23 }
        ));
    }

    #[test]
    fn test_compose_frame() {
        let grid = Grid::default();
        let snake = Snake::starting(&grid);
        let food = Cell::new(0, 0);
        let frame = compose_frame(&grid, &snake, food);

        assert_eq!(frame.len(), 600);
        assert_eq!(frame[0], Glyph::Food);
        // Head at (600, 400) is column 15, row 10.
        assert_eq!(frame[10 * 30 + 15], Glyph::Head('<'));
        assert_eq!(frame[10 * 30 + 16], Glyph::Body);
        assert_eq!(frame[10 * 30 + 17], Glyph::Body);
        assert_eq!(frame.iter().filter(|g| **g == Glyph::Empty).count(), 596);
    }

    #[test]
    fn test_snake_drawn_over_food() {
        let grid = Grid::default();
        let mut snake = Snake::starting(&grid);
        snake.set_direction(Direction::Up);
        let frame = compose_frame(&grid, &snake, snake.head());

        assert_eq!(frame[10 * 30 + 15], Glyph::Head('^'));
        assert!(!frame.contains(&Glyph::Food));
    }

    #[test]
    fn test_glyph_text() {
        assert_eq!(Glyph::Body.to_string(), "██");
        assert_eq!(Glyph::Head('>').to_string(), ">>");
        assert_eq!(Glyph::Empty.to_string(), " ·");
    }
}
