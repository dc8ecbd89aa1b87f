use std::fmt;

use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::clock::{Clock, TickTimer};
use crate::config::{MAX_SNAKE_LENGTH, TICK_RATE};
use crate::error::Result;
use crate::grid::{Cell, Grid};
use crate::input::{Input, InputSource};
use crate::render::Renderer;
use crate::snake::{Advance, Collision, Direction, Snake};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameState {
    Running,
    GameOver(Collision),
    Won,
}

/// How a session ended, as reported to the player.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Lost { score: usize, cause: Collision },
    Won { length: usize },
    Quit { score: usize },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Lost { score, cause } => write!(f, "You lose! Score: {} (the snake {})", score, cause),
            Outcome::Won { length } => write!(f, "You win! You reached the score of {}!", length),
            Outcome::Quit { score } => write!(f, "Quit with a score of {}", score),
        }
    }
}

/// One game from the starting snake to a terminal state.
pub struct Session {
    grid: Grid,
    snake: Snake,
    food: Cell,
    state: GameState,
    rng: StdRng,
}

impl Session {
    pub fn new(grid: Grid, mut rng: StdRng) -> Self {
        let snake = Snake::starting(&grid);
        let food = grid.place_food(&mut rng);
        Session { grid, snake, food, state: GameState::Running, rng }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> usize {
        self.snake.len()
    }

    /// Requests a new heading. Reversals are refused.
    pub fn steer(&mut self, direction: Direction) -> bool {
        let accepted = self.snake.set_direction(direction);
        if !accepted {
            debug!(?direction, current = ?self.snake.direction(), "reversal rejected");
        }
        accepted
    }

    /// Advances the snake once. Terminal states are final and further calls are no-ops.
    pub fn tick(&mut self) -> GameState {
        if self.state != GameState::Running {
            return self.state;
        }

        let direction = self.snake.direction();
        self.state = match self.snake.advance(direction, &mut self.food, &self.grid, &mut self.rng) {
            Advance::GameOver(cause) => GameState::GameOver(cause),
            Advance::Continue if self.snake.len() >= MAX_SNAKE_LENGTH => GameState::Won,
            Advance::Continue => GameState::Running,
        };

        self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            GameState::Running => None,
            GameState::GameOver(cause) => Some(Outcome::Lost { score: self.score(), cause }),
            GameState::Won => Some(Outcome::Won { length: self.score() }),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, food: Cell) {
        self.food = food;
    }
}

/// Drives a session frame by frame until it ends or the player quits.
///
/// Every frame drains input, draws a snapshot, and advances the snake only when
/// the tick timer fires, so the draw rate is independent of the game speed.
pub fn run_session<C, T>(session: &mut Session, clock: &C, io: &mut T) -> Result<Outcome>
where
    C: Clock,
    T: InputSource + Renderer,
{
    info!(food = %session.food(), "session started");

    let mut timer = TickTimer::new(TICK_RATE, clock.now());
    let mut shown_score = session.score();
    io.show_score(shown_score)?;

    loop {
        for input in io.poll_inputs()? {
            match input {
                Input::Quit => {
                    let outcome = Outcome::Quit { score: session.score() };
                    info!(%outcome, "session ended");
                    return Ok(outcome);
                }
                Input::Turn(direction) => {
                    session.steer(direction);
                }
                Input::Other => {}
            }
        }

        io.draw(session.grid(), session.snake(), session.food())?;

        if !timer.ready(clock.now()) {
            continue;
        }

        session.tick();

        if session.score() != shown_score {
            shown_score = session.score();
            io.show_score(shown_score)?;
        }

        if let Some(outcome) = session.outcome() {
            io.draw(session.grid(), session.snake(), session.food())?;
            info!(%outcome, "session ended");
            return Ok(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;
    use rand::SeedableRng;
    use std::cell::Cell as StdCell;
    use std::collections::VecDeque;
    use std::time::Duration;

    fn session(seed: u64) -> Session {
        Session::new(Grid::default(), StdRng::seed_from_u64(seed))
    }

    /// Each reading is a full tick later than the previous one.
    struct SteppingClock {
        now: StdCell<Duration>,
    }

    impl SteppingClock {
        fn new() -> Self {
            SteppingClock { now: StdCell::new(Duration::from_millis(0)) }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> Duration {
            let now = self.now.get() + TICK_RATE + Duration::from_millis(1);
            self.now.set(now);
            now
        }
    }

    #[derive(Default)]
    struct ScriptedTerm {
        frames: VecDeque<Vec<Input>>,
        draws: usize,
        scores: Vec<usize>,
    }

    impl InputSource for ScriptedTerm {
        fn poll_inputs(&mut self) -> Result<Vec<Input>> {
            Ok(self.frames.pop_front().unwrap_or_default())
        }

        fn wait_input(&mut self) -> Result<Input> {
            Ok(Input::Other)
        }
    }

    impl Renderer for ScriptedTerm {
        fn draw(&mut self, _grid: &Grid, snake: &Snake, _food: Cell) -> Result<()> {
            assert!(snake.body().iter().all(|c| Grid::default().contains(*c)));
            self.draws += 1;
            Ok(())
        }

        fn show_score(&mut self, score: usize) -> Result<()> {
            self.scores.push(score);
            Ok(())
        }
    }

    #[test]
    fn test_new_session() {
        let session = session(1);
        assert_eq!(session.state(), GameState::Running);
        assert_eq!(session.score(), 3);
        assert_eq!(session.snake().head(), Cell::new(600, 400));
        assert!(session.grid().contains(session.food()));
        assert_eq!(session.outcome(), None);
    }

    #[test]
    fn test_steer_rejects_reversal() {
        let mut session = session(1);
        assert!(!session.steer(Right));
        assert_eq!(session.snake().direction(), Left);
        assert!(session.steer(Down));
        assert_eq!(session.snake().direction(), Down);
    }

    #[test]
    fn test_runs_into_left_wall() {
        let mut session = session(1);
        session.set_food(Cell::new(0, 0));

        // 15 cells to the edge, one more tick to notice the pending head is off grid.
        for _ in 0..15 {
            assert_eq!(session.tick(), GameState::Running);
        }
        assert_eq!(session.snake().head(), Cell::new(0, 400));
        assert_eq!(session.tick(), GameState::GameOver(Collision::Wall));
        assert_eq!(
            session.outcome(),
            Some(Outcome::Lost { score: 3, cause: Collision::Wall })
        );

        // Terminal state is sticky.
        let head = session.snake().head();
        assert_eq!(session.tick(), GameState::GameOver(Collision::Wall));
        assert_eq!(session.snake().head(), head);
    }

    #[test]
    fn test_eating_grows_snake() {
        let mut session = session(4);
        session.set_food(session.snake().head());

        assert_eq!(session.tick(), GameState::Running);
        assert_eq!(session.score(), 4);
    }

    #[test]
    fn test_reaching_max_length_wins() {
        let mut session = session(8);
        session.steer(Up);

        while session.score() < MAX_SNAKE_LENGTH {
            assert_eq!(session.state(), GameState::Running);
            session.set_food(session.snake().head());
            // Walk in a loop around the board interior so the snake never hits a wall.
            let head = session.snake().pending_head();
            if head.y <= 80 && session.snake().direction() == Up {
                session.steer(Left);
            } else if head.x <= 80 && session.snake().direction() == Left {
                session.steer(Down);
            } else if head.y >= 680 && session.snake().direction() == Down {
                session.steer(Right);
            } else if head.x >= 1080 && session.snake().direction() == Right {
                session.steer(Up);
            }
            session.tick();
        }

        assert_eq!(session.state(), GameState::Won);
        assert_eq!(session.outcome(), Some(Outcome::Won { length: MAX_SNAKE_LENGTH }));
    }

    #[test]
    fn test_run_session_until_wall() {
        let mut session = session(11);
        let clock = SteppingClock::new();
        let mut term = ScriptedTerm::default();

        let outcome = run_session(&mut session, &clock, &mut term).unwrap();

        assert!(matches!(outcome, Outcome::Lost { cause: Collision::Wall, .. }));
        assert!(term.draws > 15);
        assert_eq!(term.scores.first(), Some(&3));
    }

    #[test]
    fn test_run_session_quit() {
        let mut session = session(2);
        session.set_food(Cell::new(0, 0));
        let clock = SteppingClock::new();
        let mut term = ScriptedTerm::default();
        term.frames.push_back(vec![Input::Turn(Right), Input::Other]);
        term.frames.push_back(vec![Input::Quit]);

        let outcome = run_session(&mut session, &clock, &mut term).unwrap();

        assert_eq!(outcome, Outcome::Quit { score: 3 });
        assert_eq!(session.snake().direction(), Left);
        assert_eq!(session.state(), GameState::Running);
    }

    #[test]
    fn test_run_session_turn_into_wall() {
        let mut session = session(3);
        let clock = SteppingClock::new();
        let mut term = ScriptedTerm::default();
        term.frames.push_back(vec![Input::Turn(Up)]);

        let outcome = run_session(&mut session, &clock, &mut term).unwrap();

        assert!(matches!(outcome, Outcome::Lost { cause: Collision::Wall, .. }));
        assert_eq!(session.snake().head().x, 560);
        assert_eq!(session.snake().head().y, 0);
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            Outcome::Lost { score: 7, cause: Collision::Wall }.to_string(),
            "You lose! Score: 7 (the snake hit the wall)"
        );
        assert_eq!(
            Outcome::Won { length: 20 }.to_string(),
            "You win! You reached the score of 20!"
        );
    }
}
