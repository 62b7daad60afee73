use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::{ConfigError, GameConfig, GridSize};
use crate::food::spawn_position;
use crate::input::Direction;
use crate::snake::{Position, Snake};

/// Heading every new game starts with.
pub const INITIAL_DIRECTION: Direction = Direction::Right;

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Ready,
    Running,
    GameOver,
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EndReason {
    WallCollision,
    SelfCollision,
    /// The body covers the whole board; nowhere is left to place an item.
    BoardFilled,
}

/// Read-only view of one completed tick, handed to the presentation layer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snapshot {
    pub body: Vec<Position>,
    pub heading: Direction,
    pub food: Position,
    pub score: u32,
    pub status: GameStatus,
    pub end_reason: Option<EndReason>,
    pub tick_count: u64,
    pub bounds: GridSize,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub score: u32,
    pub tick_count: u64,
    pub status: GameStatus,
    pub end_reason: Option<EndReason>,
    config: GameConfig,
    rng: StdRng,
}

impl GameState {
    /// Creates a game seeded from OS entropy.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let snake = initial_snake(&config);
        let food = spawn_position(&mut rng, config.grid, &snake.occupied_cells())
            .map_err(|_| ConfigError::InitialLengthTooLong {
                length: config.initial_length,
                width: config.grid.width,
                height: config.grid.height,
                max: config.max_initial_length(),
            })?;

        info!(
            width = config.grid.width,
            height = config.grid.height,
            length = config.initial_length,
            "new game"
        );

        Ok(Self {
            snake,
            food,
            score: 0,
            tick_count: 0,
            status: GameStatus::Ready,
            end_reason: None,
            config,
            rng,
        })
    }

    /// Advances simulation by one gameplay tick.
    ///
    /// Collisions are checked against the peeked head before anything moves,
    /// so a fatal tick leaves the body exactly as it was.
    pub fn tick(&mut self) -> Snapshot {
        match self.status {
            GameStatus::GameOver => return self.snapshot(),
            GameStatus::Ready => self.status = GameStatus::Running,
            GameStatus::Running => {}
        }

        let next_head = self.snake.next_head_position();
        if !next_head.is_within_bounds(self.config.grid) {
            self.end(EndReason::WallCollision);
            return self.snapshot();
        }

        if self.snake.collides_with_self(next_head) {
            self.end(EndReason::SelfCollision);
            return self.snapshot();
        }

        let eats = next_head == self.food;
        if eats {
            self.snake.grow(self.config.growth_per_item);
        }

        self.snake.advance();
        self.tick_count += 1;

        if eats {
            self.score += self.config.score_per_item;
            debug!(score = self.score, length = self.snake.len(), "item consumed");
            self.respawn_food();
        }

        self.snapshot()
    }

    /// Forwards a direction request; the last request before a tick wins.
    pub fn handle_input(&mut self, direction: Direction) {
        match self.status {
            GameStatus::GameOver => {}
            GameStatus::Ready => {
                self.status = GameStatus::Running;
                self.snake.set_pending_direction(direction);
            }
            GameStatus::Running => self.snake.set_pending_direction(direction),
        }
    }

    /// Rebuilds the whole game from the startup configuration and resumes play.
    pub fn reset(&mut self) -> Snapshot {
        self.snake = initial_snake(&self.config);
        self.score = 0;
        self.tick_count = 0;
        self.end_reason = None;
        self.status = GameStatus::Running;

        match spawn_position(&mut self.rng, self.config.grid, &self.snake.occupied_cells()) {
            Ok(food) => self.food = food,
            // Ruled out by config validation.
            Err(_) => self.end(EndReason::BoardFilled),
        }

        info!("game reset");
        self.snapshot()
    }

    /// Copies out everything the presentation layer draws.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            body: self.snake.segments().copied().collect(),
            heading: self.snake.direction(),
            food: self.food,
            score: self.score,
            status: self.status,
            end_reason: self.end_reason,
            tick_count: self.tick_count,
            bounds: self.config.grid,
        }
    }

    /// Returns the configuration this game was built from.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Returns true once the game has ended and only `reset` can resume it.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    fn respawn_food(&mut self) {
        match spawn_position(&mut self.rng, self.config.grid, &self.snake.occupied_cells()) {
            Ok(food) => {
                debug!(x = food.x, y = food.y, "item placed");
                self.food = food;
            }
            Err(_) => self.end(EndReason::BoardFilled),
        }
    }

    fn end(&mut self, reason: EndReason) {
        self.status = GameStatus::GameOver;
        self.end_reason = Some(reason);
        info!(
            ?reason,
            score = self.score,
            length = self.snake.len(),
            tick = self.tick_count,
            "game over"
        );
    }
}

/// Straight body centred on the grid, head at the centre cell, tail to its left.
fn initial_snake(config: &GameConfig) -> Snake {
    let head = Position {
        x: i32::from(config.grid.width / 2),
        y: i32::from(config.grid.height / 2),
    };

    Snake::with_length(head, INITIAL_DIRECTION, config.initial_length)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::config::{GameConfig, GridSize};
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    use super::{EndReason, GameState, GameStatus};

    fn config(width: u16, height: u16) -> GameConfig {
        GameConfig {
            grid: GridSize { width, height },
            ..GameConfig::default()
        }
    }

    fn cells(raw: &[(i32, i32)]) -> Vec<Position> {
        raw.iter().map(|&(x, y)| Position { x, y }).collect()
    }

    fn body(state: &GameState) -> Vec<Position> {
        state.snake.segments().copied().collect()
    }

    #[test]
    fn new_game_is_centred_and_ready() {
        let state = GameState::new_with_seed(config(10, 10), 1).expect("valid config");

        assert_eq!(state.status, GameStatus::Ready);
        assert_eq!(body(&state), cells(&[(5, 5), (4, 5), (3, 5)]));
        assert_eq!(state.snake.direction(), Direction::Right);
        assert!(!state.snake.occupies(state.food));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let bad = GameConfig {
            initial_length: 0,
            ..config(10, 10)
        };

        assert!(GameState::new_with_seed(bad, 1).is_err());
    }

    #[test]
    fn first_tick_or_input_starts_the_game() {
        let mut ticked = GameState::new_with_seed(config(10, 10), 1).expect("valid config");
        ticked.food = Position { x: 0, y: 0 };
        ticked.tick();
        assert_eq!(ticked.status, GameStatus::Running);

        let mut steered = GameState::new_with_seed(config(10, 10), 1).expect("valid config");
        steered.handle_input(Direction::Up);
        assert_eq!(steered.status, GameStatus::Running);
    }

    #[test]
    fn eating_grows_in_the_same_tick_and_scores() {
        let mut state = GameState::new_with_seed(config(10, 10), 4).expect("valid config");
        state.food = Position { x: 6, y: 5 };

        let snapshot = state.tick();

        assert_eq!(snapshot.body, cells(&[(6, 5), (5, 5), (4, 5), (3, 5)]));
        assert_eq!(snapshot.score, 10);
        assert_ne!(snapshot.food, Position { x: 6, y: 5 });
        assert!(!snapshot.body.contains(&snapshot.food));
    }

    #[test]
    fn larger_growth_per_item_spreads_over_ticks() {
        let grow_three = GameConfig {
            growth_per_item: 3,
            ..config(20, 10)
        };
        let mut state = GameState::new_with_seed(grow_three, 9).expect("valid config");
        state.food = Position { x: 11, y: 5 };

        state.tick();
        assert_eq!(state.snake.len(), 4);
        state.food = Position { x: 0, y: 0 };
        state.tick();
        state.tick();
        state.tick();

        assert_eq!(state.snake.len(), 6);
    }

    #[test]
    fn reversal_request_is_ignored() {
        let mut state = GameState::new_with_seed(config(10, 10), 2).expect("valid config");
        state.food = Position { x: 0, y: 0 };

        state.handle_input(Direction::Left);
        state.tick();

        assert_eq!(state.snake.direction(), Direction::Right);
        assert_eq!(state.snake.head(), Position { x: 6, y: 5 });
    }

    #[test]
    fn last_input_before_tick_wins() {
        let mut once = GameState::new_with_seed(config(10, 10), 5).expect("valid config");
        let mut many = once.clone();
        once.food = Position { x: 0, y: 0 };
        many.food = Position { x: 0, y: 0 };

        once.handle_input(Direction::Down);
        many.handle_input(Direction::Up);
        many.handle_input(Direction::Right);
        many.handle_input(Direction::Down);

        assert_eq!(once.tick(), many.tick());
    }

    #[test]
    fn final_reversal_request_cancels_earlier_turn() {
        let mut once = GameState::new_with_seed(config(10, 10), 5).expect("valid config");
        once.food = Position { x: 0, y: 0 };
        let mut many = once.clone();

        once.handle_input(Direction::Left);
        many.handle_input(Direction::Up);
        many.handle_input(Direction::Left);

        let expected = once.tick();
        assert_eq!(many.tick(), expected);
        assert_eq!(expected.heading, Direction::Right);
        assert_eq!(expected.body[0], Position { x: 6, y: 5 });
    }

    #[test]
    fn wall_collision_leaves_body_untouched() {
        let mut state = GameState::new_with_seed(config(10, 10), 6).expect("valid config");
        state.snake = Snake::from_segments(cells(&[(0, 5), (1, 5), (2, 5)]), Direction::Left);
        state.food = Position { x: 9, y: 9 };

        let snapshot = state.tick();

        assert_eq!(snapshot.status, GameStatus::GameOver);
        assert_eq!(snapshot.end_reason, Some(EndReason::WallCollision));
        assert_eq!(snapshot.body, cells(&[(0, 5), (1, 5), (2, 5)]));
    }

    #[test]
    fn self_collision_sets_game_over() {
        let mut state = GameState::new_with_seed(config(10, 10), 3).expect("valid config");
        state.snake = Snake::from_segments(
            cells(&[(5, 5), (5, 4), (4, 4), (3, 4), (3, 5), (3, 6), (4, 6), (4, 5)]),
            Direction::Down,
        );
        state.food = Position { x: 9, y: 9 };
        state.handle_input(Direction::Left);

        // Left lands on the tail as it moves away; Up then hits (4,4).
        state.tick();
        assert_eq!(state.status, GameStatus::Running);

        state.handle_input(Direction::Up);
        state.tick();
        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.end_reason, Some(EndReason::SelfCollision));
    }

    #[test]
    fn loop_into_retained_tail_is_fatal() {
        let mut state = GameState::new_with_seed(config(10, 10), 3).expect("valid config");
        let looped = cells(&[(5, 5), (5, 4), (5, 3), (4, 3), (4, 4), (4, 5)]);
        state.snake = Snake::from_segments(looped.clone(), Direction::Down);
        state.snake.grow(1);
        state.food = Position { x: 9, y: 9 };

        state.handle_input(Direction::Left);
        state.tick();

        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(body(&state), looped);
    }

    #[test]
    fn chasing_the_tail_is_legal() {
        let mut state = GameState::new_with_seed(config(10, 10), 3).expect("valid config");
        state.snake = Snake::from_segments(
            cells(&[(5, 5), (5, 4), (5, 3), (4, 3), (4, 4), (4, 5)]),
            Direction::Down,
        );
        state.food = Position { x: 9, y: 9 };

        state.handle_input(Direction::Left);
        state.tick();

        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.snake.head(), Position { x: 4, y: 5 });
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        let tiny = GameConfig {
            initial_length: 2,
            ..config(3, 1)
        };
        let mut state = GameState::new_with_seed(tiny, 8).expect("valid config");
        assert_eq!(body(&state), cells(&[(1, 0), (0, 0)]));
        assert_eq!(state.food, Position { x: 2, y: 0 });

        let snapshot = state.tick();

        assert_eq!(snapshot.body.len(), 3);
        assert_eq!(snapshot.status, GameStatus::GameOver);
        assert_eq!(snapshot.end_reason, Some(EndReason::BoardFilled));
        assert_eq!(snapshot.score, 10);
    }

    #[test]
    fn ticks_after_game_over_are_no_ops() {
        let mut state = GameState::new_with_seed(config(4, 4), 2).expect("valid config");
        state.snake = Snake::new(Position { x: 3, y: 1 }, Direction::Right);
        state.food = Position { x: 0, y: 0 };

        let over = state.tick();
        let again = state.tick();
        state.handle_input(Direction::Down);

        assert_eq!(over, again);
        assert_eq!(state.tick(), over);
    }

    #[test]
    fn reset_restores_initial_shape() {
        let mut state = GameState::new_with_seed(config(10, 10), 12).expect("valid config");
        let initial = state.snapshot();
        state.snake = Snake::new(Position { x: 9, y: 0 }, Direction::Right);
        state.score = 70;
        state.tick();
        assert!(state.is_over());

        let snapshot = state.reset();

        assert_eq!(snapshot.status, GameStatus::Running);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.tick_count, 0);
        assert_eq!(snapshot.end_reason, None);
        assert_eq!(snapshot.body, initial.body);
        assert_eq!(snapshot.heading, initial.heading);
        assert!(!snapshot.body.contains(&snapshot.food));
    }

    #[test]
    fn random_play_keeps_body_unique_and_in_bounds() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let directions = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];
        let mut rng = StdRng::seed_from_u64(99);
        let mut state = GameState::new_with_seed(config(8, 6), 99).expect("valid config");

        for _ in 0..2_000 {
            if state.is_over() {
                state.reset();
            }
            state.handle_input(directions[rng.gen_range(0..directions.len())]);
            let snapshot = state.tick();
            if snapshot.status != GameStatus::Running {
                continue;
            }

            let unique: HashSet<_> = snapshot.body.iter().collect();
            assert_eq!(unique.len(), snapshot.body.len());
            assert!(snapshot.body.iter().all(|cell| cell.is_within_bounds(snapshot.bounds)));
            assert!(!unique.contains(&snapshot.food));
        }
    }
}
