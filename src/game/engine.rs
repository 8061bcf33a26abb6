use std::time::Duration;

use rand::Rng;

use super::{
    config::GameConfig,
    direction::Direction,
    state::{CollisionKind, Position, Snake},
};

/// Lifecycle phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fresh board, timer not running
    Idle,
    /// Timer running, snake moving
    Playing,
    /// Timer stopped, board frozen mid-game
    Paused,
    /// Snake collided; board frozen until reset
    GameOver,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// The snake ate food this tick
    pub ate_food: bool,
    /// Set when the tick ended the game
    pub collision: Option<CollisionKind>,
    /// The tick interval shrank; the timer owner must recreate its timer
    pub speed_changed: bool,
}

/// Observers notified synchronously from within a tick
#[derive(Default)]
pub struct EngineCallbacks {
    on_score_update: Option<Box<dyn FnMut(u32)>>,
    on_game_over: Option<Box<dyn FnMut(u32)>>,
}

impl EngineCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_score_update(mut self, callback: impl FnMut(u32) + 'static) -> Self {
        self.on_score_update = Some(Box::new(callback));
        self
    }

    pub fn on_game_over(mut self, callback: impl FnMut(u32) + 'static) -> Self {
        self.on_game_over = Some(Box::new(callback));
        self
    }
}

/// Read-only view of the board for rendering
#[derive(Debug, Clone, Copy)]
pub struct BoardSnapshot<'a> {
    pub grid_size: usize,
    pub segments: &'a [Position],
    pub heading: Direction,
    pub food: Position,
    pub score: u32,
    pub phase: Phase,
}

/// The game simulation: a phase machine advanced by `tick`
///
/// All mutable game entities (snake, food, directions, score, speed) are
/// fields of the engine, so independent instances never share state. The
/// engine does not own a timer; the host drives `tick` and reads
/// `tick_interval` to pace it, recreating its timer whenever a tick reports
/// `speed_changed` or a lifecycle call changes the phase.
pub struct GameEngine {
    config: GameConfig,
    phase: Phase,
    snake: Snake,
    food: Position,
    /// Direction applied during the most recent tick
    committed: Direction,
    /// Direction queued by input, applied at the next tick's start
    pending: Option<Direction>,
    score: u32,
    tick_ms: u64,
    rng: rand::rngs::ThreadRng,
    callbacks: EngineCallbacks,
}

impl GameEngine {
    /// Create an engine with a freshly reset board in the Idle phase
    pub fn new(config: GameConfig) -> Self {
        let mut engine = Self {
            phase: Phase::Idle,
            snake: Snake::new(Position::new(0, 0), Direction::Right, 1),
            food: Position::new(0, 0),
            committed: Direction::Right,
            pending: None,
            score: 0,
            tick_ms: config.initial_tick_ms,
            rng: rand::thread_rng(),
            callbacks: EngineCallbacks::default(),
            config,
        };
        engine.reset();
        engine
    }

    /// Register observers; replaces any previously registered set
    pub fn set_callbacks(&mut self, callbacks: EngineCallbacks) {
        self.callbacks = callbacks;
    }

    /// Hard-reset every entity and return to Idle
    ///
    /// Snake back at the grid center heading Right, score 0, speed back to
    /// the initial interval, fresh food. Callable from any phase; the host's
    /// timer must not outlive this call.
    pub fn reset(&mut self) {
        let center = (self.config.grid_size / 2) as i32;
        self.snake = Snake::new(
            Position::new(center, center),
            Direction::Right,
            self.config.initial_snake_length,
        );
        self.committed = Direction::Right;
        self.pending = None;
        self.score = 0;
        self.tick_ms = self.config.initial_tick_ms;
        self.food = self.place_food();
        self.phase = Phase::Idle;
    }

    /// Begin play
    ///
    /// From Idle the board is already fresh and is kept as-is; from GameOver
    /// the board is reset first. A no-op while Playing or Paused.
    pub fn start(&mut self) {
        match self.phase {
            Phase::Playing | Phase::Paused => {}
            Phase::GameOver => {
                self.reset();
                self.phase = Phase::Playing;
            }
            Phase::Idle => self.phase = Phase::Playing,
        }
    }

    /// Strict Playing/Paused toggle; a no-op from Idle or GameOver
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            other => other,
        };
    }

    /// Queue a direction for the next tick
    ///
    /// The input is validated against the committed direction, not the
    /// pending one: a reversal of the direction the snake actually moved in
    /// last tick is silently dropped, while later inputs in the same tick
    /// window freely overwrite an earlier pending value. See the
    /// `rapid_inputs_*` tests for the edge this validation order leaves open.
    pub fn queue_direction(&mut self, direction: Direction) {
        if !self.committed.is_opposite(direction) {
            self.pending = Some(direction);
        }
    }

    /// Advance the simulation by one step
    ///
    /// Meaningful only while Playing; in any other phase this is a no-op
    /// returning a default outcome. Callbacks fire synchronously from here.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Playing {
            return TickOutcome::default();
        }

        if let Some(direction) = self.pending.take() {
            self.committed = direction;
        }

        let candidate = self.snake.head().step(self.committed);

        // The tail has not been popped yet, so the candidate is checked
        // against the full current body.
        let collision = if !self.in_bounds(candidate) {
            Some(CollisionKind::Wall)
        } else if self.snake.occupies(candidate) {
            Some(CollisionKind::Body)
        } else {
            None
        };

        if let Some(kind) = collision {
            self.phase = Phase::GameOver;
            let final_score = self.score;
            if let Some(callback) = self.callbacks.on_game_over.as_mut() {
                callback(final_score);
            }
            return TickOutcome {
                ate_food: false,
                collision: Some(kind),
                speed_changed: false,
            };
        }

        let ate_food = candidate == self.food;
        self.snake.advance(candidate, ate_food);

        let mut speed_changed = false;
        if ate_food {
            self.score += self.config.score_per_food;
            let score = self.score;
            if let Some(callback) = self.callbacks.on_score_update.as_mut() {
                callback(score);
            }
            if self.tick_ms > self.config.min_tick_ms {
                self.tick_ms = self
                    .tick_ms
                    .saturating_sub(self.config.speedup_per_food_ms)
                    .max(self.config.min_tick_ms);
                speed_changed = true;
            }
            self.food = self.place_food();
        }

        TickOutcome {
            ate_food,
            collision: None,
            speed_changed,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current pacing of the tick timer
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Board view for the renderer; pure, no simulation effects
    pub fn snapshot(&self) -> BoardSnapshot<'_> {
        BoardSnapshot {
            grid_size: self.config.grid_size,
            segments: self.snake.segments(),
            heading: self.committed,
            food: self.food,
            score: self.score,
            phase: self.phase,
        }
    }

    fn in_bounds(&self, pos: Position) -> bool {
        let side = self.config.grid_size as i32;
        pos.x >= 0 && pos.x < side && pos.y >= 0 && pos.y < side
    }

    /// Sample an unoccupied cell uniformly at random
    ///
    /// Rejection sampling without an iteration bound: the snake never comes
    /// close to filling the grid in practice, and full-grid completion is not
    /// handled.
    fn place_food(&mut self) -> Position {
        loop {
            let x = self.rng.gen_range(0..self.config.grid_size) as i32;
            let y = self.rng.gen_range(0..self.config.grid_size) as i32;
            let pos = Position::new(x, y);
            if !self.snake.occupies(pos) {
                return pos;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, food: Position) {
        self.food = food;
    }

    #[cfg(test)]
    pub(crate) fn set_snake(&mut self, snake: Snake, heading: Direction) {
        self.snake = snake;
        self.committed = heading;
        self.pending = None;
    }

    #[cfg(test)]
    pub(crate) fn snake(&self) -> &Snake {
        &self.snake
    }

    #[cfg(test)]
    pub(crate) fn food(&self) -> Position {
        self.food
    }
}
