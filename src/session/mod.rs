//! Host-side driver around the engine
//!
//! A [`Session`] feeds one direction per tick into an [`Engine`], keeps the
//! board stocked with food, decides when a game is over, and reports what
//! happened on the [`EventBus`].

pub mod policy;

use anyhow::Result;
use rand::Rng;
use tracing::{debug, info};

use crate::events::{EventBus, GameEvent};
use crate::game::{
    ActionResult, Direction, Engine, GameConfig, GameState, Outcome, SpawnArea, StateError,
};
use crate::metrics::GameMetrics;

pub use policy::{GreedyPolicy, Policy, RandomPolicy, ScriptedPolicy};

pub struct Session<R: Rng> {
    config: GameConfig,
    engine: Engine,
    spawn_area: SpawnArea,
    rng: R,
    events: EventBus,
    metrics: GameMetrics,
    game: u32,
    over: bool,
    game_over: Option<Outcome>,
}

impl<R: Rng> Session<R> {
    /// Start a session on a freshly generated layout
    pub fn new(config: GameConfig, mut rng: R, events: EventBus) -> Result<Self> {
        config.validate().map_err(anyhow::Error::msg)?;
        let state = config.initial_state(&mut rng)?;
        let spawn_area = config.spawn_area();
        Ok(Self::with_engine(config, Engine::new(state), spawn_area, rng, events))
    }

    /// Start a session on a caller-supplied state.
    ///
    /// Food is restocked inside the state's own walls when it has any, and
    /// inside the configured grid otherwise. Restarts use the configured
    /// layout.
    pub fn from_state(
        config: GameConfig,
        state: GameState,
        rng: R,
        events: EventBus,
    ) -> Result<Self, StateError> {
        let spawn_area = SpawnArea::inside_walls(&state).unwrap_or_else(|| config.spawn_area());
        let engine = Engine::try_new(state)?;
        Ok(Self::with_engine(config, engine, spawn_area, rng, events))
    }

    fn with_engine(
        config: GameConfig,
        engine: Engine,
        spawn_area: SpawnArea,
        rng: R,
        events: EventBus,
    ) -> Self {
        let mut session = Self {
            config,
            engine,
            spawn_area,
            rng,
            events,
            metrics: GameMetrics::new(),
            game: 1,
            over: false,
            game_over: None,
        };
        session.metrics.on_game_start();
        session.events.publish(GameEvent::Restarted { game: 1 });
        session
    }

    /// Advance the current game by one move.
    ///
    /// Returns `None` once the game is over. After a scoring move a new food
    /// item is placed before the snapshot is returned, so the result already
    /// shows the restocked board.
    pub fn tick(&mut self, action: Direction) -> Option<ActionResult> {
        if self.over {
            return None;
        }

        let mut result = self.engine.advance(action);

        if result.outcome == Outcome::Scored {
            self.restock(&mut result.state);
            self.engine = Engine::new(result.state.clone());
        }

        self.metrics.record(result.outcome);
        self.events.publish(GameEvent::Ticked {
            total_steps: result.state.total_steps,
            score: result.state.score,
            outcome: result.outcome,
        });

        if result.outcome.is_game_over() {
            self.finish(Some(result.outcome));
        }

        Some(result)
    }

    /// End the current game without a collision, e.g. when the host gives up
    /// on it. Does nothing if the game is already over.
    pub fn abandon(&mut self) {
        if !self.over {
            self.finish(None);
        }
    }

    /// Throw away the current game and lay out a new one
    pub fn restart(&mut self) -> Result<(), StateError> {
        let state = self.config.initial_state(&mut self.rng)?;
        self.engine = Engine::new(state);
        self.spawn_area = self.config.spawn_area();
        self.game += 1;
        self.over = false;
        self.game_over = None;
        self.metrics.on_game_start();
        self.events.publish(GameEvent::Restarted { game: self.game });
        debug!(game = self.game, "game restarted");
        Ok(())
    }

    pub fn state(&self) -> &GameState {
        self.engine.state()
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// The collision that ended the current game; `None` while playing or
    /// after [`abandon`](Self::abandon)
    pub fn game_over_reason(&self) -> Option<Outcome> {
        self.game_over
    }

    /// Number of the current game, starting at 1
    pub fn game(&self) -> u32 {
        self.game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut GameMetrics {
        &mut self.metrics
    }

    fn restock(&mut self, state: &mut GameState) {
        let missing = self.config.food_count.saturating_sub(state.food().count());
        for _ in 0..missing {
            match self.spawn_area.spawn_food(state, &mut self.rng) {
                Some(spot) => debug!(food = %spot, "food spawned"),
                None => {
                    debug!("no free cell left for food");
                    break;
                }
            }
        }
    }

    fn finish(&mut self, outcome: Option<Outcome>) {
        let score = self.state().score;
        let total_steps = self.state().total_steps;

        self.over = true;
        self.game_over = outcome;
        self.metrics.update();
        self.metrics.on_game_over(score);
        self.events.publish(GameEvent::GameOver {
            score,
            total_steps,
            outcome,
        });
        info!(
            game = self.game,
            score,
            steps = total_steps,
            outcome = ?outcome,
            "game over"
        );
    }
}
