//! Headless mode that plays a scripted list of moves and reports each outcome

use anyhow::{Context, Result};
use rand::Rng;
use std::path::PathBuf;
use tracing::info;

use crate::events::EventBus;
use crate::game::{ActionResult, Direction, GameConfig};
use crate::persistence::{load_snapshot, save_snapshot};
use crate::session::{Policy, ScriptedPolicy, Session};

/// Configuration for simulate mode
#[derive(Debug, Clone)]
pub struct SimulateConfig {
    /// Moves to play, in order
    pub moves: Vec<Direction>,

    /// Start from this snapshot instead of a generated layout
    pub state_path: Option<PathBuf>,

    /// Write the final state here
    pub save_path: Option<PathBuf>,

    /// Layout and food settings
    pub game_config: GameConfig,
}

impl SimulateConfig {
    pub fn new(moves: Vec<Direction>) -> Self {
        Self {
            moves,
            state_path: None,
            save_path: None,
            game_config: GameConfig::default(),
        }
    }
}

pub struct SimulateMode<R: Rng> {
    session: Session<R>,
    policy: ScriptedPolicy,
    config: SimulateConfig,
}

impl<R: Rng> SimulateMode<R> {
    pub fn new(config: SimulateConfig, rng: R) -> Result<Self> {
        let events = EventBus::new();
        let session = match &config.state_path {
            Some(path) => {
                let snapshot = load_snapshot(path)?;
                Session::from_state(config.game_config.clone(), snapshot.state, rng, events)
                    .with_context(|| format!("Invalid state in {:?}", path))?
            }
            None => Session::new(config.game_config.clone(), rng, events)?,
        };

        Ok(Self {
            session,
            policy: ScriptedPolicy::new(config.moves.clone()),
            config,
        })
    }

    /// Play every scripted move, stopping early on game over
    pub fn run(&mut self) -> Result<Vec<ActionResult>> {
        info!(moves = self.config.moves.len(), "simulation started");

        let mut results = Vec::with_capacity(self.config.moves.len());
        while self.policy.remaining() > 0 {
            let action = self.policy.choose(self.session.state());
            let Some(result) = self.session.tick(action) else {
                break;
            };
            self.print_tick(&result);
            results.push(result);
        }

        self.print_summary();

        if let Some(path) = &self.config.save_path {
            save_snapshot(self.session.state(), path)?;
            info!(path = ?path, "final state saved");
        }

        Ok(results)
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    fn print_tick(&self, result: &ActionResult) {
        println!(
            "[{:>4}] {:<5} -> {:<15} head {:<8} score {}",
            result.state.total_steps,
            result.action.to_string(),
            format!("{:?}", result.outcome),
            result.state.snake.head.to_string(),
            result.state.score
        );
    }

    fn print_summary(&self) {
        let state = self.session.state();
        let status = match self.session.game_over_reason() {
            Some(outcome) => format!("game over ({:?})", outcome),
            None => "alive".to_string(),
        };
        println!();
        println!(
            "Final: score {} | steps {} | length {} | {}",
            state.score,
            state.total_steps,
            state.snake_len(),
            status
        );
    }
}
