//! Headless mode that lets a policy play on a fixed tick
//!
//! The engine knows nothing about time; this loop supplies it. One move is
//! requested from the policy and fed to the session per tick, a finished game
//! is restarted until the requested number of games has been played, and
//! Ctrl+C stops the loop early.

use anyhow::{Context, Result};
use rand::Rng;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info};

use crate::events::{EventBus, GameEvent};
use crate::game::GameConfig;
use crate::session::{Policy, Session};

/// Configuration for autoplay mode
#[derive(Debug, Clone)]
pub struct AutoplayConfig {
    /// Number of games to play before stopping
    pub num_games: u32,

    /// Time between moves; zero runs as fast as possible
    pub tick_interval: Duration,

    /// Give up on a game after this many ticks (guards against endless loops)
    pub max_ticks_per_game: u32,

    /// Layout and food settings
    pub game_config: GameConfig,
}

impl AutoplayConfig {
    pub fn new(num_games: u32) -> Self {
        Self {
            num_games,
            tick_interval: Duration::from_millis(125),
            max_ticks_per_game: 10_000,
            game_config: GameConfig::default(),
        }
    }
}

pub struct AutoplayMode<P: Policy, R: Rng> {
    session: Session<R>,
    policy: P,
    config: AutoplayConfig,
    ticks_this_game: u32,
    should_quit: bool,
}

impl<P: Policy, R: Rng> AutoplayMode<P, R> {
    pub fn new(config: AutoplayConfig, policy: P, rng: R, events: EventBus) -> Result<Self> {
        let session = Session::new(config.game_config.clone(), rng, events)
            .context("Failed to start session")?;

        Ok(Self {
            session,
            policy,
            config,
            ticks_this_game: 0,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        info!(
            games = self.config.num_games,
            tick_ms = self.config.tick_interval.as_millis() as u64,
            "autoplay started"
        );

        let reporter = spawn_reporter(self.session.events());
        let result = self.run_game_loop().await;

        self.session.metrics_mut().update();
        println!("{}", self.session.metrics().format_summary());

        reporter.abort();
        result
    }

    async fn run_game_loop(&mut self) -> Result<()> {
        let period = self.config.tick_interval.max(Duration::from_millis(1));
        let mut tick_timer = interval(period);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = tick_timer.tick() => {
                    self.update_game()?;
                }

                _ = &mut ctrl_c => {
                    info!("interrupted");
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn update_game(&mut self) -> Result<()> {
        if self.session.is_over() || self.ticks_this_game >= self.config.max_ticks_per_game {
            if !self.session.is_over() {
                debug!(ticks = self.ticks_this_game, "tick limit reached");
                self.session.abandon();
            }

            if self.session.metrics().games_played >= self.config.num_games {
                self.should_quit = true;
                return Ok(());
            }

            self.session.restart().context("Failed to restart game")?;
            self.ticks_this_game = 0;
        }

        let action = self.policy.choose(self.session.state());
        self.session.tick(action);
        self.ticks_this_game += 1;

        Ok(())
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }
}

/// Log game-level events from the bus until the sender side goes away
fn spawn_reporter(events: &EventBus) -> JoinHandle<()> {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(GameEvent::GameOver {
                    score,
                    total_steps,
                    outcome,
                }) => match outcome {
                    Some(outcome) => println!(
                        "Game over: score {} after {} steps ({:?})",
                        score, total_steps, outcome
                    ),
                    None => println!(
                        "Game stopped: score {} after {} steps (tick limit)",
                        score, total_steps
                    ),
                },
                Ok(GameEvent::Restarted { game }) => debug!(game, "new game"),
                Ok(GameEvent::Ticked { .. }) => {}
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "reporter lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    })
}
